//! Trip state container and itinerary ingestion
//!
//! The [`TripState`] exclusively owns the current [`Itinerary`]. New
//! itineraries arrive atomically from the conversational backend and replace
//! the previous destinations and segments wholesale.

use tracing::debug;

use crate::bridge::ItineraryPayload;
use crate::domain::{Destination, Itinerary, TransportMode};

use super::seed_defaults;

/// Top-level container owning the current itinerary
#[derive(Debug, Clone, Default)]
pub struct TripState {
    pub itinerary: Itinerary,
}

impl TripState {
    /// True once the assistant has produced at least one destination
    pub fn has_itinerary(&self) -> bool {
        !self.itinerary.destinations.is_empty()
    }

    /// Replace the itinerary with an assistant-produced one
    ///
    /// Destinations are re-indexed 1..N by position; position, not any
    /// external id, is authoritative. Segments pass through verbatim. The
    /// overall `transportation` label is derived from the segment
    /// eco-defaults. The display-only carbon impact note survives until the
    /// backend sends a new one.
    pub fn apply_assistant_itinerary(&mut self, payload: ItineraryPayload) {
        debug!(
            cities = payload.cities.len(),
            segments = payload.segments.len(),
            "apply_assistant_itinerary: called"
        );

        let destinations = payload
            .cities
            .into_iter()
            .enumerate()
            .map(|(position, city)| Destination {
                id: (position + 1) as u32,
                name: city.name,
                lat: city.lat,
                lng: city.lng,
            })
            .collect();

        let transportation = overall_transportation(&payload.segments);
        debug!(%transportation, "apply_assistant_itinerary: derived overall mode");

        self.itinerary = Itinerary {
            destinations,
            segments: payload.segments,
            transportation,
            carbon_impact: self.itinerary.carbon_impact.take(),
        };
    }

    /// Apply a recalculated car emission value for one segment
    ///
    /// Validity is checked at apply time: the index must still refer to a
    /// car-bearing segment, otherwise the (stale) value is discarded and
    /// false is returned. Only the car option's `carbon_kg` changes.
    pub fn apply_car_emissions(&mut self, segment_index: usize, carbon_kg: f64) -> bool {
        let Some(option) = self
            .itinerary
            .segments
            .get_mut(segment_index)
            .and_then(|segment| segment.car_option_mut())
        else {
            debug!(segment_index, "apply_car_emissions: segment gone or not drivable, discarding");
            return false;
        };

        debug!(segment_index, carbon_kg, "apply_car_emissions: patching car option");
        option.carbon_kg = carbon_kg;
        true
    }
}

/// Derive the coarse overall-trip mode from segment eco-defaults
///
/// The mode that is the eco-default for the greatest number of segments
/// wins; ties break to the mode encountered first while scanning defaults
/// in segment order. Falls back to car when no segment has options.
fn overall_transportation(segments: &[crate::domain::Segment]) -> TransportMode {
    let defaults = seed_defaults(segments);

    // Insertion order records which mode was seen first
    let mut counts: Vec<(TransportMode, usize)> = Vec::new();
    for index in 0..segments.len() {
        if let Some(&mode) = defaults.get(&index) {
            match counts.iter_mut().find(|(m, _)| *m == mode) {
                Some((_, count)) => *count += 1,
                None => counts.push((mode, 1)),
            }
        }
    }

    let mut winner = None;
    for &(mode, count) in &counts {
        match winner {
            Some((_, best)) if count <= best => {}
            _ => winner = Some((mode, count)),
        }
    }

    winner.map(|(mode, _)| mode).unwrap_or(TransportMode::Car)
}
