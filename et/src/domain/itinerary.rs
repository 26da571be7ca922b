//! Itinerary, destination and segment types
//!
//! An itinerary arrives atomically from the conversational backend and is
//! replaced wholesale on every update; destinations and segments are never
//! merged field by field.

use serde::{Deserialize, Serialize};

use super::{TransportMode, TransportOption};

/// A city on the itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    /// Position-derived id, 1..N, stable across updates of the same list
    pub id: u32,

    /// Display name, e.g. "Denver, CO"
    pub name: String,

    /// Latitude in degrees
    pub lat: f64,

    /// Longitude in degrees
    pub lng: f64,
}

/// One directed leg between two consecutive destinations
///
/// Segments are addressed by their index in the itinerary's segment list;
/// there is no other stable key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Departure city name
    pub from: String,

    /// Arrival city name
    pub to: String,

    /// Available transport modes with their cost profiles (mode-unique)
    #[serde(default)]
    pub transport_options: Vec<TransportOption>,

    /// Great-circle distance the backend computed, for reference only
    #[serde(default)]
    pub direct_distance_km: Option<f64>,
}

impl Segment {
    /// Look up the option for a given mode
    pub fn option_for(&self, mode: TransportMode) -> Option<&TransportOption> {
        self.transport_options.iter().find(|o| o.mode == mode)
    }

    /// The car option, if this segment is drivable
    pub fn car_option(&self) -> Option<&TransportOption> {
        self.option_for(TransportMode::Car)
    }

    /// Mutable access to the car option (emission recalculation patches it in place)
    pub fn car_option_mut(&mut self) -> Option<&mut TransportOption> {
        self.transport_options.iter_mut().find(|o| o.mode == TransportMode::Car)
    }
}

/// Display-only summary of the trip's carbon impact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonImpact {
    pub value: f64,
    pub unit: String,
    pub savings: String,
}

/// The full trip: ordered destinations plus the segments connecting them
///
/// `segments` may be absent or empty (single-city trip, or an assistant
/// response without transport data); the engine treats that as
/// valid-but-sparse, never as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    /// Ordered list of cities
    #[serde(default)]
    pub destinations: Vec<Destination>,

    /// Segments connecting consecutive destinations, in order
    #[serde(default)]
    pub segments: Vec<Segment>,

    /// Coarse overall-trip label: the mode that is eco-default for the most
    /// segments. Plays no role in per-segment accounting.
    pub transportation: TransportMode,

    /// Optional backend-supplied impact summary
    #[serde(default, rename = "carbonImpact")]
    pub carbon_impact: Option<CarbonImpact>,
}

impl Default for Itinerary {
    fn default() -> Self {
        Self {
            destinations: Vec::new(),
            segments: Vec::new(),
            transportation: TransportMode::Car,
            carbon_impact: None,
        }
    }
}
