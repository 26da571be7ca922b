//! Per-segment transport selection store
//!
//! Tracks the user's chosen mode (and car occupancy) per segment index.
//! Defaults come from [`seed_defaults`] and are applied only while the store
//! is empty; once the user has made any choice, itinerary updates must not
//! clobber it.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{Segment, TransportMode};

/// Minimum car occupancy (driver alone)
pub const MIN_OCCUPANCY: u8 = 1;

/// Maximum car occupancy
pub const MAX_OCCUPANCY: u8 = 7;

/// Pick the eco-default mode for every segment that has transport options
///
/// The default is the option with minimal `carbon_kg`; ties break to the
/// earliest-listed option (left-to-right reduction with strict `<`).
/// Segments without options are omitted from the result. Pure function;
/// the caller decides whether to apply it.
pub fn seed_defaults(segments: &[Segment]) -> HashMap<usize, TransportMode> {
    let mut defaults = HashMap::new();

    for (index, segment) in segments.iter().enumerate() {
        let mut best: Option<&crate::domain::TransportOption> = None;
        for option in &segment.transport_options {
            match best {
                None => best = Some(option),
                Some(current) if option.carbon_kg < current.carbon_kg => best = Some(option),
                Some(_) => {}
            }
        }
        if let Some(option) = best {
            defaults.insert(index, option.mode);
        }
    }

    defaults
}

/// The user's current per-segment choices
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    /// Chosen transport mode per segment index
    modes: HashMap<usize, TransportMode>,

    /// Chosen car occupancy per segment index (absent means 1)
    occupancy: HashMap<usize, u8>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no mode has been chosen for any segment
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Seed eco-defaults, but only while the store is empty
    ///
    /// This guard is the consistency rule that keeps user choices alive
    /// across itinerary updates with the same segment list.
    pub fn ensure_seeded(&mut self, segments: &[Segment]) {
        if !self.is_empty() {
            debug!("ensure_seeded: store not empty, keeping existing selections");
            return;
        }
        self.modes = seed_defaults(segments);
        debug!(seeded = self.modes.len(), "ensure_seeded: seeded eco-defaults");
    }

    /// Clear all choices (next `ensure_seeded` will re-seed)
    pub fn reset(&mut self) {
        debug!("SelectionState::reset: called");
        self.modes.clear();
        self.occupancy.clear();
    }

    /// The chosen mode for a segment, if any
    pub fn mode_for(&self, index: usize) -> Option<TransportMode> {
        self.modes.get(&index).copied()
    }

    /// Override the chosen mode for one segment; all others are untouched
    ///
    /// Callers only offer modes present in the segment's options, so the
    /// mode is not validated here. Totals are derived lazily.
    pub fn set_mode(&mut self, index: usize, mode: TransportMode) {
        debug!(index, %mode, "SelectionState::set_mode: called");
        self.modes.insert(index, mode);
    }

    /// The chosen car occupancy for a segment (defaults to 1)
    pub fn occupancy_for(&self, index: usize) -> u8 {
        self.occupancy.get(&index).copied().unwrap_or(MIN_OCCUPANCY)
    }

    /// Set the car occupancy for one segment
    ///
    /// Returns false (and leaves the store unchanged) when the value is out
    /// of the 1..=7 range.
    pub fn set_occupancy(&mut self, index: usize, occupancy: u8) -> bool {
        if !(MIN_OCCUPANCY..=MAX_OCCUPANCY).contains(&occupancy) {
            debug!(index, occupancy, "SelectionState::set_occupancy: out of range");
            return false;
        }
        debug!(index, occupancy, "SelectionState::set_occupancy: called");
        self.occupancy.insert(index, occupancy);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransportOption;

    fn option(mode: TransportMode, carbon_kg: f64) -> TransportOption {
        TransportOption {
            mode,
            duration_hours: 1.0,
            carbon_kg,
            distance_km: 100.0,
        }
    }

    fn segment(options: Vec<TransportOption>) -> Segment {
        Segment {
            from: "A".to_string(),
            to: "B".to_string(),
            transport_options: options,
            direct_distance_km: None,
        }
    }

    #[test]
    fn test_seed_defaults_picks_minimal_carbon() {
        let segments = vec![segment(vec![
            option(TransportMode::Car, 120.0),
            option(TransportMode::Train, 40.0),
            option(TransportMode::Bus, 90.0),
        ])];

        let defaults = seed_defaults(&segments);
        assert_eq!(defaults.get(&0), Some(&TransportMode::Train));
    }

    #[test]
    fn test_seed_defaults_tie_breaks_to_first_listed() {
        let segments = vec![segment(vec![
            option(TransportMode::Bus, 40.0),
            option(TransportMode::Train, 40.0),
        ])];

        let defaults = seed_defaults(&segments);
        assert_eq!(defaults.get(&0), Some(&TransportMode::Bus));
    }

    #[test]
    fn test_seed_defaults_omits_optionless_segments() {
        let segments = vec![
            segment(vec![]),
            segment(vec![option(TransportMode::Train, 40.0)]),
        ];

        let defaults = seed_defaults(&segments);
        assert!(!defaults.contains_key(&0));
        assert_eq!(defaults.get(&1), Some(&TransportMode::Train));
    }

    #[test]
    fn test_ensure_seeded_only_when_empty() {
        let segments = vec![segment(vec![
            option(TransportMode::Car, 120.0),
            option(TransportMode::Train, 40.0),
        ])];

        let mut selection = SelectionState::new();
        selection.ensure_seeded(&segments);
        assert_eq!(selection.mode_for(0), Some(TransportMode::Train));

        // User override followed by a re-arrival of the same segment list:
        // the override must survive
        selection.set_mode(0, TransportMode::Car);
        selection.ensure_seeded(&segments);
        assert_eq!(selection.mode_for(0), Some(TransportMode::Car));
    }

    #[test]
    fn test_set_mode_leaves_other_segments_alone() {
        let mut selection = SelectionState::new();
        selection.set_mode(0, TransportMode::Train);
        selection.set_mode(1, TransportMode::Bus);

        selection.set_mode(0, TransportMode::Plane);

        assert_eq!(selection.mode_for(0), Some(TransportMode::Plane));
        assert_eq!(selection.mode_for(1), Some(TransportMode::Bus));
    }

    #[test]
    fn test_occupancy_defaults_to_one() {
        let selection = SelectionState::new();
        assert_eq!(selection.occupancy_for(0), 1);
    }

    #[test]
    fn test_set_occupancy_rejects_out_of_range() {
        let mut selection = SelectionState::new();
        assert!(!selection.set_occupancy(0, 0));
        assert!(!selection.set_occupancy(0, 8));
        assert_eq!(selection.occupancy_for(0), 1);

        assert!(selection.set_occupancy(0, 4));
        assert_eq!(selection.occupancy_for(0), 4);
        assert!(selection.set_occupancy(0, 7));
        assert_eq!(selection.occupancy_for(0), 7);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut selection = SelectionState::new();
        selection.set_mode(0, TransportMode::Train);
        selection.set_occupancy(0, 3);

        selection.reset();
        assert!(selection.is_empty());
        assert_eq!(selection.occupancy_for(0), 1);
    }
}
