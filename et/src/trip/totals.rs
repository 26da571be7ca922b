//! Trip total aggregation
//!
//! Totals are derived lazily from the segment list and the current
//! selections on every read; nothing is cached. Segments whose chosen mode
//! is missing or no longer offered contribute nothing and never fail the
//! aggregation.

use crate::domain::{Segment, TransportMode, TransportOption};

use super::SelectionState;

/// One contributing segment's chosen option, for the per-leg breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentChoice {
    /// Departure city name
    pub from: String,

    /// Arrival city name
    pub to: String,

    /// The mode currently chosen for this leg
    pub mode: TransportMode,

    /// Duration of the chosen option in hours
    pub duration_hours: f64,

    /// Emissions of the chosen option in kg CO2
    pub carbon_kg: f64,

    /// Distance of the chosen option in km
    pub distance_km: f64,

    /// Every option offered for this leg, for the comparison list
    pub all_options: Vec<TransportOption>,
}

/// Aggregated totals over the whole trip
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripTotals {
    /// Sum of chosen durations in hours, rounded to one decimal
    pub total_duration: f64,

    /// Sum of chosen emissions in kg CO2, rounded to one decimal
    pub total_emissions: f64,

    /// False while the itinerary has no segments yet; not an error
    pub has_data: bool,

    /// Contributing segments in itinerary order
    pub breakdown: Vec<SegmentChoice>,
}

/// Round to one decimal place, half away from zero on the final sum
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Aggregate total duration and emissions over the currently chosen options
///
/// Empty or absent segments yield `has_data == false` with zero totals.
/// A segment whose selection is missing, or whose chosen mode is no longer
/// present in its options (stale selection after the option list changed),
/// is silently skipped. Rounding happens once on each sum, not per term.
pub fn compute_totals(segments: &[Segment], selection: &SelectionState) -> TripTotals {
    if segments.is_empty() {
        return TripTotals::default();
    }

    let mut total_duration = 0.0;
    let mut total_emissions = 0.0;
    let mut breakdown = Vec::new();

    for (index, segment) in segments.iter().enumerate() {
        let Some(mode) = selection.mode_for(index) else {
            continue;
        };
        let Some(option) = segment.option_for(mode) else {
            // Stale selection: the chosen mode vanished from the option list
            continue;
        };

        total_duration += option.duration_hours;
        total_emissions += option.carbon_kg;

        breakdown.push(SegmentChoice {
            from: segment.from.clone(),
            to: segment.to.clone(),
            mode,
            duration_hours: option.duration_hours,
            carbon_kg: option.carbon_kg,
            distance_km: option.distance_km,
            all_options: segment.transport_options.clone(),
        });
    }

    TripTotals {
        total_duration: round1(total_duration),
        total_emissions: round1(total_emissions),
        has_data: true,
        breakdown,
    }
}

/// Format an hour count the way the trip summary displays it
///
/// Under an hour: whole minutes. Under a day: hours plus minutes, minutes
/// omitted when zero. A day or more: days plus hours, hours omitted when
/// zero.
pub fn format_duration(hours: f64) -> String {
    if hours < 1.0 {
        format!("{}min", (hours * 60.0).round() as i64)
    } else if hours < 24.0 {
        let whole = hours.floor();
        let minutes = ((hours - whole) * 60.0).round() as i64;
        if minutes > 0 {
            format!("{}h {}min", whole as i64, minutes)
        } else {
            format!("{}h", whole as i64)
        }
    } else {
        let days = (hours / 24.0).floor() as i64;
        let remainder = (hours % 24.0).round() as i64;
        if remainder > 0 {
            format!("{}d {}h", days, remainder)
        } else {
            format!("{}d", days)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransportOption;
    use proptest::prelude::*;

    fn option(mode: TransportMode, duration_hours: f64, carbon_kg: f64) -> TransportOption {
        TransportOption {
            mode,
            duration_hours,
            carbon_kg,
            distance_km: 500.0,
        }
    }

    fn segment(from: &str, to: &str, options: Vec<TransportOption>) -> Segment {
        Segment {
            from: from.to_string(),
            to: to.to_string(),
            transport_options: options,
            direct_distance_km: None,
        }
    }

    #[test]
    fn test_empty_segments_no_data() {
        let totals = compute_totals(&[], &SelectionState::new());
        assert!(!totals.has_data);
        assert_eq!(totals.total_duration, 0.0);
        assert_eq!(totals.total_emissions, 0.0);
        assert!(totals.breakdown.is_empty());
    }

    #[test]
    fn test_single_segment_eco_default() {
        // SF -> Denver: car 120kg/14h, train 40kg/18h, bus 90kg/20h
        let segments = vec![segment(
            "San Francisco, CA",
            "Denver, CO",
            vec![
                option(TransportMode::Car, 14.0, 120.0),
                option(TransportMode::Train, 18.0, 40.0),
                option(TransportMode::Bus, 20.0, 90.0),
            ],
        )];

        let mut selection = SelectionState::new();
        selection.ensure_seeded(&segments);
        assert_eq!(selection.mode_for(0), Some(TransportMode::Train));

        let totals = compute_totals(&segments, &selection);
        assert!(totals.has_data);
        assert_eq!(totals.total_emissions, 40.0);
        assert_eq!(totals.total_duration, 18.0);
        assert_eq!(totals.breakdown.len(), 1);
        assert_eq!(totals.breakdown[0].mode, TransportMode::Train);
        assert_eq!(totals.breakdown[0].all_options.len(), 3);
    }

    #[test]
    fn test_stale_selection_is_skipped() {
        let segments = vec![
            segment("A", "B", vec![option(TransportMode::Train, 2.0, 10.0)]),
            segment("B", "C", vec![option(TransportMode::Bus, 3.0, 20.0)]),
        ];

        let mut selection = SelectionState::new();
        selection.set_mode(0, TransportMode::Train);
        // Segment 1's chosen mode no longer exists in its options
        selection.set_mode(1, TransportMode::Plane);

        let totals = compute_totals(&segments, &selection);
        assert!(totals.has_data);
        assert_eq!(totals.total_duration, 2.0);
        assert_eq!(totals.total_emissions, 10.0);
        assert_eq!(totals.breakdown.len(), 1);
        assert_eq!(totals.breakdown[0].from, "A");
    }

    #[test]
    fn test_unselected_segment_is_skipped() {
        let segments = vec![segment("A", "B", vec![option(TransportMode::Train, 2.0, 10.0)])];

        let totals = compute_totals(&segments, &SelectionState::new());
        assert!(totals.has_data);
        assert_eq!(totals.total_duration, 0.0);
        assert!(totals.breakdown.is_empty());
    }

    #[test]
    fn test_rounding_happens_on_the_sum() {
        // Each term rounds to 0.0 on its own; the sum does not
        let segments = vec![
            segment("A", "B", vec![option(TransportMode::Train, 0.04, 0.04)]),
            segment("B", "C", vec![option(TransportMode::Train, 0.04, 0.04)]),
            segment("C", "D", vec![option(TransportMode::Train, 0.04, 0.04)]),
        ];

        let mut selection = SelectionState::new();
        selection.ensure_seeded(&segments);

        let totals = compute_totals(&segments, &selection);
        assert_eq!(totals.total_duration, 0.1);
        assert_eq!(totals.total_emissions, 0.1);
    }

    #[test]
    fn test_idempotent() {
        let segments = vec![segment(
            "A",
            "B",
            vec![
                option(TransportMode::Car, 14.0, 120.0),
                option(TransportMode::Train, 18.0, 40.0),
            ],
        )];
        let mut selection = SelectionState::new();
        selection.ensure_seeded(&segments);

        let first = compute_totals(&segments, &selection);
        let second = compute_totals(&segments, &selection);
        assert_eq!(first, second);
    }

    #[test]
    fn test_breakdown_preserves_segment_order() {
        let segments = vec![
            segment("A", "B", vec![option(TransportMode::Train, 1.0, 1.0)]),
            segment("B", "C", vec![option(TransportMode::Bus, 2.0, 2.0)]),
            segment("C", "D", vec![option(TransportMode::Car, 3.0, 3.0)]),
        ];
        let mut selection = SelectionState::new();
        selection.ensure_seeded(&segments);

        let totals = compute_totals(&segments, &selection);
        let route: Vec<&str> = totals.breakdown.iter().map(|c| c.from.as_str()).collect();
        assert_eq!(route, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.5), "30min");
        assert_eq!(format_duration(0.017), "1min");
        assert_eq!(format_duration(1.0), "1h");
        assert_eq!(format_duration(2.5), "2h 30min");
        assert_eq!(format_duration(18.0), "18h");
        assert_eq!(format_duration(24.0), "1d");
        assert_eq!(format_duration(30.0), "1d 6h");
        assert_eq!(format_duration(48.0), "2d");
    }

    proptest! {
        // The total equals rounding the exact sum, never a sum of pre-rounded terms
        #[test]
        fn prop_total_is_rounded_exact_sum(durations in prop::collection::vec(0.0f64..100.0, 1..8)) {
            let segments: Vec<Segment> = durations
                .iter()
                .enumerate()
                .map(|(i, &d)| segment(&format!("C{}", i), &format!("C{}", i + 1),
                                       vec![option(TransportMode::Train, d, d)]))
                .collect();

            let mut selection = SelectionState::new();
            selection.ensure_seeded(&segments);

            let totals = compute_totals(&segments, &selection);
            let exact: f64 = durations.iter().sum();
            prop_assert_eq!(totals.total_duration, round1(exact));
        }
    }
}
