//! Itinerary state and transport-selection engine
//!
//! The engine is pure over explicit arguments: the selection store and the
//! aggregation take the segment list and selections as inputs, so everything
//! here is testable without a rendering harness or a network.

mod ingest;
mod selection;
mod totals;

pub use ingest::TripState;
pub use selection::{MAX_OCCUPANCY, MIN_OCCUPANCY, SelectionState, seed_defaults};
pub use totals::{SegmentChoice, TripTotals, compute_totals, format_duration};
