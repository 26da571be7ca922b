//! Domain types for trip planning
//!
//! The data model mirrors what the conversational backend produces: an
//! ordered list of destinations plus the segments connecting consecutive
//! destinations, each segment carrying one cost profile per transport mode.

mod itinerary;
mod transport;

pub use itinerary::{CarbonImpact, Destination, Itinerary, Segment};
pub use transport::{TransportMode, TransportOption};
