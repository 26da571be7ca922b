//! EcoTrip - sustainable multi-city trip planning
//!
//! EcoTrip pairs a conversational travel assistant with a transport-selection
//! engine: the assistant (an external backend) turns free-text input into an
//! itinerary, and the engine picks the lowest-carbon transport option per
//! leg, lets the user override it, and re-aggregates total travel time and
//! CO₂ on every change.
//!
//! # Core Concepts
//!
//! - **Eco-defaults**: every leg starts on its minimal-emission option
//! - **First-empty-wins seeding**: user overrides survive itinerary updates
//! - **Lazy totals**: aggregation is a pure read, never cached state
//! - **Apply-time validity**: async recalculation results are checked against
//!   the current itinerary, not tracked with cancellation tokens
//!
//! # Modules
//!
//! - [`domain`] - destinations, segments and transport options
//! - [`trip`] - selection store, aggregation and ingestion engine
//! - [`bridge`] - conversational backend and emission service clients
//! - [`tui`] - chat transcript and trip summary terminal interface
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod bridge;
pub mod cli;
pub mod config;
pub mod domain;
pub mod trip;
pub mod tui;

// Re-export commonly used types
pub use bridge::{
    BridgeError, ChatClient, ChatResponse, City, ConversationBridge, ConversationEntry, EmissionService,
    EmissionsClient, ItineraryPayload,
};
pub use config::{BackendConfig, ChatConfig, Config, EmissionsConfig};
pub use domain::{CarbonImpact, Destination, Itinerary, Segment, TransportMode, TransportOption};
pub use trip::{
    MAX_OCCUPANCY, MIN_OCCUPANCY, SegmentChoice, SelectionState, TripState, TripTotals, compute_totals,
    format_duration, seed_defaults,
};
