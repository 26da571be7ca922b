//! External collaborators
//!
//! The engine consults two services it does not own: the conversational
//! backend that turns free-text input into itinerary updates, and the
//! emission recalculation service that re-prices car emissions when the
//! passenger count changes. Both are consumed through traits so the runner
//! is testable without a network.

mod chat;
mod emissions;
mod error;
mod types;

pub use chat::{ChatClient, ConversationBridge};
pub use emissions::{EmissionService, EmissionsClient};
pub use error::BridgeError;
pub use types::{ChatResponse, City, ConversationEntry, ItineraryPayload, RecalcResponse, Role};
