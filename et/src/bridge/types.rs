//! Wire types for the conversational backend and the emission service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Segment;

/// Speaker of a conversation history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the conversation history sent with each chat request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A city record inside an assistant-produced itinerary payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// Itinerary data attached to a chat response
///
/// `segments` may be absent when the backend could not compute transport
/// options (e.g. a single-city itinerary).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItineraryPayload {
    pub cities: Vec<City>,

    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// Chat response from the conversational backend
///
/// Absence of `itinerary` means "no trip-state change this turn".
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Assistant reply text (markdown)
    pub response: String,

    /// Full-replacement itinerary, when this turn produced one
    #[serde(default)]
    pub itinerary: Option<ItineraryPayload>,
}

/// Error body the backend returns with a non-2xx status
#[derive(Debug, Deserialize)]
pub struct BackendErrorBody {
    pub error: String,
}

/// Emission recalculation response
#[derive(Debug, Clone, Deserialize)]
pub struct RecalcResponse {
    pub carbon_kg: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransportMode;

    #[test]
    fn test_chat_response_without_itinerary() {
        let json = r#"{"response": "Which cities would you like to visit?"}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(response.itinerary.is_none());
    }

    #[test]
    fn test_chat_response_with_itinerary() {
        let json = r#"{
            "response": "Here's your optimized eco-friendly itinerary:",
            "itinerary": {
                "cities": [
                    {"name": "New York City, NY", "lat": 40.7128, "lng": -74.0060},
                    {"name": "Chicago, IL", "lat": 41.8781, "lng": -87.6298}
                ],
                "segments": [{
                    "from": "New York City, NY",
                    "to": "Chicago, IL",
                    "transport_options": [
                        {"mode": "train", "duration_hours": 11.2, "carbon_kg": 62.9, "distance_km": 1533.4}
                    ]
                }],
                "total_segments": 1
            }
        }"#;

        let response: ChatResponse = serde_json::from_str(json).unwrap();
        let payload = response.itinerary.unwrap();
        assert_eq!(payload.cities.len(), 2);
        assert_eq!(payload.segments.len(), 1);
        assert_eq!(payload.segments[0].transport_options[0].mode, TransportMode::Train);
    }

    #[test]
    fn test_conversation_entry_roles_serialize_lowercase() {
        let entry = ConversationEntry::user("hello");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"role\":\"user\""));

        let entry = ConversationEntry::assistant("hi");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"role\":\"assistant\""));
    }

    #[test]
    fn test_recalc_response() {
        let response: RecalcResponse = serde_json::from_str(r#"{"carbon_kg": 25.0}"#).unwrap();
        assert_eq!(response.carbon_kg, 25.0);
    }
}
