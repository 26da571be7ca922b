//! Transport modes and per-mode cost profiles

use serde::{Deserialize, Serialize};

/// Inter-city transport mode
///
/// Serialized lowercase on the wire. The backend labels the air mode
/// `flight` while the UI calls it `plane`; both spellings deserialize to
/// [`TransportMode::Plane`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Car,
    Train,
    #[serde(alias = "flight")]
    Plane,
    Bus,
}

impl TransportMode {
    /// Human-readable name for display
    pub fn label(&self) -> &'static str {
        match self {
            Self::Car => "Car",
            Self::Train => "Train",
            Self::Plane => "Flight",
            Self::Bus => "Bus",
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Car => write!(f, "car"),
            Self::Train => write!(f, "train"),
            Self::Plane => write!(f, "plane"),
            Self::Bus => write!(f, "bus"),
        }
    }
}

/// One mode's cost profile for a segment
///
/// Immutable once ingested, except `carbon_kg` on the car option which the
/// emission recalculation service may overwrite when occupancy changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportOption {
    /// Transport mode this profile describes
    pub mode: TransportMode,

    /// Estimated door-to-door travel time in hours
    pub duration_hours: f64,

    /// Estimated CO2 emissions in kilograms
    pub carbon_kg: f64,

    /// Routed travel distance in kilometers
    pub distance_km: f64,
}
