//! TUI application state
//!
//! Pure data structures for the TUI. No rendering logic here. The trip
//! engine state (itinerary + selections) lives inside [`AppState`] and is
//! only mutated from key handling and runner callbacks, never from views.

use std::time::Instant;

use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::trip::{MAX_OCCUPANCY, MIN_OCCUPANCY, SelectionState, TripState};

/// Words for the typing indicator while the assistant works
pub const TYPING_WORDS: &[&str] = &[
    "Routing",
    "Mapping",
    "Plotting",
    "Charting",
    "Weighing",
    "Measuring",
    "Optimizing",
];

/// Which pane has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusPane {
    /// Typing into the chat input
    #[default]
    Chat,
    /// Navigating the trip summary (legs, transport, occupancy)
    Trip,
}

impl FocusPane {
    /// Get the other pane (Tab toggles)
    pub fn next(self) -> Self {
        match self {
            Self::Chat => Self::Trip,
            Self::Trip => Self::Chat,
        }
    }
}

/// Chat transcript message role
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
    Error,
}

/// Chat transcript message for display
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Error,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Occupancy change queued for the runner to dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupancyChange {
    pub segment_index: usize,
    pub occupancy: u8,
}

/// Application state
pub struct AppState {
    /// Chat transcript (greeting, user messages, replies, errors)
    pub chat_history: Vec<ChatMessage>,

    /// Current chat input buffer
    pub input: String,

    /// True while a chat request is in flight
    pub waiting: bool,

    /// Typing-indicator word chosen for the in-flight request
    pub typing_word: String,

    /// When the in-flight request started
    pub waiting_since: Option<Instant>,

    /// The current itinerary (exclusively owned here)
    pub trip: TripState,

    /// Per-segment transport and occupancy choices
    pub selection: SelectionState,

    /// Which pane has keyboard focus
    pub focus: FocusPane,

    /// Cursor into the segment list (trip pane navigation)
    pub selected_segment: usize,

    /// Lines scrolled up from the transcript bottom
    pub chat_scroll: usize,

    /// Upper bound for `chat_scroll`, set during rendering
    pub chat_max_scroll: usize,

    /// User input submitted but not yet dispatched by the runner
    pub pending_submit: Option<String>,

    /// Occupancy change not yet dispatched by the runner
    pub pending_occupancy: Option<OccupancyChange>,

    /// Transient status line (cleared on next key press)
    pub status: Option<String>,

    /// Set when the trip panel failed to render; 'r' clears it
    pub trip_panel_fault: bool,

    /// Help overlay visible
    pub show_help: bool,

    /// Exit requested
    pub should_quit: bool,
}

impl AppState {
    /// Create the initial state with the assistant greeting in the transcript
    pub fn new(greeting: &str) -> Self {
        Self {
            chat_history: vec![ChatMessage::assistant(greeting)],
            input: String::new(),
            waiting: false,
            typing_word: String::new(),
            waiting_since: None,
            trip: TripState::default(),
            selection: SelectionState::new(),
            focus: FocusPane::default(),
            selected_segment: 0,
            chat_scroll: 0,
            chat_max_scroll: 0,
            pending_submit: None,
            pending_occupancy: None,
            status: None,
            trip_panel_fault: false,
            show_help: false,
            should_quit: false,
        }
    }

    /// Mark a chat request as in flight and pick a typing-indicator word
    pub fn start_waiting(&mut self) {
        debug!("AppState::start_waiting: called");
        self.waiting = true;
        self.waiting_since = Some(Instant::now());
        let mut rng = rand::rng();
        self.typing_word = TYPING_WORDS.choose(&mut rng).unwrap_or(&"Thinking").to_string();
    }

    /// Clear the in-flight chat request state
    pub fn finish_waiting(&mut self) {
        debug!("AppState::finish_waiting: called");
        self.waiting = false;
        self.waiting_since = None;
    }

    /// Set a transient status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Clear the transient status message
    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Number of segments in the current itinerary
    pub fn segment_count(&self) -> usize {
        self.trip.itinerary.segments.len()
    }

    /// Keep the segment cursor inside the current segment list
    pub fn clamp_selected_segment(&mut self) {
        let count = self.segment_count();
        if count == 0 {
            self.selected_segment = 0;
        } else if self.selected_segment >= count {
            self.selected_segment = count - 1;
        }
    }

    /// Queue the current input for submission (no-op while a request is in flight)
    pub fn submit_input(&mut self) {
        let message = self.input.trim().to_string();
        if message.is_empty() {
            return;
        }
        debug!(len = message.len(), "AppState::submit_input: queueing message");
        self.pending_submit = Some(message);
        self.input.clear();
        self.chat_scroll = 0;
    }

    /// Step the selected segment's chosen mode through its option list
    ///
    /// Only modes the segment actually offers are reachable, which keeps the
    /// selection invariant without defensive validation downstream.
    pub fn cycle_mode(&mut self, step: isize) {
        let index = self.selected_segment;
        let Some(segment) = self.trip.itinerary.segments.get(index) else {
            return;
        };
        let options = &segment.transport_options;
        if options.is_empty() {
            return;
        }

        let position = self
            .selection
            .mode_for(index)
            .and_then(|mode| options.iter().position(|o| o.mode == mode));
        let next = match position {
            Some(p) => (p as isize + step).rem_euclid(options.len() as isize) as usize,
            None => 0,
        };

        debug!(index, mode = %options[next].mode, "AppState::cycle_mode: selecting");
        self.selection.set_mode(index, options[next].mode);
    }

    /// Adjust car occupancy for the selected segment
    ///
    /// No-op when the segment has no car option. The occupancy choice is
    /// recorded immediately; the emission recalculation is queued for the
    /// runner and applied whenever its response arrives.
    pub fn adjust_occupancy(&mut self, delta: i8) {
        let index = self.selected_segment;
        let Some(segment) = self.trip.itinerary.segments.get(index) else {
            return;
        };
        if segment.car_option().is_none() {
            debug!(index, "AppState::adjust_occupancy: segment not drivable, ignoring");
            return;
        }

        let current = self.selection.occupancy_for(index);
        let target = (current as i16 + delta as i16).clamp(MIN_OCCUPANCY as i16, MAX_OCCUPANCY as i16) as u8;
        if target == current {
            return;
        }

        self.selection.set_occupancy(index, target);
        self.pending_occupancy = Some(OccupancyChange {
            segment_index: index,
            occupancy: target,
        });
        debug!(index, occupancy = target, "AppState::adjust_occupancy: queued recalculation");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Segment, TransportMode, TransportOption};

    fn option(mode: TransportMode) -> TransportOption {
        TransportOption {
            mode,
            duration_hours: 2.0,
            carbon_kg: 50.0,
            distance_km: 300.0,
        }
    }

    fn state_with_segment(options: Vec<TransportOption>) -> AppState {
        let mut state = AppState::new("hello");
        state.trip.itinerary.segments.push(Segment {
            from: "A".to_string(),
            to: "B".to_string(),
            transport_options: options,
            direct_distance_km: None,
        });
        state
    }

    #[test]
    fn test_submit_ignores_blank_input() {
        let mut state = AppState::new("hello");
        state.input = "   ".to_string();
        state.submit_input();
        assert!(state.pending_submit.is_none());
    }

    #[test]
    fn test_submit_trims_and_clears() {
        let mut state = AppState::new("hello");
        state.input = "  Plan a trip  ".to_string();
        state.submit_input();
        assert_eq!(state.pending_submit.as_deref(), Some("Plan a trip"));
        assert!(state.input.is_empty());
    }

    #[test]
    fn test_cycle_mode_wraps_through_options() {
        let mut state = state_with_segment(vec![
            option(TransportMode::Car),
            option(TransportMode::Train),
            option(TransportMode::Bus),
        ]);

        state.cycle_mode(1);
        assert_eq!(state.selection.mode_for(0), Some(TransportMode::Car));
        state.cycle_mode(1);
        assert_eq!(state.selection.mode_for(0), Some(TransportMode::Train));
        state.cycle_mode(-1);
        assert_eq!(state.selection.mode_for(0), Some(TransportMode::Car));
        state.cycle_mode(-1);
        assert_eq!(state.selection.mode_for(0), Some(TransportMode::Bus));
    }

    #[test]
    fn test_adjust_occupancy_requires_car_option() {
        let mut state = state_with_segment(vec![option(TransportMode::Train)]);
        state.adjust_occupancy(1);
        assert!(state.pending_occupancy.is_none());
        assert_eq!(state.selection.occupancy_for(0), 1);
    }

    #[test]
    fn test_adjust_occupancy_clamps_to_range() {
        let mut state = state_with_segment(vec![option(TransportMode::Car)]);

        state.adjust_occupancy(-1);
        assert!(state.pending_occupancy.is_none(), "already at minimum, nothing queued");

        for _ in 0..10 {
            state.adjust_occupancy(1);
        }
        assert_eq!(state.selection.occupancy_for(0), MAX_OCCUPANCY);
        assert_eq!(
            state.pending_occupancy,
            Some(OccupancyChange {
                segment_index: 0,
                occupancy: MAX_OCCUPANCY
            })
        );
    }

    #[test]
    fn test_clamp_selected_segment() {
        let mut state = state_with_segment(vec![option(TransportMode::Car)]);
        state.selected_segment = 5;
        state.clamp_selected_segment();
        assert_eq!(state.selected_segment, 0);

        state.trip.itinerary.segments.clear();
        state.clamp_selected_segment();
        assert_eq!(state.selected_segment, 0);
    }
}
