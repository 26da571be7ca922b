//! TUI application - event handling and state management
//!
//! The App struct owns the AppState and handles all keyboard events.
//! It does not do any rendering - that's delegated to the views module.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use super::state::{AppState, FocusPane};

/// TUI application
pub struct App {
    /// Application state
    state: AppState,
}

impl App {
    /// Create a new application instance
    pub fn new(greeting: &str) -> Self {
        debug!("App::new: called");
        Self {
            state: AppState::new(greeting),
        }
    }

    /// Get reference to state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get mutable reference to state
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_key: called");
        // Clear any transient status message on key press
        self.state.clear_status();

        // Any key dismisses the help overlay
        if self.state.show_help {
            debug!("App::handle_key: dismissing help overlay");
            self.state.show_help = false;
            return false;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                debug!("App::handle_key: Ctrl+C force quit");
                return true;
            }
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) => {
                debug!("App::handle_key: toggling focus pane");
                self.state.focus = self.state.focus.next();
            }
            _ => match self.state.focus {
                FocusPane::Chat => self.handle_chat_key(key),
                FocusPane::Trip => self.handle_trip_key(key),
            },
        }

        false
    }

    /// Handle key while the chat input has focus
    fn handle_chat_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                debug!("App::handle_chat_key: submit");
                self.state.submit_input();
            }
            KeyCode::Backspace => {
                self.state.input.pop();
            }
            KeyCode::Esc => {
                debug!("App::handle_chat_key: clearing input");
                self.state.input.clear();
            }
            KeyCode::Up => {
                let max = self.state.chat_max_scroll;
                self.state.chat_scroll = (self.state.chat_scroll + 1).min(max);
            }
            KeyCode::Down => {
                self.state.chat_scroll = self.state.chat_scroll.saturating_sub(1);
            }
            KeyCode::Char(c) => {
                self.state.input.push(c);
            }
            _ => {}
        }
    }

    /// Handle key while the trip summary has focus
    fn handle_trip_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                debug!("App::handle_trip_key: quit requested");
                self.state.should_quit = true;
            }
            KeyCode::Char('?') => {
                debug!("App::handle_trip_key: showing help");
                self.state.show_help = true;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.selected_segment = self.state.selected_segment.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.state.selected_segment + 1 < self.state.segment_count() {
                    self.state.selected_segment += 1;
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                debug!("App::handle_trip_key: previous transport option");
                self.state.cycle_mode(-1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                debug!("App::handle_trip_key: next transport option");
                self.state.cycle_mode(1);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                debug!("App::handle_trip_key: occupancy up");
                self.state.adjust_occupancy(1);
            }
            KeyCode::Char('-') => {
                debug!("App::handle_trip_key: occupancy down");
                self.state.adjust_occupancy(-1);
            }
            KeyCode::Char('r') => {
                debug!("App::handle_trip_key: retrying trip panel render");
                self.state.trip_panel_fault = false;
            }
            _ => {}
        }
    }
}
