//! TUI runner - main loop that owns the terminal and the async boundary
//!
//! The TuiRunner is responsible for:
//! - Rendering at each event (tick, key, mouse)
//! - Dispatching queued chat submissions as background tasks
//! - Dispatching queued occupancy changes to the emission service
//! - Applying asynchronous results with validity checks (a recalculation
//!   response that outlived its segment is discarded, never applied)
//!
//! All state mutation happens on this loop; the spawned tasks only perform
//! the network call and report back over channels, so there is never a
//! concurrent writer to the itinerary or the selection store.

use std::sync::Arc;
use std::time::Duration;

use eyre::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::bridge::{ChatResponse, ConversationBridge, ConversationEntry, EmissionService};
use crate::config::Config;

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::state::{ChatMessage, FocusPane, OccupancyChange};
use super::views;

/// Result from the background chat task
#[derive(Debug)]
enum ChatTaskResult {
    /// Backend replied
    Response(ChatResponse),
    /// Request failed after retries
    Error(String),
}

/// Result from a background recalculation task
#[derive(Debug)]
struct RecalcOutcome {
    segment_index: usize,
    occupancy: u8,
    result: Result<f64, String>,
}

/// TUI runner that manages the terminal and event loop
pub struct TuiRunner {
    /// Application state and key handling
    app: App,
    /// Terminal handle
    terminal: Tui,
    /// Event handler
    event_handler: EventHandler,
    /// Conversational backend
    bridge: Arc<dyn ConversationBridge>,
    /// Emission recalculation service
    emissions: Arc<dyn EmissionService>,
    /// Wire-format conversation history (windowed by the client per request)
    conversation: Vec<ConversationEntry>,
    /// Receiver for the in-flight chat task result
    chat_result_rx: Option<mpsc::Receiver<ChatTaskResult>>,
    /// Handle to the in-flight chat task
    chat_task: Option<JoinHandle<()>>,
    /// Shared sender for recalculation outcomes (many tasks may be in flight)
    recalc_tx: mpsc::Sender<RecalcOutcome>,
    /// Receiver for recalculation outcomes
    recalc_rx: mpsc::Receiver<RecalcOutcome>,
}

impl TuiRunner {
    /// Create a new runner
    pub fn new(
        terminal: Tui,
        config: &Config,
        bridge: Arc<dyn ConversationBridge>,
        emissions: Arc<dyn EmissionService>,
    ) -> Self {
        debug!("TuiRunner::new: called");
        let (recalc_tx, recalc_rx) = mpsc::channel(16);

        Self {
            app: App::new(&config.chat.greeting),
            terminal,
            event_handler: EventHandler::new(Duration::from_millis(33)), // ~30 FPS
            bridge,
            emissions,
            conversation: Vec::new(),
            chat_result_rx: None,
            chat_task: None,
            recalc_tx,
            recalc_rx,
        }
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> Result<()> {
        debug!("TuiRunner::run: entering main loop");
        loop {
            self.terminal.draw(|frame| views::render(self.app.state_mut(), frame))?;

            match self.event_handler.next().await? {
                Event::Tick => self.handle_tick(),
                Event::Key(key) => {
                    if self.app.handle_key(key) {
                        break;
                    }
                }
                Event::Mouse(mouse) => self.handle_mouse(mouse),
                Event::Resize(_, _) => {}
            }

            if self.app.state().should_quit {
                debug!("TuiRunner::run: should_quit is true, breaking");
                break;
            }
        }

        debug!("TuiRunner::run: exiting");
        Ok(())
    }

    /// Handle tick event - dispatch queued work, drain async results
    fn handle_tick(&mut self) {
        if let Some(input) = self.app.state_mut().pending_submit.take() {
            self.start_chat_request(&input);
        }
        self.process_chat_results();

        if let Some(change) = self.app.state_mut().pending_occupancy.take() {
            self.start_recalculation(change);
        }
        self.process_recalc_results();
    }

    /// Start a chat request in a background task
    fn start_chat_request(&mut self, input: &str) {
        debug!(input_len = input.len(), "TuiRunner::start_chat_request: called");
        if self.app.state().waiting {
            warn!("TuiRunner::start_chat_request: already waiting on the assistant");
            self.app
                .state_mut()
                .chat_history
                .push(ChatMessage::error("Please wait for the current reply to arrive."));
            return;
        }

        self.app.state_mut().chat_history.push(ChatMessage::user(input));
        self.conversation.push(ConversationEntry::user(input));
        self.app.state_mut().start_waiting();

        let (result_tx, result_rx) = mpsc::channel::<ChatTaskResult>(1);
        self.chat_result_rx = Some(result_rx);

        let bridge = Arc::clone(&self.bridge);
        let message = input.to_string();
        let trip = self.app.state().trip.itinerary.clone();
        let history = self.conversation.clone();

        self.chat_task = Some(tokio::spawn(async move {
            let result = match bridge.send(&message, &trip, &history).await {
                Ok(response) => ChatTaskResult::Response(response),
                Err(e) => ChatTaskResult::Error(e.to_string()),
            };
            let _ = result_tx.send(result).await;
        }));
    }

    /// Drain chat task results (non-blocking)
    fn process_chat_results(&mut self) {
        let results: Vec<ChatTaskResult> = match &mut self.chat_result_rx {
            Some(rx) => std::iter::from_fn(|| rx.try_recv().ok()).collect(),
            None => return,
        };

        for result in results {
            match result {
                ChatTaskResult::Response(response) => {
                    info!(
                        has_itinerary = response.itinerary.is_some(),
                        "TuiRunner::process_chat_results: reply received"
                    );
                    self.conversation.push(ConversationEntry::assistant(&response.response));

                    let state = self.app.state_mut();
                    state.finish_waiting();
                    state.chat_history.push(ChatMessage::assistant(&response.response));

                    if let Some(payload) = response.itinerary {
                        state.trip.apply_assistant_itinerary(payload);
                        // First-empty-wins: an existing selection survives the update
                        state.selection.ensure_seeded(&state.trip.itinerary.segments);
                        state.clamp_selected_segment();
                        if state.focus == FocusPane::Chat && state.segment_count() > 0 {
                            state.set_status("Itinerary updated — Tab to choose transport per leg".to_string());
                        }
                    }
                    self.finish_chat();
                }
                ChatTaskResult::Error(err) => {
                    warn!(%err, "TuiRunner::process_chat_results: chat request failed");
                    // Upstream failures surface in the transcript; trip state is untouched
                    let state = self.app.state_mut();
                    state.finish_waiting();
                    state
                        .chat_history
                        .push(ChatMessage::error(format!("The assistant is unavailable: {}", err)));
                    self.finish_chat();
                }
            }
        }
    }

    /// Tear down the chat task bookkeeping
    fn finish_chat(&mut self) {
        self.chat_result_rx = None;
        self.chat_task = None;
    }

    /// Dispatch an occupancy change to the emission service
    ///
    /// The occupancy choice itself was already recorded by the key handler;
    /// only the emission figure depends on the service. Fire-and-forget: no
    /// cancellation of superseded requests, staleness is handled when the
    /// response is applied.
    fn start_recalculation(&mut self, change: OccupancyChange) {
        let distance_km = self
            .app
            .state()
            .trip
            .itinerary
            .segments
            .get(change.segment_index)
            .and_then(|segment| segment.car_option())
            .map(|option| option.distance_km);

        let Some(distance_km) = distance_km else {
            debug!(
                segment_index = change.segment_index,
                "TuiRunner::start_recalculation: segment not drivable, skipping"
            );
            return;
        };

        info!(
            segment_index = change.segment_index,
            occupancy = change.occupancy,
            distance_km,
            "TuiRunner::start_recalculation: dispatching"
        );

        let emissions = Arc::clone(&self.emissions);
        let tx = self.recalc_tx.clone();
        tokio::spawn(async move {
            let result = emissions
                .recalculate(change.segment_index, change.occupancy, distance_km)
                .await
                .map_err(|e| e.to_string());
            let _ = tx
                .send(RecalcOutcome {
                    segment_index: change.segment_index,
                    occupancy: change.occupancy,
                    result,
                })
                .await;
        });
    }

    /// Drain recalculation outcomes (non-blocking)
    fn process_recalc_results(&mut self) {
        let outcomes: Vec<RecalcOutcome> = std::iter::from_fn(|| self.recalc_rx.try_recv().ok()).collect();

        for outcome in outcomes {
            match outcome.result {
                Ok(carbon_kg) => {
                    // Validity check at apply time: the segment must still
                    // exist and carry a car option
                    if self.app.state_mut().trip.apply_car_emissions(outcome.segment_index, carbon_kg) {
                        debug!(
                            segment_index = outcome.segment_index,
                            occupancy = outcome.occupancy,
                            carbon_kg,
                            "TuiRunner::process_recalc_results: applied"
                        );
                    } else {
                        debug!(
                            segment_index = outcome.segment_index,
                            "TuiRunner::process_recalc_results: stale response discarded"
                        );
                    }
                }
                Err(err) => {
                    // Prior emission value is retained; the occupancy choice stands
                    warn!(
                        segment_index = outcome.segment_index,
                        %err,
                        "TuiRunner::process_recalc_results: recalculation failed"
                    );
                    self.app
                        .state_mut()
                        .set_status(format!("Emissions update failed: {}", err));
                }
            }
        }
    }

    /// Handle mouse event - scroll the transcript
    fn handle_mouse(&mut self, mouse: crossterm::event::MouseEvent) {
        use crossterm::event::MouseEventKind;

        let state = self.app.state_mut();
        let max = state.chat_max_scroll;
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                state.chat_scroll = (state.chat_scroll + 3).min(max);
            }
            MouseEventKind::ScrollDown => {
                state.chat_scroll = state.chat_scroll.saturating_sub(3);
            }
            _ => {}
        }
    }
}
