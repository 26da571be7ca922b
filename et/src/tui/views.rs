//! TUI views and rendering
//!
//! All rendering logic is contained here. The views module draws the UI
//! based on AppState; the only state it writes back is render-derived
//! (scroll bounds and the trip panel fault flag). Each panel region renders
//! through a boundary that degrades to a placeholder instead of letting a
//! fault escape, so a broken region never takes down the rest of the UI.

use eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tracing::warn;

use crate::domain::TransportMode;
use crate::trip::{compute_totals, format_duration, seed_defaults};

use super::state::{AppState, ChatRole, FocusPane};

/// Panel colors
mod colors {
    use ratatui::style::Color;

    pub const USER: Color = Color::Rgb(0, 255, 127); // Spring green
    pub const ASSISTANT: Color = Color::Rgb(100, 149, 237); // Cornflower blue
    pub const ERROR: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const ECO: Color = Color::Rgb(50, 205, 50); // Lime green
    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const METRIC: Color = Color::Rgb(255, 215, 0); // Gold
    pub const DIM: Color = Color::DarkGray;
    pub const SELECTED_BG: Color = Color::Rgb(40, 40, 40);
}

/// Quick suggestions shown while the transcript only has the greeting
const QUICK_SUGGESTIONS: &[&str] = &[
    "Plan a cross-country US route",
    "Show me eco-friendly hotels",
    "Calculate carbon footprint",
    "Suggest green activities",
];

/// Main render function
pub fn render(state: &mut AppState, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(state, frame, chunks[0]);

    // Chat on the left, trip summary on the right
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    render_chat(state, frame, panels[0]);
    render_trip(state, frame, panels[1]);

    render_footer(state, frame, chunks[2]);

    if state.show_help {
        render_help_overlay(frame, frame.area());
    }
}

/// Render header with title and pane tabs
fn render_header(state: &AppState, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled("EcoTrip", Style::default().fg(colors::ECO).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled("sustainable travel planning", Style::default().fg(colors::DIM)),
        Span::raw("   "),
    ];

    for (pane, label) in [(FocusPane::Chat, " Chat "), (FocusPane::Trip, " Trip ")] {
        let style = if state.focus == pane {
            Style::default().fg(Color::Black).bg(colors::HEADER)
        } else {
            Style::default().fg(colors::HEADER)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

/// Render the chat pane: transcript plus input box
fn render_chat(state: &mut AppState, frame: &mut Frame, area: Rect) {
    let border_style = if state.focus == FocusPane::Chat {
        Style::default().fg(colors::HEADER)
    } else {
        Style::default().fg(colors::DIM)
    };
    let block = Block::default().borders(Borders::ALL).title("Chat").border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let mut lines: Vec<Line> = Vec::new();
    for msg in &state.chat_history {
        match msg.role {
            ChatRole::User => {
                for (i, content_line) in msg.content.lines().enumerate() {
                    let prefix = if i == 0 { "> " } else { "  " };
                    lines.push(Line::from(vec![
                        Span::styled(prefix, Style::default().fg(colors::USER).add_modifier(Modifier::BOLD)),
                        Span::styled(content_line, Style::default().fg(colors::USER)),
                    ]));
                }
            }
            ChatRole::Assistant => {
                // Assistant replies are markdown
                let markdown_text = tui_markdown::from_str(&msg.content);
                for line in markdown_text.lines.iter() {
                    let mut spans = vec![Span::raw("  ")];
                    spans.extend(line.spans.iter().cloned());
                    lines.push(Line::from(spans));
                }
            }
            ChatRole::Error => {
                for (i, content_line) in msg.content.lines().enumerate() {
                    let prefix = if i == 0 { "! " } else { "  " };
                    lines.push(Line::from(vec![
                        Span::styled(prefix, Style::default().fg(colors::ERROR).add_modifier(Modifier::BOLD)),
                        Span::styled(content_line, Style::default().fg(colors::ERROR)),
                    ]));
                }
            }
        }
        lines.push(Line::from(""));
    }

    if state.chat_history.len() <= 1 {
        lines.push(Line::from(Span::styled("Quick suggestions:", Style::default().fg(colors::DIM))));
        for suggestion in QUICK_SUGGESTIONS {
            lines.push(Line::from(Span::styled(format!("  · {}", suggestion), Style::default().fg(colors::DIM))));
        }
        lines.push(Line::from(""));
    }

    if state.waiting {
        let elapsed = state.waiting_since.map(|t| t.elapsed().as_secs()).unwrap_or(0);
        lines.push(Line::from(Span::styled(
            format!("* {}... ({}s)", state.typing_word, elapsed),
            Style::default().fg(colors::ASSISTANT),
        )));
    }

    let max_scroll = lines.len().saturating_sub(rows[0].height as usize);
    let scroll = max_scroll.saturating_sub(state.chat_scroll.min(max_scroll));
    let transcript = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));
    frame.render_widget(transcript, rows[0]);
    state.chat_max_scroll = max_scroll;

    // Input line with a block cursor while the chat pane has focus
    let cursor = if state.focus == FocusPane::Chat { "█" } else { "" };
    let input = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(colors::USER)),
        Span::raw(state.input.clone()),
        Span::styled(cursor, Style::default().fg(colors::USER)),
    ]));
    frame.render_widget(input, rows[1]);
}

/// Render the trip panel through its fault boundary
///
/// A render fault flips the panel into a placeholder with a retry hint
/// instead of propagating; the chat pane keeps working either way.
fn render_trip(state: &mut AppState, frame: &mut Frame, area: Rect) {
    if state.trip_panel_fault {
        render_trip_fallback(frame, area);
        return;
    }

    if let Err(error) = try_render_trip(state, frame, area) {
        warn!(%error, "trip panel render failed, degrading to placeholder");
        state.trip_panel_fault = true;
        render_trip_fallback(frame, area);
    }
}

/// Placeholder shown when the trip panel faulted
fn render_trip_fallback(frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Trip Summary");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let message = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("Trip data unavailable.", Style::default().fg(colors::ERROR))),
        Line::from(Span::styled("Press r (trip pane) to retry.", Style::default().fg(colors::DIM))),
    ])
    .wrap(Wrap { trim: false });
    frame.render_widget(message, inner);
}

/// Render the trip summary: destinations, totals, per-leg breakdown
fn try_render_trip(state: &AppState, frame: &mut Frame, area: Rect) -> Result<()> {
    let border_style = if state.focus == FocusPane::Trip {
        Style::default().fg(colors::HEADER)
    } else {
        Style::default().fg(colors::DIM)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Trip Summary")
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let itinerary = &state.trip.itinerary;
    let mut lines: Vec<Line> = Vec::new();

    if itinerary.destinations.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "No trip yet — ask the assistant to plan one.",
            Style::default().fg(colors::DIM),
        )));
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);
        return Ok(());
    }

    for (position, destination) in itinerary.destinations.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!(" {}. ", position + 1), Style::default().fg(colors::HEADER)),
            Span::raw(destination.name.clone()),
        ]));
    }
    lines.push(Line::from(""));

    let totals = compute_totals(&itinerary.segments, &state.selection);
    if totals.has_data {
        lines.push(Line::from(vec![
            Span::styled("Travel time  ", Style::default().fg(colors::DIM)),
            Span::styled(
                format_duration(totals.total_duration),
                Style::default().fg(colors::METRIC).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   CO₂  ", Style::default().fg(colors::DIM)),
            Span::styled(
                format!("{} kg", totals.total_emissions),
                Style::default().fg(colors::ECO).add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(""));
    }

    let eco_defaults = seed_defaults(&itinerary.segments);
    for (index, segment) in itinerary.segments.iter().enumerate() {
        let selected = state.focus == FocusPane::Trip && index == state.selected_segment;
        let row_style = if selected {
            Style::default().bg(colors::SELECTED_BG)
        } else {
            Style::default()
        };

        lines.push(
            Line::from(vec![
                Span::styled(if selected { "❯ " } else { "  " }, Style::default().fg(colors::HEADER)),
                Span::styled(
                    format!("{} → {}", segment.from, segment.to),
                    row_style.add_modifier(Modifier::BOLD),
                ),
            ])
            .style(row_style),
        );

        match state.selection.mode_for(index).and_then(|mode| segment.option_for(mode)) {
            Some(option) => {
                let occupancy = state.selection.occupancy_for(index);
                let mut spans = vec![
                    Span::raw("    "),
                    Span::styled(option.mode.label(), Style::default().fg(colors::METRIC)),
                    Span::styled(
                        format!("  {}  {} kg CO₂", format_duration(option.duration_hours), option.carbon_kg),
                        Style::default().fg(colors::DIM),
                    ),
                ];
                if option.mode == TransportMode::Car {
                    spans.push(Span::styled(
                        format!("  · {} aboard", occupancy),
                        Style::default().fg(colors::DIM),
                    ));
                }
                lines.push(Line::from(spans).style(row_style));
            }
            None => {
                // Stale or missing selection: the leg contributes nothing
                lines.push(
                    Line::from(Span::styled("    no transport selected", Style::default().fg(colors::DIM)))
                        .style(row_style),
                );
            }
        }

        // Expand the option comparison for the leg under the cursor
        if selected {
            let chosen = state.selection.mode_for(index);
            for option in &segment.transport_options {
                let marker = if chosen == Some(option.mode) { "● " } else { "○ " };
                let mut spans = vec![
                    Span::raw("      "),
                    Span::styled(marker, Style::default().fg(colors::HEADER)),
                    Span::raw(format!(
                        "{:<7} {:>8}  {:>7.1} kg",
                        option.mode.label(),
                        format_duration(option.duration_hours),
                        option.carbon_kg,
                    )),
                ];
                if eco_defaults.get(&index) == Some(&option.mode) {
                    spans.push(Span::styled("  eco", Style::default().fg(colors::ECO)));
                }
                lines.push(Line::from(spans).style(row_style));
            }
            if segment.car_option().is_some() {
                lines.push(
                    Line::from(Span::styled(
                        format!("      occupancy {} (+/- to adjust)", state.selection.occupancy_for(index)),
                        Style::default().fg(colors::DIM),
                    ))
                    .style(row_style),
                );
            }
        }
    }

    if let Some(impact) = &itinerary.carbon_impact {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(format!("{} {}", impact.value, impact.unit), Style::default().fg(colors::ECO)),
            Span::styled(format!("  {}", impact.savings), Style::default().fg(colors::DIM)),
        ]));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
    Ok(())
}

/// Render footer with status message or context-sensitive keybinds
fn render_footer(state: &AppState, frame: &mut Frame, area: Rect) {
    let line = if let Some(status) = &state.status {
        Line::from(Span::styled(status.clone(), Style::default().fg(colors::ERROR)))
    } else {
        let hints = match state.focus {
            FocusPane::Chat => "Enter send · Tab trip pane · ↑/↓ scroll · Ctrl+C quit",
            FocusPane::Trip => "↑/↓ leg · ←/→ transport · +/- occupancy · r retry · ? help · Tab chat · q quit",
        };
        Line::from(Span::styled(hints, Style::default().fg(colors::DIM)))
    };

    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Render the help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 50, area);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from(Span::styled("EcoTrip keys", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("  Tab        switch between chat and trip panes"),
        Line::from("  Enter      send the chat message"),
        Line::from("  ↑/↓        scroll transcript / move between legs"),
        Line::from("  ←/→        cycle the selected leg's transport"),
        Line::from("  +/-        adjust car occupancy (1-7)"),
        Line::from("  r          retry a failed trip panel"),
        Line::from("  q          quit (trip pane)"),
        Line::from("  Ctrl+C     quit from anywhere"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Style::default().fg(colors::DIM))),
    ];

    let help = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: false });
    frame.render_widget(help, popup);
}

/// Centered popup rect, percentage-sized
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
