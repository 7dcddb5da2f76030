//! UI rendering for the terminal user interface.
//!
//! `draw` paints one frame with `ratatui` and returns the `ScreenAreas` it
//! used, which the runtime hands to mouse hit-testing.

mod layout;

pub use layout::*;

use ratatui::{
    Frame,
    layout::Alignment,
    style::{Modifier, Style},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::config::{ControlsSettings, UiSettings};
use crate::player::{Controller, MediaBackend, PlaybackState};

/// Key bindings in the order they are shown in the footer.
const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("enter", "play selected song"),
    ("space/p", "play/pause"),
    ("h/l", "prev/next song"),
    ("1-9", "catalog"),
    ("b", "catalogs panel"),
    ("q", "quit"),
];

/// Render the controls help text, incorporating the configured steps.
fn controls_text(controls: &ControlsSettings) -> String {
    let mut parts: Vec<String> = CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect();
    parts.insert(
        4,
        format!("[H/L] seek -/+{}s", controls.seek_step_seconds),
    );
    parts.insert(5, format!("[-/+] volume -/+{}%", controls.volume_step));
    parts.join(" | ")
}

fn state_icon(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Idle => "■",
        PlaybackState::Playing => "▶",
        PlaybackState::Paused => "⏸",
    }
}

/// Status line: indicator, now-playing label, elapsed/total.
fn status_text<B: MediaBackend>(controller: &Controller<B>, ui: &UiSettings) -> String {
    let mut parts = vec![state_icon(controller.state()).to_string()];
    match controller.now_playing() {
        Some(np) => parts.push(np.label(&ui.now_playing_separator)),
        None => parts.push("Nothing playing".to_string()),
    }
    parts.push(controller.readout().label(&ui.time_separator));
    if controller.is_loading() {
        parts.push("loading…".to_string());
    }
    parts.join(" • ")
}

/// Render the entire UI into `frame` and return the areas it drew into.
pub fn draw<B: MediaBackend>(
    frame: &mut Frame,
    app: &App,
    controller: &Controller<B>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) -> ScreenAreas {
    let sources = controller.sources().sources();
    let areas = screen_areas(frame.area(), app.side_panel_open, sources.len());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, areas.header);
    if !app.side_panel_open {
        frame.render_widget(Paragraph::new("≡"), areas.menu_button);
    }

    // Catalog cards
    if let Some(panel) = areas.side_panel {
        frame.render_widget(
            Block::default().borders(Borders::ALL).title(" catalogs "),
            panel,
        );
        if let Some(close) = areas.panel_close {
            frame.render_widget(Paragraph::new("[x]"), close);
        }
        for (i, (card, source)) in areas.cards.iter().zip(sources).enumerate() {
            let active = controller.active_source() == Some(source.key.as_str());
            let style = if active {
                Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
            } else {
                Style::default()
            };
            let label = if i < 9 {
                format!("{} {}", i + 1, source.title)
            } else {
                source.title.clone()
            };
            let card_widget = Paragraph::new(label)
                .style(style)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(card_widget, *card);
        }
    }

    // Track list: only the visible window is built, and row k of the
    // window is catalog index `start + k`.
    {
        let entries = controller.entries();
        let playing = controller.current_index();
        let (start, end) = list_window(
            entries.len(),
            areas.list_rows.height as usize,
            app.cursor,
        );
        let items: Vec<ListItem> = entries[start..end]
            .iter()
            .map(|e| {
                let marker = if Some(e.index) == playing {
                    "♪"
                } else {
                    " "
                };
                ListItem::new(format!(
                    "{marker} ▶ play  {}{}{}  {}",
                    e.title, ui_settings.now_playing_separator, e.artist, e.duration
                ))
            })
            .collect();

        let title = match controller.active_source() {
            Some(key) => format!(" tracks: {key} "),
            None => " tracks ".to_string(),
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let mut state = ListState::default();
        if end > start {
            state.select(Some(app.cursor.clamp(start, end - 1) - start));
        }
        frame.render_stateful_widget(list, areas.list, &mut state);
    }

    // Status
    let status = Paragraph::new(status_text(controller, ui_settings))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status, areas.status);

    // Transport
    frame.render_widget(Block::default().borders(Borders::ALL), areas.transport);
    frame.render_widget(Paragraph::new("|◀"), areas.prev_button);
    let play_label = if controller.state() == PlaybackState::Playing {
        "⏸"
    } else {
        "▶"
    };
    frame.render_widget(Paragraph::new(play_label), areas.play_button);
    frame.render_widget(Paragraph::new("▶|"), areas.next_button);

    let readout = controller.readout();
    let seek = Gauge::default()
        .gauge_style(Style::default().add_modifier(Modifier::BOLD))
        .ratio((readout.fill_percent / 100.0).clamp(0.0, 1.0))
        .label(readout.label(&ui_settings.time_separator));
    frame.render_widget(seek, areas.seek_bar);

    let volume = Gauge::default()
        .ratio(f64::from(controller.volume()) / 100.0)
        .label(format!("vol {}%", controller.volume()));
    frame.render_widget(volume, areas.volume);

    // Footer
    let footer = Paragraph::new(controls_text(controls_settings))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, areas.footer);

    areas
}
