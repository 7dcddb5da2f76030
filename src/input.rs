//! Decoding of key presses and mouse clicks into `Action`s.
//!
//! Clicks are resolved against the `ScreenAreas` of the last drawn frame.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Position, Rect};

use crate::app::Action;
use crate::catalog::ResolvedSource;
use crate::config::ControlsSettings;
use crate::player::Command;
use crate::ui::{ScreenAreas, list_window};

/// Map a key press to an action. `sources` backs the `1`-`9` card keys.
pub fn action_for_key(
    key: KeyEvent,
    controls: &ControlsSettings,
    sources: &[ResolvedSource],
) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    let seek = i64::try_from(controls.seek_step_seconds).unwrap_or(i64::MAX);
    let volume = i16::from(controls.volume_step);

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::CursorDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::CursorUp),
        KeyCode::Enter => Some(Action::PlaySelected),
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            Some(Action::Player(Command::TogglePlayPause))
        }
        KeyCode::Char('l') => Some(Action::Player(Command::Next)),
        KeyCode::Char('h') => Some(Action::Player(Command::Previous)),
        KeyCode::Char('L') => Some(Action::SeekBy(seek)),
        KeyCode::Char('H') => Some(Action::SeekBy(-seek)),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::VolumeBy(volume)),
        KeyCode::Char('-') => Some(Action::VolumeBy(-volume)),
        KeyCode::Char('b') => Some(Action::ToggleSidePanel),
        KeyCode::Char(c @ '1'..='9') => {
            let n = c as usize - '1' as usize;
            sources
                .get(n)
                .map(|s| Action::Player(Command::SwitchCatalog(s.key.clone())))
        }
        _ => None,
    }
}

/// Horizontal click position within `area` as a fraction in `[0, 1]`.
pub fn click_fraction(area: Rect, column: u16) -> f64 {
    let span = f64::from(area.width.saturating_sub(1).max(1));
    (f64::from(column.saturating_sub(area.x)) / span).clamp(0.0, 1.0)
}

/// New slider position after moving `current` by `delta` percent.
pub fn step_volume(current: u8, delta: i16) -> u8 {
    (i16::from(current) + delta).clamp(0, 100) as u8
}

/// Map a left click at (`column`, `row`) to an action.
///
/// `cursor` and `entry_count` must be the values the frame was drawn with,
/// so list rows map to the same catalog indices the user saw.
pub fn action_for_click(
    areas: &ScreenAreas,
    cursor: usize,
    entry_count: usize,
    sources: &[ResolvedSource],
    column: u16,
    row: u16,
) -> Option<Action> {
    let pos = Position::new(column, row);

    if areas.panel_close.is_some_and(|c| c.contains(pos)) {
        return Some(Action::CloseSidePanel);
    }
    if areas.side_panel.is_none() && areas.menu_button.contains(pos) {
        return Some(Action::OpenSidePanel);
    }
    if let Some(i) = areas.cards.iter().position(|c| c.contains(pos)) {
        return sources
            .get(i)
            .map(|s| Action::Player(Command::SwitchCatalog(s.key.clone())));
    }

    if areas.list_rows.contains(pos) {
        let (start, end) = list_window(entry_count, areas.list_rows.height as usize, cursor);
        let index = start + usize::from(row - areas.list_rows.y);
        return (index < end).then_some(Action::Player(Command::SelectTrack(index)));
    }

    if areas.prev_button.contains(pos) {
        return Some(Action::Player(Command::Previous));
    }
    if areas.play_button.contains(pos) {
        return Some(Action::Player(Command::TogglePlayPause));
    }
    if areas.next_button.contains(pos) {
        return Some(Action::Player(Command::Next));
    }
    if areas.seek_bar.contains(pos) {
        return Some(Action::Player(Command::Seek(click_fraction(
            areas.seek_bar,
            column,
        ))));
    }
    if areas.volume.contains(pos) {
        let percent = (click_fraction(areas.volume, column) * 100.0).round() as u8;
        return Some(Action::Player(Command::SetVolume(percent)));
    }

    None
}
