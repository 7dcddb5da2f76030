//! Application model types: `App` and the `Action`s the runtime applies.

use crate::player::Command;

/// Something the user asked for, after keys or clicks were decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Forwarded to the playback controller.
    Player(Command),
    /// Play the row under the cursor.
    PlaySelected,
    /// Seek relative to the current position, in seconds.
    SeekBy(i64),
    /// Move the volume slider by this many percent.
    VolumeBy(i16),
    CursorDown,
    CursorUp,
    OpenSidePanel,
    CloseSidePanel,
    ToggleSidePanel,
    Quit,
}

/// Presentational state of the terminal UI.
pub struct App {
    /// Highlighted row of the track list.
    pub cursor: usize,
    pub side_panel_open: bool,
    /// Last now-playing index the cursor jumped to.
    followed_index: Option<usize>,
}

impl App {
    pub fn new(side_panel_open: bool) -> Self {
        Self {
            cursor: 0,
            side_panel_open,
            followed_index: None,
        }
    }

    /// Move the cursor down, wrapping to the top.
    pub fn cursor_down(&mut self, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = (self.cursor + 1) % len;
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn cursor_up(&mut self, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = if self.cursor == 0 {
            len - 1
        } else {
            (self.cursor - 1).min(len - 1)
        };
    }

    /// Jump the cursor to the now-playing row whenever it changes, so
    /// next/previous keep the playing track in view.
    pub fn follow(&mut self, now_playing: Option<usize>, len: usize) {
        if now_playing != self.followed_index {
            self.followed_index = now_playing;
            if let Some(i) = now_playing.filter(|&i| i < len) {
                self.cursor = i;
            }
        }
    }

    /// A new catalog was rendered: back to the top.
    pub fn reset_list(&mut self) {
        self.cursor = 0;
        self.followed_index = None;
    }

    pub fn open_side_panel(&mut self) {
        self.side_panel_open = true;
    }

    pub fn close_side_panel(&mut self) {
        self.side_panel_open = false;
    }

    pub fn toggle_side_panel(&mut self) {
        self.side_panel_open = !self.side_panel_open;
    }
}
