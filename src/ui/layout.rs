//! Screen geometry shared by drawing and mouse hit-testing.
//!
//! `draw` renders into the areas computed here and returns them, so a click
//! is always resolved against the layout the user actually saw.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the catalog side panel, borders included.
pub const SIDE_PANEL_WIDTH: u16 = 26;
/// Height of one catalog card, borders included.
pub const CARD_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenAreas {
    pub header: Rect,
    /// The `≡` trigger that opens the side panel.
    pub menu_button: Rect,
    pub side_panel: Option<Rect>,
    /// The `x` trigger on the side panel's border.
    pub panel_close: Option<Rect>,
    /// One rect per catalog card that fits on screen, in source order.
    pub cards: Vec<Rect>,
    pub list: Rect,
    /// Rows of the track list (inside the border).
    pub list_rows: Rect,
    pub status: Rect,
    pub transport: Rect,
    pub prev_button: Rect,
    pub play_button: Rect,
    pub next_button: Rect,
    pub seek_bar: Rect,
    pub volume: Rect,
    pub footer: Rect,
}

fn inner(r: Rect) -> Rect {
    Rect {
        x: r.x.saturating_add(1),
        y: r.y.saturating_add(1),
        width: r.width.saturating_sub(2),
        height: r.height.saturating_sub(2),
    }
}

/// Compute every interactive area for a frame of size `area`.
pub fn screen_areas(area: Rect, side_panel_open: bool, card_count: usize) -> ScreenAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    let header = rows[0];
    let header_inner = inner(header);
    let menu_button = Rect {
        width: header_inner.width.min(3),
        height: header_inner.height.min(1),
        ..header_inner
    };

    let (side_panel, list) = if side_panel_open {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDE_PANEL_WIDTH), Constraint::Min(10)])
            .split(rows[1]);
        (Some(cols[0]), cols[1])
    } else {
        (None, rows[1])
    };

    let panel_close = side_panel.filter(|p| p.width >= 6).map(|p| Rect {
        x: p.x + p.width - 4,
        y: p.y,
        width: 3,
        height: 1,
    });

    let cards = side_panel
        .map(|p| {
            let body = inner(p);
            let fit = body.height / CARD_HEIGHT;
            (0..fit.min(u16::try_from(card_count).unwrap_or(u16::MAX)))
                .map(|i| Rect {
                    x: body.x,
                    y: body.y + i * CARD_HEIGHT,
                    width: body.width,
                    height: CARD_HEIGHT,
                })
                .collect()
        })
        .unwrap_or_default();

    let controls = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(18),
        ])
        .split(inner(rows[3]));

    ScreenAreas {
        header,
        menu_button,
        side_panel,
        panel_close,
        cards,
        list,
        list_rows: inner(list),
        status: rows[2],
        transport: rows[3],
        prev_button: controls[0],
        play_button: controls[1],
        next_button: controls[2],
        seek_bar: controls[4],
        volume: controls[6],
        footer: rows[4],
    }
}

/// Visible slice `[start, end)` of a list of `total` rows shown in
/// `height` rows, keeping `selected` centered when possible.
pub fn list_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}
