use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::{Action, App};
use crate::catalog::LoadedCatalog;
use crate::config;
use crate::input;
use crate::player::{Command, Controller, FetchedMedia, MediaBackend};
use crate::ui;

/// Main terminal event loop: applies finished catalog loads and media
/// fetches, polls the media handle, draws, and dispatches input. Returns
/// `Ok(())` on quit.
pub fn run<B: MediaBackend>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller<B>,
    catalog_rx: &mpsc::Receiver<LoadedCatalog>,
    media_rx: &mpsc::Receiver<FetchedMedia<B::Source>>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(loaded) = catalog_rx.try_recv() {
            if controller.apply_loaded(loaded) {
                app.reset_list();
            }
        }
        while let Ok(fetched) = media_rx.try_recv() {
            controller.apply_media(fetched);
        }

        controller.tick();
        app.follow(controller.current_index(), controller.entries().len());

        let mut areas = ui::ScreenAreas::default();
        terminal.draw(|f| {
            areas = ui::draw(f, app, controller, &settings.ui, &settings.controls);
        })?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let action = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                input::action_for_key(key, &settings.controls, controller.sources().sources())
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => input::action_for_click(
                    &areas,
                    app.cursor,
                    controller.entries().len(),
                    controller.sources().sources(),
                    mouse.column,
                    mouse.row,
                ),
                MouseEventKind::ScrollDown => Some(Action::CursorDown),
                MouseEventKind::ScrollUp => Some(Action::CursorUp),
                _ => None,
            },
            _ => None,
        };

        if let Some(action) = action {
            if apply_action(action, app, controller) {
                return Ok(());
            }
        }
    }
}

/// Apply one decoded action. Returns `true` when the user asked to quit.
fn apply_action<B: MediaBackend>(
    action: Action,
    app: &mut App,
    controller: &mut Controller<B>,
) -> bool {
    debug!("action: {action:?}");
    let len = controller.entries().len();
    match action {
        Action::Player(cmd) => controller.dispatch(cmd),
        Action::PlaySelected => {
            if app.cursor < len {
                controller.dispatch(Command::SelectTrack(app.cursor));
            }
        }
        Action::SeekBy(secs) => {
            if let Some(fraction) = controller.seek_fraction_by(secs) {
                controller.dispatch(Command::Seek(fraction));
            }
        }
        Action::VolumeBy(delta) => {
            let volume = input::step_volume(controller.volume(), delta);
            controller.dispatch(Command::SetVolume(volume));
        }
        Action::CursorDown => app.cursor_down(len),
        Action::CursorUp => app.cursor_up(len),
        Action::OpenSidePanel => app.open_side_panel(),
        Action::CloseSidePanel => app.close_side_panel(),
        Action::ToggleSidePanel => app.toggle_side_panel(),
        Action::Quit => return true,
    }
    false
}
