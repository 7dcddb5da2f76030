use std::env;
use std::sync::mpsc;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::catalog::{CatalogLoader, SourceTable};
use crate::locator::Locator;
use crate::player::{Command, Controller, MediaFetcher, RodioBackend};

mod event_loop;
mod logging;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, problem) = settings::load_settings();

    let _log_guard = match logging::init_logging(&settings.logging) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("songdeck: logging disabled: {e}");
            None
        }
    };
    if let Some(msg) = problem {
        warn!("{msg}");
    }

    // Catalog documents live under this directory or URL.
    let base = env::args().nth(1).unwrap_or_else(|| ".".to_string());
    let base = Locator::parse_dir(&base)?;
    info!("catalog base: {base}");

    let sources = SourceTable::new(&settings.catalogs, &base)?;
    let backend = RodioBackend::open_default()?;
    let (catalog_tx, catalog_rx) = mpsc::channel();
    let loader = CatalogLoader::new(catalog_tx);
    let (media_tx, media_rx) = mpsc::channel();
    let fetcher = MediaFetcher::new(media_tx);

    let mut controller = Controller::new(
        backend,
        sources,
        loader,
        fetcher,
        settings.audio.initial_volume,
    );
    let mut app = App::new(settings.ui.side_panel_open);
    controller.dispatch(Command::SwitchCatalog(settings.catalogs.initial_key.clone()));

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut controller,
        &catalog_rx,
        &media_rx,
    );

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    run_result
}
