//! The playback controller: owns the rendered catalog, the session slot and
//! the transport state, and applies `Command`s to them.

use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::catalog::{CatalogLoader, LoadedCatalog, SourceTable, Track};
use crate::locator::{Locator, LocatorError};

use super::command::Command;
use super::fetcher::{FetchedMedia, MediaFetcher};
use super::media::{MediaBackend, MediaHandle};
use super::session::Session;
use super::transport::{PlaybackState, TransportReadout};

/// One row of the rendered track list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Position in the catalog; selecting the row selects this index.
    pub index: usize,
    pub title: String,
    pub artist: String,
    pub duration: String,
}

/// Title and artist of the track in the session slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
}

impl NowPlaying {
    pub fn label(&self, separator: &str) -> String {
        format!("{}{}{}", self.title, separator, self.artist)
    }
}

/// A track whose media is being fetched.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingOpen {
    seq: u64,
    index: usize,
    /// Seek applied once the handle is installed.
    seek: Option<f64>,
}

pub struct Controller<B: MediaBackend> {
    backend: B,
    session: Session<B::Handle>,
    fetcher: MediaFetcher<B::Source>,
    pending_open: Option<PendingOpen>,

    sources: SourceTable,
    loader: CatalogLoader,
    /// Sequence number of the catalog request whose result will be applied.
    pending_catalog: Option<u64>,

    catalog: Vec<Track>,
    catalog_locator: Option<Locator>,
    active_source: Option<String>,
    entries: Vec<ListEntry>,

    state: PlaybackState,
    now_playing: Option<NowPlaying>,
    readout: TransportReadout,
    metadata_ready: bool,
    /// Volume slider position (0-100); new handles start at this level.
    volume: u8,
}

impl<B: MediaBackend> Controller<B> {
    pub fn new(
        backend: B,
        sources: SourceTable,
        loader: CatalogLoader,
        fetcher: MediaFetcher<B::Source>,
        volume: u8,
    ) -> Self {
        Self {
            backend,
            session: Session::default(),
            fetcher,
            pending_open: None,
            sources,
            loader,
            pending_catalog: None,
            catalog: Vec::new(),
            catalog_locator: None,
            active_source: None,
            entries: Vec::new(),
            state: PlaybackState::Idle,
            now_playing: None,
            readout: TransportReadout::default(),
            metadata_ready: false,
            volume: volume.min(100),
        }
    }

    /// Apply one user command.
    pub fn dispatch(&mut self, cmd: Command) {
        debug!("command: {cmd:?}");
        match cmd {
            Command::SelectTrack(index) => self.select_track(index),
            Command::TogglePlayPause => self.toggle_play_pause(),
            Command::Seek(fraction) => self.seek(fraction),
            Command::Next => self.next(),
            Command::Previous => self.previous(),
            Command::SetVolume(percent) => self.set_volume(percent),
            Command::SwitchCatalog(key) => self.switch_catalog(&key),
        }
    }

    /// Replace the visible list with one entry per track.
    pub fn render(&mut self, catalog: Vec<Track>) {
        self.entries = catalog
            .iter()
            .enumerate()
            .map(|(index, t)| ListEntry {
                index,
                title: t.title.clone(),
                artist: t.artist.clone(),
                duration: t.duration.clone(),
            })
            .collect();
        self.catalog = catalog;

        if self
            .session
            .current_index()
            .is_some_and(|i| i >= self.catalog.len())
        {
            self.session.clear_index();
        }
    }

    fn media_locator(&self, track: &Track) -> Result<Locator, LocatorError> {
        match &self.catalog_locator {
            Some(doc) => doc.join_sibling(&track.file),
            None => Locator::parse(&track.file),
        }
    }

    fn select_track(&mut self, index: usize) {
        self.open_track(index, None);
    }

    /// Release the live handle and start fetching track `index`. The new
    /// handle is installed by `apply_media`, then seeked to `seek`.
    fn open_track(&mut self, index: usize, seek: Option<f64>) {
        let Some(track) = self.catalog.get(index) else {
            warn!(
                "ignoring selection of track {index}: catalog has {} tracks",
                self.catalog.len()
            );
            return;
        };

        // The previous handle goes silent before anything new is opened, so
        // a failed open leaves the slot empty rather than the old track playing.
        self.session.release();
        self.state = PlaybackState::Idle;
        self.metadata_ready = false;

        let locator = match self.media_locator(track) {
            Ok(l) => l,
            Err(e) => {
                self.pending_open = None;
                error!("Error playing audio: {e}");
                return;
            }
        };

        let seq = self.fetcher.request(index, locator, B::fetch);
        self.pending_open = Some(PendingOpen { seq, index, seek });
    }

    /// Install a finished background fetch. Fetches overtaken by a later
    /// selection or a catalog switch are dropped; returns whether the
    /// result was the one being waited for.
    pub fn apply_media(&mut self, fetched: FetchedMedia<B::Source>) -> bool {
        let Some(pending) = self.pending_open.filter(|p| p.seq == fetched.seq) else {
            debug!(
                "discarding stale media #{} ({}), waiting for {:?}",
                fetched.seq, fetched.locator, self.pending_open
            );
            return false;
        };
        self.pending_open = None;

        let Some(track) = self.catalog.get(pending.index).cloned() else {
            return true;
        };
        let locator = fetched.locator;

        let source = match fetched.source {
            Ok(s) => s,
            Err(e) => {
                error!("Error playing audio: {e}");
                return true;
            }
        };
        let mut handle = match self.backend.open(&locator, source) {
            Ok(h) => h,
            Err(e) => {
                error!("Error playing audio: {e}");
                return true;
            }
        };
        handle.set_volume(f32::from(self.volume) / 100.0);
        if let Err(e) = handle.start() {
            error!("Error playing audio {locator}: {e}");
            handle.stop();
            return true;
        }

        info!("playing #{}: {} - {}", pending.index, track.title, track.artist);
        self.session.install(handle, pending.index);
        self.state = PlaybackState::Playing;
        self.now_playing = Some(NowPlaying {
            title: track.title,
            artist: track.artist,
        });
        self.readout = TransportReadout::default();

        if let Some(fraction) = pending.seek {
            self.seek(fraction);
        }
        true
    }

    fn toggle_play_pause(&mut self) {
        let Some(handle) = self.session.handle_mut() else {
            debug!("play/pause with nothing loaded");
            return;
        };

        if handle.is_finished() {
            // A finished track plays again from the top.
            if let Some(i) = self.session.current_index() {
                self.select_track(i);
            }
            return;
        }

        if handle.is_paused() {
            handle.resume();
            self.state = PlaybackState::Playing;
        } else {
            handle.pause();
            self.state = PlaybackState::Paused;
        }
    }

    fn seek(&mut self, fraction: f64) {
        if !fraction.is_finite() {
            debug!("seek ignored: fraction {fraction} is not finite");
            return;
        }
        if let Some(pending) = self.pending_open.as_mut() {
            // Applied once the fetched track is installed.
            pending.seek = Some(fraction);
            return;
        }
        let Some(handle) = self.session.handle_mut() else {
            debug!("seek ignored: nothing loaded");
            return;
        };
        let Some(duration) = handle.duration().filter(|d| !d.is_zero()) else {
            debug!("seek ignored: duration unknown");
            return;
        };

        if handle.is_finished() {
            // An ended stream cannot move; reopen the track and seek that.
            if let Some(i) = self.session.current_index() {
                self.open_track(i, Some(fraction));
            }
            return;
        }

        let target = duration.mul_f64(fraction.clamp(0.0, 1.0));
        if let Err(e) = handle.seek(target) {
            warn!("{e}");
        }
        self.readout = TransportReadout::progress(handle.position().min(duration), duration);
    }

    /// The track being opened, else the one in the session slot.
    fn selected_index(&self) -> Option<usize> {
        self.pending_open
            .map(|p| p.index)
            .or(self.session.current_index())
    }

    fn next(&mut self) {
        // With nothing selected yet, "next" starts at the top.
        let next = self.selected_index().map_or(0, |i| i + 1);
        if next < self.catalog.len() {
            self.select_track(next);
        } else {
            info!("This is the last song.");
        }
    }

    fn previous(&mut self) {
        match self.selected_index() {
            Some(i) if i > 0 && i - 1 < self.catalog.len() => self.select_track(i - 1),
            _ => info!("This is the first song."),
        }
    }

    fn set_volume(&mut self, percent: u8) {
        self.volume = percent.min(100);
        if let Some(handle) = self.session.handle_mut() {
            handle.set_volume(f32::from(self.volume) / 100.0);
        }
    }

    fn switch_catalog(&mut self, key: &str) {
        let Some(source) = self.sources.resolve(key) else {
            warn!("no catalog sources configured");
            return;
        };
        let (key, locator) = (source.key.clone(), source.locator.clone());
        self.pending_catalog = Some(self.loader.request(&key, locator));
    }

    /// Install a finished background load. Results of requests that were
    /// overtaken by a later `SwitchCatalog` are dropped; returns whether the
    /// catalog was applied.
    pub fn apply_loaded(&mut self, loaded: LoadedCatalog) -> bool {
        if self.pending_catalog != Some(loaded.seq) {
            debug!(
                "discarding stale catalog #{} ({}), waiting for {:?}",
                loaded.seq, loaded.key, self.pending_catalog
            );
            return false;
        }
        self.pending_catalog = None;

        info!(
            "catalog {:?} from {}: {} tracks",
            loaded.key,
            loaded.locator,
            loaded.tracks.len()
        );
        self.catalog_locator = Some(loaded.locator);
        self.active_source = Some(loaded.key);
        self.render(loaded.tracks);

        self.pending_open = None;
        self.session.release();
        self.session.clear_index();
        self.state = PlaybackState::Idle;
        self.metadata_ready = false;
        self.now_playing = None;
        self.readout = TransportReadout::default();
        true
    }

    /// Poll the live handle for metadata and progress and refresh the readout.
    pub fn tick(&mut self) {
        let Some(handle) = self.session.handle() else {
            return;
        };
        let duration = handle.duration().filter(|d| !d.is_zero());
        let position = handle.position();
        let finished = handle.is_finished();

        if let Some(duration) = duration {
            if !self.metadata_ready {
                self.metadata_ready = true;
                self.readout = TransportReadout::metadata(duration);
            } else if self.state == PlaybackState::Playing {
                self.readout = TransportReadout::progress(position.min(duration), duration);
            }
        }

        if finished && self.state == PlaybackState::Playing {
            debug!("track finished");
            self.state = PlaybackState::Paused;
            if let Some(duration) = duration {
                self.readout = TransportReadout::progress(duration, duration);
            }
        }
    }

    /// Seek fraction for moving `delta_secs` from the current position, if
    /// a handle with a known duration is loaded.
    pub fn seek_fraction_by(&self, delta_secs: i64) -> Option<f64> {
        let handle = self.session.handle()?;
        let duration = handle.duration().filter(|d| !d.is_zero())?;
        let target = if delta_secs < 0 {
            handle
                .position()
                .saturating_sub(Duration::from_secs(delta_secs.unsigned_abs()))
        } else {
            handle.position() + Duration::from_secs(delta_secs.unsigned_abs())
        };
        Some((target.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0))
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn sources(&self) -> &SourceTable {
        &self.sources
    }

    pub fn active_source(&self) -> Option<&str> {
        self.active_source.as_deref()
    }

    /// A catalog or a track is being fetched.
    pub fn is_loading(&self) -> bool {
        self.pending_catalog.is_some() || self.pending_open.is_some()
    }

    pub fn is_opening(&self) -> bool {
        self.pending_open.is_some()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.session.current_index()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn now_playing(&self) -> Option<&NowPlaying> {
        self.now_playing.as_ref()
    }

    pub fn readout(&self) -> &TransportReadout {
        &self.readout
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }
}

#[cfg(test)]
impl<B: MediaBackend> Controller<B> {
    pub(crate) fn handle(&self) -> Option<&B::Handle> {
        self.session.handle()
    }

    pub(crate) fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub(crate) fn handle_mut(&mut self) -> Option<&mut B::Handle> {
        self.session.handle_mut()
    }
}
