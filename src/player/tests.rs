use super::*;
use crate::catalog::{CatalogLoader, LoadedCatalog, SourceTable, Track};
use crate::config::CatalogSettings;
use crate::locator::Locator;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
enum Ev {
    Opened(usize, Locator),
    Started(usize),
    Stopped(usize),
    Dropped(usize),
}

type Log = Rc<RefCell<Vec<Ev>>>;

struct FakeBackend {
    log: Log,
    next_id: usize,
    duration: Option<Duration>,
    unopenable: HashSet<Locator>,
    unstartable: HashSet<Locator>,
}

struct FakeHandle {
    id: usize,
    log: Log,
    locator: Locator,
    paused: bool,
    finished: bool,
    position: Duration,
    duration: Option<Duration>,
    volume: f32,
}

impl MediaBackend for FakeBackend {
    type Handle = FakeHandle;
    type Source = ();

    fn fetch(_locator: &Locator) -> Result<(), MediaError> {
        Ok(())
    }

    fn open(&mut self, locator: &Locator, _source: ()) -> Result<FakeHandle, MediaError> {
        if self.unopenable.contains(locator) {
            return Err(MediaError::Start(format!("cannot open {locator}")));
        }
        self.next_id += 1;
        self.log
            .borrow_mut()
            .push(Ev::Opened(self.next_id, locator.clone()));
        Ok(FakeHandle {
            id: self.next_id,
            log: self.log.clone(),
            locator: locator.clone(),
            paused: true,
            finished: self.unstartable.contains(locator),
            position: Duration::ZERO,
            duration: self.duration,
            volume: 1.0,
        })
    }
}

impl MediaHandle for FakeHandle {
    fn start(&mut self) -> Result<(), MediaError> {
        if self.finished {
            return Err(MediaError::Start("autoplay refused".into()));
        }
        self.paused = false;
        self.log.borrow_mut().push(Ev::Started(self.id));
        Ok(())
    }
    fn pause(&mut self) {
        self.paused = true;
    }
    fn resume(&mut self) {
        self.paused = false;
    }
    fn stop(&mut self) {
        self.paused = true;
        self.position = Duration::ZERO;
        self.log.borrow_mut().push(Ev::Stopped(self.id));
    }
    fn is_paused(&self) -> bool {
        self.paused
    }
    fn is_finished(&self) -> bool {
        self.finished
    }
    fn position(&self) -> Duration {
        self.position
    }
    fn seek(&mut self, position: Duration) -> Result<(), MediaError> {
        if self.finished {
            return Err(MediaError::Seek("track has ended".into()));
        }
        self.position = position;
        Ok(())
    }
    fn duration(&self) -> Option<Duration> {
        self.duration
    }
    fn volume(&self) -> f32 {
        self.volume
    }
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}

impl Drop for FakeHandle {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Ev::Dropped(self.id));
    }
}

fn live_handles(log: &Log) -> usize {
    let log = log.borrow();
    let opened = log.iter().filter(|e| matches!(e, Ev::Opened(..))).count();
    let dropped = log.iter().filter(|e| matches!(e, Ev::Dropped(..))).count();
    opened - dropped
}

fn track(title: &str, artist: &str, file: &str) -> Track {
    Track {
        title: title.into(),
        artist: artist.into(),
        duration: "3:00".into(),
        file: file.into(),
    }
}

fn three_tracks() -> Vec<Track> {
    vec![
        track("Faded", "Alan Walker", "songs/a.mp3"),
        track("Spectre", "Alan Walker", "songs/b.mp3"),
        track("On & On", "Cartoon", "songs/c.mp3"),
    ]
}

struct Harness {
    ctl: Controller<FakeBackend>,
    log: Log,
    rx: Receiver<LoadedCatalog>,
    media_rx: Receiver<FetchedMedia<()>>,
    dir: tempfile::TempDir,
}

fn harness(duration: Option<Duration>) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let backend = FakeBackend {
        log: log.clone(),
        next_id: 0,
        duration,
        unopenable: HashSet::new(),
        unstartable: HashSet::new(),
    };
    let base = Locator::Path(dir.path().to_path_buf());
    let sources = SourceTable::new(&CatalogSettings::default(), &base).unwrap();
    let (tx, rx) = mpsc::channel();
    let (media_tx, media_rx) = mpsc::channel();
    let mut ctl = Controller::new(
        backend,
        sources,
        CatalogLoader::new(tx),
        MediaFetcher::new(media_tx),
        100,
    );
    ctl.render(three_tracks());
    Harness {
        ctl,
        log,
        rx,
        media_rx,
        dir,
    }
}

/// Deliver background media fetches until no open is in flight.
fn settle(h: &mut Harness) {
    while h.ctl.is_opening() {
        let fetched = h.media_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        h.ctl.apply_media(fetched);
    }
}

/// Dispatch `cmd` and let any track it opens finish loading.
fn run(h: &mut Harness, cmd: Command) {
    h.ctl.dispatch(cmd);
    settle(h);
}

fn catalog_json(artist: &str, titles: &[&str]) -> String {
    let songs: Vec<String> = titles
        .iter()
        .map(|t| format!(r#"{{"title":"{t}","duration":"2:00","file":"{t}.mp3"}}"#))
        .collect();
    format!(
        r#"{{"albums":[{{"artist":"{artist}","songs":[{}]}}]}}"#,
        songs.join(",")
    )
}

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let p = dir.join(name);
    fs::write(&p, body).unwrap();
    p
}

fn recv(rx: &Receiver<LoadedCatalog>) -> LoadedCatalog {
    rx.recv_timeout(Duration::from_secs(5)).unwrap()
}

#[test]
fn format_mmss_pads_and_does_not_wrap_hours() {
    assert_eq!(format_mmss(Duration::ZERO), "00:00");
    assert_eq!(format_mmss(Duration::from_secs(65)), "01:05");
    assert_eq!(format_mmss(Duration::from_secs(3661)), "61:01");
    assert_eq!(format_mmss(Duration::from_millis(59_999)), "00:59");
}

#[test]
fn render_lists_every_track_with_its_index() {
    let h = harness(None);
    let entries = h.ctl.entries();
    assert_eq!(entries.len(), 3);
    for (i, e) in entries.iter().enumerate() {
        assert_eq!(e.index, i);
    }
    assert_eq!(entries[2].title, "On & On");
    assert_eq!(entries[2].artist, "Cartoon");
}

#[test]
fn selecting_a_track_starts_it_and_updates_the_transport() {
    let mut h = harness(None);
    run(&mut h, Command::SelectTrack(1));

    assert_eq!(h.ctl.state(), PlaybackState::Playing);
    assert_eq!(h.ctl.current_index(), Some(1));
    assert_eq!(
        h.ctl.now_playing().unwrap().label(" - "),
        "Spectre - Alan Walker"
    );
    assert_eq!(h.ctl.readout().label(" / "), "00:00 / 00:00");
    assert_eq!(
        h.ctl.handle().unwrap().locator,
        Locator::Path("songs/b.mp3".into())
    );
}

#[test]
fn reselecting_leaves_exactly_one_live_handle_bound_to_the_new_track() {
    let mut h = harness(None);
    run(&mut h, Command::SelectTrack(0));
    run(&mut h, Command::SelectTrack(2));

    assert_eq!(live_handles(&h.log), 1);
    assert_eq!(
        h.ctl.handle().unwrap().locator,
        Locator::Path("songs/c.mp3".into())
    );

    let log = h.log.borrow();
    let stopped_first = log.iter().position(|e| *e == Ev::Stopped(1)).unwrap();
    let second_started = log.iter().position(|e| *e == Ev::Started(2)).unwrap();
    assert!(stopped_first < second_started);
}

#[test]
fn out_of_range_selection_is_ignored() {
    let mut h = harness(None);
    run(&mut h, Command::SelectTrack(0));
    run(&mut h, Command::SelectTrack(3));
    assert_eq!(h.ctl.current_index(), Some(0));
    assert_eq!(h.ctl.state(), PlaybackState::Playing);
    assert_eq!(live_handles(&h.log), 1);
}

#[test]
fn failed_open_leaves_session_idle_with_previous_index() {
    let mut h = harness(None);
    h.ctl
        .backend_mut()
        .unopenable
        .insert(Locator::Path("songs/b.mp3".into()));

    run(&mut h, Command::SelectTrack(0));
    run(&mut h, Command::SelectTrack(1));

    assert_eq!(live_handles(&h.log), 0);
    assert!(h.ctl.handle().is_none());
    assert_eq!(h.ctl.state(), PlaybackState::Idle);
    assert_eq!(h.ctl.current_index(), Some(0));
    assert!(h.log.borrow().contains(&Ev::Stopped(1)));

    // Navigation continues from the retained index.
    run(&mut h, Command::Next);
    assert_eq!(h.ctl.current_index(), Some(0));
    assert!(h.ctl.handle().is_none());
}

#[test]
fn failed_start_never_installs_the_handle() {
    let mut h = harness(None);
    h.ctl
        .backend_mut()
        .unstartable
        .insert(Locator::Path("songs/c.mp3".into()));

    run(&mut h, Command::SelectTrack(2));
    assert!(h.ctl.handle().is_none());
    assert_eq!(h.ctl.current_index(), None);
    assert_eq!(h.ctl.state(), PlaybackState::Idle);
    assert_eq!(live_handles(&h.log), 0);
}

#[test]
fn toggle_is_a_noop_without_a_handle_and_flips_with_one() {
    let mut h = harness(None);
    run(&mut h, Command::TogglePlayPause);
    assert_eq!(h.ctl.state(), PlaybackState::Idle);
    assert!(h.log.borrow().is_empty());

    run(&mut h, Command::SelectTrack(0));
    run(&mut h, Command::TogglePlayPause);
    assert_eq!(h.ctl.state(), PlaybackState::Paused);
    assert!(h.ctl.handle().unwrap().is_paused());

    run(&mut h, Command::TogglePlayPause);
    assert_eq!(h.ctl.state(), PlaybackState::Playing);
    assert!(!h.ctl.handle().unwrap().is_paused());
}

#[test]
fn next_and_previous_stop_at_the_catalog_bounds() {
    let mut h = harness(None);

    run(&mut h, Command::Previous);
    assert_eq!(h.ctl.current_index(), None);

    // Nothing selected: next starts at the top.
    run(&mut h, Command::Next);
    assert_eq!(h.ctl.current_index(), Some(0));

    run(&mut h, Command::Previous);
    assert_eq!(h.ctl.current_index(), Some(0));

    run(&mut h, Command::Next);
    run(&mut h, Command::Next);
    assert_eq!(h.ctl.current_index(), Some(2));
    let opened_before = live_handles(&h.log);

    run(&mut h, Command::Next);
    assert_eq!(h.ctl.current_index(), Some(2));
    assert_eq!(live_handles(&h.log), opened_before);
    assert_eq!(
        h.ctl.handle().unwrap().locator,
        Locator::Path("songs/c.mp3".into())
    );

    run(&mut h, Command::Previous);
    assert_eq!(h.ctl.current_index(), Some(1));
}

#[test]
fn seek_half_of_two_hundred_seconds() {
    let mut h = harness(Some(Duration::from_secs(200)));
    run(&mut h, Command::SelectTrack(0));
    run(&mut h, Command::Seek(0.5));

    assert_eq!(h.ctl.handle().unwrap().position, Duration::from_secs(100));
    assert_eq!(h.ctl.readout().fill_percent, 50.0);
    assert_eq!(h.ctl.readout().label(" / "), "01:40 / 03:20");
}

#[test]
fn seek_needs_a_handle_with_known_duration() {
    let mut h = harness(None);
    run(&mut h, Command::Seek(0.5));
    run(&mut h, Command::SelectTrack(0));
    run(&mut h, Command::Seek(0.5));
    assert_eq!(h.ctl.handle().unwrap().position, Duration::ZERO);
    assert_eq!(h.ctl.readout().fill_percent, 0.0);
}

#[test]
fn seek_clamps_fractions() {
    let mut h = harness(Some(Duration::from_secs(100)));
    run(&mut h, Command::SelectTrack(0));
    run(&mut h, Command::Seek(1.7));
    assert_eq!(h.ctl.handle().unwrap().position, Duration::from_secs(100));
    run(&mut h, Command::Seek(-0.2));
    assert_eq!(h.ctl.handle().unwrap().position, Duration::ZERO);
}

#[test]
fn seek_fraction_by_moves_relative_to_position() {
    let mut h = harness(Some(Duration::from_secs(200)));
    assert_eq!(h.ctl.seek_fraction_by(5), None);
    run(&mut h, Command::SelectTrack(0));
    run(&mut h, Command::Seek(0.5));
    assert_eq!(h.ctl.seek_fraction_by(10), Some(0.55));
    assert_eq!(h.ctl.seek_fraction_by(-500), Some(0.0));
}

#[test]
fn tick_reports_metadata_then_progress() {
    let mut h = harness(Some(Duration::from_secs(200)));
    run(&mut h, Command::SelectTrack(0));
    assert_eq!(h.ctl.readout().label(" / "), "00:00 / 00:00");

    h.ctl.tick();
    assert_eq!(h.ctl.readout().label(" / "), "00:00 / 03:20");

    h.ctl.handle_mut().unwrap().position = Duration::from_secs(50);
    h.ctl.tick();
    assert_eq!(h.ctl.readout().label(" / "), "00:50 / 03:20");
    assert_eq!(h.ctl.readout().fill_percent, 25.0);
}

#[test]
fn finished_track_pauses_and_toggle_restarts_it() {
    let mut h = harness(Some(Duration::from_secs(60)));
    run(&mut h, Command::SelectTrack(1));
    h.ctl.tick();
    h.ctl.handle_mut().unwrap().finished = true;
    h.ctl.tick();
    assert_eq!(h.ctl.state(), PlaybackState::Paused);
    assert_eq!(h.ctl.readout().fill_percent, 100.0);

    run(&mut h, Command::TogglePlayPause);
    assert_eq!(h.ctl.state(), PlaybackState::Playing);
    assert_eq!(h.ctl.current_index(), Some(1));
    assert_eq!(h.ctl.handle().unwrap().id, 2);
    assert_eq!(live_handles(&h.log), 1);
}

#[test]
fn volume_maps_percent_to_unit_range() {
    let mut h = harness(None);
    run(&mut h, Command::SetVolume(30));
    assert_eq!(h.ctl.volume(), 30);
    assert!(h.ctl.handle().is_none());

    run(&mut h, Command::SelectTrack(0));
    assert!((h.ctl.handle().unwrap().volume() - 0.3).abs() < f32::EPSILON);

    run(&mut h, Command::SetVolume(75));
    assert!((h.ctl.handle().unwrap().volume() - 0.75).abs() < f32::EPSILON);

    run(&mut h, Command::SetVolume(250));
    assert_eq!(h.ctl.volume(), 100);
    assert!((h.ctl.handle().unwrap().volume() - 1.0).abs() < f32::EPSILON);
}

#[test]
fn switch_catalog_loads_rerenders_and_stops_playback() {
    let mut h = harness(None);
    write(
        h.dir.path(),
        "hiphop.json",
        &catalog_json("Eminem", &["Lose Yourself", "Stan", "Mockingbird", "Venom"]),
    );
    run(&mut h, Command::SelectTrack(2));
    run(&mut h, Command::SwitchCatalog("hiphop".into()));
    assert!(h.ctl.is_loading());

    let loaded = recv(&h.rx);
    assert_eq!(
        loaded.locator,
        Locator::Path(h.dir.path().join("hiphop.json"))
    );
    assert!(h.ctl.apply_loaded(loaded));

    assert!(!h.ctl.is_loading());
    assert_eq!(h.ctl.active_source(), Some("hiphop"));
    assert_eq!(h.ctl.entries().len(), 4);
    assert_eq!(h.ctl.entries()[3].title, "Venom");
    assert_eq!(live_handles(&h.log), 0);
    assert!(h.log.borrow().contains(&Ev::Stopped(1)));
    assert_eq!(h.ctl.state(), PlaybackState::Idle);
    assert_eq!(h.ctl.current_index(), None);
    assert!(h.ctl.now_playing().is_none());
}

#[test]
fn tracks_resolve_next_to_their_catalog_document() {
    let mut h = harness(None);
    write(h.dir.path(), "music.json", &catalog_json("A", &["one"]));
    run(&mut h, Command::SwitchCatalog("music".into()));
    let loaded = recv(&h.rx);
    h.ctl.apply_loaded(loaded);

    run(&mut h, Command::SelectTrack(0));
    assert_eq!(
        h.ctl.handle().unwrap().locator,
        Locator::Path(h.dir.path().join("one.mp3"))
    );
}

#[test]
fn unknown_source_keys_load_the_default_catalog() {
    let mut h = harness(None);
    write(h.dir.path(), "ncs.json", &catalog_json("NCS", &["x", "y"]));
    run(&mut h, Command::SwitchCatalog("polka".into()));
    let loaded = recv(&h.rx);
    assert_eq!(loaded.key, "ncs");
    assert!(h.ctl.apply_loaded(loaded));
    assert_eq!(h.ctl.entries().len(), 2);
}

#[test]
fn failed_catalog_load_renders_an_empty_list() {
    let mut h = harness(None);
    run(&mut h, Command::SwitchCatalog("hiphop".into()));
    let loaded = recv(&h.rx);
    assert!(loaded.tracks.is_empty());
    assert!(h.ctl.apply_loaded(loaded));
    assert!(h.ctl.entries().is_empty());

    run(&mut h, Command::Next);
    assert!(h.ctl.handle().is_none());
}

#[test]
fn stale_catalog_responses_are_discarded() {
    let mut h = harness(None);
    write(h.dir.path(), "ncs.json", &catalog_json("NCS", &["a"]));
    write(h.dir.path(), "music.json", &catalog_json("M", &["b", "c"]));

    run(&mut h, Command::SwitchCatalog("ncs".into()));
    run(&mut h, Command::SwitchCatalog("music".into()));

    let mut results = vec![recv(&h.rx), recv(&h.rx)];
    // Deliver the older response last to mimic out-of-order completion.
    results.sort_by_key(|l| std::cmp::Reverse(l.seq));
    let newer = results.remove(0);
    let older = results.remove(0);

    assert!(h.ctl.apply_loaded(newer));
    assert!(!h.ctl.apply_loaded(older));
    assert_eq!(h.ctl.active_source(), Some("music"));
    assert_eq!(h.ctl.entries().len(), 2);
}

#[test]
fn session_install_releases_the_previous_handle_first() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut backend = FakeBackend {
        log: log.clone(),
        next_id: 0,
        duration: None,
        unopenable: HashSet::new(),
        unstartable: HashSet::new(),
    };
    let a = backend.open(&Locator::Path("a".into()), ()).unwrap();
    let b = backend.open(&Locator::Path("b".into()), ()).unwrap();

    let mut session = Session::new();
    session.install(a, 0);
    session.install(b, 1);
    assert_eq!(session.current_index(), Some(1));
    assert_eq!(session.handle().unwrap().id, 2);
    assert_eq!(live_handles(&log), 1);

    session.release();
    assert!(session.handle().is_none());
    assert_eq!(session.current_index(), Some(1));
    assert_eq!(live_handles(&log), 0);
}

#[test]
fn overtaken_opens_are_discarded() {
    let mut h = harness(None);
    h.ctl.dispatch(Command::SelectTrack(0));
    h.ctl.dispatch(Command::SelectTrack(1));
    assert!(h.ctl.is_opening());
    assert!(h.ctl.is_loading());
    assert_eq!(h.ctl.state(), PlaybackState::Idle);

    let mut results: Vec<FetchedMedia<()>> = (0..2)
        .map(|_| h.media_rx.recv_timeout(Duration::from_secs(5)).unwrap())
        .collect();
    results.sort_by_key(|m| m.seq);
    let newer = results.pop().unwrap();
    let older = results.pop().unwrap();
    assert_eq!(older.index, 0);

    // The older fetch completes last and must not replace the newer track.
    assert!(h.ctl.apply_media(newer));
    assert!(!h.ctl.apply_media(older));

    assert_eq!(h.ctl.current_index(), Some(1));
    assert_eq!(live_handles(&h.log), 1);
    assert_eq!(
        h.ctl.handle().unwrap().locator,
        Locator::Path("songs/b.mp3".into())
    );
    let opened = h
        .log
        .borrow()
        .iter()
        .filter(|e| matches!(e, Ev::Opened(..)))
        .count();
    assert_eq!(opened, 1);
}

#[test]
fn navigation_continues_from_a_track_still_loading() {
    let mut h = harness(None);
    h.ctl.dispatch(Command::Next);
    h.ctl.dispatch(Command::Next);
    settle(&mut h);
    assert_eq!(h.ctl.current_index(), Some(1));
    assert_eq!(live_handles(&h.log), 1);
}

#[test]
fn catalog_switch_cancels_an_open_in_flight() {
    let mut h = harness(None);
    write(h.dir.path(), "ncs.json", &catalog_json("NCS", &["x", "y"]));
    h.ctl.dispatch(Command::SelectTrack(0));
    h.ctl.dispatch(Command::SwitchCatalog("ncs".into()));
    let loaded = recv(&h.rx);
    assert!(h.ctl.apply_loaded(loaded));
    assert!(!h.ctl.is_opening());

    let fetched = h.media_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(!h.ctl.apply_media(fetched));
    assert!(h.ctl.handle().is_none());
    assert_eq!(h.ctl.state(), PlaybackState::Idle);
    assert_eq!(live_handles(&h.log), 0);
}

#[test]
fn seeking_a_finished_track_reopens_it_at_the_target() {
    let mut h = harness(Some(Duration::from_secs(200)));
    run(&mut h, Command::SelectTrack(0));
    h.ctl.tick();
    h.ctl.handle_mut().unwrap().finished = true;
    h.ctl.tick();
    assert_eq!(h.ctl.state(), PlaybackState::Paused);

    h.ctl.dispatch(Command::Seek(0.5));
    assert!(h.ctl.is_opening());
    settle(&mut h);

    let handle = h.ctl.handle().unwrap();
    assert_eq!(handle.id, 2);
    assert_eq!(handle.position, Duration::from_secs(100));
    assert_eq!(h.ctl.state(), PlaybackState::Playing);
    assert_eq!(h.ctl.readout().fill_percent, 50.0);
    assert_eq!(h.ctl.readout().label(" / "), "01:40 / 03:20");
    assert_eq!(live_handles(&h.log), 1);
}

#[test]
fn non_finite_seek_fractions_are_ignored() {
    let mut h = harness(Some(Duration::from_secs(200)));
    run(&mut h, Command::SelectTrack(0));
    run(&mut h, Command::Seek(0.25));
    run(&mut h, Command::Seek(f64::NAN));
    run(&mut h, Command::Seek(f64::INFINITY));
    assert_eq!(h.ctl.handle().unwrap().position, Duration::from_secs(50));
    assert_eq!(h.ctl.readout().fill_percent, 25.0);
}
