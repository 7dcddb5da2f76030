//! The media handle contract the controller plays through.

use std::time::Duration;

use thiserror::Error;

use crate::locator::{FetchError, Locator};

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to read {locator}: {source}")]
    Fetch {
        locator: String,
        #[source]
        source: FetchError,
    },

    #[error("failed to decode {locator}: {source}")]
    Decode {
        locator: String,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("playback could not start: {0}")]
    Start(String),

    #[error("seek failed: {0}")]
    Seek(String),

    #[error("no audio output available: {0}")]
    Output(#[from] rodio::StreamError),
}

/// One loaded audio resource. Dropping a handle silences it.
pub trait MediaHandle {
    /// Begin output. May fail, in which case the handle stays silent.
    fn start(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self);
    fn resume(&mut self);
    /// Pause and rewind to the beginning.
    fn stop(&mut self);
    fn is_paused(&self) -> bool;
    /// True once the resource has played to its end.
    fn is_finished(&self) -> bool;
    fn position(&self) -> Duration;
    fn seek(&mut self, position: Duration) -> Result<(), MediaError>;
    /// Total length, once known.
    fn duration(&self) -> Option<Duration>;
    /// Linear volume in `0.0..=1.0`.
    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);
}

/// Creates handles from locators, in two steps: `fetch` reads the media
/// and may block on disk or network I/O, so it runs on a worker thread;
/// `open` turns the fetched source into a handle on the UI thread.
pub trait MediaBackend {
    type Handle: MediaHandle;
    /// Whatever `fetch` hands over to `open`.
    type Source: Send + 'static;

    fn fetch(locator: &Locator) -> Result<Self::Source, MediaError>;

    /// Open a fetched source as a paused handle positioned at the start.
    fn open(&mut self, locator: &Locator, source: Self::Source) -> Result<Self::Handle, MediaError>;
}
