//! `MediaBackend` on top of `rodio`: one shared output stream, one `Sink`
//! per handle.

use std::io::Cursor;
use std::time::Duration;

use lofty::file::AudioFile;
use lofty::probe::Probe;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::debug;

use crate::locator::Locator;

use super::media::{MediaBackend, MediaError, MediaHandle};

pub struct RodioBackend {
    stream: OutputStream,
}

impl RodioBackend {
    /// Open the default audio output device.
    pub fn open_default() -> Result<Self, MediaError> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        // rodio logs to stderr when OutputStream is dropped, which would
        // scribble over the terminal UI.
        stream.log_on_drop(false);
        Ok(Self { stream })
    }
}

/// Media bytes read on a worker thread, plus the container duration when
/// the tags carry one.
pub struct AudioBytes {
    bytes: Vec<u8>,
    tagged_duration: Option<Duration>,
}

/// Duration from container metadata, for streams whose decoder cannot tell.
fn probe_duration(bytes: &[u8]) -> Option<Duration> {
    let tagged = Probe::new(Cursor::new(bytes))
        .guess_file_type()
        .ok()?
        .read()
        .ok()?;
    Some(tagged.properties().duration()).filter(|d| !d.is_zero())
}

impl MediaBackend for RodioBackend {
    type Handle = RodioHandle;
    type Source = AudioBytes;

    fn fetch(locator: &Locator) -> Result<AudioBytes, MediaError> {
        let bytes = locator.fetch_bytes().map_err(|source| MediaError::Fetch {
            locator: locator.to_string(),
            source,
        })?;
        let tagged_duration = probe_duration(&bytes);
        Ok(AudioBytes {
            bytes,
            tagged_duration,
        })
    }

    fn open(&mut self, locator: &Locator, source: AudioBytes) -> Result<RodioHandle, MediaError> {
        let decoder =
            Decoder::new(Cursor::new(source.bytes)).map_err(|source| MediaError::Decode {
                locator: locator.to_string(),
                source,
            })?;
        let duration = decoder.total_duration().or(source.tagged_duration);

        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        sink.append(decoder);

        debug!("opened {locator} (duration {duration:?})");
        Ok(RodioHandle { sink, duration })
    }
}

pub struct RodioHandle {
    sink: Sink,
    duration: Option<Duration>,
}

impl MediaHandle for RodioHandle {
    fn start(&mut self) -> Result<(), MediaError> {
        if self.sink.empty() {
            return Err(MediaError::Start("nothing queued to play".to_string()));
        }
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn resume(&mut self) {
        self.sink.play();
    }

    fn stop(&mut self) {
        self.sink.pause();
        // An exhausted sink has nothing to rewind.
        if !self.sink.empty() {
            let _ = self.sink.try_seek(Duration::ZERO);
        }
    }

    fn is_paused(&self) -> bool {
        self.sink.is_paused()
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn seek(&mut self, position: Duration) -> Result<(), MediaError> {
        // A drained sink acknowledges seeks without moving.
        if self.sink.empty() {
            return Err(MediaError::Seek("track has ended".to_string()));
        }
        self.sink
            .try_seek(position)
            .map_err(|e| MediaError::Seek(e.to_string()))
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn volume(&self) -> f32 {
        self.sink.volume()
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume.clamp(0.0, 1.0));
    }
}
