use std::sync::mpsc::Sender;
use std::thread;

use tracing::debug;

use crate::locator::Locator;

use super::media::MediaError;

/// A finished background media fetch.
#[derive(Debug)]
pub struct FetchedMedia<S> {
    /// Sequence number returned by the `request` that produced this.
    pub seq: u64,
    /// Catalog index the fetch was started for.
    pub index: usize,
    pub locator: Locator,
    pub source: Result<S, MediaError>,
}

/// Runs a backend's `fetch` on worker threads and posts results to a channel.
pub struct MediaFetcher<S> {
    tx: Sender<FetchedMedia<S>>,
    next_seq: u64,
}

impl<S: Send + 'static> MediaFetcher<S> {
    pub fn new(tx: Sender<FetchedMedia<S>>) -> Self {
        Self { tx, next_seq: 0 }
    }

    /// Start fetching `locator` for catalog row `index` and return the
    /// request's sequence number.
    pub fn request(
        &mut self,
        index: usize,
        locator: Locator,
        fetch: fn(&Locator) -> Result<S, MediaError>,
    ) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        let tx = self.tx.clone();

        debug!("media request #{seq}: track {index} -> {locator}");
        thread::spawn(move || {
            let source = fetch(&locator);
            // The receiver is gone when the app is shutting down.
            let _ = tx.send(FetchedMedia {
                seq,
                index,
                locator,
                source,
            });
        });

        seq
    }
}
