use std::sync::mpsc::Sender;
use std::thread;

use tracing::debug;

use crate::locator::Locator;

use super::load::load_catalog;
use super::model::Track;

/// A finished background load.
#[derive(Debug)]
pub struct LoadedCatalog {
    /// Sequence number returned by the `request` that produced this.
    pub seq: u64,
    pub key: String,
    pub locator: Locator,
    pub tracks: Vec<Track>,
}

/// Runs `load_catalog` on worker threads and posts results to a channel.
pub struct CatalogLoader {
    tx: Sender<LoadedCatalog>,
    next_seq: u64,
}

impl CatalogLoader {
    pub fn new(tx: Sender<LoadedCatalog>) -> Self {
        Self { tx, next_seq: 0 }
    }

    /// Start loading `locator` and return the request's sequence number.
    /// Sequence numbers increase strictly with every call.
    pub fn request(&mut self, key: &str, locator: Locator) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        let key = key.to_string();
        let tx = self.tx.clone();

        debug!("catalog request #{seq}: {key} -> {locator}");
        thread::spawn(move || {
            let tracks = load_catalog(&locator);
            // The receiver is gone when the app is shutting down.
            let _ = tx.send(LoadedCatalog {
                seq,
                key,
                locator,
                tracks,
            });
        });

        seq
    }
}
