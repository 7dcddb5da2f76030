use thiserror::Error;
use tracing::{debug, error};

use crate::locator::{FetchError, Locator};

use super::model::{CatalogDocument, Track};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to fetch catalog: {0}")]
    Fetch(#[from] FetchError),

    #[error("failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fetch and parse the document at `locator`.
pub fn try_load_catalog(locator: &Locator) -> Result<Vec<Track>, CatalogError> {
    let body = locator.fetch_string()?;
    let document: CatalogDocument = serde_json::from_str(&body)?;
    Ok(document.into_tracks())
}

/// Load the catalog at `locator`, or an empty list when it cannot be
/// fetched or parsed. Every call re-reads the document.
pub fn load_catalog(locator: &Locator) -> Vec<Track> {
    match try_load_catalog(locator) {
        Ok(tracks) => {
            debug!("loaded {} tracks from {locator}", tracks.len());
            tracks
        }
        Err(e) => {
            error!("Error fetching or parsing catalog {locator}: {e}");
            Vec::new()
        }
    }
}
