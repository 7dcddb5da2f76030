use tracing::info;

use crate::config::CatalogSettings;
use crate::locator::{Locator, LocatorError};

/// A catalog card with its locator resolved against the base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub key: String,
    pub title: String,
    pub locator: Locator,
}

/// Fixed mapping from source keys to catalog locators.
#[derive(Debug, Clone)]
pub struct SourceTable {
    sources: Vec<ResolvedSource>,
    default_index: usize,
}

impl SourceTable {
    /// Resolve every configured source against `base`. The default key must
    /// name one of the sources (`Settings::validate` checks this), otherwise
    /// the first source is the fallback.
    pub fn new(settings: &CatalogSettings, base: &Locator) -> Result<Self, LocatorError> {
        let sources = settings
            .sources
            .iter()
            .map(|s| {
                Ok(ResolvedSource {
                    key: s.key.clone(),
                    title: s.title.clone(),
                    locator: base.join_child(&s.locator)?,
                })
            })
            .collect::<Result<Vec<_>, LocatorError>>()?;

        let default_index = sources
            .iter()
            .position(|s| s.key == settings.default_key)
            .unwrap_or(0);

        Ok(Self {
            sources,
            default_index,
        })
    }

    pub fn sources(&self) -> &[ResolvedSource] {
        &self.sources
    }

    /// Map `key` to its source; unknown keys fall back to the default.
    pub fn resolve(&self, key: &str) -> Option<&ResolvedSource> {
        match self.sources.iter().find(|s| s.key == key) {
            Some(s) => Some(s),
            None => {
                let fallback = self.sources.get(self.default_index);
                if let Some(f) = fallback {
                    info!("unknown catalog {key:?}, using default {:?}", f.key);
                }
                fallback
            }
        }
    }
}
