use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/songdeck/config.toml` or `~/.config/songdeck/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SONGDECK__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalogs: CatalogSettings,
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub logging: LoggingSettings,
}

/// One selectable catalog card.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogSource {
    /// Short identifier a card is annotated with (e.g. `hiphop`).
    pub key: String,
    /// Label shown on the card.
    pub title: String,
    /// Path or URL of the backing JSON document. Relative values resolve
    /// against the base given on the command line.
    pub locator: String,
}

impl CatalogSource {
    fn new(key: &str, title: &str, locator: &str) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            locator: locator.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Catalog cards in display order.
    pub sources: Vec<CatalogSource>,
    /// Source used when a card key is not recognized.
    pub default_key: String,
    /// Source loaded at startup.
    pub initial_key: String,
}

impl CatalogSettings {
    /// Look up a source by key.
    pub fn source(&self, key: &str) -> Option<&CatalogSource> {
        self.sources.iter().find(|s| s.key == key)
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            sources: vec![
                CatalogSource::new("ncs", "NCS", "ncs.json"),
                CatalogSource::new("music", "Music", "music.json"),
                CatalogSource::new("hiphop", "Hip-Hop", "hiphop.json"),
            ],
            default_key: "ncs".to_string(),
            initial_key: "music".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume slider position at startup (0-100).
    pub initial_volume: u8,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            initial_volume: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Separator between title and artist in the now-playing label.
    pub now_playing_separator: String,
    /// Separator between elapsed and total time.
    pub time_separator: String,
    /// Whether the catalog side panel starts open.
    pub side_panel_open: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " songdeck ".to_string(),
            now_playing_separator: " - ".to_string(),
            time_separator: " / ".to_string(),
            side_panel_open: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to seek when pressing `H` / `L`.
    pub seek_step_seconds: u64,
    /// Volume change in percent when pressing `-` / `+`.
    pub volume_step: u8,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            seek_step_seconds: 5,
            volume_step: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Directory for the rolling log file. `None` uses the XDG state dir.
    pub directory: Option<PathBuf>,
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    pub filter: Option<String>,
}
