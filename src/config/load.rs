use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` layers an optional config file under environment
/// variables (prefix `SONGDECK__`) and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("SONGDECK")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let catalogs = &self.catalogs;
        if catalogs.sources.is_empty() {
            return Err("catalogs.sources must list at least one catalog".to_string());
        }
        if let Some(dup) = catalogs
            .sources
            .iter()
            .enumerate()
            .find(|(i, s)| catalogs.sources[..*i].iter().any(|o| o.key == s.key))
            .map(|(_, s)| s.key.as_str())
        {
            return Err(format!("catalogs.sources has duplicate key {dup:?}"));
        }
        if catalogs.source(&catalogs.default_key).is_none() {
            return Err(format!(
                "catalogs.default_key {:?} is not a configured source",
                catalogs.default_key
            ));
        }
        if catalogs.source(&catalogs.initial_key).is_none() {
            return Err(format!(
                "catalogs.initial_key {:?} is not a configured source",
                catalogs.initial_key
            ));
        }
        if self.audio.initial_volume > 100 {
            return Err("audio.initial_volume must be between 0 and 100".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `SONGDECK_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SONGDECK_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/songdeck/config.toml`
/// or `~/.config/songdeck/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("songdeck").join("config.toml"))
}

/// Directory for log files: `$XDG_STATE_HOME/songdeck` or
/// `~/.local/state/songdeck`, falling back to the system temp dir.
pub fn default_log_dir() -> PathBuf {
    if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("songdeck");
    }
    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("state")
            .join("songdeck");
    }
    env::temp_dir().join("songdeck")
}
