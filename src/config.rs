use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// User overlay location, relative to `$HOME`.
const USER_CONFIG: &str = ".config/dasc/config.toml";

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub output: Output,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    /// Prefix of every parse error message.
    #[serde(default = "default_label")]
    pub label: String,
    /// `log` level filter name.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log file path; empty means stderr.
    #[serde(default)]
    pub log_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            label: default_label(),
            log_level: default_log_level(),
            log_file: String::new(),
        }
    }
}

fn default_label() -> String {
    crate::parse::DEFAULT_LABEL.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Output {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub pretty: bool,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    output: OutputOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    label: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct OutputOverlay {
    format: Option<OutputFormat>,
    pretty: Option<bool>,
}

/// Expand `~` and environment variables in a user-supplied path.
pub fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(e) => {
            eprintln!("dasc: cannot expand {path:?}: {e}");
            PathBuf::from(path)
        }
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge the overlay at `path` if given, else ~/.config/dasc/config.toml (if exists)
    ///
    /// Keys present in the overlay override defaults; absent keys keep them.
    pub fn load(path: Option<&str>) -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay(path) {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Try to load an overlay from `path` or the user config location.
    fn load_overlay(path: Option<&str>) -> Option<ConfigOverlay> {
        let result = match path {
            Some(p) => Self::read_overlay(&expand_path(p), true),
            None => {
                let home = std::env::var_os("HOME")?;
                Self::read_overlay(&Path::new(&home).join(USER_CONFIG), false)
            }
        };
        result.unwrap_or_else(|msg| {
            eprintln!("dasc: {msg}");
            None
        })
    }

    /// Read and parse one overlay file. A missing file is only an error
    /// when it was asked for explicitly.
    fn read_overlay(path: &Path, required: bool) -> Result<Option<ConfigOverlay>, String> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) if !required => return Ok(None),
            Err(e) => return Err(format!("cannot read config {}: {e}", path.display())),
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|e| format!("config parse error in {}: {e}", path.display()))
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let s = overlay.settings;
        if let Some(v) = s.label {
            self.settings.label = v;
        }
        if let Some(v) = s.log_level {
            self.settings.log_level = v;
        }
        if let Some(v) = s.log_file {
            self.settings.log_file = v;
        }

        let o = overlay.output;
        if let Some(v) = o.format {
            self.output.format = v;
        }
        if let Some(v) = o.pretty {
            self.output.pretty = v;
        }
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
