//! Designer settings, read once at startup.

use crate::error::ConfigError;
use egui::{Vec2, vec2};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file.
pub(crate) const CONFIG_ENV: &str = "IMGUI_RAD_CONFIG";
pub(crate) const DEFAULT_CONFIG_FILE: &str = "imgui-rad-designer.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct DesignerConfig {
    /// Drag container for the design canvas.
    pub canvas_size: Vec2,
    /// Preview tick interval.
    pub preview_interval_ms: u64,
    pub preview_window_size: Vec2,
    /// Show a native dialog when a previewed button is clicked.
    pub click_dialog: bool,
    pub syntax_highlighting: bool,
    pub highlight_theme: String,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            canvas_size: vec2(780.0, 580.0),
            preview_interval_ms: 16,
            preview_window_size: vec2(800.0, 600.0),
            click_dialog: true,
            syntax_highlighting: true,
            highlight_theme: "base16-ocean.dark".to_owned(),
            log_filter: "info".to_owned(),
        }
    }
}

impl DesignerConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Loads from `$IMGUI_RAD_CONFIG`, else the default file, else built-in values.
    ///
    /// Runs before logging is set up, so problems are returned as messages for
    /// the caller to log once the subscriber exists.
    pub fn load() -> (Self, Option<String>) {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let path = explicit
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        if explicit.is_none() && !path.exists() {
            return (Self::default(), None);
        }
        match Self::read(&path) {
            Ok(config) => (config, None),
            Err(err) => (
                Self::default(),
                Some(format!("{}: {err}; using defaults", path.display())),
            ),
        }
    }

    /// Logs where the configuration came from.
    pub fn report(&self, problem: Option<&str>) {
        match problem {
            Some(problem) => warn!(problem, "config not loaded"),
            None => info!(
                canvas = ?self.canvas_size,
                interval_ms = self.preview_interval_ms,
                "config ready"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = DesignerConfig::from_json(r#"{ "preview_interval_ms": 33 }"#).unwrap();
        assert_eq!(config.preview_interval_ms, 33);
        assert_eq!(config.canvas_size, vec2(780.0, 580.0));
        assert!(config.click_dialog);
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(
            DesignerConfig::from_json("{}").unwrap(),
            DesignerConfig::default()
        );
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            DesignerConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = DesignerConfig::read(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_serialized_defaults_read_back() {
        let json = serde_json::to_string(&DesignerConfig::default()).unwrap();
        assert_eq!(
            DesignerConfig::from_json(&json).unwrap(),
            DesignerConfig::default()
        );
    }
}
