use retouch_editor::{ClassifierConfig, EditorConfig, GestureConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "retouch.config.json";

/// Retouch configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Snapshots kept for undo/redo
    pub history_limit: usize,

    /// Pointer travel in pixels before a press becomes a drag
    pub drag_threshold: f64,

    /// Text length that makes a single-child container a section
    pub text_threshold: usize,

    /// Directory for saved documents
    pub store_dir: String,

    /// Width of the layout surface used for hit testing
    pub viewport_width: f64,
}

impl Default for Config {
    fn default() -> Self {
        let editor = EditorConfig::default();
        Self {
            history_limit: editor.history_limit,
            drag_threshold: editor.gesture.drag_threshold,
            text_threshold: editor.classifier.text_threshold,
            store_dir: ".retouch".to_string(),
            viewport_width: 1024.0,
        }
    }
}

impl Config {
    /// Load config from a directory; a missing file yields the defaults
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn editor_config(&self) -> EditorConfig {
        EditorConfig {
            history_limit: self.history_limit,
            classifier: ClassifierConfig {
                text_threshold: self.text_threshold,
            },
            gesture: GestureConfig {
                drag_threshold: self.drag_threshold,
            },
        }
    }

    /// Absolute path to the store directory
    pub fn get_store_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.store_dir)
    }
}
