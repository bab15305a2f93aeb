use serde::{Deserialize, Serialize};

use crate::classify::ClassifierConfig;
use crate::gesture::GestureConfig;
use crate::history::DEFAULT_HISTORY_LIMIT;

/// Tunables for one editing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub history_limit: usize,
    pub classifier: ClassifierConfig,
    pub gesture: GestureConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            classifier: ClassifierConfig::default(),
            gesture: GestureConfig::default(),
        }
    }
}
