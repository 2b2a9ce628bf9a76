//! Storage provider configuration.

use serde::{Deserialize, Serialize};

/// Local filesystem storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory that every shared path is resolved against.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Top-level entries never exposed through listings or shares.
    #[serde(default = "default_hidden_paths")]
    pub hidden_paths: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            hidden_paths: default_hidden_paths(),
        }
    }
}

fn default_root_path() -> String {
    "./data/storage".to_string()
}

fn default_hidden_paths() -> Vec<String> {
    vec![".avatars".to_string()]
}
