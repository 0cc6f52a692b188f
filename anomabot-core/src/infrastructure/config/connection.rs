// anomabot-core/src/infrastructure/config/connection.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Where each project's data lives. Values are DuckDB file paths or `:memory:`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WarehouseConfig {
    #[serde(default = "default_database")]
    pub default: Option<String>,
    #[serde(default)]
    pub projects: HashMap<String, String>,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            default: default_database(),
            projects: HashMap::new(),
        }
    }
}

fn default_database() -> Option<String> {
    Some("warehouse.duckdb".to_string())
}

impl WarehouseConfig {
    /// Copy with every relative database path joined onto `root`.
    pub fn resolved(&self, root: &Path) -> Self {
        let resolve = |p: &String| {
            if p == ":memory:" || Path::new(p).is_absolute() {
                p.clone()
            } else {
                root.join(p).to_string_lossy().into_owned()
            }
        };
        Self {
            default: self.default.as_ref().map(resolve),
            projects: self
                .projects
                .iter()
                .map(|(name, path)| (name.clone(), resolve(path)))
                .collect(),
        }
    }
}
