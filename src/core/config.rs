use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::tdnet::report::CategoryTable;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding the global label linkbases, one per namespace
    pub taxonomy_dir: Option<PathBuf>,
    /// Keep only facts asserted against `Current*` contexts
    #[serde(default)]
    pub current_period_only: bool,
    #[serde(default)]
    pub categories: CategoryTable,
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        let taxonomy_dir = std::env::var("TDNET_TAXONOMY_DIR").ok().map(PathBuf::from);

        let current_period_only = match std::env::var("TDNET_CURRENT_ONLY") {
            Ok(value) => parse_flag(&value)
                .ok_or_else(|| anyhow!("TDNET_CURRENT_ONLY must be true/false, got {}", value))?,
            Err(_) => false,
        };

        let categories = match std::env::var("TDNET_CATEGORIES") {
            Ok(path) => CategoryTable::from_path(Path::new(&path))?,
            Err(_) => CategoryTable::default(),
        };

        Ok(Self {
            taxonomy_dir,
            current_period_only,
            categories,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
