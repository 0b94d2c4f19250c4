use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

/// Reference data for one hexagram, keyed by name in the side-table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HexagramMeta {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub pinyin: String,
    #[serde(default)]
    pub palace: String,
}

impl HexagramMeta {
    /// Code with its line order flipped (top-to-bottom → bottom-to-top).
    pub fn reversed_code(&self) -> String {
        self.code.chars().rev().collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SideTable {
    entries: HashMap<String, HexagramMeta>,
}

impl SideTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read side-table {}", path.display()))?;
        let table = Self::from_json(&raw)
            .with_context(|| format!("Invalid side-table JSON in {}", path.display()))?;
        if table.is_empty() {
            warn!("Side-table {} has no entries", path.display());
        } else {
            info!("Loaded {} side-table entries from {}", table.len(), path.display());
        }
        Ok(table)
    }

    /// Load when a path is given, otherwise fall back to an empty table.
    pub fn load_or_empty(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                warn!("No side-table given, hexagram metadata will be empty");
                Ok(Self::empty())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&HexagramMeta> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn insert(&mut self, name: &str, meta: HexagramMeta) {
        self.entries.insert(name.to_string(), meta);
    }
}
