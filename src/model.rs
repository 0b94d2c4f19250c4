use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One hexagram with its merged metadata and commentary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hexagram {
    /// Older documents carry no id; `Corpus::load` fills it from the map key.
    #[serde(default)]
    pub id: u8,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pinyin: String,
    /// Line symbols bottom-to-top (the side-table stores them top-to-bottom).
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub palace: String,
    #[serde(rename = "general_text", default)]
    pub header_text: String,
    #[serde(rename = "takashima_general", default)]
    pub commentary: String,
    #[serde(default)]
    pub lines: BTreeMap<u8, LineEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineEntry {
    #[serde(rename = "text", default)]
    pub label: String,
    #[serde(rename = "takashima_explanation", default)]
    pub commentary: String,
}

/// Output collection keyed by hexagram id (stringified on the wire).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    pub hexagrams: BTreeMap<u8, Hexagram>,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.hexagrams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hexagrams.is_empty()
    }

    pub fn get(&self, id: u8) -> Option<&Hexagram> {
        self.hexagrams.get(&id)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut corpus: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid corpus JSON in {}", path.display()))?;
        for (id, hex) in corpus.hexagrams.iter_mut() {
            hex.id = *id;
        }
        Ok(corpus)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }
}
