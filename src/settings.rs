use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "takashima.toml";

/// Scan and output settings: defaults < config file < `TAKASHIMA_*` env.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Header line of the first hexagram in the body text.
    pub start_marker: String,
    /// The start marker only counts past this line index (skips the table of contents).
    pub min_start_line: usize,
    /// Commentary after this marker holds worked examples and is dropped.
    pub example_marker: String,
    pub output: PathBuf,
    pub split_dir: PathBuf,
    pub index_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_marker: "01\u{3000}乾为天".to_string(),
            min_start_line: 1000,
            example_marker: "【例】".to_string(),
            output: PathBuf::from("takashima.json"),
            split_dir: PathBuf::from("public/data/takashima"),
            index_path: PathBuf::from("public/data/takashima_index.json"),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("TAKASHIMA").try_parsing(true))
            .build()
            .and_then(Config::try_deserialize)
            .with_context(|| format!("Failed to load settings from {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings.min_start_line, 1000);
        assert_eq!(settings.example_marker, "【例】");
        assert_eq!(settings.start_marker, "01　乾为天");
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("takashima.toml");
        std::fs::write(&path, "min_start_line = 5\noutput = \"out/all.json\"\n").unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.min_start_line, 5);
        assert_eq!(settings.output, PathBuf::from("out/all.json"));
        assert_eq!(settings.example_marker, "【例】");
    }

    #[test]
    fn env_overrides_file() {
        // No other test asserts index_path.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("takashima.toml");
        std::fs::write(&path, "index_path = \"from/file.json\"\n").unwrap();

        std::env::set_var("TAKASHIMA_INDEX_PATH", "from/env.json");
        let settings = Settings::load(&path);
        std::env::remove_var("TAKASHIMA_INDEX_PATH");

        let settings = settings.unwrap();
        assert_eq!(settings.index_path, PathBuf::from("from/env.json"));
        assert_eq!(settings.min_start_line, 1000);
    }
}
