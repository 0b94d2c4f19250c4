use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::model::Corpus;

pub struct SplitStats {
    pub files: usize,
    pub indexed: usize,
    pub out_dir: PathBuf,
}

/// `code → id` lookup; hexagrams without a code are left out.
pub fn build_index(corpus: &Corpus) -> BTreeMap<String, String> {
    let mut index = BTreeMap::new();
    for (id, hex) in &corpus.hexagrams {
        if hex.code.is_empty() {
            continue;
        }
        if let Some(prev) = index.insert(hex.code.clone(), id.to_string()) {
            warn!("Code {} shared by hexagrams {} and {}", hex.code, prev, id);
        }
    }
    index
}

/// Write one `<id>.json` per hexagram into `out_dir`, plus the index file.
pub fn split(corpus: &Corpus, out_dir: &Path, index_path: &Path) -> Result<SplitStats> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let docs: Vec<(u8, String)> = corpus
        .hexagrams
        .par_iter()
        .map(|(id, hex)| -> Result<(u8, String)> { Ok((*id, serde_json::to_string_pretty(hex)?)) })
        .collect::<Result<Vec<_>>>()?;

    let pb = ProgressBar::new(docs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len}")?
            .progress_chars("=> "),
    );
    for (id, doc) in &docs {
        let path = out_dir.join(format!("{}.json", id));
        std::fs::write(&path, doc).with_context(|| format!("Failed to write {}", path.display()))?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    let index = build_index(corpus);
    if let Some(parent) = index_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(index_path, serde_json::to_string_pretty(&index)?)
        .with_context(|| format!("Failed to write {}", index_path.display()))?;

    info!("Split {} hexagrams into {}", docs.len(), out_dir.display());
    info!("Index saved to {}", index_path.display());
    Ok(SplitStats {
        files: docs.len(),
        indexed: index.len(),
        out_dir: out_dir.to_path_buf(),
    })
}
