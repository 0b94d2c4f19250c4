pub mod lines;
pub mod scanner;

use tracing::{info, warn};

use crate::diagnostics::Diagnostic;
use crate::metadata::SideTable;
use crate::model::Corpus;
use crate::settings::Settings;
use scanner::{find_start, Scanner};

/// Records plus everything that went sideways while building them.
#[derive(Debug)]
pub struct Extraction {
    pub corpus: Corpus,
    pub diagnostics: Vec<Diagnostic>,
    /// 0-based index of the line the scan started at, `None` when the marker was missing.
    pub start_index: Option<usize>,
}

impl Extraction {
    pub fn start_found(&self) -> bool {
        self.start_index.is_some()
    }
}

/// Locate the body start, then run every following line through the scanner.
pub fn extract(text: &str, table: &SideTable, settings: &Settings) -> Extraction {
    let lines: Vec<&str> = text.lines().collect();
    let mut diagnostics = Vec::new();

    let start_index = find_start(&lines, &settings.start_marker, settings.min_start_line);
    let start = match start_index {
        Some(idx) => idx,
        None => {
            let diagnostic = Diagnostic::StartNotFound {
                marker: settings.start_marker.clone(),
                min_line: settings.min_start_line,
            };
            warn!("{}", diagnostic);
            diagnostics.push(diagnostic);
            0
        }
    };
    info!("Starting parse at line {} of {}", start + 1, lines.len());

    let mut scanner = Scanner::new(table, &settings.example_marker);
    for (idx, line) in lines.iter().enumerate().skip(start) {
        scanner.feed(idx + 1, line);
    }
    let (corpus, scan_diagnostics) = scanner.finish();
    diagnostics.extend(scan_diagnostics);

    info!("Total hexagrams parsed: {}", corpus.len());
    Extraction {
        corpus,
        diagnostics,
        start_index,
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_settings() -> Settings {
        Settings {
            min_start_line: 5,
            ..Settings::default()
        }
    }

    fn fixture() -> (String, SideTable) {
        let text = std::fs::read_to_string("tests/fixtures/gaodao_sample.txt").unwrap();
        let table = SideTable::load(std::path::Path::new("tests/fixtures/meta.json")).unwrap();
        (text, table)
    }

    #[test]
    fn sample_skips_table_of_contents() {
        let (text, table) = fixture();
        let out = extract(&text, &table, &fixture_settings());
        assert!(out.start_found());
        let ids: Vec<u8> = out.corpus.hexagrams.keys().copied().collect();
        assert_eq!(ids, vec![1, 2, 3]);
        // The table of contents has no commentary; real records do.
        assert!(out.corpus.hexagrams.values().all(|h| !h.header_text.is_empty()));
    }

    #[test]
    fn sample_qian() {
        let (text, table) = fixture();
        let out = extract(&text, &table, &fixture_settings());
        let qian = out.corpus.get(1).unwrap();
        assert_eq!(qian.name, "乾为天");
        assert_eq!(qian.header_text, "元，亨，利，贞。");
        assert_eq!(qian.code, "111111");
        assert!(qian.commentary.starts_with("此卦六爻皆阳"));
        assert!(!qian.commentary.contains("【例】"));
        assert_eq!(qian.lines.len(), 7);
        assert!(qian.lines[&1].label.starts_with("初九："));
        assert!(qian.lines[&7].label.starts_with("用九："));
        assert!(qian.lines.values().all(|l| !l.commentary.is_empty()));
        assert!(qian.lines.values().all(|l| !l.commentary.contains("占例")));
    }

    #[test]
    fn sample_zhun_code_reversed() {
        let (text, table) = fixture();
        let out = extract(&text, &table, &fixture_settings());
        let zhun = out.corpus.get(3).unwrap();
        assert_eq!(zhun.code, "100010");
        assert_eq!(zhun.palace, "坎");
        assert_eq!(zhun.lines.len(), 6);
    }

    #[test]
    fn sample_kun_has_no_metadata() {
        let (text, table) = fixture();
        let out = extract(&text, &table, &fixture_settings());
        let kun = out.corpus.get(2).unwrap();
        assert!(kun.code.is_empty() && kun.pinyin.is_empty() && kun.palace.is_empty());
        assert!(out
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::MissingMetadata { id: 2, .. })));
    }

    #[test]
    fn scenario_next_header_seals_previous() {
        let text = "01　乾为天\n元，亨，利，贞。\n初九：潜龙，勿用。\n阳气潜藏。\n09　风天小畜\n亨。\n";
        let settings = Settings {
            min_start_line: 0,
            ..Settings::default()
        };
        // Marker sits on line 0, which is not past the threshold.
        let out = extract(text, &SideTable::empty(), &settings);
        assert!(!out.start_found());
        let qian = out.corpus.get(1).unwrap();
        assert_eq!(qian.header_text, "元，亨，利，贞。");
        assert!(qian.lines[&1].label.starts_with("初九："));
        assert_eq!(qian.lines[&1].commentary, "阳气潜藏。");
        assert_eq!(out.corpus.get(9).unwrap().header_text, "亨。");
    }

    #[test]
    fn missing_start_marker_is_reported() {
        let out = extract("序言\n目录\n正文未见\n", &SideTable::empty(), &Settings::default());
        assert!(!out.start_found());
        assert!(out.corpus.is_empty());
        assert!(matches!(
            out.diagnostics.first(),
            Some(Diagnostic::StartNotFound { min_line: 1000, .. })
        ));
    }

    #[test]
    fn empty_input() {
        let out = extract("", &SideTable::empty(), &Settings::default());
        assert!(out.corpus.is_empty());
        assert_eq!(out.diagnostics.len(), 1);
    }
}
