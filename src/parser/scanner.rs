use tracing::{info, trace, warn};

use super::lines::{classify_line, Line, LinePosition};
use crate::diagnostics::Diagnostic;
use crate::metadata::SideTable;
use crate::model::{Corpus, Hexagram, LineEntry};

/// Where the scan currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Before the first hexagram header; content is ignored.
    SeekingStart,
    /// Between a hexagram header and its first line header.
    InHeader,
    /// Inside one line's commentary.
    InLine,
}

/// First line index past `min_line` containing `marker`.
pub fn find_start(lines: &[&str], marker: &str, min_line: usize) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .skip(min_line.saturating_add(1))
        .find(|(_, line)| line.contains(marker))
        .map(|(i, _)| i)
}

/// Keep only the text before the first example marker, trimmed.
pub fn strip_examples<'t>(text: &'t str, marker: &str) -> &'t str {
    let kept = match text.find(marker) {
        Some(idx) if !marker.is_empty() => &text[..idx],
        _ => text,
    };
    kept.trim()
}

/// Push a paragraph break unless the buffer is empty or already ends with one.
fn push_break(buf: &mut Vec<String>) {
    if buf.last().is_some_and(|l| !l.is_empty()) {
        buf.push(String::new());
    }
}

/// Line-by-line state machine that assembles hexagram records.
pub struct Scanner<'a> {
    table: &'a SideTable,
    example_marker: &'a str,
    phase: Phase,
    current: Option<Hexagram>,
    open_line: Option<u8>,
    general_buf: Vec<String>,
    line_buf: Vec<String>,
    corpus: Corpus,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Scanner<'a> {
    pub fn new(table: &'a SideTable, example_marker: &'a str) -> Self {
        Self {
            table,
            example_marker,
            phase: Phase::SeekingStart,
            current: None,
            open_line: None,
            general_buf: Vec::new(),
            line_buf: Vec::new(),
            corpus: Corpus::default(),
            diagnostics: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Feed one raw line; `line_no` is 1-based and only used for diagnostics.
    pub fn feed(&mut self, line_no: usize, raw: &str) {
        match classify_line(raw) {
            Line::Hexagram { id, name } => self.open_hexagram(id, name),
            Line::LineHeader {
                position,
                token,
                rest,
            } => self.open_line(line_no, position, &token, &rest),
            Line::StrayToken { token, text } => {
                if self.phase != Phase::SeekingStart {
                    self.report(Diagnostic::UnmatchedLineToken {
                        line: line_no,
                        token,
                    });
                }
                self.push_text(text);
            }
            Line::Text(text) => self.push_text(text),
            Line::Empty => self.push_empty(),
        }
    }

    /// Seal whatever is still open and hand back the collected records.
    pub fn finish(mut self) -> (Corpus, Vec<Diagnostic>) {
        self.seal_hexagram();
        (self.corpus, self.diagnostics)
    }

    fn open_hexagram(&mut self, id: u8, name: String) {
        self.seal_hexagram();

        let meta = self.table.get(&name).cloned();
        if meta.is_none() {
            self.report(Diagnostic::MissingMetadata {
                id,
                name: name.clone(),
            });
        }
        let meta = meta.unwrap_or_default();

        trace!(id, %name, "hexagram header");
        self.current = Some(Hexagram {
            id,
            code: meta.reversed_code(),
            pinyin: meta.pinyin,
            palace: meta.palace,
            name,
            ..Default::default()
        });
        self.phase = Phase::InHeader;
    }

    fn open_line(&mut self, line_no: usize, position: LinePosition, token: &str, rest: &str) {
        if self.current.is_none() {
            trace!(token, "line header before any hexagram, ignored");
            return;
        }
        self.seal_section();

        let key = position.key();
        trace!(key, token, "line header");
        let replaced = self.current.as_mut().and_then(|hex| {
            let entry = LineEntry {
                label: Line::label(token, rest),
                commentary: String::new(),
            };
            hex.lines.insert(key, entry).map(|_| hex.id)
        });
        if let Some(id) = replaced {
            self.report(Diagnostic::DuplicateLine {
                line: line_no,
                id,
                key,
            });
        }
        self.open_line = Some(key);
        self.phase = Phase::InLine;
    }

    fn push_text(&mut self, text: String) {
        match self.phase {
            Phase::SeekingStart => {}
            Phase::InHeader => match self.current.as_mut() {
                Some(hex) if hex.header_text.is_empty() => hex.header_text = text,
                _ => self.general_buf.push(text),
            },
            Phase::InLine => self.line_buf.push(text),
        }
    }

    fn push_empty(&mut self) {
        match self.phase {
            Phase::SeekingStart => {}
            Phase::InHeader => {
                // Blank lines before the header text are skipped outright.
                if self.current.as_ref().is_some_and(|h| !h.header_text.is_empty()) {
                    push_break(&mut self.general_buf);
                }
            }
            Phase::InLine => push_break(&mut self.line_buf),
        }
    }

    /// Flush the buffer of the section being left into its record field.
    fn seal_section(&mut self) {
        let marker = self.example_marker;
        match self.phase {
            Phase::SeekingStart => {}
            Phase::InHeader => {
                let text = std::mem::take(&mut self.general_buf).join("\n");
                if let Some(hex) = self.current.as_mut() {
                    hex.commentary = strip_examples(&text, marker).to_string();
                }
            }
            Phase::InLine => {
                let text = std::mem::take(&mut self.line_buf).join("\n");
                let entry = self
                    .open_line
                    .take()
                    .zip(self.current.as_mut())
                    .and_then(|(key, hex)| hex.lines.get_mut(&key));
                if let Some(entry) = entry {
                    entry.commentary = strip_examples(&text, marker).to_string();
                }
            }
        }
    }

    fn seal_hexagram(&mut self) {
        self.seal_section();
        self.phase = Phase::SeekingStart;
        let Some(hex) = self.current.take() else {
            return;
        };

        info!("Processed hexagram {}: {}", hex.id, hex.name);
        let id = hex.id;
        if self.corpus.hexagrams.insert(id, hex).is_some() {
            self.report(Diagnostic::DuplicateHexagram { id });
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}
