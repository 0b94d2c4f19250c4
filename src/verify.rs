//! Completeness check over a parsed corpus. Reports, never fails.

use crate::model::Corpus;

const HEXAGRAM_COUNT: u8 = 64;
const LINE_COUNT: u8 = 6;

#[derive(Debug, Default)]
pub struct Report {
    pub total: usize,
    pub missing: Vec<String>,
    pub empty: Vec<String>,
    /// Worth a look but not counted as a problem.
    pub notes: Vec<String>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.empty.is_empty()
    }

    pub fn print(&self) {
        println!("Total hexagrams: {}", self.total);
        for note in &self.notes {
            println!("{}", note);
        }

        if self.missing.is_empty() {
            println!("All hexagrams and lines present.");
        } else {
            println!("Missing items:");
            for m in &self.missing {
                println!("{}", m);
            }
        }

        if self.empty.is_empty() {
            println!("All fields populated.");
        } else {
            println!("Empty fields:");
            for e in &self.empty {
                println!("{}", e);
            }
        }
    }
}

pub fn check(corpus: &Corpus) -> Report {
    let mut report = Report {
        total: corpus.len(),
        ..Default::default()
    };

    for id in 1..=HEXAGRAM_COUNT {
        let Some(hex) = corpus.get(id) else {
            report.missing.push(format!("Hexagram {} missing", id));
            continue;
        };

        if hex.name.is_empty() {
            report.empty.push(format!("Hexagram {} name empty", id));
        }
        if hex.header_text.is_empty() {
            report
                .notes
                .push(format!("Hexagram {} general_text empty (might be ok)", id));
        }
        if hex.commentary.is_empty() {
            report.empty.push(format!("Hexagram {} takashima_general empty", id));
        }

        for key in 1..=LINE_COUNT {
            let Some(line) = hex.lines.get(&key) else {
                report.missing.push(format!("Hexagram {} Line {} missing", id, key));
                continue;
            };
            if line.label.is_empty() {
                report.empty.push(format!("Hexagram {} Line {} text empty", id, key));
            }
            if line.commentary.is_empty() {
                report
                    .empty
                    .push(format!("Hexagram {} Line {} explanation empty", id, key));
            }
        }
    }

    report
}
