use thiserror::Error;

/// Non-fatal conditions raised while scanning. The scan always completes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("start marker {marker:?} not found after line {min_line}, scanning from the top")]
    StartNotFound { marker: String, min_line: usize },

    #[error("line {line}: unknown line token {token:?}, kept as commentary")]
    UnmatchedLineToken { line: usize, token: String },

    #[error("hexagram {id} ({name}): no side-table entry, metadata left empty")]
    MissingMetadata { id: u8, name: String },

    #[error("line {line}: hexagram {id} line {key} opened again, replacing the earlier entry")]
    DuplicateLine { line: usize, id: u8, key: u8 },

    #[error("hexagram {id} appears more than once, keeping the later record")]
    DuplicateHexagram { id: u8 },
}
