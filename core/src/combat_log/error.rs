//! Error types for replay event log parsing

use std::path::PathBuf;
use thiserror::Error;

/// Errors during event line parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid event at line {line_number}: not a JSON object")]
    InvalidJson {
        line_number: u64,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid event at line {line_number}: not valid UTF-8")]
    InvalidEncoding { line_number: u64 },

    #[error("event at line {line_number} doesn't contain a time")]
    MissingTime { line_number: u64 },

    #[error("event at line {line_number} doesn't contain a type")]
    MissingType { line_number: u64 },
}

impl ParseError {
    pub fn line_number(&self) -> u64 {
        match self {
            ParseError::InvalidJson { line_number, .. }
            | ParseError::InvalidEncoding { line_number }
            | ParseError::MissingTime { line_number }
            | ParseError::MissingType { line_number } => *line_number,
        }
    }
}

/// Errors during event log file reading operations
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("failed to open event log {path}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to memory map file {path}")]
    MemoryMap {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse event log {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}
