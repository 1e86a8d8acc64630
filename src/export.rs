//! CSV rendering of session history.
//!
//! Columns are fixed: `content,genre,polarity,intensity,comment`. The header
//! is always written, even for an empty history. Quoting follows RFC 4180,
//! so commas, quotes and newlines inside comments survive.

use serde::Serialize;

use crate::session::HistoryEntry;
use crate::{MimirError, Result};

/// Default file name offered for downloads.
pub const DEFAULT_FILE_NAME: &str = "diagnosis_history.csv";

const HEADER: [&str; 5] = ["content", "genre", "polarity", "intensity", "comment"];

#[derive(Serialize)]
struct Row<'a> {
    content: &'a str,
    genre: Option<&'a str>,
    polarity: f64,
    intensity: f64,
    comment: &'a str,
}

impl<'a> From<&'a HistoryEntry> for Row<'a> {
    fn from(entry: &'a HistoryEntry) -> Self {
        Self {
            content: entry.diagnosis.source_text(),
            genre: entry.genre.as_ref().map(|g| g.as_str()),
            polarity: entry.diagnosis.polarity(),
            intensity: entry.diagnosis.intensity(),
            comment: entry.diagnosis.comment(),
        }
    }
}

/// Render `history` as UTF-8 CSV text.
pub fn to_csv(history: &[HistoryEntry]) -> Result<String> {
    // Header is written by hand: serde-driven headers only appear once a row
    // has been serialized.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for entry in history {
        writer.serialize(Row::from(entry))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| MimirError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| MimirError::Export(e.to_string()))
}
