//! Splitting pasted text into per-file segments.

use serde::{Deserialize, Serialize};

/// One pasted input block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportData {
    /// Name given on the `-filename` line; `None` for text pasted before any.
    pub filename: Option<String>,
    pub raw_input: String,
}

impl ImportData {
    pub fn display_name(&self) -> &str {
        self.filename.as_deref().unwrap_or("Unnamed")
    }
}

/// Split pasted text into segments.
///
/// A line starting with `-` opens a segment named by the rest of the line
/// (leading dashes and whitespace stripped). Blank lines are skipped. Any
/// other line is appended, with a trailing newline, to the open segment,
/// opening an unnamed one when needed.
pub fn split_input(text: &str) -> Vec<ImportData> {
    let mut segments: Vec<ImportData> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with('-') {
            let name = line.trim_start_matches('-').trim();
            segments.push(ImportData {
                filename: (!name.is_empty()).then(|| name.to_string()),
                raw_input: String::new(),
            });
            continue;
        }
        if segments.is_empty() {
            segments.push(ImportData::default());
        }
        if let Some(current) = segments.last_mut() {
            current.raw_input.push_str(line);
            current.raw_input.push('\n');
        }
    }
    segments
}
