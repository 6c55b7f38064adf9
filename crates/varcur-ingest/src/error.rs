use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("line {line}: expected at least 8 tab separated VCF fields, found {found}")]
    MalformedVcfLine { line: usize, found: usize },

    #[error("line {line}: malformed SeqPilot row: {source}")]
    MalformedSeqPilotRow {
        line: usize,
        #[source]
        source: csv::Error,
    },

    #[error("import selection for '{filename}' is incomplete")]
    IncompleteSelection { filename: String },

    #[error("no import job with index {index}")]
    UnknownJob { index: usize },
}

pub type Result<T> = std::result::Result<T, ImportError>;
