pub mod dialect;
pub mod error;
pub mod job;
pub mod split;

pub use dialect::{
    Dialect, ParsedInput, VariantDataLine, parse_free_text_line, parse_segment, parse_vcf_line,
};
pub use error::{ImportError, Result};
pub use job::{
    AnalysisRef, CreateOrAppend, GenepanelRef, ImportJob, ImportJobs, ImportPayload,
    ImportProperties, ImportSelection, ImportType, Technology, build_import_payload,
    is_selection_complete,
};
pub use split::{ImportData, split_input};
