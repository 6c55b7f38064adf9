pub mod acmg;
pub mod allele;
pub mod assessment;
pub mod error;
pub mod interpretation;
pub mod payload;
pub mod reference;
pub mod state;

pub type AlleleId = i64;
pub type AssessmentId = i64;
pub type ReferenceId = i64;
pub type UserId = i64;

pub use acmg::{AcmgAnnotation, AcmgCode, AcmgEvaluation};
pub use allele::{Allele, Annotation, AnnotationReference, FrequencyRecord, Transcript};
pub use assessment::{
    AlleleAssessment, AlleleReport, Evaluation, ReferenceAssessment, ReferenceEvaluation,
    ReportEvaluation, SectionComment,
};
pub use error::{ModelError, Result};
pub use interpretation::{
    Interpretation, InterpretationState, InterpretationStatus, WorkflowStatus, WorkflowType,
};
pub use payload::{
    AlleleAssessmentPayload, AlleleReportPayload, FinalizeAllelePayload, FinalizeAlleleResult,
    ReferenceAssessmentPayload, WorkflowPayload,
};
pub use reference::Reference;
pub use state::{
    AlleleAssessmentDraft, AlleleReportDraft, AlleleState, AnalysisState,
    ReferenceAssessmentEntry, ReportState, Verification,
};
