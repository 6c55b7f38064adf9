//! Error types for state reconciliation.
//!
//! Every variant signals an inconsistency between the draft, the
//! authoritative data and the configuration. None of them is a user error.

use thiserror::Error;
use uuid::Uuid;

use varcur_model::{AlleleId, AssessmentId, ReferenceId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("allele {allele_id}: reuse is set but the allele has no existing assessment")]
    ReuseWithoutAssessment { allele_id: AlleleId },

    #[error("classification '{value}' is not present in config")]
    UnknownClassification { value: String },

    #[error("no included ACMG code matches {code}")]
    NoMatchingCode { code: String },

    #[error("no included ACMG code has uuid {uuid}")]
    UnknownCodeUuid { uuid: Uuid },

    #[error("ACMG code {code} has no uuid")]
    MissingCodeUuid { code: String },

    #[error("allele {allele_id}: assessment is reused and cannot be edited")]
    AssessmentReused { allele_id: AlleleId },

    #[error(
        "allele {allele_id}, reference {reference_id}: reused reference assessment {id} not found"
    )]
    DanglingReuseMarker {
        allele_id: AlleleId,
        reference_id: ReferenceId,
        id: AssessmentId,
    },
}

pub type Result<T> = std::result::Result<T, StateError>;
