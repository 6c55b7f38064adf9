//! Error types for workflow orchestration.

use thiserror::Error;

use varcur_model::{AlleleId, UserId};
use varcur_state::StateError;

/// Integration errors raised while assembling or applying workflow calls.
///
/// Backend failures are not errors at this level: they are logged and turned
/// into toasts on the session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WorkflowError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error("interpretation {interpretation_id} is not editable by user {user_id}")]
    NotEditable {
        interpretation_id: i64,
        user_id: UserId,
    },

    #[error("allele {allele_id} is not loaded in this session")]
    UnknownAllele { allele_id: AlleleId },

    #[error("allele {allele_id} has no classification to submit")]
    MissingClassification { allele_id: AlleleId },

    #[error("alleles without classification: {allele_ids:?}")]
    UnclassifiedAlleles { allele_ids: Vec<AlleleId> },

    #[error("interpretation {interpretation_id} is not finished and cannot be reopened")]
    NotReopenable { interpretation_id: i64 },
}

impl WorkflowError {
    /// Short message suitable for a notification.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::NotEditable { .. } => "You are not allowed to edit this interpretation.",
            Self::MissingClassification { .. } | Self::UnclassifiedAlleles { .. } => {
                "All variants must be classified first."
            }
            Self::NotReopenable { .. } => "Only finished interpretations can be reopened.",
            Self::State(_) | Self::UnknownAllele { .. } => "An unexpected error occurred.",
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
