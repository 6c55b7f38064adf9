//! Request bodies sent when finalizing alleles and moving workflows.
//!
//! Each entry is either a reference to an existing authoritative object
//! (`{allele_id, id}`) or a fresh object built from the draft. Both shapes
//! serialise as plain JSON objects.

use serde::{Deserialize, Serialize};

use crate::assessment::{Evaluation, ReferenceEvaluation, ReportEvaluation};
use crate::{AlleleId, AssessmentId, ReferenceId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlleleAssessmentPayload {
    Reuse {
        allele_id: AlleleId,
        id: AssessmentId,
    },
    New {
        allele_id: AlleleId,
        user_id: UserId,
        classification: String,
        evaluation: Evaluation,
        attachment_ids: Vec<i64>,
    },
}

impl AlleleAssessmentPayload {
    pub fn allele_id(&self) -> AlleleId {
        match self {
            Self::Reuse { allele_id, .. } | Self::New { allele_id, .. } => *allele_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceAssessmentPayload {
    Reuse {
        allele_id: AlleleId,
        reference_id: ReferenceId,
        id: AssessmentId,
    },
    New {
        allele_id: AlleleId,
        reference_id: ReferenceId,
        user_id: UserId,
        evaluation: ReferenceEvaluation,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlleleReportPayload {
    Reuse {
        allele_id: AlleleId,
        id: AssessmentId,
    },
    New {
        allele_id: AlleleId,
        user_id: UserId,
        evaluation: ReportEvaluation,
    },
}

/// Body of the finalize-allele call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizeAllelePayload {
    pub allele_id: AlleleId,
    pub annotation_id: Option<i64>,
    pub custom_annotation_id: Option<i64>,
    pub alleleassessment: AlleleAssessmentPayload,
    pub referenceassessments: Vec<ReferenceAssessmentPayload>,
    pub allelereport: AlleleReportPayload,
}

/// Body of the mark-review and finalize workflow calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowPayload {
    pub allele_ids: Vec<AlleleId>,
    pub technical_allele_ids: Vec<AlleleId>,
    pub notrelevant_allele_ids: Vec<AlleleId>,
    pub annotation_ids: Vec<i64>,
    pub custom_annotation_ids: Vec<i64>,
    pub alleleassessment_ids: Vec<AssessmentId>,
    pub allelereport_ids: Vec<AssessmentId>,
}

/// Response of the finalize-allele call: the objects now authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizeAlleleResult {
    pub allele_id: AlleleId,
    pub alleleassessment: crate::AlleleAssessment,
    #[serde(default)]
    pub referenceassessments: Vec<crate::ReferenceAssessment>,
    pub allelereport: crate::AlleleReport,
}
