//! Local, mutable curation drafts.
//!
//! Every field of [`AlleleState`] has a default, so a draft deserialised from
//! any partial JSON document is fully populated. Bookkeeping ids keep the
//! camelCase keys the backend stores them under.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::assessment::{Evaluation, ReferenceEvaluation, ReportEvaluation};
use crate::{AlleleId, AssessmentId, ReferenceId};

/// Draft of an allele assessment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlleleAssessmentDraft {
    pub classification: Option<String>,
    pub evaluation: Evaluation,
    /// Defer to the authoritative assessment instead of this draft.
    pub reuse: bool,
    pub attachment_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlleleReportDraft {
    pub evaluation: ReportEvaluation,
}

/// One reference assessment entry in a draft.
///
/// The mode is selected by the presence of `id`: with an id the entry points
/// at an authoritative assessment, without one it owns a mutable evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceAssessmentEntry {
    Reused {
        allele_id: AlleleId,
        reference_id: ReferenceId,
        id: AssessmentId,
    },
    Draft {
        allele_id: AlleleId,
        reference_id: ReferenceId,
        #[serde(default)]
        evaluation: ReferenceEvaluation,
    },
}

impl ReferenceAssessmentEntry {
    pub fn draft(allele_id: AlleleId, reference_id: ReferenceId) -> Self {
        Self::Draft {
            allele_id,
            reference_id,
            evaluation: ReferenceEvaluation::default(),
        }
    }

    pub fn allele_id(&self) -> AlleleId {
        match self {
            Self::Reused { allele_id, .. } | Self::Draft { allele_id, .. } => *allele_id,
        }
    }

    pub fn reference_id(&self) -> ReferenceId {
        match self {
            Self::Reused { reference_id, .. } | Self::Draft { reference_id, .. } => *reference_id,
        }
    }

    pub fn set_allele_id(&mut self, id: AlleleId) {
        match self {
            Self::Reused { allele_id, .. } | Self::Draft { allele_id, .. } => *allele_id = id,
        }
    }

    pub fn reused_id(&self) -> Option<AssessmentId> {
        match self {
            Self::Reused { id, .. } => Some(*id),
            Self::Draft { .. } => None,
        }
    }

    pub fn is_reused(&self) -> bool {
        matches!(self, Self::Reused { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportState {
    pub included: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisState {
    pub comment: String,
    pub notrelevant: Option<bool>,
}

/// Verification status set by the curator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verification {
    Verified,
    /// Technical artefact; never included in the report.
    Technical,
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verified => f.write_str("verified"),
            Self::Technical => f.write_str("technical"),
        }
    }
}

/// Curator's draft for one allele within one interpretation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlleleState {
    pub allele_id: Option<AlleleId>,
    pub alleleassessment: AlleleAssessmentDraft,
    pub allelereport: AlleleReportDraft,
    pub referenceassessments: Vec<ReferenceAssessmentEntry>,
    pub report: ReportState,
    pub analysis: AnalysisState,
    pub verification: Option<Verification>,
    #[serde(rename = "alleleAssessmentCopiedFromId")]
    pub allele_assessment_copied_from_id: Option<AssessmentId>,
    #[serde(rename = "alleleReportCopiedFromId")]
    pub allele_report_copied_from_id: Option<AssessmentId>,
    #[serde(rename = "autoReuseAlleleAssessmentCheckedId")]
    pub auto_reuse_checked_id: Option<AssessmentId>,
}

impl AlleleState {
    pub fn new(allele_id: AlleleId) -> Self {
        Self {
            allele_id: Some(allele_id),
            ..Self::default()
        }
    }

    /// Build a draft from a possibly partial JSON document.
    pub fn from_value(value: Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn reference_entry(&self, reference_id: ReferenceId) -> Option<&ReferenceAssessmentEntry> {
        self.referenceassessments
            .iter()
            .find(|entry| entry.reference_id() == reference_id)
    }

    pub fn is_technical(&self) -> bool {
        self.verification == Some(Verification::Technical)
    }

    pub fn is_not_relevant(&self) -> bool {
        self.analysis.notrelevant == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_document_yields_full_shape() {
        let state = AlleleState::from_value(json!({})).expect("empty state");
        assert!(!state.alleleassessment.reuse);
        assert!(state.alleleassessment.classification.is_none());
        assert!(state.alleleassessment.attachment_ids.is_empty());
        assert!(state.alleleassessment.evaluation.acmg.included.is_empty());
        assert!(state.referenceassessments.is_empty());
        assert_eq!(state.allelereport.evaluation.comment, "");
    }

    #[test]
    fn reference_entry_mode_follows_id() {
        let reused: ReferenceAssessmentEntry =
            serde_json::from_value(json!({"allele_id": 1, "reference_id": 2, "id": 7}))
                .expect("reused entry");
        assert_eq!(reused.reused_id(), Some(7));

        let draft: ReferenceAssessmentEntry = serde_json::from_value(
            json!({"allele_id": 1, "reference_id": 2, "evaluation": {"relevance": "Yes"}}),
        )
        .expect("draft entry");
        assert!(!draft.is_reused());
        assert_eq!(draft.reference_id(), 2);
    }

    #[test]
    fn bookkeeping_ids_use_camel_case_keys() {
        let state = AlleleState::from_value(json!({
            "alleleAssessmentCopiedFromId": 3,
            "autoReuseAlleleAssessmentCheckedId": 4,
            "verification": "technical"
        }))
        .expect("state");
        assert_eq!(state.allele_assessment_copied_from_id, Some(3));
        assert_eq!(state.auto_reuse_checked_id, Some(4));
        assert!(state.is_technical());
    }
}
