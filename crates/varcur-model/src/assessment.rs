//! Server-authoritative assessments and the evaluation documents they carry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::acmg::AcmgEvaluation;
use crate::{AlleleId, AssessmentId, ReferenceId, UserId};

/// Free-text comment attached to one evaluation section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionComment {
    pub comment: String,
}

/// Evaluation document of an allele assessment.
///
/// Unknown keys are preserved so documents written by newer clients survive a
/// round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Evaluation {
    pub acmg: AcmgEvaluation,
    pub classification: SectionComment,
    pub frequency: SectionComment,
    pub external: SectionComment,
    pub prediction: SectionComment,
    pub reference: SectionComment,
    pub similar: SectionComment,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Evaluation document of an allele report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportEvaluation {
    pub comment: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Evaluation document of a reference assessment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceEvaluation {
    pub relevance: Option<String>,
    pub comment: String,
    pub sources: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A finalized classification. Immutable once created; superseded by a newer id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlleleAssessment {
    pub id: AssessmentId,
    pub allele_id: AlleleId,
    pub classification: String,
    #[serde(default)]
    pub evaluation: Evaluation,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub seconds_since_update: u64,
    #[serde(default)]
    pub attachment_ids: Vec<i64>,
}

impl AlleleAssessment {
    /// Days (fractional) elapsed since the assessment was last updated.
    pub fn days_since_update(&self) -> f64 {
        self.seconds_since_update as f64 / 86_400.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlleleReport {
    pub id: AssessmentId,
    pub allele_id: AlleleId,
    #[serde(default)]
    pub evaluation: ReportEvaluation,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
}

/// A finalized assessment of one reference for one allele.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceAssessment {
    pub id: AssessmentId,
    pub allele_id: AlleleId,
    pub reference_id: ReferenceId,
    #[serde(default)]
    pub evaluation: ReferenceEvaluation,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
}
