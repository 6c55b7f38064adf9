//! Interpretation rounds and their accumulated drafts.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::state::AlleleState;
use crate::{AlleleId, UserId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterpretationStatus {
    #[default]
    #[serde(rename = "Not started")]
    NotStarted,
    Ongoing,
    Done,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowStatus {
    #[default]
    Interpretation,
    Review,
    #[serde(rename = "Medical review")]
    MedicalReview,
    #[serde(rename = "Not ready")]
    NotReady,
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Interpretation => "Interpretation",
            Self::Review => "Review",
            Self::MedicalReview => "Medical review",
            Self::NotReady => "Not ready",
        };
        f.write_str(label)
    }
}

/// Whether the workflow covers a whole analysis or a single allele.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowType {
    Analysis,
    Allele,
}

impl WorkflowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analysis => "analysis",
            Self::Allele => "allele",
        }
    }
}

/// Shared state of an interpretation: one draft per allele.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpretationState {
    pub allele: BTreeMap<AlleleId, AlleleState>,
    pub manually_added_alleles: Vec<AlleleId>,
}

impl InterpretationState {
    /// Draft for `allele_id`, created empty on first access.
    pub fn allele_state_mut(&mut self, allele_id: AlleleId) -> &mut AlleleState {
        self.allele
            .entry(allele_id)
            .or_insert_with(|| AlleleState::new(allele_id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub id: i64,
    pub workflow_type: WorkflowType,
    /// Analysis id or allele id depending on `workflow_type`.
    pub workflow_id: i64,
    #[serde(default)]
    pub status: InterpretationStatus,
    #[serde(default)]
    pub workflow_status: WorkflowStatus,
    #[serde(default)]
    pub finalized: bool,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub state: InterpretationState,
    #[serde(default)]
    pub user_state: Map<String, Value>,
    #[serde(default)]
    pub date_last_update: Option<DateTime<Utc>>,
}

impl Interpretation {
    pub fn is_ongoing(&self) -> bool {
        self.status == InterpretationStatus::Ongoing
    }

    /// Only the owner of an ongoing interpretation may edit it.
    pub fn is_editable_by(&self, user_id: UserId) -> bool {
        self.is_ongoing() && self.user_id == Some(user_id)
    }
}
