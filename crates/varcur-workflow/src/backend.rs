//! The seam between a session and the REST backend.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use varcur_model::{
    Allele, AlleleId, FinalizeAllelePayload, FinalizeAlleleResult, Interpretation, UserId,
    WorkflowPayload, WorkflowType,
};

/// Identifies the workflow a call applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowTarget {
    pub workflow_type: WorkflowType,
    pub workflow_id: i64,
}

impl WorkflowTarget {
    pub fn of(interpretation: &Interpretation) -> Self {
        Self {
            workflow_type: interpretation.workflow_type,
            workflow_id: interpretation.workflow_id,
        }
    }
}

/// Another ongoing workflow touching one of our alleles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    pub allele_id: AlleleId,
    pub workflow_type: WorkflowType,
    pub workflow_id: i64,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub username: Option<String>,
}

impl Collision {
    pub fn describe(&self) -> String {
        let who = self.username.as_deref().unwrap_or("another user");
        format!(
            "Allele {} is being worked on by {} in {} workflow {}",
            self.allele_id,
            who,
            self.workflow_type.as_str(),
            self.workflow_id
        )
    }
}

/// Remote operations a session depends on.
///
/// Implementations perform one request per call without retrying. Any error
/// is reported back to the curator by the session.
pub trait Backend {
    fn get_alleles(
        &mut self,
        target: WorkflowTarget,
        allele_ids: &[AlleleId],
    ) -> Result<Vec<Allele>>;

    fn patch_interpretation(&mut self, interpretation: &Interpretation) -> Result<()>;

    fn finalize_allele(
        &mut self,
        target: WorkflowTarget,
        payload: &FinalizeAllelePayload,
    ) -> Result<FinalizeAlleleResult>;

    fn mark_review(&mut self, target: WorkflowTarget, payload: &WorkflowPayload) -> Result<()>;

    fn finalize(&mut self, target: WorkflowTarget, payload: &WorkflowPayload) -> Result<()>;

    fn reopen(&mut self, target: WorkflowTarget) -> Result<()>;

    fn collisions(
        &mut self,
        target: WorkflowTarget,
        allele_ids: &[AlleleId],
    ) -> Result<Vec<Collision>>;

    /// Forward an error nobody handled to the backend log.
    fn report_error(&mut self, message: &str) -> Result<()>;
}
