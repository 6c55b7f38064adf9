//! An interpretation being worked on by one curator.
//!
//! The session owns the interpretation (and with it every allele draft), the
//! alleles fetched for it, and the backend. Drafts are only changed through
//! the `varcur-state` helpers. Backend failures never escape as errors: they
//! are logged and queued as toasts, and the calling operation reports `false`.

use std::collections::BTreeMap;

use tracing::{info, warn};

use varcur_config::AppConfig;
use varcur_model::{
    Allele, AlleleId, AlleleState, FinalizeAlleleResult, Interpretation, InterpretationStatus,
    ReferenceAssessmentEntry, UserId, WorkflowPayload, WorkflowStatus,
};
use varcur_state::{
    check_add_remove_allele_to_report, check_allele_state_model, copy_allele_assessment_to_state,
    copy_allele_report_to_state, get_classification, prepare_allele_state,
};

use crate::backend::{Backend, Collision, WorkflowTarget};
use crate::error::{Result, WorkflowError};
use crate::payload::{build_finalize_allele_payload, build_workflow_payload};
use crate::toast::Toast;

pub struct InterpretationSession<B> {
    config: AppConfig,
    user_id: UserId,
    interpretation: Interpretation,
    alleles: BTreeMap<AlleleId, Allele>,
    toasts: Vec<Toast>,
    backend: B,
}

impl<B: Backend> InterpretationSession<B> {
    pub fn new(config: AppConfig, user_id: UserId, interpretation: Interpretation, backend: B) -> Self {
        Self {
            config,
            user_id,
            interpretation,
            alleles: BTreeMap::new(),
            toasts: Vec::new(),
            backend,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn interpretation(&self) -> &Interpretation {
        &self.interpretation
    }

    pub fn alleles(&self) -> &BTreeMap<AlleleId, Allele> {
        &self.alleles
    }

    pub fn allele(&self, allele_id: AlleleId) -> Option<&Allele> {
        self.alleles.get(&allele_id)
    }

    pub fn allele_state(&self, allele_id: AlleleId) -> Option<&AlleleState> {
        self.interpretation.state.allele.get(&allele_id)
    }

    /// The allele together with its mutable draft, for editing through the
    /// state helpers.
    pub fn edit(&mut self, allele_id: AlleleId) -> Result<(&Allele, &mut AlleleState)> {
        let allele = self
            .alleles
            .get(&allele_id)
            .ok_or(WorkflowError::UnknownAllele { allele_id })?;
        Ok((allele, self.interpretation.state.allele_state_mut(allele_id)))
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn take_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    fn target(&self) -> WorkflowTarget {
        WorkflowTarget::of(&self.interpretation)
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.interpretation.is_editable_by(self.user_id) {
            Ok(())
        } else {
            Err(WorkflowError::NotEditable {
                interpretation_id: self.interpretation.id,
                user_id: self.user_id,
            })
        }
    }

    fn settle<T>(&mut self, operation: &str, result: anyhow::Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(
                    interpretation_id = self.interpretation.id,
                    operation,
                    error = %format!("{err:#}"),
                    "backend call failed"
                );
                self.toasts
                    .push(Toast::error(format!("{operation} failed: {err}")));
                None
            }
        }
    }

    /// Fetch alleles and bring their drafts up to date.
    ///
    /// Returns the number of alleles loaded; zero when the fetch failed.
    pub fn load_alleles(&mut self, allele_ids: &[AlleleId]) -> Result<usize> {
        let target = self.target();
        let result = self.backend.get_alleles(target, allele_ids);
        let Some(alleles) = self.settle("Loading variants", result) else {
            return Ok(0);
        };
        let count = alleles.len();
        let mut prepared = Vec::with_capacity(count);
        for allele in alleles {
            let mut state = self
                .interpretation
                .state
                .allele
                .get(&allele.id)
                .cloned()
                .unwrap_or_else(|| AlleleState::new(allele.id));
            prepare_allele_state(&allele, &mut state, &self.config)?;
            prepared.push((allele, state));
        }
        for (allele, state) in prepared {
            self.interpretation.state.allele.insert(allele.id, state);
            self.alleles.insert(allele.id, allele);
        }
        info!(
            interpretation_id = self.interpretation.id,
            alleles = count,
            "loaded alleles"
        );
        Ok(count)
    }

    pub fn save(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        let result = self.backend.patch_interpretation(&self.interpretation);
        if self.settle("Saving", result).is_none() {
            return Ok(false);
        }
        info!(interpretation_id = self.interpretation.id, "saved interpretation");
        self.toasts.push(Toast::info("Interpretation saved"));
        Ok(true)
    }

    /// Submit one allele's draft and adopt the returned objects as the new
    /// authoritative data, reused by the draft from then on.
    pub fn finalize_allele(&mut self, allele_id: AlleleId) -> Result<bool> {
        self.ensure_editable()?;
        let payload = {
            let allele = self
                .alleles
                .get(&allele_id)
                .ok_or(WorkflowError::UnknownAllele { allele_id })?;
            let state = self
                .interpretation
                .state
                .allele
                .get(&allele_id)
                .cloned()
                .unwrap_or_else(|| AlleleState::new(allele_id));
            build_finalize_allele_payload(allele, &state, self.user_id)?
        };
        let target = self.target();
        let result = self.backend.finalize_allele(target, &payload);
        let Some(finalized) = self.settle("Finalizing variant", result) else {
            return Ok(false);
        };

        let allele = self
            .alleles
            .get_mut(&allele_id)
            .ok_or(WorkflowError::UnknownAllele { allele_id })?;
        let state = self.interpretation.state.allele_state_mut(allele_id);
        merge_finalized(allele, state, finalized, &self.config)?;
        info!(allele_id, "finalized allele");
        self.toasts.push(Toast::info("Variant finalized"));
        Ok(true)
    }

    pub fn workflow_payload(&self) -> WorkflowPayload {
        build_workflow_payload(&self.alleles, &self.interpretation.state)
    }

    pub fn mark_review(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        let payload = self.workflow_payload();
        let target = self.target();
        let result = self.backend.mark_review(target, &payload);
        if self.settle("Marking for review", result).is_none() {
            return Ok(false);
        }
        self.interpretation.status = InterpretationStatus::Done;
        self.interpretation.workflow_status = WorkflowStatus::Review;
        info!(interpretation_id = self.interpretation.id, "marked for review");
        self.toasts.push(Toast::info("Marked for review"));
        Ok(true)
    }

    /// Finish the workflow. Every allele that is neither technical nor marked
    /// not relevant must have a classification.
    pub fn finalize(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        let unclassified = self.unclassified_alleles()?;
        if !unclassified.is_empty() {
            return Err(WorkflowError::UnclassifiedAlleles {
                allele_ids: unclassified,
            });
        }
        let payload = self.workflow_payload();
        let target = self.target();
        let result = self.backend.finalize(target, &payload);
        if self.settle("Finalizing", result).is_none() {
            return Ok(false);
        }
        self.interpretation.status = InterpretationStatus::Done;
        self.interpretation.finalized = true;
        info!(interpretation_id = self.interpretation.id, "finalized workflow");
        self.toasts.push(Toast::info("Workflow finalized"));
        Ok(true)
    }

    fn unclassified_alleles(&self) -> Result<Vec<AlleleId>> {
        let mut missing = Vec::new();
        for (allele_id, allele) in &self.alleles {
            let Some(state) = self.interpretation.state.allele.get(allele_id) else {
                missing.push(*allele_id);
                continue;
            };
            if state.is_technical() || state.is_not_relevant() {
                continue;
            }
            if get_classification(allele, state)?.is_none() {
                missing.push(*allele_id);
            }
        }
        Ok(missing)
    }

    /// Start a new round on a finished interpretation, owned by this user.
    pub fn reopen(&mut self) -> Result<bool> {
        if self.interpretation.status != InterpretationStatus::Done {
            return Err(WorkflowError::NotReopenable {
                interpretation_id: self.interpretation.id,
            });
        }
        let target = self.target();
        let result = self.backend.reopen(target);
        if self.settle("Reopening", result).is_none() {
            return Ok(false);
        }
        self.interpretation.status = InterpretationStatus::Ongoing;
        self.interpretation.finalized = false;
        self.interpretation.user_id = Some(self.user_id);
        info!(interpretation_id = self.interpretation.id, "reopened interpretation");
        self.toasts.push(Toast::info("Interpretation reopened"));
        Ok(true)
    }

    /// Look for other workflows working on the loaded alleles.
    ///
    /// Collisions only produce warnings; nothing is locked.
    pub fn check_collisions(&mut self) -> Vec<Collision> {
        let allele_ids: Vec<AlleleId> = self.alleles.keys().copied().collect();
        let target = self.target();
        let result = self.backend.collisions(target, &allele_ids);
        let collisions = self
            .settle("Checking collisions", result)
            .unwrap_or_default();
        for collision in &collisions {
            warn!(
                allele_id = collision.allele_id,
                workflow_id = collision.workflow_id,
                "allele is in another ongoing workflow"
            );
            self.toasts.push(Toast::warning(collision.describe()));
        }
        collisions
    }

    /// Send an unhandled error to the backend log and tell the curator.
    pub fn report_uncaught(&mut self, error: &WorkflowError) {
        warn!(error = %error, "unhandled workflow error");
        if let Err(err) = self.backend.report_error(&error.to_string()) {
            warn!(error = %format!("{err:#}"), "could not report error to backend");
        }
        self.toasts.push(Toast::error(error.user_message()));
    }
}

fn merge_finalized(
    allele: &mut Allele,
    state: &mut AlleleState,
    finalized: FinalizeAlleleResult,
    config: &AppConfig,
) -> Result<()> {
    let assessment_id = finalized.alleleassessment.id;
    allele.allele_assessment = Some(finalized.alleleassessment);
    allele.allele_report = Some(finalized.allelereport);
    for returned in finalized.referenceassessments {
        let entry = ReferenceAssessmentEntry::Reused {
            allele_id: allele.id,
            reference_id: returned.reference_id,
            id: returned.id,
        };
        match state
            .referenceassessments
            .iter_mut()
            .find(|e| e.reference_id() == returned.reference_id)
        {
            Some(slot) => *slot = entry,
            None => state.referenceassessments.push(entry),
        }
        match allele
            .reference_assessments
            .iter_mut()
            .find(|ra| ra.reference_id == returned.reference_id)
        {
            Some(slot) => *slot = returned,
            None => allele.reference_assessments.push(returned),
        }
    }

    copy_allele_assessment_to_state(allele, state, true);
    copy_allele_report_to_state(allele, state, true);
    state.alleleassessment.reuse = true;
    state.auto_reuse_checked_id = Some(assessment_id);
    check_allele_state_model(state);
    check_add_remove_allele_to_report(allele, state, config)?;
    Ok(())
}
