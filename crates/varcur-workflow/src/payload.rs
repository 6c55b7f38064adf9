//! Turning accumulated drafts into request bodies.

use std::collections::BTreeMap;

use tracing::debug;

use varcur_model::{
    Allele, AlleleAssessmentPayload, AlleleId, AlleleReportPayload, AlleleState,
    FinalizeAllelePayload, InterpretationState, ReferenceAssessmentEntry,
    ReferenceAssessmentPayload, ReferenceEvaluation, UserId, WorkflowPayload,
};
use varcur_state::StateError;

use crate::error::{Result, WorkflowError};

/// The finalize entries for one allele.
#[derive(Debug, Clone, PartialEq)]
pub struct AllelePayloads {
    pub alleleassessment: AlleleAssessmentPayload,
    pub referenceassessments: Vec<ReferenceAssessmentPayload>,
    pub allelereport: AlleleReportPayload,
}

/// Build the finalize entries for one allele from its draft.
///
/// Reused assessments and reference assessments are sent as `{allele_id, id}`.
/// Draft reference assessments that were never filled in are left out. The
/// report is sent as a reference when the draft still matches the
/// authoritative report.
pub fn assemble_allele_payloads(
    allele: &Allele,
    state: &AlleleState,
    user_id: UserId,
) -> Result<AllelePayloads> {
    let allele_id = allele.id;
    let draft = &state.alleleassessment;
    let alleleassessment = if draft.reuse {
        let existing = allele
            .allele_assessment
            .as_ref()
            .ok_or(StateError::ReuseWithoutAssessment { allele_id })?;
        AlleleAssessmentPayload::Reuse {
            allele_id,
            id: existing.id,
        }
    } else {
        let classification = draft
            .classification
            .clone()
            .ok_or(WorkflowError::MissingClassification { allele_id })?;
        AlleleAssessmentPayload::New {
            allele_id,
            user_id,
            classification,
            evaluation: draft.evaluation.clone(),
            attachment_ids: draft.attachment_ids.clone(),
        }
    };

    let referenceassessments = state
        .referenceassessments
        .iter()
        .filter_map(|entry| match entry {
            ReferenceAssessmentEntry::Reused {
                reference_id, id, ..
            } => Some(ReferenceAssessmentPayload::Reuse {
                allele_id,
                reference_id: *reference_id,
                id: *id,
            }),
            ReferenceAssessmentEntry::Draft {
                reference_id,
                evaluation,
                ..
            } if *evaluation != ReferenceEvaluation::default() => {
                Some(ReferenceAssessmentPayload::New {
                    allele_id,
                    reference_id: *reference_id,
                    user_id,
                    evaluation: evaluation.clone(),
                })
            }
            ReferenceAssessmentEntry::Draft { .. } => None,
        })
        .collect();

    let allelereport = match allele.allele_report.as_ref() {
        Some(report) if report.evaluation == state.allelereport.evaluation => {
            AlleleReportPayload::Reuse {
                allele_id,
                id: report.id,
            }
        }
        _ => AlleleReportPayload::New {
            allele_id,
            user_id,
            evaluation: state.allelereport.evaluation.clone(),
        },
    };

    Ok(AllelePayloads {
        alleleassessment,
        referenceassessments,
        allelereport,
    })
}

pub fn build_finalize_allele_payload(
    allele: &Allele,
    state: &AlleleState,
    user_id: UserId,
) -> Result<FinalizeAllelePayload> {
    let payloads = assemble_allele_payloads(allele, state, user_id)?;
    debug!(
        allele_id = allele.id,
        referenceassessments = payloads.referenceassessments.len(),
        "assembled finalize allele payload"
    );
    Ok(FinalizeAllelePayload {
        allele_id: allele.id,
        annotation_id: allele.annotation.annotation_id,
        custom_annotation_id: allele.annotation.custom_annotation_id,
        alleleassessment: payloads.alleleassessment,
        referenceassessments: payloads.referenceassessments,
        allelereport: payloads.allelereport,
    })
}

/// Body for mark-review and finalize over every loaded allele.
pub fn build_workflow_payload(
    alleles: &BTreeMap<AlleleId, Allele>,
    state: &InterpretationState,
) -> WorkflowPayload {
    let mut payload = WorkflowPayload::default();
    for (allele_id, allele) in alleles {
        payload.allele_ids.push(*allele_id);
        if let Some(allele_state) = state.allele.get(allele_id) {
            if allele_state.is_technical() {
                payload.technical_allele_ids.push(*allele_id);
            }
            if allele_state.is_not_relevant() {
                payload.notrelevant_allele_ids.push(*allele_id);
            }
        }
        payload
            .annotation_ids
            .extend(allele.annotation.annotation_id);
        payload
            .custom_annotation_ids
            .extend(allele.annotation.custom_annotation_id);
        payload
            .alleleassessment_ids
            .extend(allele.allele_assessment.as_ref().map(|a| a.id));
        payload
            .allelereport_ids
            .extend(allele.allele_report.as_ref().map(|r| r.id));
    }
    payload
}
