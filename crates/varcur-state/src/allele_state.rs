//! Reconciliation of an allele's authoritative data with the curator's draft.
//!
//! Every function here is pure over `(allele, state[, config])`: no I/O, and
//! the allele is never mutated. The draft decides, through its `reuse` flag,
//! whether the authoritative assessment or the local draft is surfaced.

use std::collections::BTreeSet;

use tracing::debug;
use uuid::Uuid;

use varcur_config::AppConfig;
use varcur_model::{
    Allele, AlleleAssessment, AlleleAssessmentDraft, AlleleState, Evaluation, Reference,
    ReferenceAssessment, ReferenceAssessmentEntry, ReferenceEvaluation,
};

use crate::error::{Result, StateError};


/// The assessment currently surfaced for an allele.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssessmentView<'a> {
    Reused(&'a AlleleAssessment),
    Draft(&'a AlleleAssessmentDraft),
}

impl<'a> AssessmentView<'a> {
    pub fn classification(&self) -> Option<&'a str> {
        match self {
            Self::Reused(assessment) => Some(assessment.classification.as_str()),
            Self::Draft(draft) => draft.classification.as_deref(),
        }
    }

    pub fn evaluation(&self) -> &'a Evaluation {
        match self {
            Self::Reused(assessment) => &assessment.evaluation,
            Self::Draft(draft) => &draft.evaluation,
        }
    }

    pub fn is_reused(&self) -> bool {
        matches!(self, Self::Reused(_))
    }
}

/// The reference assessment surfaced for one (allele, reference) pair.
#[derive(Debug, PartialEq)]
pub enum ReferenceAssessmentView<'a> {
    /// Authoritative assessment; read-only.
    Reused(&'a ReferenceAssessment),
    /// Mutable draft evaluation owned by the state.
    Draft(&'a mut ReferenceEvaluation),
}

impl ReferenceAssessmentView<'_> {
    pub fn evaluation(&self) -> &ReferenceEvaluation {
        match self {
            Self::Reused(assessment) => &assessment.evaluation,
            Self::Draft(evaluation) => evaluation,
        }
    }

    pub fn is_reused(&self) -> bool {
        matches!(self, Self::Reused(_))
    }
}

/// Normalise a draft so every later read finds a complete, consistent shape.
///
/// Idempotent: included ACMG codes get a uuid when missing, reference
/// assessment entries take the state's allele id, and only the first entry per
/// reference survives.
pub fn check_allele_state_model(state: &mut AlleleState) {
    ensure_included_uuids(&mut state.alleleassessment);

    if let Some(allele_id) = state.allele_id {
        for entry in &mut state.referenceassessments {
            entry.set_allele_id(allele_id);
        }
    }

    let mut seen = BTreeSet::new();
    let before = state.referenceassessments.len();
    state
        .referenceassessments
        .retain(|entry| seen.insert(entry.reference_id()));
    if state.referenceassessments.len() != before {
        debug!(
            allele_id = ?state.allele_id,
            dropped = before - state.referenceassessments.len(),
            "dropped duplicate reference assessment entries"
        );
    }
}

fn ensure_included_uuids(draft: &mut AlleleAssessmentDraft) {
    for code in &mut draft.evaluation.acmg.included {
        if code.uuid.is_none() {
            code.uuid = Some(Uuid::new_v4());
        }
    }
}

pub fn is_allele_assessment_reused(state: &AlleleState) -> bool {
    state.alleleassessment.reuse
}

/// Surface the authoritative assessment when reused, the draft otherwise.
pub fn get_allele_assessment<'a>(
    allele: &'a Allele,
    state: &'a AlleleState,
) -> Result<AssessmentView<'a>> {
    if !state.alleleassessment.reuse {
        return Ok(AssessmentView::Draft(&state.alleleassessment));
    }
    allele
        .allele_assessment
        .as_ref()
        .map(AssessmentView::Reused)
        .ok_or(StateError::ReuseWithoutAssessment {
            allele_id: allele.id,
        })
}

pub fn get_classification<'a>(allele: &'a Allele, state: &'a AlleleState) -> Result<Option<&'a str>> {
    Ok(get_allele_assessment(allele, state)?.classification())
}

/// Copy the authoritative assessment into the draft.
///
/// Only copies when the assessment id is strictly greater than the id copied
/// last time, unless `force` is set. Returns whether the draft changed.
pub fn copy_allele_assessment_to_state(
    allele: &Allele,
    state: &mut AlleleState,
    force: bool,
) -> bool {
    let Some(assessment) = allele.allele_assessment.as_ref() else {
        return false;
    };
    let newer = state
        .allele_assessment_copied_from_id
        .is_none_or(|copied| assessment.id > copied);
    if !newer && !force {
        return false;
    }
    let draft = &mut state.alleleassessment;
    draft.classification = Some(assessment.classification.clone());
    draft.evaluation = assessment.evaluation.clone();
    draft.attachment_ids = assessment.attachment_ids.clone();
    ensure_included_uuids(draft);
    state.allele_assessment_copied_from_id = Some(assessment.id);
    debug!(
        allele_id = allele.id,
        assessment_id = assessment.id,
        force,
        "copied allele assessment into draft"
    );
    true
}

/// Copy the authoritative report into the draft, gated like
/// [`copy_allele_assessment_to_state`].
pub fn copy_allele_report_to_state(allele: &Allele, state: &mut AlleleState, force: bool) -> bool {
    let Some(report) = allele.allele_report.as_ref() else {
        return false;
    };
    let newer = state
        .allele_report_copied_from_id
        .is_none_or(|copied| report.id > copied);
    if !newer && !force {
        return false;
    }
    state.allelereport.evaluation = report.evaluation.clone();
    state.allele_report_copied_from_id = Some(report.id);
    debug!(
        allele_id = allele.id,
        report_id = report.id,
        force,
        "copied allele report into draft"
    );
    true
}

/// Whether the allele's authoritative assessment is too old to reuse.
///
/// Fails when the assessment's classification is not configured.
pub fn is_allele_assessment_outdated(allele: &Allele, config: &AppConfig) -> Result<bool> {
    let Some(assessment) = allele.allele_assessment.as_ref() else {
        return Ok(false);
    };
    let option = config
        .classification
        .option(&assessment.classification)
        .ok_or_else(|| StateError::UnknownClassification {
            value: assessment.classification.clone(),
        })?;
    Ok(option.outdated_after_days.is_some_and(|days| {
        assessment.days_since_update() >= f64::from(days)
    }))
}

/// Turn on reuse. Returns `false` without touching the draft when there is
/// nothing to reuse or the existing assessment is outdated.
pub fn enable_reuse_allele_assessment(
    allele: &Allele,
    state: &mut AlleleState,
    config: &AppConfig,
) -> Result<bool> {
    if allele.allele_assessment.is_none() || is_allele_assessment_outdated(allele, config)? {
        return Ok(false);
    }
    state.alleleassessment.reuse = true;
    Ok(true)
}

/// Turn off reuse and seed the draft from the authoritative assessment
/// (unless it was already copied).
pub fn disable_reuse_allele_assessment(allele: &Allele, state: &mut AlleleState) {
    state.alleleassessment.reuse = false;
    copy_allele_assessment_to_state(allele, state, false);
}

/// Flip the reuse flag. Returns the resulting flag.
pub fn toggle_reuse_allele_assessment(
    allele: &Allele,
    state: &mut AlleleState,
    config: &AppConfig,
) -> Result<bool> {
    if state.alleleassessment.reuse {
        disable_reuse_allele_assessment(allele, state);
        Ok(false)
    } else {
        enable_reuse_allele_assessment(allele, state, config)
    }
}

/// Reuse a newly seen authoritative assessment automatically.
///
/// Each assessment id is considered once. After that the curator's choice
/// stands, so an explicit disable is never overridden for the same id.
pub fn auto_reuse_existing_assessment(
    allele: &Allele,
    state: &mut AlleleState,
    config: &AppConfig,
) -> Result<bool> {
    let Some(assessment) = allele.allele_assessment.as_ref() else {
        return Ok(false);
    };
    if state.auto_reuse_checked_id == Some(assessment.id) {
        return Ok(false);
    }
    let enabled = enable_reuse_allele_assessment(allele, state, config)?;
    state.auto_reuse_checked_id = Some(assessment.id);
    debug!(
        allele_id = allele.id,
        assessment_id = assessment.id,
        enabled,
        "checked existing assessment for auto reuse"
    );
    Ok(enabled)
}

/// Reference assessment for `(allele, reference)`.
///
/// Returns the existing draft entry, or registers a reuse marker when the
/// allele carries an authoritative assessment, or registers a fresh draft.
/// Afterwards the state holds exactly one entry for the pair.
pub fn get_reference_assessment<'a>(
    allele: &'a Allele,
    reference: &Reference,
    state: &'a mut AlleleState,
) -> Result<ReferenceAssessmentView<'a>> {
    let allele_id = allele.id;
    let reference_id = reference.id;
    let position = state
        .referenceassessments
        .iter()
        .position(|entry| entry.reference_id() == reference_id);
    let index = match position {
        Some(index) => index,
        None => {
            let entry = match allele.reference_assessment(reference_id) {
                Some(existing) => ReferenceAssessmentEntry::Reused {
                    allele_id,
                    reference_id,
                    id: existing.id,
                },
                None => ReferenceAssessmentEntry::draft(allele_id, reference_id),
            };
            debug!(
                allele_id,
                reference_id,
                reused = entry.is_reused(),
                "registered reference assessment entry"
            );
            state.referenceassessments.push(entry);
            state.referenceassessments.len() - 1
        }
    };

    match &mut state.referenceassessments[index] {
        ReferenceAssessmentEntry::Reused { id, .. } => {
            let id = *id;
            allele
                .reference_assessment_by_id(id)
                .map(ReferenceAssessmentView::Reused)
                .ok_or(StateError::DanglingReuseMarker {
                    allele_id,
                    reference_id,
                    id,
                })
        }
        ReferenceAssessmentEntry::Draft { evaluation, .. } => {
            Ok(ReferenceAssessmentView::Draft(evaluation))
        }
    }
}

/// Switch one reference between reusing the authoritative assessment and
/// editing a draft seeded from it. Returns `false` when reuse is requested but
/// the allele has no assessment for the reference.
pub fn set_reference_assessment_reuse(
    allele: &Allele,
    reference: &Reference,
    state: &mut AlleleState,
    reuse: bool,
) -> bool {
    let existing = allele.reference_assessment(reference.id);
    let entry = match (reuse, existing) {
        (true, None) => return false,
        (true, Some(existing)) => ReferenceAssessmentEntry::Reused {
            allele_id: allele.id,
            reference_id: reference.id,
            id: existing.id,
        },
        (false, existing) => ReferenceAssessmentEntry::Draft {
            allele_id: allele.id,
            reference_id: reference.id,
            evaluation: existing
                .map(|ra| ra.evaluation.clone())
                .unwrap_or_default(),
        },
    };
    match state
        .referenceassessments
        .iter_mut()
        .find(|e| e.reference_id() == reference.id)
    {
        Some(slot) => *slot = entry,
        None => state.referenceassessments.push(entry),
    }
    true
}

/// Derive report inclusion from the surfaced classification.
///
/// A `technical` verification always excludes the allele. Without a
/// classification the current flag is left alone.
pub fn check_add_remove_allele_to_report(
    allele: &Allele,
    state: &mut AlleleState,
    config: &AppConfig,
) -> Result<()> {
    if state.is_technical() {
        state.report.included = false;
        return Ok(());
    }
    let Some(classification) = get_classification(allele, state)?.map(str::to_owned) else {
        return Ok(());
    };
    let option = config
        .classification
        .option(&classification)
        .ok_or(StateError::UnknownClassification {
            value: classification.clone(),
        })?;
    state.report.included = option.include_report;
    Ok(())
}
