#![deny(unsafe_code)]

pub mod acmg;
pub mod allele_state;
pub mod error;
pub mod visibility;

pub use acmg::{
    CodeCategory, can_downgrade_code_obj, can_upgrade_code_obj, code_base, code_category,
    code_strength, compare_acmg_objs, downgrade_code_obj, exclude_acmg, include_acmg,
    populate_suggested_acmg, update_included_acmg, upgrade_code_obj, upgrade_downgrade_code,
};
pub use allele_state::{
    AssessmentView, ReferenceAssessmentView, auto_reuse_existing_assessment,
    check_add_remove_allele_to_report, check_allele_state_model, copy_allele_assessment_to_state,
    copy_allele_report_to_state, disable_reuse_allele_assessment, enable_reuse_allele_assessment,
    get_allele_assessment, get_classification, get_reference_assessment,
    is_allele_assessment_outdated, is_allele_assessment_reused, set_reference_assessment_reuse,
    toggle_reuse_allele_assessment,
};
pub use error::{Result, StateError};
pub use visibility::{
    FrequencyClass, MaxFrequency, allele_frequency_class, frequency_class, max_frequency,
};

use tracing::debug;
use varcur_config::AppConfig;
use varcur_model::{Allele, AlleleState};

/// Bring a draft up to date with a freshly fetched allele.
///
/// Runs the reconciliation steps in the order the views rely on: normalise,
/// pull in a newer report, auto-reuse a newly seen assessment, refresh
/// suggested ACMG codes, then derive report inclusion.
pub fn prepare_allele_state(
    allele: &Allele,
    state: &mut AlleleState,
    config: &AppConfig,
) -> Result<()> {
    if state.allele_id.is_none() {
        state.allele_id = Some(allele.id);
    }
    check_allele_state_model(state);
    copy_allele_report_to_state(allele, state, false);
    let reused = auto_reuse_existing_assessment(allele, state, config)?;
    populate_suggested_acmg(allele, state);
    check_add_remove_allele_to_report(allele, state, config)?;
    debug!(allele_id = allele.id, reused, "prepared allele state");
    Ok(())
}
