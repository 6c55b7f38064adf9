//! ACMG code handling for drafts.
//!
//! Codes move between the `suggested` list (regenerated from the allele's
//! server annotation) and the curator's `included` list. Included codes may be
//! duplicated; each copy carries its own uuid.
//!
//! Codes carry an optional strength prefix, `STRENGTHxBASE`: `PSxPM2` is the
//! moderate criterion PM2 applied at strong strength. Upgrading and
//! downgrading walk the configured ordering of the code's category and
//! saturate at either end.

use tracing::debug;
use uuid::Uuid;

use varcur_config::AppConfig;
use varcur_model::{AcmgCode, Allele, AlleleState};

use crate::error::{Result, StateError};

/// Evidence direction of a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCategory {
    Pathogenic,
    Benign,
}

/// Equality used to match suggestions against included codes.
///
/// Two entries with uuids are equal iff the uuids are. Otherwise `code` and
/// `source` must agree, and `match` lists must be element-wise equal when both
/// sides have one.
pub fn compare_acmg_objs(a: &AcmgCode, b: &AcmgCode) -> bool {
    if let (Some(left), Some(right)) = (a.uuid, b.uuid) {
        return left == right;
    }
    if a.code != b.code || a.source != b.source {
        return false;
    }
    match (&a.matches, &b.matches) {
        (Some(left), Some(right)) => left == right,
        _ => true,
    }
}

/// Rebuild `suggested` from the allele's server codes, minus codes already
/// included. Does nothing while the assessment is reused.
pub fn populate_suggested_acmg(allele: &Allele, state: &mut AlleleState) -> bool {
    if state.alleleassessment.reuse {
        return false;
    }
    let acmg = &mut state.alleleassessment.evaluation.acmg;
    acmg.suggested = allele
        .acmg
        .codes
        .iter()
        .filter(|code| {
            !acmg
                .included
                .iter()
                .any(|included| compare_acmg_objs(included, code))
        })
        .cloned()
        .collect();
    debug!(
        allele_id = allele.id,
        suggested = acmg.suggested.len(),
        included = acmg.included.len(),
        "populated suggested ACMG codes"
    );
    true
}

fn ensure_draft_editable(state: &AlleleState) -> Result<()> {
    if state.alleleassessment.reuse {
        return Err(StateError::AssessmentReused {
            allele_id: state.allele_id.unwrap_or_default(),
        });
    }
    Ok(())
}

/// Append a copy of `code` to the included list under a fresh uuid.
pub fn include_acmg(state: &mut AlleleState, code: &AcmgCode) -> Result<Uuid> {
    ensure_draft_editable(state)?;
    let uuid = Uuid::new_v4();
    let mut copy = code.clone();
    copy.uuid = Some(uuid);
    state.alleleassessment.evaluation.acmg.included.push(copy);
    Ok(uuid)
}

/// Remove the first included code matching `code`. Other duplicates stay.
pub fn exclude_acmg(state: &mut AlleleState, code: &AcmgCode) -> Result<AcmgCode> {
    ensure_draft_editable(state)?;
    let included = &mut state.alleleassessment.evaluation.acmg.included;
    let index = included
        .iter()
        .position(|candidate| compare_acmg_objs(candidate, code))
        .ok_or_else(|| StateError::NoMatchingCode {
            code: code.code.clone(),
        })?;
    Ok(included.remove(index))
}

/// Replace the included code that has the same uuid as `code`.
pub fn update_included_acmg(state: &mut AlleleState, code: AcmgCode) -> Result<()> {
    let uuid = code.uuid.ok_or_else(|| StateError::MissingCodeUuid {
        code: code.code.clone(),
    })?;
    let slot = state
        .alleleassessment
        .evaluation
        .acmg
        .included
        .iter_mut()
        .find(|included| included.uuid == Some(uuid))
        .ok_or(StateError::UnknownCodeUuid { uuid })?;
    *slot = code;
    Ok(())
}

/// `PM2` for both `PM2` and `PSxPM2`.
pub fn code_base(code: &str) -> &str {
    code.split_once('x').map_or(code, |(_, base)| base)
}

/// Leading letters of a base code: `PM` for `PM2`.
fn base_strength(base: &str) -> &str {
    let end = base
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(base.len());
    &base[..end]
}

/// Strength a code is applied at: the prefix when present, else the base's own.
pub fn code_strength(code: &str) -> &str {
    match code.split_once('x') {
        Some((strength, _)) => strength,
        None => base_strength(code),
    }
}

pub fn code_category(code: &str, config: &AppConfig) -> Option<CodeCategory> {
    let strength = base_strength(code_base(code));
    let codes = &config.acmg.codes;
    if codes.pathogenic.iter().any(|s| s == strength) {
        Some(CodeCategory::Pathogenic)
    } else if codes.benign.iter().any(|s| s == strength) {
        Some(CodeCategory::Benign)
    } else {
        None
    }
}

/// Move a code one step stronger (`upgrade`) or weaker along its category's
/// ordering. Codes outside the orderings and codes already at the end are
/// returned unchanged.
pub fn upgrade_downgrade_code(code: &str, config: &AppConfig, upgrade: bool) -> String {
    let Some(category) = code_category(code, config) else {
        return code.to_string();
    };
    let base = code_base(code);
    // Pathogenic strengths are configured strongest first, benign weakest first.
    let (strengths, toward_start) = match category {
        CodeCategory::Pathogenic => (&config.acmg.codes.pathogenic, upgrade),
        CodeCategory::Benign => (&config.acmg.codes.benign, !upgrade),
    };
    let Some(index) = strengths.iter().position(|s| s == code_strength(code)) else {
        return code.to_string();
    };
    let next = if toward_start {
        index.checked_sub(1)
    } else {
        Some(index + 1).filter(|next| *next < strengths.len())
    };
    let Some(next) = next else {
        return code.to_string();
    };
    let strength = strengths[next].as_str();
    if strength == base_strength(base) {
        base.to_string()
    } else {
        format!("{strength}x{base}")
    }
}

pub fn upgrade_code_obj(code: &AcmgCode, config: &AppConfig) -> AcmgCode {
    let mut upgraded = code.clone();
    upgraded.code = upgrade_downgrade_code(&code.code, config, true);
    upgraded
}

pub fn downgrade_code_obj(code: &AcmgCode, config: &AppConfig) -> AcmgCode {
    let mut downgraded = code.clone();
    downgraded.code = upgrade_downgrade_code(&code.code, config, false);
    downgraded
}

pub fn can_upgrade_code_obj(code: &AcmgCode, config: &AppConfig) -> bool {
    upgrade_downgrade_code(&code.code, config, true) != code.code
}

pub fn can_downgrade_code_obj(code: &AcmgCode, config: &AppConfig) -> bool {
    upgrade_downgrade_code(&code.code, config, false) != code.code
}
