//! Static domain configuration.
//!
//! The configuration is loaded once and only ever read afterwards:
//! - classification options (what each class means for reuse and reporting)
//! - ACMG strength orderings used to upgrade and downgrade codes
//! - frequency provider groups and commonness thresholds

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub classification: ClassificationConfig,
    pub acmg: AcmgConfig,
    pub frequencies: FrequencyConfig,
}

// ============================================================================
// Classification
// ============================================================================

/// One selectable classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationOption {
    /// Display name (e.g. "Class 5").
    pub name: String,
    /// Value stored on assessments (e.g. "5").
    pub value: String,
    /// Assessments older than this are no longer reused automatically.
    #[serde(default)]
    pub outdated_after_days: Option<u32>,
    /// Alleles with this classification are included in the report.
    #[serde(default)]
    pub include_report: bool,
    #[serde(default)]
    pub include_analysis_with_findings: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub options: Vec<ClassificationOption>,
}

impl ClassificationConfig {
    pub fn option(&self, value: &str) -> Option<&ClassificationOption> {
        self.options.iter().find(|o| o.value == value)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|o| o.value.as_str())
    }
}

// ============================================================================
// ACMG
// ============================================================================

/// Strength orderings per code category.
///
/// `pathogenic` is listed strongest first, `benign` weakest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcmgCodes {
    pub pathogenic: Vec<String>,
    pub benign: Vec<String>,
    pub other: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcmgConfig {
    pub codes: AcmgCodes,
}

// ============================================================================
// Frequencies
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyThresholds {
    pub hi_freq_cutoff: f64,
    pub lo_freq_cutoff: f64,
}

impl Default for FrequencyThresholds {
    fn default() -> Self {
        Self {
            hi_freq_cutoff: 0.01,
            lo_freq_cutoff: 0.001,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyConfig {
    /// Provider -> populations considered.
    pub groups: BTreeMap<String, Vec<String>>,
    pub thresholds: FrequencyThresholds,
}
