//! ACMG evidence code entries.
//!
//! A code entry is shared between the server's suggestions (`allele.acmg.codes`)
//! and the curator's draft (`evaluation.acmg.included`). Suggested entries carry
//! no `uuid`; every included entry gets one so duplicates of the same code can be
//! told apart.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A single ACMG code with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcmgCode {
    /// Code, optionally with a strength prefix (`PSxPM2`).
    pub code: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<String>,
    /// Values that matched the rule. Absent means "matches anything".
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,
}

impl AcmgCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            source: None,
            op: None,
            matches: None,
            value: None,
            comment: None,
            uuid: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_matches(mut self, matches: Vec<Value>) -> Self {
        self.matches = Some(matches);
        self
    }

    #[must_use]
    pub fn with_uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = Some(uuid);
        self
    }
}

/// Server-derived ACMG suggestions attached to an allele.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcmgAnnotation {
    pub codes: Vec<AcmgCode>,
}

/// The ACMG block of an evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcmgEvaluation {
    pub suggested: Vec<AcmgCode>,
    pub included: Vec<AcmgCode>,
}
