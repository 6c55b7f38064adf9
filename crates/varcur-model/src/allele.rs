//! Server-authoritative allele records.
//!
//! An [`Allele`] is fetched read-only for an interpretation session. The only
//! fields the client fills in afterwards are the derived `acmg` suggestions and
//! the resolved `references`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::AlleleId;
use crate::acmg::AcmgAnnotation;
use crate::assessment::{AlleleAssessment, AlleleReport, ReferenceAssessment};
use crate::reference::Reference;

/// Frequencies reported by one provider (e.g. `GNOMAD_GENOMES`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyRecord {
    /// Population -> allele frequency.
    pub freq: BTreeMap<String, f64>,
    pub count: BTreeMap<String, u64>,
    pub num: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transcript {
    pub symbol: String,
    pub transcript: String,
    pub hgvsc: Option<String>,
    pub hgvsp: Option<String>,
    pub consequences: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationReference {
    pub id: Option<i64>,
    pub pubmed_id: Option<i64>,
    pub source: Option<String>,
    pub source_info: Option<String>,
}

/// Annotation produced by the backend pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotation {
    pub annotation_id: Option<i64>,
    pub custom_annotation_id: Option<i64>,
    pub frequencies: BTreeMap<String, FrequencyRecord>,
    pub transcripts: Vec<Transcript>,
    /// Transcript names selected by the genepanel.
    pub filtered_transcripts: Vec<String>,
    pub references: Vec<AnnotationReference>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allele {
    pub id: AlleleId,
    #[serde(default = "default_genome_reference")]
    pub genome_reference: String,
    pub chromosome: String,
    /// Zero-based start.
    pub start_position: u64,
    /// Exclusive end.
    pub open_end_position: u64,
    #[serde(default)]
    pub change_from: String,
    #[serde(default)]
    pub change_to: String,
    pub change_type: String,
    #[serde(default)]
    pub annotation: Annotation,
    #[serde(default)]
    pub allele_assessment: Option<AlleleAssessment>,
    #[serde(default)]
    pub allele_report: Option<AlleleReport>,
    #[serde(default)]
    pub reference_assessments: Vec<ReferenceAssessment>,
    #[serde(default)]
    pub acmg: AcmgAnnotation,
    #[serde(default)]
    pub references: Vec<Reference>,
}

fn default_genome_reference() -> String {
    "GRCh37".to_string()
}

impl Allele {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_classified(&self) -> bool {
        self.allele_assessment.is_some()
    }

    /// `chr:pos` for single-base changes, `chr:start-end` otherwise (1-based).
    pub fn display_position(&self) -> String {
        let start = self.start_position + 1;
        if self.open_end_position <= start {
            format!("{}:{}", self.chromosome, start)
        } else {
            format!("{}:{}-{}", self.chromosome, start, self.open_end_position)
        }
    }

    /// Short genomic HGVS description without the reference sequence prefix.
    pub fn hgvsg(&self) -> String {
        let start = self.start_position + 1;
        let end = self.open_end_position;
        let span = if end > start {
            format!("{start}_{end}")
        } else {
            start.to_string()
        };
        match self.change_type.as_str() {
            "SNP" => format!("g.{start}{}>{}", self.change_from, self.change_to),
            "del" => format!("g.{span}del"),
            "ins" => format!("g.{start}_{}ins{}", start + 1, self.change_to),
            "indel" => format!("g.{span}delins{}", self.change_to),
            other => format!("g.{span}{other}"),
        }
    }

    /// Transcripts selected by the genepanel, falling back to all transcripts.
    pub fn filtered_transcripts(&self) -> Vec<&Transcript> {
        if self.annotation.filtered_transcripts.is_empty() {
            return self.annotation.transcripts.iter().collect();
        }
        self.annotation
            .transcripts
            .iter()
            .filter(|t| {
                self.annotation
                    .filtered_transcripts
                    .iter()
                    .any(|name| name == &t.transcript)
            })
            .collect()
    }

    pub fn reference_assessment(&self, reference_id: i64) -> Option<&ReferenceAssessment> {
        self.reference_assessments
            .iter()
            .find(|ra| ra.reference_id == reference_id)
    }

    pub fn reference_assessment_by_id(&self, id: i64) -> Option<&ReferenceAssessment> {
        self.reference_assessments.iter().find(|ra| ra.id == id)
    }
}
