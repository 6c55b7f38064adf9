//! Shared fixtures: an in-memory backend that records every call.

#![allow(dead_code)]

use std::collections::BTreeSet;

use anyhow::{Result, anyhow, bail};
use serde_json::json;

use varcur_config::default_config;
use varcur_model::{
    Allele, AlleleAssessment, AlleleAssessmentPayload, AlleleId, AlleleReport,
    AlleleReportPayload, FinalizeAllelePayload, FinalizeAlleleResult, Interpretation,
    ReferenceAssessment, ReferenceAssessmentPayload, WorkflowPayload,
};
use varcur_workflow::{Backend, Collision, InterpretationSession, WorkflowTarget};

pub const CURATOR: i64 = 2;

#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub alleles: Vec<Allele>,
    pub calls: Vec<&'static str>,
    pub failing: BTreeSet<&'static str>,
    pub finalized: Vec<FinalizeAllelePayload>,
    pub workflow_payloads: Vec<WorkflowPayload>,
    pub collisions: Vec<Collision>,
    pub reported: Vec<String>,
    next_id: i64,
}

impl RecordingBackend {
    pub fn with_alleles(alleles: Vec<Allele>) -> Self {
        Self {
            alleles,
            next_id: 1000,
            ..Self::default()
        }
    }

    pub fn failing(mut self, call: &'static str) -> Self {
        self.failing.insert(call);
        self
    }

    fn record(&mut self, call: &'static str) -> Result<()> {
        self.calls.push(call);
        if self.failing.contains(call) {
            bail!("{call}: 503 Service Unavailable");
        }
        Ok(())
    }

    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn stored(&self, allele_id: AlleleId) -> Result<&Allele> {
        self.alleles
            .iter()
            .find(|a| a.id == allele_id)
            .ok_or_else(|| anyhow!("allele {allele_id} not found"))
    }
}

impl Backend for RecordingBackend {
    fn get_alleles(&mut self, _target: WorkflowTarget, allele_ids: &[AlleleId]) -> Result<Vec<Allele>> {
        self.record("get_alleles")?;
        Ok(self
            .alleles
            .iter()
            .filter(|a| allele_ids.contains(&a.id))
            .cloned()
            .collect())
    }

    fn patch_interpretation(&mut self, _interpretation: &Interpretation) -> Result<()> {
        self.record("patch_interpretation")
    }

    fn finalize_allele(
        &mut self,
        _target: WorkflowTarget,
        payload: &FinalizeAllelePayload,
    ) -> Result<FinalizeAlleleResult> {
        self.record("finalize_allele")?;
        self.finalized.push(payload.clone());
        let allele_id = payload.allele_id;

        let alleleassessment = match &payload.alleleassessment {
            AlleleAssessmentPayload::Reuse { id, .. } => self
                .stored(allele_id)?
                .allele_assessment
                .clone()
                .filter(|a| a.id == *id)
                .ok_or_else(|| anyhow!("assessment {id} not found"))?,
            AlleleAssessmentPayload::New {
                user_id,
                classification,
                evaluation,
                attachment_ids,
                ..
            } => AlleleAssessment {
                id: self.allocate_id(),
                allele_id,
                classification: classification.clone(),
                evaluation: evaluation.clone(),
                user_id: Some(*user_id),
                date_created: None,
                seconds_since_update: 0,
                attachment_ids: attachment_ids.clone(),
            },
        };

        let mut referenceassessments = Vec::new();
        for entry in &payload.referenceassessments {
            let ra = match entry {
                ReferenceAssessmentPayload::Reuse { id, .. } => self
                    .stored(allele_id)?
                    .reference_assessment_by_id(*id)
                    .cloned()
                    .ok_or_else(|| anyhow!("reference assessment {id} not found"))?,
                ReferenceAssessmentPayload::New {
                    reference_id,
                    user_id,
                    evaluation,
                    ..
                } => ReferenceAssessment {
                    id: self.allocate_id(),
                    allele_id,
                    reference_id: *reference_id,
                    evaluation: evaluation.clone(),
                    user_id: Some(*user_id),
                    date_created: None,
                },
            };
            referenceassessments.push(ra);
        }

        let allelereport = match &payload.allelereport {
            AlleleReportPayload::Reuse { id, .. } => self
                .stored(allele_id)?
                .allele_report
                .clone()
                .filter(|r| r.id == *id)
                .ok_or_else(|| anyhow!("report {id} not found"))?,
            AlleleReportPayload::New {
                user_id,
                evaluation,
                ..
            } => AlleleReport {
                id: self.allocate_id(),
                allele_id,
                evaluation: evaluation.clone(),
                user_id: Some(*user_id),
                date_created: None,
            },
        };

        Ok(FinalizeAlleleResult {
            allele_id,
            alleleassessment,
            referenceassessments,
            allelereport,
        })
    }

    fn mark_review(&mut self, _target: WorkflowTarget, payload: &WorkflowPayload) -> Result<()> {
        self.record("mark_review")?;
        self.workflow_payloads.push(payload.clone());
        Ok(())
    }

    fn finalize(&mut self, _target: WorkflowTarget, payload: &WorkflowPayload) -> Result<()> {
        self.record("finalize")?;
        self.workflow_payloads.push(payload.clone());
        Ok(())
    }

    fn reopen(&mut self, _target: WorkflowTarget) -> Result<()> {
        self.record("reopen")
    }

    fn collisions(
        &mut self,
        _target: WorkflowTarget,
        allele_ids: &[AlleleId],
    ) -> Result<Vec<Collision>> {
        self.record("collisions")?;
        Ok(self
            .collisions
            .iter()
            .filter(|c| allele_ids.contains(&c.allele_id))
            .cloned()
            .collect())
    }

    fn report_error(&mut self, message: &str) -> Result<()> {
        self.record("report_error")?;
        self.reported.push(message.to_string());
        Ok(())
    }
}

/// Allele 1: recently classified as 5 with a report and one reference
/// assessment. Allele 2: never classified, with one suggested code.
pub fn alleles() -> Vec<Allele> {
    vec![
        serde_json::from_value(json!({
            "id": 1,
            "chromosome": "13",
            "start_position": 32890571,
            "open_end_position": 32890572,
            "change_from": "G",
            "change_to": "A",
            "change_type": "SNP",
            "annotation": {"annotation_id": 500},
            "allele_assessment": {
                "id": 10,
                "allele_id": 1,
                "classification": "5",
                "seconds_since_update": 86400,
                "evaluation": {"acmg": {"included": [{"code": "PVS1", "source": "user"}]}}
            },
            "allele_report": {"id": 20, "allele_id": 1, "evaluation": {"comment": "Known pathogenic"}},
            "reference_assessments": [
                {"id": 30, "allele_id": 1, "reference_id": 100, "evaluation": {"relevance": "Yes"}}
            ]
        }))
        .expect("allele 1"),
        serde_json::from_value(json!({
            "id": 2,
            "chromosome": "17",
            "start_position": 41245466,
            "open_end_position": 41245467,
            "change_from": "C",
            "change_to": "T",
            "change_type": "SNP",
            "annotation": {"annotation_id": 501, "custom_annotation_id": 7},
            "acmg": {"codes": [{"code": "PM2", "source": "genepanel.frequency"}]}
        }))
        .expect("allele 2"),
    ]
}

pub fn interpretation(owner: i64) -> Interpretation {
    serde_json::from_value(json!({
        "id": 3,
        "workflow_type": "analysis",
        "workflow_id": 9,
        "status": "Ongoing",
        "user_id": owner
    }))
    .expect("interpretation")
}

pub fn session(backend: RecordingBackend) -> InterpretationSession<RecordingBackend> {
    InterpretationSession::new(
        default_config().expect("default config"),
        CURATOR,
        interpretation(CURATOR),
        backend,
    )
}

pub fn loaded_session() -> InterpretationSession<RecordingBackend> {
    let mut session = session(RecordingBackend::with_alleles(alleles()));
    assert_eq!(session.load_alleles(&[1, 2]).expect("load"), 2);
    session
}
