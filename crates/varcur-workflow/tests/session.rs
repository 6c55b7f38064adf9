//! Session orchestration against a recording backend.

mod common;

use serde_json::json;

use varcur_model::{
    AlleleAssessmentPayload, AlleleReportPayload, InterpretationStatus, Reference,
    ReferenceAssessmentPayload, Verification, WorkflowStatus, WorkflowType,
};
use varcur_state::{get_reference_assessment, include_acmg};
use varcur_workflow::{Collision, InterpretationSession, ToastLevel, WorkflowError};

use common::{CURATOR, RecordingBackend, alleles, interpretation, loaded_session, session};

fn reference(id: i64) -> Reference {
    serde_json::from_value(json!({"id": id})).expect("reference")
}

#[test]
fn loading_prepares_every_draft() {
    let session = loaded_session();

    let classified = session.allele_state(1).expect("state 1");
    assert!(classified.alleleassessment.reuse);
    assert_eq!(classified.auto_reuse_checked_id, Some(10));
    assert_eq!(classified.allelereport.evaluation.comment, "Known pathogenic");
    assert!(classified.report.included);

    let fresh = session.allele_state(2).expect("state 2");
    assert!(!fresh.alleleassessment.reuse);
    assert_eq!(fresh.alleleassessment.evaluation.acmg.suggested.len(), 1);
    assert!(!fresh.report.included);
}

#[test]
fn failed_load_becomes_a_toast() {
    let mut session = session(RecordingBackend::with_alleles(alleles()).failing("get_alleles"));
    assert_eq!(session.load_alleles(&[1, 2]).expect("load"), 0);
    assert!(session.alleles().is_empty());
    let toasts = session.take_toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, ToastLevel::Error);
    assert!(toasts[0].message.starts_with("Loading variants failed"));
    assert!(session.toasts().is_empty());
}

#[test]
fn load_with_unknown_classification_commits_nothing() {
    let mut stored = alleles();
    stored[1].allele_assessment = stored[0].allele_assessment.clone().map(|mut assessment| {
        assessment.id = 11;
        assessment.allele_id = 2;
        assessment.classification = "7".to_string();
        assessment
    });
    let mut session = session(RecordingBackend::with_alleles(stored));

    for _ in 0..2 {
        let err = session.load_alleles(&[1, 2]).unwrap_err();
        assert!(matches!(err, WorkflowError::State(_)));
        assert!(session.alleles().is_empty());
        assert!(session.interpretation().state.allele.is_empty());
    }
}

#[test]
fn finalizing_reused_allele_sends_references_only() {
    let mut session = loaded_session();
    {
        let (allele, state) = session.edit(1).expect("edit 1");
        let view = get_reference_assessment(allele, &reference(100), state).expect("reference");
        assert!(view.is_reused());
    }

    assert!(session.finalize_allele(1).expect("finalize allele"));
    let payload = &session.backend().finalized[0];
    assert_eq!(payload.annotation_id, Some(500));
    assert_eq!(
        payload.alleleassessment,
        AlleleAssessmentPayload::Reuse { allele_id: 1, id: 10 }
    );
    assert_eq!(
        payload.referenceassessments,
        vec![ReferenceAssessmentPayload::Reuse {
            allele_id: 1,
            reference_id: 100,
            id: 30
        }]
    );
    assert_eq!(
        payload.allelereport,
        AlleleReportPayload::Reuse { allele_id: 1, id: 20 }
    );
    assert_eq!(session.toasts().last().map(|t| t.level), Some(ToastLevel::Info));
}

#[test]
fn finalizing_fresh_allele_adopts_returned_assessment() {
    let mut session = loaded_session();
    {
        let (allele, state) = session.edit(2).expect("edit 2");
        state.alleleassessment.classification = Some("3".to_string());
        include_acmg(state, &allele.acmg.codes[0]).expect("include");
        state.allelereport.evaluation.comment = "VUS in BRCA1".to_string();
    }

    assert!(session.finalize_allele(2).expect("finalize allele"));
    let payload = &session.backend().finalized[0];
    match &payload.alleleassessment {
        AlleleAssessmentPayload::New {
            user_id,
            classification,
            evaluation,
            ..
        } => {
            assert_eq!(*user_id, CURATOR);
            assert_eq!(classification, "3");
            assert_eq!(evaluation.acmg.included.len(), 1);
        }
        other => panic!("expected a new assessment, got {other:?}"),
    }
    assert!(matches!(payload.allelereport, AlleleReportPayload::New { .. }));
    assert!(payload.referenceassessments.is_empty());

    let allele = session.allele(2).expect("allele 2");
    let assessment_id = allele.allele_assessment.as_ref().map(|a| a.id);
    assert_eq!(assessment_id, Some(1001));
    assert_eq!(allele.allele_report.as_ref().map(|r| r.id), Some(1002));

    let state = session.allele_state(2).expect("state 2");
    assert!(state.alleleassessment.reuse);
    assert_eq!(state.allele_assessment_copied_from_id, assessment_id);
    assert_eq!(state.auto_reuse_checked_id, assessment_id);
    assert_eq!(state.allele_report_copied_from_id, Some(1002));
    assert!(state.report.included);
}

#[test]
fn edited_reference_assessment_is_sent_fresh_and_then_reused() {
    let mut session = loaded_session();
    {
        let (allele, state) = session.edit(2).expect("edit 2");
        state.alleleassessment.classification = Some("2".to_string());
        let view = get_reference_assessment(allele, &reference(200), state).expect("reference");
        let varcur_state::ReferenceAssessmentView::Draft(evaluation) = view else {
            panic!("expected a draft reference assessment");
        };
        evaluation.relevance = Some("Indirectly".to_string());
    }
    assert!(session.finalize_allele(2).expect("finalize allele"));
    assert!(matches!(
        session.backend().finalized[0].referenceassessments[..],
        [ReferenceAssessmentPayload::New { reference_id: 200, .. }]
    ));
    let state = session.allele_state(2).expect("state 2");
    let entry = state.reference_entry(200).expect("entry");
    assert!(entry.is_reused());
}

#[test]
fn unclassified_draft_is_rejected_before_any_call() {
    let mut session = loaded_session();
    let err = session.finalize_allele(2).unwrap_err();
    assert!(matches!(err, WorkflowError::MissingClassification { allele_id: 2 }));
    assert_eq!(session.backend().calls, vec!["get_alleles"]);
}

#[test]
fn backend_failure_leaves_draft_untouched() {
    let mut session = session(RecordingBackend::with_alleles(alleles()).failing("finalize_allele"));
    session.load_alleles(&[1, 2]).expect("load");
    let before = session.allele_state(1).cloned();

    assert!(!session.finalize_allele(1).expect("finalize allele"));
    assert_eq!(session.allele_state(1).cloned(), before);
    let toast = session.toasts().last().expect("toast");
    assert_eq!(toast.level, ToastLevel::Error);
    assert!(toast.message.contains("503"));
}

#[test]
fn only_the_owner_may_save() {
    let mut session = InterpretationSession::new(
        varcur_config::default_config().expect("config"),
        CURATOR,
        interpretation(7),
        RecordingBackend::default(),
    );
    let err = session.save().unwrap_err();
    assert!(matches!(err, WorkflowError::NotEditable { user_id: CURATOR, .. }));
    assert_eq!(err.user_message(), "You are not allowed to edit this interpretation.");
    assert!(session.backend().calls.is_empty());
}

#[test]
fn save_reports_success() {
    let mut session = loaded_session();
    assert!(session.save().expect("save"));
    assert_eq!(session.backend().calls, vec!["get_alleles", "patch_interpretation"]);
    assert_eq!(
        session.toasts().last().map(|t| t.message.as_str()),
        Some("Interpretation saved")
    );
}

#[test]
fn finalize_requires_classified_or_excluded_alleles() {
    let mut session = loaded_session();
    let err = session.finalize().unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::UnclassifiedAlleles { ref allele_ids } if allele_ids == &vec![2]
    ));

    session.edit(2).expect("edit 2").1.verification = Some(Verification::Technical);
    assert!(session.finalize().expect("finalize"));
    let payload = &session.backend().workflow_payloads[0];
    assert_eq!(payload.technical_allele_ids, vec![2]);
    assert_eq!(payload.alleleassessment_ids, vec![10]);
    assert_eq!(session.interpretation().status, InterpretationStatus::Done);
    assert!(session.interpretation().finalized);
}

#[test]
fn mark_review_payload() {
    let mut session = loaded_session();
    session.edit(2).expect("edit 2").1.analysis.notrelevant = Some(true);

    assert!(session.mark_review().expect("mark review"));
    assert_eq!(session.interpretation().workflow_status, WorkflowStatus::Review);
    insta::assert_json_snapshot!(session.backend().workflow_payloads[0], @r#"
    {
      "allele_ids": [
        1,
        2
      ],
      "technical_allele_ids": [],
      "notrelevant_allele_ids": [
        2
      ],
      "annotation_ids": [
        500,
        501
      ],
      "custom_annotation_ids": [
        7
      ],
      "alleleassessment_ids": [
        10
      ],
      "allelereport_ids": [
        20
      ]
    }
    "#);
}

#[test]
fn reopen_only_after_done() {
    let mut session = loaded_session();
    assert!(matches!(
        session.reopen(),
        Err(WorkflowError::NotReopenable { interpretation_id: 3 })
    ));

    session.edit(2).expect("edit 2").1.analysis.notrelevant = Some(true);
    assert!(session.finalize().expect("finalize"));
    assert!(session.reopen().expect("reopen"));
    assert_eq!(session.interpretation().status, InterpretationStatus::Ongoing);
    assert!(!session.interpretation().finalized);
    assert_eq!(session.interpretation().user_id, Some(CURATOR));
}

#[test]
fn collisions_are_warnings_only() {
    let mut backend = RecordingBackend::with_alleles(alleles());
    backend.collisions.push(Collision {
        allele_id: 1,
        workflow_type: WorkflowType::Allele,
        workflow_id: 4,
        user_id: Some(5),
        username: Some("jdoe".to_string()),
    });
    let mut session = session(backend);
    session.load_alleles(&[1, 2]).expect("load");

    let collisions = session.check_collisions();
    assert_eq!(collisions.len(), 1);
    let toast = session.toasts().last().expect("toast");
    assert_eq!(toast.level, ToastLevel::Warning);
    assert_eq!(
        toast.message,
        "Allele 1 is being worked on by jdoe in allele workflow 4"
    );
    // Editing is still possible.
    assert!(session.save().expect("save"));
}

#[test]
fn uncaught_errors_are_forwarded() {
    let mut session = loaded_session();
    session.report_uncaught(&WorkflowError::UnknownAllele { allele_id: 99 });
    assert_eq!(session.backend().reported.len(), 1);
    assert!(session.backend().reported[0].contains("99"));
    assert_eq!(
        session.toasts().last().map(|t| t.message.as_str()),
        Some("An unexpected error occurred.")
    );
}
