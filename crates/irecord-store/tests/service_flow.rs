//! End-to-end service flows against a real (temp-file) sqlite store.

use assert_matches::assert_matches;
use serde_json::json;

use irecord_store::entities::{ActivityType, ExportRequestStatus, InnovationStatus, SupportStatus};
use irecord_store::{ErrorCode, ServiceError, Store};

fn open_store() -> (tempfile::TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("irecord.db")).unwrap();
    (dir, store)
}

#[test]
fn create_edit_and_submit_flow() {
    let (_dir, store) = open_store();

    let innovation = store.create_innovation("Glucose sensor", "user-1", None).unwrap();
    assert_eq!(innovation.status, InnovationStatus::Created);

    let draft = store
        .save_section_draft(
            &innovation.id,
            "INNOVATION_DESCRIPTION",
            &json!({
                "name": "Glucose sensor",
                "description": "Continuous monitoring",
                "categories": ["IN_VITRO_DIAGNOSTIC"],
                "bogusField": "dropped"
            }),
        )
        .unwrap();
    let section = draft.document["INNOVATION_DESCRIPTION"].as_object().unwrap();
    assert_eq!(section["name"], "Glucose sensor");
    assert!(!section.contains_key("bogusField"));

    // A drafted-but-unsubmitted section blocks innovation submission.
    let err = store.submit_innovation(&innovation.id).unwrap_err();
    assert_matches!(
        err,
        ServiceError::UnprocessableEntity(ErrorCode::InnovationSectionsIncomplete)
    );

    store.submit_section(&innovation.id, "INNOVATION_DESCRIPTION").unwrap();
    let submitted = store.submit_innovation(&innovation.id).unwrap();
    assert_eq!(submitted.status, InnovationStatus::WaitingNeedsAssessment);
    assert!(submitted.submitted_at.is_some());

    let document = store.get_document(&innovation.id).unwrap();
    assert!(document.is_snapshot);
    assert_eq!(
        document.document["INNOVATION_DESCRIPTION"]["categories"],
        json!(["IN_VITRO_DIAGNOSTIC"])
    );

    // Second submission is rejected.
    let err = store.submit_innovation(&innovation.id).unwrap_err();
    assert_matches!(
        err,
        ServiceError::UnprocessableEntity(ErrorCode::InnovationAlreadySubmitted)
    );

    let log = store.list_activity_log(&innovation.id, &[], 10, 0).unwrap();
    assert_eq!(log[0].activity, ActivityType::InnovationSubmission);
    let submissions = store
        .list_activity_log(&innovation.id, &[ActivityType::InnovationSubmission], 10, 0)
        .unwrap();
    assert_eq!(submissions.len(), 1);
}

#[test]
fn sections_never_started_do_not_block_submission() {
    // A section with no row at all is treated as complete by the
    // completeness check; only existing non-submitted rows block.
    let (_dir, store) = open_store();
    let innovation = store.create_innovation("Empty record", "user-1", None).unwrap();
    assert!(store.list_sections(&innovation.id).unwrap().is_empty());

    let submitted = store.submit_innovation(&innovation.id).unwrap();
    assert_eq!(submitted.status, InnovationStatus::WaitingNeedsAssessment);
}

#[test]
fn seeded_documents_pass_through_strict_cleanup() {
    let (_dir, store) = open_store();
    let innovation = store
        .create_innovation(
            "Seeded",
            "user-1",
            Some(&json!({
                "version": "202304",
                "INNOVATION_DESCRIPTION": {
                    "name": "Seeded",
                    "categories": ["NOT_A_CATEGORY"]
                }
            })),
        )
        .unwrap();
    let document = store.get_document(&innovation.id).unwrap();
    let section = document.document["INNOVATION_DESCRIPTION"].as_object().unwrap();
    assert_eq!(section["name"], "Seeded");
    assert!(!section.contains_key("categories"));
}

#[test]
fn export_request_lifecycle() {
    let (_dir, store) = open_store();
    let innovation = store.create_innovation("Shared", "user-1", None).unwrap();
    store
        .update_innovation_shares(&innovation.id, &["org-a".to_string()])
        .unwrap();

    // Not shared with org-b.
    let err = store
        .create_export_request(&innovation.id, "org-b", "qa-1", "Need the record")
        .unwrap_err();
    assert_matches!(err, ServiceError::Forbidden(ErrorCode::InnovationNotShared));

    let request = store
        .create_export_request(&innovation.id, "org-a", "qa-1", "Need the record")
        .unwrap();
    assert_eq!(request.status, ExportRequestStatus::Pending);

    // Rejection needs a reason.
    let err = store
        .update_export_request_status(&request.id, ExportRequestStatus::Rejected, "user-1", None)
        .unwrap_err();
    assert_matches!(
        err,
        ServiceError::UnprocessableEntity(ErrorCode::ExportRequestRejectReasonRequired)
    );

    // Only the requester may cancel.
    let err = store
        .update_export_request_status(&request.id, ExportRequestStatus::Cancelled, "someone-else", None)
        .unwrap_err();
    assert_matches!(err, ServiceError::Forbidden(ErrorCode::ExportRequestWrongRequester));

    let resolved = store
        .update_export_request_status(
            &request.id,
            ExportRequestStatus::Rejected,
            "user-1",
            Some("Sensitive data"),
        )
        .unwrap();
    assert_eq!(resolved.status, ExportRequestStatus::Rejected);
    assert_eq!(resolved.reject_reason.as_deref(), Some("Sensitive data"));

    // Resolved requests cannot change again.
    let err = store
        .update_export_request_status(&request.id, ExportRequestStatus::Approved, "user-1", None)
        .unwrap_err();
    assert_matches!(
        err,
        ServiceError::UnprocessableEntity(ErrorCode::ExportRequestNotPending)
    );

    let pending = store
        .list_export_requests(&innovation.id, Some(ExportRequestStatus::Pending))
        .unwrap();
    assert!(pending.is_empty());
}

#[test]
fn removing_a_share_rejects_its_pending_requests_and_closes_supports() {
    let (_dir, store) = open_store();
    let innovation = store.create_innovation("Shared", "user-1", None).unwrap();
    store
        .update_innovation_shares(&innovation.id, &["org-a".to_string(), "org-b".to_string()])
        .unwrap();
    let request = store
        .create_export_request(&innovation.id, "org-a", "qa-1", "Need the record")
        .unwrap();
    store.add_support(&innovation.id, "org-a").unwrap();

    store
        .update_innovation_shares(&innovation.id, &["org-b".to_string()])
        .unwrap();

    let request = store.get_export_request(&request.id).unwrap();
    assert_eq!(request.status, ExportRequestStatus::Rejected);
    assert!(request.reject_reason.is_some());

    let supports = store.list_supports(&innovation.id).unwrap();
    assert_eq!(supports.len(), 1);
    assert_eq!(supports[0].status, SupportStatus::Closed);

    assert_eq!(store.innovation_shares(&innovation.id).unwrap(), ["org-b"]);
}

#[test]
fn archive_and_withdraw_cascade() {
    let (_dir, store) = open_store();
    let innovation = store.create_innovation("To archive", "user-1", None).unwrap();
    store
        .update_innovation_shares(&innovation.id, &["org-a".to_string()])
        .unwrap();
    let support = store.add_support(&innovation.id, "org-a").unwrap();
    store
        .update_support_status(&support.id, SupportStatus::Engaging)
        .unwrap();
    let request = store
        .create_export_request(&innovation.id, "org-a", "qa-1", "Need the record")
        .unwrap();

    let archived = store.archive_innovation(&innovation.id).unwrap();
    assert_eq!(archived.status, InnovationStatus::Archived);
    assert_eq!(archived.previous_status, Some(InnovationStatus::Created));

    let supports = store.list_supports(&innovation.id).unwrap();
    assert_eq!(supports[0].status, SupportStatus::Closed);
    let request = store.get_export_request(&request.id).unwrap();
    assert_eq!(request.status, ExportRequestStatus::Rejected);

    let err = store.archive_innovation(&innovation.id).unwrap_err();
    assert_matches!(err, ServiceError::UnprocessableEntity(ErrorCode::InnovationArchived));

    let withdrawn = store.withdraw_innovation(&innovation.id, "No longer pursuing").unwrap();
    assert_eq!(withdrawn.status, InnovationStatus::Withdrawn);
    let err = store.withdraw_innovation(&innovation.id, "again").unwrap_err();
    assert_matches!(err, ServiceError::UnprocessableEntity(ErrorCode::InnovationWithdrawn));
}

#[test]
fn assessment_overdue_counting_uses_the_cutoff() {
    let (_dir, store) = open_store();
    let innovation = store.create_innovation("Waiting", "user-1", None).unwrap();
    store.submit_innovation(&innovation.id).unwrap();

    assert_eq!(store.count_assessment_overdue("9999-01-01T00:00:00Z").unwrap(), 1);
    assert_eq!(store.count_assessment_overdue("2000-01-01T00:00:00Z").unwrap(), 0);
}

#[test]
fn migration_is_a_no_op_at_the_latest_version() {
    let (_dir, store) = open_store();
    let innovation = store.create_innovation("Current", "user-1", None).unwrap();
    let before = store.get_document(&innovation.id).unwrap();
    let after = store.migrate_document(&innovation.id).unwrap();
    assert_eq!(before.version, after.version);
    assert_eq!(before.document, after.document);

    // No migration activity was logged.
    let log = store
        .list_activity_log(&innovation.id, &[ActivityType::DocumentMigration], 10, 0)
        .unwrap();
    assert!(log.is_empty());
}

#[test]
fn unknown_innovations_produce_typed_not_found() {
    let (_dir, store) = open_store();
    let err = store.get_innovation("missing").unwrap_err();
    assert_matches!(err, ServiceError::NotFound(ErrorCode::InnovationNotFound));
    let err = store.get_document("missing").unwrap_err();
    assert_matches!(err, ServiceError::NotFound(ErrorCode::InnovationNotFound | ErrorCode::DocumentNotFound));
}
