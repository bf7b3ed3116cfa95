// libs/appointment-cell/tests/lifecycle_test.rs

use assert_matches::assert_matches;
use chrono::Utc;
use uuid::Uuid;

use appointment_cell::models::{
    Appointment, AppointmentAction, AppointmentError, AppointmentStatus,
};
use appointment_cell::services::lifecycle::{authorize, valid_transitions, validate_status_transition};
use shared_utils::test_utils::TestUser;

fn appointment(user_id: &str, vet_id: &str, status: AppointmentStatus) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        user_id: user_id.parse().unwrap(),
        vet_id: vet_id.parse().unwrap(),
        appointment_datetime: Utc::now(),
        status,
        reason: Some("Limping calf".to_string()),
        images: None,
        diagnosis: None,
        prescription: None,
        vet_comments: None,
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
    }
}

// ==============================================================================
// STATE MACHINE
// ==============================================================================

#[test]
fn pending_can_be_approved_or_cancelled_only() {
    let from = AppointmentStatus::Pending;

    assert!(validate_status_transition(&from, &AppointmentStatus::Approved).is_ok());
    assert!(validate_status_transition(&from, &AppointmentStatus::Cancelled).is_ok());
    assert_matches!(
        validate_status_transition(&from, &AppointmentStatus::Completed),
        Err(AppointmentError::InvalidStatusTransition { .. })
    );
}

#[test]
fn approved_can_complete_or_cancel() {
    let from = AppointmentStatus::Approved;

    assert!(validate_status_transition(&from, &AppointmentStatus::Completed).is_ok());
    assert!(validate_status_transition(&from, &AppointmentStatus::Cancelled).is_ok());
    assert_matches!(
        validate_status_transition(&from, &AppointmentStatus::Pending),
        Err(AppointmentError::InvalidStatusTransition { .. })
    );
}

#[test]
fn completed_and_cancelled_are_terminal() {
    assert!(valid_transitions(&AppointmentStatus::Completed).is_empty());
    assert!(valid_transitions(&AppointmentStatus::Cancelled).is_empty());

    assert_matches!(
        validate_status_transition(&AppointmentStatus::Cancelled, &AppointmentStatus::Approved),
        Err(AppointmentError::InvalidStatusTransition { .. })
    );
}

#[test]
fn full_happy_path_pending_to_completed() {
    let mut status = AppointmentStatus::Pending;
    for next in [AppointmentStatus::Approved, AppointmentStatus::Completed] {
        validate_status_transition(&status, &next).unwrap();
        status = next;
    }
    assert_eq!(status, AppointmentStatus::Completed);
}

// ==============================================================================
// AUTHORIZATION POLICY
// ==============================================================================

#[test]
fn only_the_assigned_vet_approves_and_completes() {
    let vet = TestUser::veterinarian("vet@example.com");
    let other_vet = TestUser::veterinarian("other@example.com");
    let client = TestUser::client("farmer@example.com");
    let appt = appointment(&client.id, &vet.id, AppointmentStatus::Pending);

    assert!(authorize(&vet.to_user(), AppointmentAction::Approve, &appt).is_ok());
    assert_matches!(
        authorize(&other_vet.to_user(), AppointmentAction::Approve, &appt),
        Err(AppointmentError::NotAuthorized(_))
    );
    assert_matches!(
        authorize(&client.to_user(), AppointmentAction::Approve, &appt),
        Err(AppointmentError::NotAuthorized(_))
    );
    assert_matches!(
        authorize(&client.to_user(), AppointmentAction::Complete, &appt),
        Err(AppointmentError::NotAuthorized(_))
    );
}

#[test]
fn either_participant_may_cancel_nobody_else() {
    let vet = TestUser::veterinarian("vet@example.com");
    let client = TestUser::client("farmer@example.com");
    let stranger = TestUser::client("stranger@example.com");
    let appt = appointment(&client.id, &vet.id, AppointmentStatus::Pending);

    assert!(authorize(&vet.to_user(), AppointmentAction::Cancel, &appt).is_ok());
    assert!(authorize(&client.to_user(), AppointmentAction::Cancel, &appt).is_ok());
    assert_matches!(
        authorize(&stranger.to_user(), AppointmentAction::Cancel, &appt),
        Err(AppointmentError::NotAuthorized(_))
    );
}

#[test]
fn visit_record_requires_assigned_vet_and_progressed_status() {
    let vet = TestUser::veterinarian("vet@example.com");
    let client = TestUser::client("farmer@example.com");

    let pending = appointment(&client.id, &vet.id, AppointmentStatus::Pending);
    assert_matches!(
        authorize(&vet.to_user(), AppointmentAction::RecordVisit, &pending),
        Err(AppointmentError::NotAuthorized(_))
    );

    let approved = appointment(&client.id, &vet.id, AppointmentStatus::Approved);
    assert!(authorize(&vet.to_user(), AppointmentAction::RecordVisit, &approved).is_ok());

    let completed = appointment(&client.id, &vet.id, AppointmentStatus::Completed);
    assert!(authorize(&vet.to_user(), AppointmentAction::RecordVisit, &completed).is_ok());
    assert_matches!(
        authorize(&client.to_user(), AppointmentAction::RecordVisit, &completed),
        Err(AppointmentError::NotAuthorized(_))
    );
}

#[test]
fn status_to_action_mapping() {
    assert_eq!(
        AppointmentAction::for_status(&AppointmentStatus::Approved),
        Some(AppointmentAction::Approve)
    );
    assert_eq!(
        AppointmentAction::for_status(&AppointmentStatus::Cancelled),
        Some(AppointmentAction::Cancel)
    );
    assert_eq!(
        AppointmentAction::for_status(&AppointmentStatus::Completed),
        Some(AppointmentAction::Complete)
    );
    // Nothing moves an appointment back to pending.
    assert_eq!(AppointmentAction::for_status(&AppointmentStatus::Pending), None);
}
