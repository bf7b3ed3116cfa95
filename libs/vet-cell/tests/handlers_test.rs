// libs/vet-cell/tests/handlers_test.rs

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Extension, Path, Query, State};
use axum::Json;
use axum_extra::TypedHeader;
use chrono::NaiveDate;
use headers::{authorization::Bearer, Authorization};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::test_utils::{JwtTestUtils, MockSupabaseResponses, TestConfig, TestUser};
use vet_cell::handlers;
use vet_cell::models::{default_week, ReplaceScheduleRequest, VetSearchFilters};

fn config_for(mock_server: &MockServer) -> Arc<AppConfig> {
    let base = TestConfig::default();
    Arc::new(AppConfig {
        supabase_url: mock_server.uri(),
        ..base.to_app_config()
    })
}

fn auth_header(token: &str) -> TypedHeader<Authorization<Bearer>> {
    TypedHeader(Authorization::bearer(token).unwrap())
}

fn week_request(available_days: &[i32]) -> ReplaceScheduleRequest {
    let mut schedule = default_week();
    for day in &mut schedule {
        day.is_available = available_days.contains(&day.day_of_week);
    }
    ReplaceScheduleRequest { schedule }
}

// ==============================================================================
// SCHEDULE READS
// ==============================================================================

#[tokio::test]
async fn get_schedule_returns_stored_week() {
    let mock_server = MockServer::start().await;
    let vet_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/veterinarian_schedules"))
        .and(query_param("vet_id", format!("eq.{}", vet_id)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockSupabaseResponses::full_week_response(&vet_id, &[1, 3])),
        )
        .mount(&mock_server)
        .await;

    let result = handlers::get_schedule(State(config_for(&mock_server)), Path(vet_id))
        .await
        .unwrap();

    let body = result.0;
    assert_eq!(body["success"], json!(true));
    let schedule = body["schedule"].as_array().unwrap();
    assert_eq!(schedule.len(), 7);
    assert_eq!(schedule[1]["is_available"], json!(true));
    assert_eq!(schedule[2]["is_available"], json!(false));
    assert_eq!(schedule[1]["start_time"], json!("09:00"));
}

#[tokio::test]
async fn get_schedule_synthesizes_default_week_when_unset() {
    let mock_server = MockServer::start().await;
    let vet_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/veterinarian_schedules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let result = handlers::get_schedule(State(config_for(&mock_server)), Path(vet_id))
        .await
        .unwrap();

    let schedule = result.0["schedule"].as_array().unwrap().clone();
    assert_eq!(schedule.len(), 7);
    for (dow, day) in schedule.iter().enumerate() {
        assert_eq!(day["day_of_week"], json!(dow));
        assert_eq!(day["is_available"], json!(false));
        assert_eq!(day["start_time"], json!("09:00"));
        assert_eq!(day["end_time"], json!("17:00"));
    }
}

// ==============================================================================
// SCHEDULE WRITES
// ==============================================================================

#[tokio::test]
async fn put_schedule_replaces_week_via_rpc() {
    let mock_server = MockServer::start().await;
    let vet = TestUser::veterinarian("vet@example.com");
    let token = JwtTestUtils::create_test_token(&vet, "test-secret", Some(1));

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/replace_vet_schedule"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockSupabaseResponses::full_week_response(&vet.id, &[1])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = handlers::put_schedule(
        State(config_for(&mock_server)),
        Path(vet.id.clone()),
        auth_header(&token),
        Extension(vet.to_user()),
        Json(week_request(&[1])),
    )
    .await
    .unwrap();

    assert_eq!(result.0["success"], json!(true));
    assert_eq!(result.0["schedule"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn put_schedule_rejects_non_owner() {
    let mock_server = MockServer::start().await;
    let vet = TestUser::veterinarian("vet@example.com");
    let other_vet_id = Uuid::new_v4().to_string();
    let token = JwtTestUtils::create_test_token(&vet, "test-secret", Some(1));

    let err = handlers::put_schedule(
        State(config_for(&mock_server)),
        Path(other_vet_id),
        auth_header(&token),
        Extension(vet.to_user()),
        Json(week_request(&[1])),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::Forbidden(_));
}

#[tokio::test]
async fn put_schedule_rejects_admin_for_another_vets_schedule() {
    let mock_server = MockServer::start().await;
    let admin = TestUser::admin("admin@example.com");
    let vet = TestUser::veterinarian("vet@example.com");
    let token = JwtTestUtils::create_test_token(&admin, "test-secret", Some(1));

    // Ownership binds regardless of role; admins moderate elsewhere.
    let err = handlers::put_schedule(
        State(config_for(&mock_server)),
        Path(vet.id.clone()),
        auth_header(&token),
        Extension(admin.to_user()),
        Json(week_request(&[1])),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::Forbidden(_));
}

#[tokio::test]
async fn put_schedule_rejects_client_role() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("farmer@example.com");
    let token = JwtTestUtils::create_test_token(&client, "test-secret", Some(1));

    let err = handlers::put_schedule(
        State(config_for(&mock_server)),
        Path(client.id.clone()),
        auth_header(&token),
        Extension(client.to_user()),
        Json(week_request(&[1])),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::Forbidden(_));
}

#[tokio::test]
async fn put_schedule_rejects_incomplete_week_before_touching_store() {
    let mock_server = MockServer::start().await;
    let vet = TestUser::veterinarian("vet@example.com");
    let token = JwtTestUtils::create_test_token(&vet, "test-secret", Some(1));

    let mut request = week_request(&[1]);
    request.schedule.pop();

    let err = handlers::put_schedule(
        State(config_for(&mock_server)),
        Path(vet.id.clone()),
        auth_header(&token),
        Extension(vet.to_user()),
        Json(request),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::ValidationError(_));
    // No RPC mock is mounted; reaching the store would have failed loudly.
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn put_schedule_rejects_inverted_window() {
    let mock_server = MockServer::start().await;
    let vet = TestUser::veterinarian("vet@example.com");
    let token = JwtTestUtils::create_test_token(&vet, "test-secret", Some(1));

    let mut request = week_request(&[2]);
    let tuesday = &mut request.schedule[2];
    std::mem::swap(&mut tuesday.start_time, &mut tuesday.end_time);

    let err = handlers::put_schedule(
        State(config_for(&mock_server)),
        Path(vet.id.clone()),
        auth_header(&token),
        Extension(vet.to_user()),
        Json(request),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::ValidationError(_));
}

#[tokio::test]
async fn put_schedule_surfaces_store_failure() {
    let mock_server = MockServer::start().await;
    let vet = TestUser::veterinarian("vet@example.com");
    let token = JwtTestUtils::create_test_token(&vet, "test-secret", Some(1));

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/replace_vet_schedule"))
        .respond_with(ResponseTemplate::new(500).set_body_json(
            MockSupabaseResponses::error_response("transaction aborted", "P0001"),
        ))
        .mount(&mock_server)
        .await;

    let err = handlers::put_schedule(
        State(config_for(&mock_server)),
        Path(vet.id.clone()),
        auth_header(&token),
        Extension(vet.to_user()),
        Json(week_request(&[1])),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::Database(_));
}

// ==============================================================================
// PUBLIC SLOTS AND DIRECTORY
// ==============================================================================

#[tokio::test]
async fn vet_slots_on_an_available_day() {
    let mock_server = MockServer::start().await;
    let vet_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/veterinarian_schedules"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockSupabaseResponses::full_week_response(&vet_id, &[1])),
        )
        .mount(&mock_server)
        .await;

    // 2025-01-06 is a Monday.
    let result = handlers::get_vet_slots_public(
        State(config_for(&mock_server)),
        Path(vet_id),
        Query(handlers::SlotsQuery {
            date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
        }),
    )
    .await
    .unwrap();

    let slots = result.0["slots"].as_array().unwrap().clone();
    assert_eq!(slots.len(), 16);
    assert_eq!(slots[0], json!("09:00"));
    assert_eq!(slots[1], json!("09:30"));
    assert_eq!(*slots.last().unwrap(), json!("16:30"));
    assert_eq!(result.0["total_slots"], json!(16));
}

#[tokio::test]
async fn vet_slots_on_an_off_day_are_empty() {
    let mock_server = MockServer::start().await;
    let vet_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/veterinarian_schedules"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockSupabaseResponses::full_week_response(&vet_id, &[1])),
        )
        .mount(&mock_server)
        .await;

    // 2025-01-07 is a Tuesday, which is switched off.
    let result = handlers::get_vet_slots_public(
        State(config_for(&mock_server)),
        Path(vet_id),
        Query(handlers::SlotsQuery {
            date: NaiveDate::from_ymd_opt(2025, 1, 7).unwrap(),
        }),
    )
    .await
    .unwrap();

    assert!(result.0["slots"].as_array().unwrap().is_empty());
    assert_eq!(result.0["total_slots"], json!(0));
}

#[tokio::test]
async fn get_vet_returns_not_found_for_unknown_id() {
    let mock_server = MockServer::start().await;
    let vet_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let err = handlers::get_vet_public(State(config_for(&mock_server)), Path(vet_id))
        .await
        .unwrap_err();

    assert_matches!(err, AppError::NotFound(_));
}

#[tokio::test]
async fn list_vets_includes_availability_summary() {
    let mock_server = MockServer::start().await;
    let vet_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::profile_response(&vet_id, "veterinarian")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/veterinarian_schedules"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockSupabaseResponses::full_week_response(&vet_id, &[1, 2])),
        )
        .mount(&mock_server)
        .await;

    let result = handlers::list_vets_public(
        State(config_for(&mock_server)),
        Query(VetSearchFilters::default()),
    )
    .await
    .unwrap();

    assert_eq!(result.0["total"], json!(1));
    let entry = &result.0["vets"][0];
    assert_eq!(entry["id"], json!(vet_id));
    assert_eq!(entry["has_weekly_availability"], json!(true));
    assert!(entry["next_available_day"].is_object());
}
