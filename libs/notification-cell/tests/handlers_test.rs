// libs/notification-cell/tests/handlers_test.rs

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Extension, Path, State};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use notification_cell::handlers;
use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

fn config_for(mock_server: &MockServer) -> Arc<AppConfig> {
    Arc::new(AppConfig {
        supabase_url: mock_server.uri(),
        ..TestConfig::default().to_app_config()
    })
}

fn auth_header(user: &TestUser) -> TypedHeader<Authorization<Bearer>> {
    let token = JwtTestUtils::create_test_token(user, "test-secret", Some(1));
    TypedHeader(Authorization::bearer(&token).unwrap())
}

fn notification_row(user_id: &str, is_read: bool) -> serde_json::Value {
    json!({
        "id": Uuid::new_v4(),
        "user_id": user_id,
        "title": "Appointment approved",
        "message": "Your appointment on 2025-01-06 10:00 is now approved",
        "notification_type": "appointment",
        "is_read": is_read,
        "created_at": "2025-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn listing_scopes_to_the_caller_and_counts_unread() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("farmer@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/notifications"))
        .and(query_param("user_id", format!("eq.{}", client.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            notification_row(&client.id, false),
            notification_row(&client.id, true)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = handlers::get_notifications(
        State(config_for(&mock_server)),
        auth_header(&client),
        Extension(client.to_user()),
    )
    .await
    .unwrap();

    assert_eq!(result.0["notifications"].as_array().unwrap().len(), 2);
    assert_eq!(result.0["unread_count"], json!(1));
}

#[tokio::test]
async fn mark_read_is_scoped_to_the_owner() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("farmer@example.com");
    let notification_id = Uuid::new_v4().to_string();

    let mut row = notification_row(&client.id, true);
    row["id"] = json!(notification_id);
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/notifications"))
        .and(query_param("id", format!("eq.{}", notification_id)))
        .and(query_param("user_id", format!("eq.{}", client.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = handlers::mark_notification_read(
        State(config_for(&mock_server)),
        Path(notification_id),
        auth_header(&client),
        Extension(client.to_user()),
    )
    .await
    .unwrap();

    assert_eq!(result.0["success"], json!(true));
    assert_eq!(result.0["notification"]["is_read"], json!(true));
}

#[tokio::test]
async fn marking_someone_elses_notification_is_not_found() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("farmer@example.com");

    // The owner filter makes the PATCH match nothing.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let err = handlers::mark_notification_read(
        State(config_for(&mock_server)),
        Path(Uuid::new_v4().to_string()),
        auth_header(&client),
        Extension(client.to_user()),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::NotFound(_));
}
