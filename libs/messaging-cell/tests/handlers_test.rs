// libs/messaging-cell/tests/handlers_test.rs

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Extension, Path, State};
use axum::Json;
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use messaging_cell::handlers;
use messaging_cell::models::{OpenConversationRequest, SendMessageRequest};
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

fn conversation_row(client_id: &str, vet_id: &str) -> serde_json::Value {
    json!({
        "id": Uuid::new_v4(),
        "client_id": client_id,
        "vet_id": vet_id,
        "created_at": "2025-01-01T00:00:00Z"
    })
}

fn message_row(conversation_id: &str, sender_id: &str, content: &str) -> serde_json::Value {
    json!({
        "id": Uuid::new_v4(),
        "conversation_id": conversation_id,
        "sender_id": sender_id,
        "content": content,
        "is_read": false,
        "created_at": "2025-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn open_conversation_returns_the_existing_pair() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("farmer@example.com");
    let vet = TestUser::veterinarian("vet@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/conversations"))
        .and(query_param("client_id", format!("eq.{}", client.id)))
        .and(query_param("vet_id", format!("eq.{}", vet.id)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([conversation_row(&client.id, &vet.id)])),
        )
        .mount(&mock_server)
        .await;

    let result = handlers::open_conversation(
        State(config_for(&mock_server)),
        auth_header(&client),
        Extension(client.to_user()),
        Json(OpenConversationRequest {
            participant_id: vet.id.parse().unwrap(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(result.0["success"], json!(true));
    assert_eq!(result.0["conversation"]["client_id"], json!(client.id));
}

#[tokio::test]
async fn open_conversation_creates_when_none_exists() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("farmer@example.com");
    let vet = TestUser::veterinarian("vet@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/conversations"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!([conversation_row(&client.id, &vet.id)])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    // The vet opens it; the pair still lands as (client, vet).
    let result = handlers::open_conversation(
        State(config_for(&mock_server)),
        auth_header(&vet),
        Extension(vet.to_user()),
        Json(OpenConversationRequest {
            participant_id: client.id.parse().unwrap(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(result.0["conversation"]["vet_id"], json!(vet.id));
}

#[tokio::test]
async fn open_conversation_with_self_is_rejected() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("farmer@example.com");

    let err = handlers::open_conversation(
        State(config_for(&mock_server)),
        auth_header(&client),
        Extension(client.to_user()),
        Json(OpenConversationRequest {
            participant_id: client.id.parse().unwrap(),
        }),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::BadRequest(_));
}

#[tokio::test]
async fn send_message_requires_participation() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("farmer@example.com");
    let vet = TestUser::veterinarian("vet@example.com");
    let stranger = TestUser::client("stranger@example.com");

    let conversation = conversation_row(&client.id, &vet.id);
    let conversation_id = conversation["id"].as_str().unwrap().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([conversation])))
        .mount(&mock_server)
        .await;

    let err = handlers::send_message(
        State(config_for(&mock_server)),
        Path(conversation_id),
        auth_header(&stranger),
        Extension(stranger.to_user()),
        Json(SendMessageRequest {
            content: "hello".to_string(),
        }),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::Forbidden(_));
}

#[tokio::test]
async fn send_message_inserts_and_returns_the_row() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("farmer@example.com");
    let vet = TestUser::veterinarian("vet@example.com");

    let conversation = conversation_row(&client.id, &vet.id);
    let conversation_id = conversation["id"].as_str().unwrap().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([conversation])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/messages"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([message_row(
            &conversation_id,
            &client.id,
            "Is the calf vaccine in stock?"
        )])))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Notification fan-out is unmocked and may fail; the send still stands.
    let result = handlers::send_message(
        State(config_for(&mock_server)),
        Path(conversation_id),
        auth_header(&client),
        Extension(client.to_user()),
        Json(SendMessageRequest {
            content: "Is the calf vaccine in stock?".to_string(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(result.0["success"], json!(true));
    assert_eq!(result.0["message"]["sender_id"], json!(client.id));
}

#[tokio::test]
async fn blank_messages_are_rejected() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("farmer@example.com");

    let err = handlers::send_message(
        State(config_for(&mock_server)),
        Path(Uuid::new_v4().to_string()),
        auth_header(&client),
        Extension(client.to_user()),
        Json(SendMessageRequest {
            content: "   ".to_string(),
        }),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::BadRequest(_));
}

#[tokio::test]
async fn list_messages_returns_thread_for_participant() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("farmer@example.com");
    let vet = TestUser::veterinarian("vet@example.com");

    let conversation = conversation_row(&client.id, &vet.id);
    let conversation_id = conversation["id"].as_str().unwrap().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([conversation])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            message_row(&conversation_id, &client.id, "Hello"),
            message_row(&conversation_id, &vet.id, "Hi, how can I help?")
        ])))
        .mount(&mock_server)
        .await;

    let result = handlers::list_messages(
        State(config_for(&mock_server)),
        Path(conversation_id),
        auth_header(&vet),
        Extension(vet.to_user()),
    )
    .await
    .unwrap();

    assert_eq!(result.0["total"], json!(2));
}

#[tokio::test]
async fn mark_read_flips_the_other_sides_messages() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("farmer@example.com");
    let vet = TestUser::veterinarian("vet@example.com");

    let conversation = conversation_row(&client.id, &vet.id);
    let conversation_id = conversation["id"].as_str().unwrap().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([conversation])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/messages"))
        .and(query_param("sender_id", format!("neq.{}", client.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = handlers::mark_conversation_read(
        State(config_for(&mock_server)),
        Path(conversation_id),
        auth_header(&client),
        Extension(client.to_user()),
    )
    .await
    .unwrap();

    assert_eq!(result.0["success"], json!(true));
}
