// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tool dispatch against a mock platform and a scripted web app.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use switchboard_api::{PlatformClient, RetryPolicy};
use switchboard_browser::{ChatPipeline, PipelineTiming};
use switchboard_config::model::{PlatformConfig, RetryConfig};
use switchboard_test_utils::fixtures::{chat_card, conversation};
use switchboard_test_utils::{ScriptedApp, ScriptedLauncher};
use switchboard_tools::{register_builtins, Backends, ToolRegistry};
use wiremock::matchers::{body_string_contains, method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WEB_URL: &str = "https://web.switchboard-chat.app";

fn client(uri: &str, max_attempts: u32) -> PlatformClient {
    let platform = PlatformConfig {
        api_key: Some("test-key".into()),
        account_id: Some("acct-1".into()),
        phone_id: Some("phone-1".into()),
        api_base_url: Some(uri.to_string()),
        ..Default::default()
    };
    PlatformClient::from_config(&platform, &RetryConfig::default())
        .unwrap()
        .with_policy(RetryPolicy::new(
            max_attempts,
            Duration::ZERO,
            Duration::ZERO,
        ))
}

fn registry(uri: &str, launcher: &ScriptedLauncher) -> ToolRegistry {
    let pipeline = ChatPipeline::new(
        Arc::new(launcher.clone()),
        WEB_URL,
        PipelineTiming::immediate(30),
    )
    .unwrap();
    let backends = Backends::new(client(uri, 3), pipeline);
    let mut registry = ToolRegistry::new();
    register_builtins(&mut registry, &backends);
    registry
}

fn parse(content: &str) -> Value {
    serde_json::from_str(content).expect("tool output is JSON")
}

#[tokio::test]
async fn registers_all_builtin_tools() {
    let server = MockServer::start().await;
    let registry = registry(&server.uri(), &ScriptedLauncher::new(ScriptedApp::new()));

    let names: Vec<_> = registry.list().into_iter().map(|(n, _)| n).collect();
    assert_eq!(
        names,
        [
            "get_contact",
            "list_chats",
            "read_messages",
            "send_message",
            "transfer_chat"
        ]
    );
    for def in registry.tool_definitions() {
        assert_eq!(def["input_schema"]["type"], "object", "{}", def["name"]);
    }
}

#[tokio::test]
async fn send_message_normalizes_phone_and_posts_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(query_param("action", "send_message"))
        .and(query_param("key", "test-key"))
        .and(body_string_contains("phone=5581991095702"))
        .and(body_string_contains("text=hello"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "id": "m-1" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry(&server.uri(), &ScriptedLauncher::new(ScriptedApp::new()));
    let output = registry
        .dispatch(
            "send_message",
            json!({ "phone": "+55 (81) 99109-5702", "text": "hello" }),
        )
        .await;

    assert!(!output.is_error, "{}", output.content);
    assert_eq!(parse(&output.content)["id"], "m-1");
    assert!(output.content.contains('\n'), "payload is pretty-printed");
}

#[tokio::test]
async fn get_contact_sends_phone_in_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(query_param("action", "get_contact"))
        .and(query_param("phone", "5581991095702"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "contact": { "name": "Maria" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry(&server.uri(), &ScriptedLauncher::new(ScriptedApp::new()));
    let output = registry
        .dispatch("get_contact", json!({ "phone": "81991095702" }))
        .await;

    assert!(!output.is_error, "{}", output.content);
    assert_eq!(parse(&output.content)["contact"]["name"], "Maria");
}

#[tokio::test]
async fn business_failure_becomes_error_output_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(query_param("action", "transfer_chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({ "success": false, "message": "department does not exist" }),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry(&server.uri(), &ScriptedLauncher::new(ScriptedApp::new()));
    let output = registry
        .dispatch(
            "transfer_chat",
            json!({ "phone": "5581991095702", "department": "Nowhere" }),
        )
        .await;

    assert!(output.is_error);
    assert!(output.content.contains("department does not exist"));
}

#[tokio::test]
async fn repeated_server_errors_surface_after_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let registry = registry(&server.uri(), &ScriptedLauncher::new(ScriptedApp::new()));
    let output = registry
        .dispatch("get_contact", json!({ "phone": "81991095702" }))
        .await;

    assert!(output.is_error);
    assert!(output.content.contains("503"), "{}", output.content);
    assert!(output.content.contains("3 attempt(s)"), "{}", output.content);
}

#[tokio::test]
async fn invalid_input_never_reaches_the_platform() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;

    let registry = registry(&server.uri(), &ScriptedLauncher::new(ScriptedApp::new()));

    let output = registry.dispatch("send_message", json!({ "phone": "8199" })).await;
    assert!(output.is_error);
    assert!(output.content.contains("text"), "{}", output.content);

    let output = registry
        .dispatch("send_message", json!({ "phone": "n/a", "text": "hi" }))
        .await;
    assert!(output.is_error);
    assert!(output.content.contains("not a phone number"));

    let output = registry
        .dispatch(
            "transfer_chat",
            json!({ "phone": "81991095702", "department": "  " }),
        )
        .await;
    assert!(output.is_error);
}

#[tokio::test]
async fn list_chats_reports_count_chats_and_notes() {
    let server = MockServer::start().await;
    let launcher =
        ScriptedLauncher::new(ScriptedApp::new().with_chat_cards((0..40).map(chat_card).collect(), 25));
    let registry = registry(&server.uri(), &launcher);

    let output = registry
        .dispatch("list_chats", json!({ "status": "waiting", "limit": 30 }))
        .await;

    assert!(!output.is_error, "{}", output.content);
    let body = parse(&output.content);
    assert_eq!(body["count"], 30);
    assert_eq!(body["chats"].as_array().unwrap().len(), 30);
    assert_eq!(body["chats"][0]["chat_id"], "chat-0");
    assert_eq!(body["notes"], json!([]));
    assert_eq!(launcher.closed(), 1);
}

#[tokio::test]
async fn list_chats_rejects_unknown_filters() {
    let server = MockServer::start().await;
    let launcher = ScriptedLauncher::new(ScriptedApp::new());
    let registry = registry(&server.uri(), &launcher);

    let output = registry
        .dispatch("list_chats", json!({ "colour": "blue" }))
        .await;
    assert!(output.is_error);
    assert!(output.content.contains("colour"));
    assert_eq!(launcher.opened(), 0);
}

#[tokio::test]
async fn read_messages_defaults_to_fifty() {
    let server = MockServer::start().await;
    let launcher =
        ScriptedLauncher::new(ScriptedApp::new().with_conversation(conversation(4, 20), 20));
    let registry = registry(&server.uri(), &launcher);

    let output = registry
        .dispatch("read_messages", json!({ "chat_id": "chat-3" }))
        .await;

    assert!(!output.is_error, "{}", output.content);
    let body = parse(&output.content);
    assert_eq!(body["chat_id"], "chat-3");
    assert_eq!(body["count"], 50);
    assert_eq!(body["messages"][49]["text"], "d3-m19");
    assert_eq!(body["messages"][49]["sender"], "operator");
}

#[tokio::test]
async fn expired_session_is_an_error_output() {
    let server = MockServer::start().await;
    let launcher = ScriptedLauncher::new(
        ScriptedApp::new()
            .with_conversation(conversation(1, 5), 10)
            .redirect_to(format!("{WEB_URL}/login")),
    );
    let registry = registry(&server.uri(), &launcher);

    let output = registry
        .dispatch("read_messages", json!({ "chat_id": "chat-1", "limit": 5 }))
        .await;

    assert!(output.is_error);
    assert!(output.content.contains("session expired"));
    assert!(output.content.contains("login flow"));
    assert_eq!(launcher.closed(), 1);
}

#[tokio::test]
async fn missing_session_is_an_actionable_error_output() {
    let server = MockServer::start().await;
    let registry = registry(&server.uri(), &ScriptedLauncher::without_session());

    let output = registry.dispatch("list_chats", json!({})).await;
    assert!(output.is_error);
    assert!(output.content.contains("run the login flow"));
}
