mod common;

use std::sync::Arc;

use directline_bridge::error::DirectLineError;
use directline_bridge::prelude::*;
use directline_bridge::tools::query_bot::NO_RESULT_MESSAGE;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{activity_set, plan_step_activity, test_client};

const ACTIVITIES: &str = "/v3/directline/conversations/conv1/activities";

fn tool(server: &MockServer, options: ExchangeOptions) -> QueryBotTool {
    QueryBotTool::new(Arc::new(test_client(server)), options)
}

fn args() -> ToolArguments {
    ToolArguments::new(json!({
        "conversation_id": "conv1",
        "message": "what do you know about agents?",
        "token": "tok1"
    }))
}

#[tokio::test]
async fn tool_schema_requires_all_three_arguments() {
    let server = MockServer::start().await;
    let tool = tool(&server, ExchangeOptions::default());

    assert_eq!(tool.name(), "query_directline");
    let schema = &tool.parameters().schema;
    assert_eq!(schema["type"], "object");
    assert_eq!(
        schema["required"],
        json!(["conversation_id", "message", "token"])
    );
    assert_eq!(schema["properties"]["message"]["type"], "string");
}

#[tokio::test]
async fn tool_returns_markdown_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ACTIVITIES))
        .and(body_partial_json(json!({
            "type": "message",
            "text": "what do you know about agents?"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "m" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ACTIVITIES))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(activity_set(vec![plan_step_activity("# Agents\n...")])),
        )
        .mount(&server)
        .await;

    let output = tool(&server, ExchangeOptions::default())
        .execute(&args())
        .await
        .expect("tool output");

    assert_eq!(output, json!("# Agents\n..."));
}

#[tokio::test]
async fn tool_forwards_side_channel_credential_and_sign_in_card() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ACTIVITIES))
        .and(body_partial_json(json!({
            "type": "message",
            "attachments": [{ "contentType": "application/vnd.microsoft.card.oauth" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "m" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ACTIVITIES))
        .and(body_partial_json(json!({
            "type": "event",
            "name": "tokens/response",
            "value": { "token": "user-cred" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "e" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ACTIVITIES))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(activity_set(vec![plan_step_activity("done")])),
        )
        .mount(&server)
        .await;

    let options = ExchangeOptions::default()
        .with_sign_in_card(true)
        .with_user_credential(Some("user-cred".to_string()));
    let output = tool(&server, options).execute(&args()).await.expect("tool output");

    assert_eq!(output, json!("done"));
}

#[tokio::test]
async fn tool_reports_missing_result_as_error_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ACTIVITIES))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "m" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ACTIVITIES))
        .respond_with(ResponseTemplate::new(200).set_body_json(activity_set(vec![])))
        .mount(&server)
        .await;

    let output = tool(&server, ExchangeOptions::default())
        .execute(&args())
        .await
        .expect("tool output");

    assert_eq!(output, json!(NO_RESULT_MESSAGE));
}

#[tokio::test]
async fn tool_reports_transport_failure_as_error_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ACTIVITIES))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&server)
        .await;

    let output = tool(&server, ExchangeOptions::default())
        .query("conv1", "hi", "tok1")
        .await;

    assert!(output.starts_with("Error: "), "{output}");
    assert!(output.contains("token expired"), "{output}");
}

#[tokio::test]
async fn tool_rejects_missing_arguments() {
    let server = MockServer::start().await;
    let err = tool(&server, ExchangeOptions::default())
        .execute(&ToolArguments::new(json!({ "message": "hi" })))
        .await
        .unwrap_err();

    match err {
        DirectLineError::InvalidArgument(message) => assert!(message.contains("conversation_id")),
        other => panic!("expected invalid argument, got {other:?}"),
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}
