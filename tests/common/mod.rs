#![allow(dead_code)]

use std::time::Duration;

use directline_bridge::client::DirectLineClient;
use directline_bridge::config::DirectLineConfig;
use directline_bridge::session::{Conversation, SessionToken};
use directline_bridge::util::poll::PollPolicy;
use directline_bridge::util::retry::RetryPolicy;
use serde_json::{json, Value};
use wiremock::MockServer;

pub const SECRET: &str = "T";
pub const BOT_ID: &str = "B";

pub fn test_config(server: &MockServer) -> DirectLineConfig {
    DirectLineConfig::builder()
        .endpoint(format!("{}/v3/directline", server.uri()))
        .timeout(Duration::from_secs(5))
        .retry(RetryPolicy::fixed(3, Duration::from_millis(10)))
        .poll(PollPolicy {
            deadline: Duration::from_millis(300),
            interval: Duration::from_millis(20),
        })
        .build()
}

pub fn test_client(server: &MockServer) -> DirectLineClient {
    DirectLineClient::with_secret(SECRET, BOT_ID, test_config(server)).expect("client")
}

pub fn conversation(id: &str, token: &str) -> Conversation {
    Conversation::resume(id, SessionToken::new(token))
}

pub fn plan_step_activity(markdown: &str) -> Value {
    json!({
        "type": "event",
        "id": "conv1|0000002",
        "from": { "id": "bot", "name": "Bot" },
        "valueType": "DynamicPlanStepFinished",
        "value": {
            "observation": {
                "search_result": {
                    "Text": { "MarkdownContent": markdown }
                }
            }
        }
    })
}

pub fn activity_set(activities: Vec<Value>) -> Value {
    let watermark = activities.len().to_string();
    json!({ "activities": activities, "watermark": watermark })
}
