//! `query_directline`: relay a question to the bot and return its search result.

use std::sync::Arc;

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::tool::Tool;
use super::types::AgentToolParameters;
use crate::client::DirectLineClient;
use crate::error::DirectLineError;
use crate::session::{Conversation, ExchangeOptions, SessionToken};

const TOOL_NAME: &str = "query_directline";

/// Message returned to the agent when the bot never produced a search result.
pub const NO_RESULT_MESSAGE: &str = "Error: the bot returned no search result";

/// Tool wrapping one full exchange with the bot.
///
/// The agent supplies the conversation id, message and token; the tool sends
/// the message, delivers the side-channel credential when configured, waits
/// for the bot, and returns the markdown result. Failures come back as an
/// `"Error: ..."` string so the agent can move on.
pub struct QueryBotTool {
    client: Arc<DirectLineClient>,
    options: ExchangeOptions,
    parameters: AgentToolParameters,
}

impl QueryBotTool {
    pub fn new(client: Arc<DirectLineClient>, options: ExchangeOptions) -> Self {
        let parameters = AgentToolParameters::object()
            .string(
                "conversation_id",
                "The ID of the conversation with the bot.",
                true,
            )
            .string("message", "The message to send to the bot.", true)
            .string(
                "token",
                "The Direct Line token the conversation was opened with.",
                true,
            )
            .build();
        Self {
            client,
            options,
            parameters,
        }
    }

    /// Run one exchange and render the outcome as text.
    pub async fn query(&self, conversation_id: &str, message: &str, token: &str) -> String {
        let conversation = Conversation::resume(conversation_id, SessionToken::new(token));
        match self
            .client
            .exchange(&conversation, message, &self.options)
            .await
        {
            Ok(Some(markdown)) => markdown,
            Ok(None) => {
                tracing::info!(conversation_id, "No search result in bot reply");
                NO_RESULT_MESSAGE.to_string()
            }
            Err(e) => format!("Error: {e}"),
        }
    }
}

#[async_trait]
impl Tool for QueryBotTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Sends a message to the bot over Direct Line and returns the markdown search result it produces."
    }

    fn parameters(&self) -> &AgentToolParameters {
        &self.parameters
    }

    async fn execute(&self, args: &ToolArguments) -> Result<serde_json::Value, DirectLineError> {
        let conversation_id = args.get_str("conversation_id")?;
        let message = args.get_str("message")?;
        let token = args.get_str("token")?;
        Ok(serde_json::Value::String(
            self.query(conversation_id, message, token).await,
        ))
    }
}

impl std::fmt::Debug for QueryBotTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBotTool")
            .field("name", &TOOL_NAME)
            .field("options", &self.options)
            .finish()
    }
}
