//! Token and conversation responses.

use serde::{Deserialize, Serialize};

/// Response of `POST /tokens/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default, rename = "expires_in")]
    pub expires_in: Option<u64>,
}

/// Response of `POST /conversations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub conversation_id: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, rename = "expires_in")]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub stream_url: Option<String>,
}

/// Body sent when opening a conversation with a specific bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartConversationRequest {
    pub bot: BotReference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotReference {
    pub id: String,
}

/// Response of `POST /conversations/{id}/activities`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceResponse {
    #[serde(default)]
    pub id: Option<String>,
}

impl ResourceResponse {
    /// Watermark just past the posted activity.
    ///
    /// Direct Line ids look like `{conversationId}|{sequence}`; the sequence,
    /// without zero padding, is the watermark after which the bot's replies
    /// appear. `None` when the id is missing or has another shape.
    pub fn watermark(&self) -> Option<String> {
        let (_, sequence) = self.id.as_deref()?.rsplit_once('|')?;
        sequence.parse::<u64>().ok().map(|n| n.to_string())
    }
}
