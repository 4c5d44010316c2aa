//! Activity types exchanged with the bot over Direct Line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

/// `valueType` tag on the event that carries a finished plan step.
pub const PLAN_STEP_FINISHED: &str = "DynamicPlanStepFinished";

/// Event name used to hand the bot an externally obtained credential.
pub const TOKEN_RESPONSE_EVENT: &str = "tokens/response";

/// Attachment content type of an OAuth sign-in card.
pub const OAUTH_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.oauth";

/// Sender or recipient of an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAccount {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChannelAccount {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

/// Kind of an activity, as carried in its `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum ActivityKind {
    Message,
    Event,
    Typing,
    EndOfConversation,
    Other,
}

/// A single unit of a conversation's activity stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Activity {
    Message(MessageActivity),
    Event(EventActivity),
    Typing(MarkerActivity),
    EndOfConversation(MarkerActivity),
    /// Any activity kind this crate does not model.
    #[serde(other)]
    Other,
}

impl Activity {
    pub fn kind(&self) -> ActivityKind {
        match self {
            Self::Message(_) => ActivityKind::Message,
            Self::Event(_) => ActivityKind::Event,
            Self::Typing(_) => ActivityKind::Typing,
            Self::EndOfConversation(_) => ActivityKind::EndOfConversation,
            Self::Other => ActivityKind::Other,
        }
    }

    /// Markdown search-result text, if this is a finished plan step that has one.
    pub fn markdown_content(&self) -> Option<String> {
        match self {
            Self::Event(event) => event.markdown_content(),
            _ => None,
        }
    }
}

/// A text message, inbound or outbound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageActivity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A named event with an optional typed value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventActivity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl EventActivity {
    /// Event that delivers a credential to the bot on the side channel.
    pub fn token_response(from: ChannelAccount, credential: &str) -> Self {
        Self {
            from: Some(from),
            name: Some(TOKEN_RESPONSE_EVENT.to_string()),
            value: Some(serde_json::json!({ "token": credential })),
            ..Default::default()
        }
    }

    /// Decode the value according to its `valueType` tag.
    pub fn payload(&self) -> EventPayload {
        match (self.value_type.as_deref(), &self.value) {
            (Some(PLAN_STEP_FINISHED), Some(value)) => {
                match PlanStepFinished::deserialize(value) {
                    Ok(step) => EventPayload::PlanStepFinished(step),
                    Err(e) => {
                        tracing::debug!(error = %e, "Plan step value has unexpected shape");
                        EventPayload::Unrecognized
                    }
                }
            }
            _ => EventPayload::Unrecognized,
        }
    }

    /// Markdown search-result text carried by a finished plan step.
    pub fn markdown_content(&self) -> Option<String> {
        match self.payload() {
            EventPayload::PlanStepFinished(step) => step.markdown_content().map(str::to_owned),
            EventPayload::Unrecognized => None,
        }
    }
}

/// Typing indicators and end-of-conversation markers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerActivity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ChannelAccount>,
}

/// Typed view of an event value.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    PlanStepFinished(PlanStepFinished),
    Unrecognized,
}

/// Value of a `DynamicPlanStepFinished` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanStepFinished {
    #[serde(default)]
    pub observation: Option<Observation>,
}

impl PlanStepFinished {
    pub fn markdown_content(&self) -> Option<&str> {
        self.observation
            .as_ref()?
            .search_result
            .as_ref()?
            .text
            .as_ref()?
            .markdown_content
            .as_deref()
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(default)]
    pub search_result: Option<SearchResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default, rename = "Text")]
    pub text: Option<SearchText>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchText {
    #[serde(default, rename = "MarkdownContent")]
    pub markdown_content: Option<String>,
}

/// Rich attachment on a message activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub content_type: String,
    #[serde(default)]
    pub content: serde_json::Value,
}

impl Attachment {
    pub fn oauth_card(card: &OAuthCard) -> Result<Self, serde_json::Error> {
        Ok(Self {
            content_type: OAUTH_CARD_CONTENT_TYPE.to_string(),
            content: serde_json::to_value(card)?,
        })
    }
}

/// Sign-in card prompting the user to authenticate with an identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthCard {
    pub text: String,
    pub connection_name: String,
    pub token_exchange_resource: TokenExchangeResource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenExchangeResource {
    pub uri: String,
}

/// Response of `GET /conversations/{id}/activities`.
///
/// Activities are decoded one at a time; one that does not fit its typed
/// shape becomes [`Activity::Other`] instead of failing the whole set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySet {
    #[serde(default, deserialize_with = "lenient_activities")]
    pub activities: Vec<Activity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark: Option<String>,
}

impl ActivitySet {
    /// First markdown search result in server order, if any.
    pub fn markdown_content(&self) -> Option<String> {
        self.activities.iter().find_map(Activity::markdown_content)
    }
}

fn lenient_activities<'de, D>(deserializer: D) -> Result<Vec<Activity>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .map(|value| {
            Activity::deserialize(value).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Skipping activity with unexpected shape");
                Activity::Other
            })
        })
        .collect())
}
