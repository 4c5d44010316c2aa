//! Direct Line session exchange client.
//!
//! Walks the conversation lifecycle one call at a time:
//! [`acquire_token`](DirectLineClient::acquire_token) →
//! [`open_session`](DirectLineClient::open_session) →
//! [`send_message`](DirectLineClient::send_message) →
//! [`wait_for_result`](DirectLineClient::wait_for_result).
//! Every call goes through the configured [`RetryPolicy`](crate::util::retry::RetryPolicy)
//! and logs its failure before returning it.

pub mod http;

use crate::config::{BridgeSettings, Credentials, DirectLineConfig};
use crate::error::Result;
use crate::session::{Conversation, ExchangeOptions, SessionToken};
use crate::types::{
    Activity, ActivitySet, Attachment, BotReference, ChannelAccount, ConversationResponse,
    EventActivity, MessageActivity, OAuthCard, ResourceResponse, StartConversationRequest,
    TokenExchangeResource, TokenResponse,
};

use self::http::{bearer_headers, build_client, ensure_success};

/// Client for one bot behind a Direct Line endpoint.
///
/// ```no_run
/// use directline_bridge::client::DirectLineClient;
/// use directline_bridge::config::{Credentials, DirectLineConfig};
///
/// # async fn example() -> directline_bridge::error::Result<()> {
/// let credentials = Credentials::new("secret", "bot-id")?;
/// let client = DirectLineClient::new(credentials, DirectLineConfig::default())?;
///
/// let token = client.acquire_token().await?;
/// let conversation = client.open_session(&token).await?;
/// client.send_message(&conversation, "what do you know about agents?").await?;
/// if let Some(markdown) = client.wait_for_result(&conversation).await? {
///     println!("{markdown}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DirectLineClient {
    http: reqwest::Client,
    config: DirectLineConfig,
    credentials: Credentials,
}

impl DirectLineClient {
    /// Create a client. No network traffic happens here.
    pub fn new(credentials: Credentials, config: DirectLineConfig) -> Result<Self> {
        let http = build_client(config.timeout)?;
        Ok(Self {
            http,
            config,
            credentials,
        })
    }

    /// Create a client from a raw secret and bot id, validating both.
    pub fn with_secret(
        secret: impl Into<String>,
        bot_id: impl Into<String>,
        config: DirectLineConfig,
    ) -> Result<Self> {
        Self::new(Credentials::new(secret, bot_id)?, config)
    }

    pub fn from_settings(settings: &BridgeSettings) -> Result<Self> {
        Self::new(settings.credentials.clone(), settings.config.clone())
    }

    pub fn config(&self) -> &DirectLineConfig {
        &self.config
    }

    fn user(&self) -> ChannelAccount {
        ChannelAccount::new(self.config.user_id.clone())
    }

    /// Send a request built by `build`, retrying per policy, and require a 2xx.
    async fn send<F>(&self, build: F) -> Result<reqwest::Response>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let build = &build;
        self.config
            .retry
            .execute(move || async move { ensure_success(build().send().await?).await })
            .await
    }

    /// Exchange the long-lived secret for a session token.
    pub async fn acquire_token(&self) -> Result<SessionToken> {
        let url = self.config.token_endpoint();
        let result: Result<SessionToken> = async {
            let response = self
                .send(|| {
                    self.http
                        .post(&url)
                        .headers(bearer_headers(self.credentials.secret()))
                })
                .await?;
            let body: TokenResponse = response.json().await?;
            Ok(SessionToken::new(body.token))
        }
        .await;

        match &result {
            Ok(_) => tracing::debug!("Acquired Direct Line token"),
            Err(e) => tracing::warn!(error = %e, "Error generating Direct Line token"),
        }
        result
    }

    /// Open a conversation with the configured bot.
    pub async fn open_session(&self, token: &SessionToken) -> Result<Conversation> {
        let url = self.config.conversations_url();
        let request = StartConversationRequest {
            bot: BotReference {
                id: self.credentials.bot_id().to_string(),
            },
        };
        let result: Result<Conversation> = async {
            let response = self
                .send(|| {
                    self.http
                        .post(&url)
                        .headers(bearer_headers(token.as_str()))
                        .json(&request)
                })
                .await?;
            let body: ConversationResponse = response.json().await?;
            Ok(Conversation::opened(
                body.conversation_id,
                token.clone(),
                body.stream_url,
            ))
        }
        .await;

        match &result {
            Ok(conversation) => {
                tracing::info!(conversation_id = conversation.id(), "Started conversation")
            }
            Err(e) => tracing::warn!(error = %e, "Failed to start conversation"),
        }
        result
    }

    async fn post_activity(
        &self,
        conversation: &Conversation,
        activity: &Activity,
    ) -> Result<ResourceResponse> {
        let url = self.config.activities_url(conversation.id());
        let response = self
            .send(|| {
                self.http
                    .post(&url)
                    .headers(bearer_headers(conversation.token().as_str()))
                    .json(activity)
            })
            .await?;
        // Some deployments answer 204 with no body.
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(ResourceResponse::default());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn message(&self, text: &str, attachments: Vec<Attachment>) -> Activity {
        Activity::Message(MessageActivity {
            from: Some(self.user()),
            text: Some(text.to_string()),
            locale: Some(self.config.locale.clone()),
            attachments,
            ..Default::default()
        })
    }

    /// Post a user message. Each call posts a new activity; there is no
    /// idempotency key, so a retried post may reach the bot twice.
    pub async fn send_message(
        &self,
        conversation: &Conversation,
        text: &str,
    ) -> Result<ResourceResponse> {
        let result = self
            .post_activity(conversation, &self.message(text, Vec::new()))
            .await;
        log_send("message", conversation, &result);
        result
    }

    /// Post a user message carrying an OAuth sign-in card, prompting the bot's
    /// sign-in flow.
    pub async fn send_message_with_sign_in(
        &self,
        conversation: &Conversation,
        text: &str,
    ) -> Result<ResourceResponse> {
        let card = OAuthCard {
            text: self.config.sign_in_text.clone(),
            connection_name: self.config.oauth_connection_name.clone(),
            token_exchange_resource: TokenExchangeResource {
                uri: self.config.sign_in_endpoint(),
            },
        };
        let result = match Attachment::oauth_card(&card) {
            Ok(attachment) => {
                self.post_activity(conversation, &self.message(text, vec![attachment]))
                    .await
            }
            Err(e) => Err(e.into()),
        };
        log_send("sign-in message", conversation, &result);
        result
    }

    /// Deliver an externally obtained credential as a token-exchange event.
    pub async fn send_side_channel_credential(
        &self,
        conversation: &Conversation,
        credential: &str,
    ) -> Result<ResourceResponse> {
        let event = Activity::Event(EventActivity::token_response(self.user(), credential));
        let result = self.post_activity(conversation, &event).await;
        log_send("user token", conversation, &result);
        result
    }

    /// Fetch the conversation's activity list, optionally after a watermark.
    pub async fn fetch_activities(
        &self,
        conversation: &Conversation,
        watermark: Option<&str>,
    ) -> Result<ActivitySet> {
        let url = self.config.activities_url(conversation.id());
        let response = self
            .send(|| {
                let request = self
                    .http
                    .get(&url)
                    .headers(bearer_headers(conversation.token().as_str()));
                match watermark {
                    Some(watermark) => request.query(&[("watermark", watermark)]),
                    None => request,
                }
            })
            .await?;
        Ok(response.json().await?)
    }

    /// Fetch activities once and extract the first markdown search result.
    ///
    /// `Ok(None)` means the fetch worked but nothing matched yet.
    pub async fn poll_activities(
        &self,
        conversation: &Conversation,
        watermark: Option<&str>,
    ) -> Result<Option<String>> {
        match self.fetch_activities(conversation, watermark).await {
            Ok(set) => {
                let found = set.markdown_content();
                tracing::debug!(
                    conversation_id = conversation.id(),
                    activities = set.activities.len(),
                    found = found.is_some(),
                    "Polled activities"
                );
                Ok(found)
            }
            Err(e) => {
                tracing::warn!(
                    conversation_id = conversation.id(),
                    error = %e,
                    "Error getting responses"
                );
                Err(e)
            }
        }
    }

    /// Poll the whole conversation until a markdown result shows up or the
    /// poll deadline passes.
    pub async fn wait_for_result(&self, conversation: &Conversation) -> Result<Option<String>> {
        self.wait_for_result_after(conversation, None).await
    }

    /// Like [`wait_for_result`](Self::wait_for_result), but only looks at
    /// activities after `watermark`.
    pub async fn wait_for_result_after(
        &self,
        conversation: &Conversation,
        watermark: Option<&str>,
    ) -> Result<Option<String>> {
        self.config
            .poll
            .run(move || self.poll_activities(conversation, watermark))
            .await
    }

    /// Send a message, optionally deliver a side-channel credential, then wait
    /// for the bot's search result.
    ///
    /// Only activities after the posted message are searched, so an earlier
    /// answer on the same conversation is not returned again. When the
    /// service does not report the message id, the whole conversation is
    /// searched. A failed side-channel post is logged and does not abort the
    /// exchange.
    pub async fn exchange(
        &self,
        conversation: &Conversation,
        text: &str,
        options: &ExchangeOptions,
    ) -> Result<Option<String>> {
        let posted = if options.sign_in_card {
            self.send_message_with_sign_in(conversation, text).await?
        } else {
            self.send_message(conversation, text).await?
        };
        let watermark = posted.watermark();

        if let Some(credential) = options.user_credential.as_deref() {
            // Already logged inside; the bot may still answer without it.
            let _ = self
                .send_side_channel_credential(conversation, credential)
                .await;
        }

        self.wait_for_result_after(conversation, watermark.as_deref())
            .await
    }
}

fn log_send(kind: &'static str, conversation: &Conversation, result: &Result<ResourceResponse>) {
    match result {
        Ok(resource) => tracing::debug!(
            conversation_id = conversation.id(),
            activity_id = resource.id.as_deref().unwrap_or(""),
            kind,
            "Posted activity"
        ),
        Err(e) => tracing::warn!(
            conversation_id = conversation.id(),
            kind,
            error = %e,
            "Error sending activity"
        ),
    }
}
