//! Configuration: endpoint and policy settings, credentials, environment loading.

pub mod credentials;

pub use credentials::Credentials;

use std::time::Duration;

use bon::Builder;

use crate::error::Result;
use crate::util::poll::PollPolicy;
use crate::util::retry::RetryPolicy;

/// Public Direct Line v3 endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://directline.botframework.com/v3/directline";

const DEFAULT_SIGN_IN_BASE: &str = "https://token.botframework.com/api/oauth/signin";

/// Endpoint, timeout and policy settings for a Direct Line client.
///
/// ```
/// use std::time::Duration;
/// use directline_bridge::config::DirectLineConfig;
///
/// let config = DirectLineConfig::builder()
///     .endpoint("http://localhost:3978/v3/directline")
///     .timeout(Duration::from_secs(30))
///     .build();
/// assert_eq!(
///     config.token_endpoint(),
///     "http://localhost:3978/v3/directline/tokens/generate"
/// );
/// ```
#[derive(Debug, Clone, Builder)]
pub struct DirectLineConfig {
    #[builder(into, default = DEFAULT_ENDPOINT.to_string())]
    pub endpoint: String,
    /// Overrides the token URL derived from `endpoint`.
    #[builder(into)]
    pub token_url: Option<String>,
    /// Per-request timeout.
    #[builder(default = Duration::from_secs(120))]
    pub timeout: Duration,
    #[builder(default)]
    pub retry: RetryPolicy,
    /// How long to wait for the bot to finish after a message is sent.
    #[builder(default)]
    pub poll: PollPolicy,
    /// Identity attributed to every outgoing activity.
    #[builder(into, default = "user123".to_string())]
    pub user_id: String,
    #[builder(into, default = "en-US".to_string())]
    pub locale: String,
    /// OAuth connection configured on the bot, referenced by sign-in cards.
    #[builder(into, default = "my-oauth-connection".to_string())]
    pub oauth_connection_name: String,
    #[builder(into, default = "To continue, please sign in.".to_string())]
    pub sign_in_text: String,
    /// Overrides the sign-in URL derived from `user_id`.
    #[builder(into)]
    pub sign_in_url: Option<String>,
}

impl Default for DirectLineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DirectLineConfig {
    fn base(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    /// `{endpoint}/tokens/generate` unless overridden.
    pub fn token_endpoint(&self) -> String {
        self.token_url
            .clone()
            .unwrap_or_else(|| format!("{}/tokens/generate", self.base()))
    }

    pub fn conversations_url(&self) -> String {
        format!("{}/conversations", self.base())
    }

    pub fn activities_url(&self, conversation_id: &str) -> String {
        format!("{}/conversations/{conversation_id}/activities", self.base())
    }

    pub fn sign_in_endpoint(&self) -> String {
        self.sign_in_url
            .clone()
            .unwrap_or_else(|| format!("{DEFAULT_SIGN_IN_BASE}?signin={}", self.user_id))
    }
}

/// Everything the bridge reads from the environment.
#[derive(Debug, Clone)]
pub struct BridgeSettings {
    pub credentials: Credentials,
    pub config: DirectLineConfig,
    /// Externally obtained user credential for the side channel (`USER_TOKEN`).
    pub user_token: Option<String>,
    /// Token for the model behind the calling agent (`HUGGINGFACE_API_TOKEN`).
    pub model_api_token: Option<String>,
}

impl BridgeSettings {
    /// Load from environment variables, reading `.env` first if present.
    ///
    /// Fails with a configuration error when `DIRECT_LINE_SECRET` or
    /// `BotIdentifier` (alias `DIRECT_LINE_BOT_ID`) is missing.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secret = non_empty("DIRECT_LINE_SECRET").unwrap_or_default();
        let bot_id = non_empty("BotIdentifier")
            .or_else(|| non_empty("DIRECT_LINE_BOT_ID"))
            .unwrap_or_default();
        let credentials = Credentials::new(secret, bot_id)?;

        let config = match non_empty("DIRECT_LINE_ENDPOINT") {
            Some(endpoint) => DirectLineConfig::builder().endpoint(endpoint).build(),
            None => DirectLineConfig::default(),
        };

        Ok(Self {
            credentials,
            config,
            user_token: non_empty("USER_TOKEN"),
            model_api_token: non_empty("HUGGINGFACE_API_TOKEN"),
        })
    }
}
