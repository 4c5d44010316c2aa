//! Session state threaded through every client call.
//!
//! A [`Conversation`] always carries the [`SessionToken`] that opened it, so a
//! conversation handle cannot be paired with a foreign token by accident.

use std::fmt;

/// Opaque Direct Line token. Not refreshed; expiry is not tracked.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a token obtained elsewhere (for example, handed in by an agent).
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// An open conversation with the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    id: String,
    token: SessionToken,
    stream_url: Option<String>,
}

impl Conversation {
    pub(crate) fn opened(id: String, token: SessionToken, stream_url: Option<String>) -> Self {
        Self {
            id,
            token,
            stream_url,
        }
    }

    /// Rebuild a handle for a conversation opened elsewhere with `token`.
    pub fn resume(id: impl Into<String>, token: SessionToken) -> Self {
        Self {
            id: id.into(),
            token,
            stream_url: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    /// WebSocket stream URL, when the service returned one.
    pub fn stream_url(&self) -> Option<&str> {
        self.stream_url.as_deref()
    }
}

/// What to send alongside the user's message in a full exchange.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ExchangeOptions {
    /// Attach an OAuth sign-in card to the message.
    pub sign_in_card: bool,
    /// Credential to deliver on the side channel after the message.
    pub user_credential: Option<String>,
}

impl ExchangeOptions {
    pub fn with_sign_in_card(mut self, enabled: bool) -> Self {
        self.sign_in_card = enabled;
        self
    }

    pub fn with_user_credential(mut self, credential: Option<String>) -> Self {
        self.user_credential = credential;
        self
    }
}

impl fmt::Debug for ExchangeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeOptions")
            .field("sign_in_card", &self.sign_in_card)
            .field(
                "user_credential",
                &self.user_credential.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
