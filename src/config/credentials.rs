//! Direct Line credentials.

use std::fmt;

use crate::error::{DirectLineError, Result};

/// Service secret and bot identifier. Both are required.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    secret: String,
    bot_id: String,
}

impl Credentials {
    /// Validate and wrap the secret and bot id.
    ///
    /// Empty or whitespace-only values are rejected with
    /// [`DirectLineError::Configuration`].
    pub fn new(secret: impl Into<String>, bot_id: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        let bot_id = bot_id.into();

        let missing: Vec<&str> = [("secret", &secret), ("bot id", &bot_id)]
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect();
        if !missing.is_empty() {
            return Err(DirectLineError::Configuration(format!(
                "Direct Line {} required",
                missing.join(" and ")
            )));
        }

        Ok(Self { secret, bot_id })
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn bot_id(&self) -> &str {
        &self.bot_id
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("secret", &"<redacted>")
            .field("bot_id", &self.bot_id)
            .finish()
    }
}
