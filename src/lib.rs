//! Direct Line bridge.
//!
//! A client for bots reachable over the Direct Line v3 protocol, plus a
//! single agent tool that relays a question to the bot and returns the
//! markdown search result from its activity stream.
//!
//! # Quick Start
//!
//! ```no_run
//! use directline_bridge::prelude::*;
//!
//! # async fn example() -> directline_bridge::error::Result<()> {
//! let settings = BridgeSettings::from_env()?;
//! let client = DirectLineClient::from_settings(&settings)?;
//!
//! let token = client.acquire_token().await?;
//! let conversation = client.open_session(&token).await?;
//! let options = ExchangeOptions::default().with_user_credential(settings.user_token.clone());
//! let answer = client.exchange(&conversation, "Hello!", &options).await?;
//! println!("{answer:?}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod prelude;
pub mod session;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
