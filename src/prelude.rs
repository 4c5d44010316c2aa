//! Convenience re-exports for common use.

pub use crate::client::DirectLineClient;
pub use crate::config::{BridgeSettings, Credentials, DirectLineConfig};
pub use crate::error::{DirectLineError, Result};
pub use crate::session::{Conversation, ExchangeOptions, SessionToken};
pub use crate::tools::{AgentToolParameters, QueryBotTool, Tool, ToolArguments};
pub use crate::types::{Activity, ActivitySet};
pub use crate::util::poll::PollPolicy;
pub use crate::util::retry::RetryPolicy;
