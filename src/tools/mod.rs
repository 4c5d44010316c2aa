//! Agent-facing tool surface.

pub mod arguments;
pub mod query_bot;
pub mod tool;
pub mod types;

pub use arguments::ToolArguments;
pub use query_bot::QueryBotTool;
pub use tool::Tool;
pub use types::AgentToolParameters;
