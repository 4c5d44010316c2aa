//! CLI argument parsing for the `directline-bridge` binary.

use clap::{Parser, Subcommand};

/// Direct Line bridge CLI
#[derive(Parser, Debug)]
#[command(
    name = "directline-bridge",
    version,
    about = "Ask a Direct Line bot a question and print its search result"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open a conversation, ask a question, and print the markdown result
    Ask(AskArgs),
    /// Check that a token can be generated with the configured secret
    Token,
}

/// Arguments for the `ask` subcommand.
#[derive(Parser, Debug)]
pub struct AskArgs {
    /// Question to send to the bot
    pub question: String,

    /// Attach an OAuth sign-in card to the message
    #[arg(long)]
    pub sign_in: bool,

    /// Do not forward USER_TOKEN on the side channel
    #[arg(long)]
    pub no_user_token: bool,

    /// Seconds to keep polling for the bot's answer
    #[arg(long)]
    pub wait_secs: Option<u64>,
}
