//! Direct Line bridge binary entry point.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use directline_bridge::cli::{AskArgs, Cli, Commands};
use directline_bridge::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Ask(args) => handle_ask(args).await,
        Commands::Token => handle_token().await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn handle_token() -> Result<()> {
    let settings = BridgeSettings::from_env()?;
    let client = DirectLineClient::from_settings(&settings)?;
    client.acquire_token().await?;
    println!("Direct Line token generated");
    Ok(())
}

async fn handle_ask(args: AskArgs) -> Result<()> {
    let mut settings = BridgeSettings::from_env()?;
    if let Some(secs) = args.wait_secs {
        settings.config.poll.deadline = Duration::from_secs(secs);
    }
    let client = Arc::new(DirectLineClient::from_settings(&settings)?);

    let token = client.acquire_token().await?;
    let conversation = client.open_session(&token).await?;

    let user_credential = if args.no_user_token {
        None
    } else {
        settings.user_token.clone()
    };
    let options = ExchangeOptions::default()
        .with_sign_in_card(args.sign_in)
        .with_user_credential(user_credential);

    let tool = QueryBotTool::new(client, options);
    let answer = tool
        .execute(&ToolArguments::new(serde_json::json!({
            "conversation_id": conversation.id(),
            "message": args.question,
            "token": token.as_str(),
        })))
        .await?;

    match answer {
        serde_json::Value::String(text) => println!("{text}"),
        other => println!("{other}"),
    }
    Ok(())
}
