use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use tradebuddy::{
    config::{idle_timeout_from_secs, parse_premium_users, BotConfig},
    health,
    telegram::{Poller, TelegramClient},
    DialogueEngine, Ledger,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Telegram bot token
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    bot_token: String,

    /// Premium user ids (comma-separated)
    #[arg(long, env = "PREMIUM_USERS", default_value = "")]
    premium_users: String,

    /// Port for the liveness endpoint
    #[arg(short, long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Drop conversations idle for this many seconds
    #[arg(
        long,
        env = "DIALOGUE_IDLE_TIMEOUT_SECS",
        default_value = "1800",
        value_parser = clap::value_parser!(u64).range(1..=31_536_000)
    )]
    idle_timeout_secs: u64,

    /// Long-poll timeout for getUpdates
    #[arg(long, env = "POLL_TIMEOUT_SECS", default_value = "30")]
    poll_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tradebuddy=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let config = BotConfig {
        premium_users: parse_premium_users(&args.premium_users)?,
        dialogue_idle_timeout: idle_timeout_from_secs(args.idle_timeout_secs)?,
        poll_timeout_secs: args.poll_timeout_secs,
        health_port: args.port,
    };

    info!("Starting TradeBuddy");
    info!("Premium users: {}", config.premium_users.len());
    info!("Dialogue idle timeout: {}s", args.idle_timeout_secs);

    let port = config.health_port;
    tokio::spawn(async move {
        if let Err(e) = health::serve(port).await {
            error!("Health endpoint error: {:#}", e);
        }
    });

    let client = TelegramClient::new(args.bot_token, config.poll_timeout_secs)?;
    let poll_timeout_secs = config.poll_timeout_secs;
    let engine = Arc::new(DialogueEngine::new(Ledger::new(), config));
    let poller = Poller::new(client, engine, poll_timeout_secs);

    info!("🤖 TradeBuddy bot running");

    tokio::select! {
        _ = poller.run() => {},
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
        }
    }

    Ok(())
}
