//! rewe - weekly Reddit digest mailer.

use anyhow::Result;
use chrono::{Datelike, Local};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rewe::{schedule, Config, Newsletter};

/// Weekly Reddit digest mailer.
#[derive(Parser)]
#[command(name = "rewe")]
#[command(about = "Emails a weekly digest of top submissions from subscribed subreddits")]
#[command(version)]
pub struct Cli {
    /// Send now regardless of the day of week
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rewe=info,warn")),
        )
        .init();

    let today = Local::now().weekday();
    if !schedule::should_run(cli.force, today) {
        println!(
            "📭 Not the send day (today is {today}; digests go out on {}). Use --force to send now.",
            schedule::SEND_DAY
        );
        return Ok(());
    }

    run().await
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    let recipient = config.recipient.clone();
    tracing::info!(recipient = %recipient, "starting weekly digest run");

    let newsletter = Newsletter::from_config(config)?;
    let summary = newsletter.send().await?;

    println!("\n📊 Weekly Digest Summary");
    println!("   Feeds: {}", summary.feeds);
    println!("   Items: {}", summary.items);
    println!("✅ Digest sent to {recipient}");

    Ok(())
}
