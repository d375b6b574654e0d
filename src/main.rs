use clap::{Parser, Subcommand};
use dioxus_logger::tracing;
use serde::Serialize;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use discord_history::{
    config::Config,
    error::AppError,
    model::TimeWindow,
    service::AccountService,
    startup,
    util::parse::{parse_snowflake, parse_timestamp},
};

/// Fetch bounded windows of Discord message history as JSON.
#[derive(Parser)]
#[command(name = "discord-history", version)]
struct Cli {
    /// Write JSON output to this file instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the account the token belongs to
    Whoami,
    /// List the guilds the account is a member of
    Guilds,
    /// List the text channels of a guild
    Channels {
        #[arg(long)]
        guild: String,
    },
    /// Most recent page of every direct message channel
    Dms,
    /// Recent messages across every text channel of a guild
    Recent {
        #[arg(long)]
        guild: String,
        #[arg(long, default_value_t = 24)]
        hours: i64,
    },
    /// Paginated history of one channel
    History {
        #[arg(long)]
        channel: String,
        #[arg(long, conflicts_with = "since")]
        hours: Option<i64>,
        /// RFC 3339 start instant, e.g. 2024-01-01T00:00:00Z
        #[arg(long)]
        since: Option<String>,
    },
    /// Paginated history of every text channel of a guild
    GuildHistory {
        #[arg(long)]
        guild: String,
        #[arg(long, default_value_t = 24)]
        hours: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    dioxus_logger::init(config.log_level).map_err(|e| AppError::LoggerErr(e.to_string()))?;

    let transport = startup::setup_transport(&config)?;

    // Ctrl-C stops walks between pages; whatever was gathered is still written
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing with partial results");
            interrupt.cancel();
        }
    });

    let enumerator = startup::setup_enumerator(&config, transport.clone(), cancel);
    let account = AccountService::new(transport.as_ref());

    let output = cli.output.as_deref();
    match cli.command {
        Command::Whoami => write_json(output, &account.current_user().await?)?,
        Command::Guilds => write_json(output, &account.guilds().await?)?,
        Command::Channels { guild } => {
            let channels = enumerator
                .list_guild_channels(parse_snowflake(&guild)?)
                .await;
            write_json(output, &channels)?
        }
        Command::Dms => write_json(output, &enumerator.all_direct_messages().await)?,
        Command::Recent { guild, hours } => {
            let window = TimeWindow::try_last_hours(hours)?;
            let messages = enumerator
                .recent_across_guild(parse_snowflake(&guild)?, window)
                .await;
            write_json(output, &messages)?
        }
        Command::History {
            channel,
            hours,
            since,
        } => {
            let window = match since {
                Some(since) => TimeWindow::Since(parse_timestamp(&since)?),
                None => TimeWindow::try_last_hours(hours.unwrap_or(24))?,
            };
            let messages = enumerator
                .channel_history(parse_snowflake(&channel)?, window)
                .await;
            write_json(output, &messages)?
        }
        Command::GuildHistory { guild, hours } => {
            let window = TimeWindow::try_last_hours(hours)?;
            let messages = enumerator
                .history_across_guild(parse_snowflake(&guild)?, window)
                .await;
            write_json(output, &messages)?
        }
    }

    Ok(())
}

fn write_json<T: Serialize>(output: Option<&std::path::Path>, value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)?;

    match output {
        Some(path) => {
            std::fs::write(path, rendered).map_err(|e| {
                AppError::OutputErr(format!("Failed to write {}: {}", path.display(), e))
            })?;
            tracing::info!("Wrote output to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
