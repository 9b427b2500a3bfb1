use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use eventplanner::config::Config;
use eventplanner::notifications::LogNotificationSender;
use eventplanner::state::AppState;

/// Eventplanner - Plan events with guests, tasks and expenses
#[derive(Parser, Debug)]
#[command(name = "eventplanner")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Storage backend to run against
    #[arg(long, value_enum, default_value_t = Backend::default(), env = "EVENTPLANNER_BACKEND")]
    backend: Backend,

    /// Emit logs as JSON lines
    #[arg(long, env = "EVENTPLANNER_JSON_LOGS")]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send pending-task summaries to the owners of upcoming events
    Notify {
        /// Exit with an error when any delivery failed
        #[arg(long)]
        strict: bool,
    },
    /// Print the resolved configuration
    Config,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    #[cfg(feature = "inmemory")]
    Inmemory,
    #[cfg(feature = "dynamodb")]
    Dynamodb,
}

impl Default for Backend {
    #[cfg(feature = "inmemory")]
    fn default() -> Self {
        Backend::Inmemory
    }

    #[cfg(not(feature = "inmemory"))]
    fn default() -> Self {
        Backend::Dynamodb
    }
}

fn init_tracing(json: bool) {
    let fmt_layer = if json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventplanner=debug".into()),
        )
        .with(fmt_layer)
        .init();
}

async fn build_state(backend: Backend, config: &Config) -> AppState {
    let sender = Arc::new(LogNotificationSender);
    match backend {
        #[cfg(feature = "inmemory")]
        Backend::Inmemory => AppState::in_memory(config, sender),
        #[cfg(feature = "dynamodb")]
        Backend::Dynamodb => AppState::dynamodb(config, sender).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);

    let config = Config::from_env();

    match cli.command {
        Command::Config => {
            println!("{config:#?}");
            Ok(())
        }
        Command::Notify { strict } => {
            let state = build_state(cli.backend, &config).await;
            let outcome = state.actions.send_pending_tasks_notifications().await;
            state.shutdown().await?;
            let report = outcome?;

            for failure in &report.failures {
                tracing::warn!(
                    event_id = %failure.event_id,
                    recipient = %failure.recipient,
                    reason = %failure.reason,
                    "delivery failed"
                );
            }
            tracing::info!(
                events = report.events_notified,
                attempted = report.deliveries_attempted,
                succeeded = report.deliveries_succeeded,
                "notification run finished"
            );

            if strict && report.is_partial_failure() {
                bail!(
                    "{} of {} deliveries failed",
                    report.failures.len(),
                    report.deliveries_attempted
                );
            }
            Ok(())
        }
    }
}
