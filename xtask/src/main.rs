//! Repository automation, run as `cargo xtask <command>` through the alias in
//! `.cargo/config.toml`.
//!
//! Currently this only manages the DynamoDB table the `dynamodb` storage
//! backend expects.

use clap::{Args, Parser, Subcommand};

mod dynamodb;
mod prelude;

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Repository tasks for eventplanner")]
struct Cli {
    #[command(flatten)]
    global: Global,

    #[command(subcommand)]
    command: Task,
}

/// Flags shared by every task.
#[derive(Debug, Clone, Args)]
pub struct Global {
    /// Only print errors and prompts
    #[arg(long, global = true)]
    pub silent: bool,
}

impl Global {
    pub fn is_silent(&self) -> bool {
        self.silent
    }
}

#[derive(Debug, Subcommand)]
enum Task {
    /// Create, update or destroy the events table
    Dynamodb(dynamodb::DynamodbCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli { global, command } = Cli::parse();

    match command {
        Task::Dynamodb(cmd) => dynamodb::run(cmd, global).await?,
    }
    Ok(())
}
