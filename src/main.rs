mod cli;
mod config;
mod db;
mod error;
mod identity;
mod journal;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "daybook", version, about = "Voice journal with daily archival")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API server
    Serve,
    /// Append a voice-log entry for an owner
    Append {
        #[arg(long)]
        owner: String,
        text: String,
    },
    /// Fold today's live entries into the day's archive batch.
    /// Suitable as a cron job at (or just before) UTC midnight.
    Archive {
        #[arg(long)]
        owner: String,
    },
    /// List today's live entries
    Today {
        #[arg(long)]
        owner: String,
    },
    /// List live entries for a specific day (YYYY-MM-DD)
    Day {
        #[arg(long)]
        owner: String,
        day: String,
    },
    /// List archived days, newest first
    Days {
        #[arg(long)]
        owner: String,
    },
    /// Show one archived day by batch id
    Show {
        #[arg(long)]
        owner: String,
        batch_id: String,
    },
    /// Read or write the daily summary
    Summary {
        #[command(subcommand)]
        action: SummaryAction,
    },
    /// Manage owners and their access tokens
    Owner {
        #[command(subcommand)]
        action: OwnerAction,
    },
    /// Run database diagnostics
    Doctor,
}

#[derive(Subcommand)]
enum SummaryAction {
    /// Save the summary for a day (replaces any existing one)
    Set {
        #[arg(long)]
        owner: String,
        day: String,
        text: String,
    },
    /// Print the summary for a day
    Get {
        #[arg(long)]
        owner: String,
        day: String,
    },
}

#[derive(Subcommand)]
enum OwnerAction {
    /// Register an owner and mint their access token
    Add {
        owner_key: String,
        #[arg(long, default_value = "")]
        name: String,
    },
    /// List registered owners
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = config::DaybookConfig::load()?;

    // Initialize tracing with the configured log level, to stderr so the
    // listing commands keep stdout clean.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => server::serve(config).await?,
        Command::Append { owner, text } => cli::journal::append(&config, &owner, &text)?,
        Command::Archive { owner } => cli::journal::archive(&config, &owner)?,
        Command::Today { owner } => cli::journal::today(&config, &owner)?,
        Command::Day { owner, day } => cli::journal::day(&config, &owner, &day)?,
        Command::Days { owner } => cli::journal::days(&config, &owner)?,
        Command::Show { owner, batch_id } => cli::journal::show(&config, &owner, &batch_id)?,
        Command::Summary { action } => match action {
            SummaryAction::Set { owner, day, text } => {
                cli::journal::summary_set(&config, &owner, &day, &text)?
            }
            SummaryAction::Get { owner, day } => {
                cli::journal::summary_get(&config, &owner, &day)?
            }
        },
        Command::Owner { action } => match action {
            OwnerAction::Add { owner_key, name } => cli::owners::add(&config, &owner_key, &name)?,
            OwnerAction::List => cli::owners::list(&config)?,
        },
        Command::Doctor => cli::doctor::doctor(&config)?,
    }

    Ok(())
}
