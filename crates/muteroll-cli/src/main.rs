use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "muteroll", version, about = "Muteroll CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a mute for a group
    Draw {
        /// Group to draw in
        #[arg(long)]
        group: String,
        /// User to log the mute against
        #[arg(long)]
        user: Option<String>,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Evaluate an arithmetic expression
    Eval {
        /// Expression, e.g. "(sqrt(100)+1e1)^2"
        expr: String,
    },
    /// Parse a duration expression
    Duration {
        /// Duration, e.g. "1h30m" or "2^4h"
        input: String,
        /// Substitute {t} in the input with this counter first
        #[arg(long)]
        count: Option<u32>,
    },
    /// Gacha configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Draw record management
    Record {
        #[command(subcommand)]
        action: commands::record::RecordAction,
    },
    /// Monte Carlo simulation of a draw configuration
    Simulate {
        /// Number of draws to simulate
        #[arg(long, default_value_t = 1000)]
        draws: usize,
        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        /// Simulate a group's effective configuration
        #[arg(long)]
        group: Option<String>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Draw { group, user, json } => commands::draw::run(&group, user.as_deref(), json),
        Commands::Eval { expr } => commands::eval::run(&expr),
        Commands::Duration { input, count } => commands::duration::run(&input, count),
        Commands::Config { action } => commands::config::run(action),
        Commands::Record { action } => commands::record::run(action),
        Commands::Simulate {
            draws,
            seed,
            group,
            json,
        } => commands::simulate::run(draws, seed, group.as_deref(), json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
