//! tally — replay operation scripts against a fresh voting ledger.

mod script;

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use tally_governance::{LedgerConfig, VotingLedger};
use tally_nullables::NullClock;
use tally_types::Address;
use tally_utils::LogFormat;

use crate::script::{replay, Script, Summary};

#[derive(Parser)]
#[command(name = "tally", about = "Deterministic voting ledger")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "TALLY_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "TALLY_LOG_FORMAT", global = true)]
    log_format: Option<LogFormat>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Apply a script of operations to a new ledger and print the final state as JSON.
    Run {
        /// Script file (TOML, one `[[step]]` table per operation).
        script: PathBuf,

        /// Ledger owner.
        #[arg(long, env = "TALLY_OWNER")]
        owner: Option<Address>,

        /// Minimum total weighted votes needed to count a proposal.
        #[arg(long, env = "TALLY_QUORUM")]
        quorum: Option<u64>,

        /// Initial ledger time in Unix seconds (overrides the script's `start_time`).
        #[arg(long)]
        start_time: Option<u64>,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => LedgerConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => LedgerConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        Command::Run {
            script,
            owner,
            quorum,
            start_time,
        } => {
            if let Some(owner) = owner {
                config.owner = owner;
            }
            if let Some(quorum) = quorum {
                config.quorum_threshold = quorum;
            }
            tally_utils::init_logging(config.log_format, &config.log_level);
            if let Some(path) = &cli.config {
                tracing::info!("Loaded config from {}", path.display());
            }

            let text = std::fs::read_to_string(&script)
                .with_context(|| format!("reading script {}", script.display()))?;
            let parsed = Script::from_toml_str(&text)
                .with_context(|| format!("parsing script {}", script.display()))?;

            let clock = NullClock::new(start_time.or(parsed.start_time).unwrap_or(0));
            let mut ledger = VotingLedger::from_config(&config, clock);
            let outcomes = replay(&mut ledger, &parsed.steps);
            let summary = Summary::new(&ledger, &outcomes);

            println!("{}", serde_json::to_string_pretty(&summary)?);

            if summary.failed_expectations > 0 {
                bail!(
                    "{} of {} steps did not match their expectation",
                    summary.failed_expectations,
                    summary.steps
                );
            }
            Ok(())
        }
    }
}
