//! remedy - bulk remediation plans
//!
//! CLI binary for packing, submitting and exporting remediation plans.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use remedy::config::{ApiConfig, Config};
use remedy::logging::{init_logging, LogFormat};
use remedy::submit::{PayloadTemplate, SubmissionMode};
use std::path::PathBuf;
use std::time::Duration;

mod cli;

#[derive(Parser)]
#[command(name = "remedy")]
#[command(about = "Bulk creation and export of remediation plans")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Log format: text or json
    #[arg(long, global = true, default_value = "text")]
    log_format: LogFormat,

    /// Remediations API base URL (overrides REMEDY_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how an issues file would be split into requests
    Plan {
        /// JSON file with issues
        file: PathBuf,

        #[command(flatten)]
        limits: cli::LimitArgs,
    },

    /// Create or extend a remediation plan from an issues file
    Submit {
        /// JSON file with issues
        file: PathBuf,

        /// Name of the plan to create
        #[arg(long, required_unless_present = "update", conflicts_with = "update")]
        name: Option<String>,

        /// Id of an existing plan to add the issues to
        #[arg(long)]
        update: Option<String>,

        /// Allow systems to reboot automatically
        #[arg(long)]
        auto_reboot: bool,

        /// Delay between requests in milliseconds (overrides REMEDY_THROTTLE_MS)
        #[arg(long)]
        throttle_ms: Option<u64>,

        /// Dry run - show the requests without sending them
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        limits: cli::LimitArgs,
    },

    /// Export every remediation plan as JSON
    Export {
        /// Rows per page request (overrides REMEDY_PAGE_SIZE)
        #[arg(long)]
        page_size: Option<u64>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format)?;

    let mut config = Config::from_env().context("invalid REMEDY_* environment")?;
    if let Some(url) = &cli.api_url {
        config.api = ApiConfig {
            token: config.api.token.take(),
            timeout: config.api.timeout,
            ..ApiConfig::new(url)?
        };
    }

    match cli.command {
        Commands::Plan { file, limits } => {
            cli::run_plan(&file, limits.apply(config.limits))?;
        }
        Commands::Submit {
            file,
            name,
            update,
            auto_reboot,
            throttle_ms,
            dry_run,
            limits,
        } => {
            config.limits = limits.apply(config.limits);
            if let Some(ms) = throttle_ms {
                config.throttle = Duration::from_millis(ms);
            }
            let mode = update.map_or(SubmissionMode::Create, SubmissionMode::Update);
            let template = PayloadTemplate { name, auto_reboot };
            cli::run_submit(&config, &file, mode, template, dry_run).await?;
        }
        Commands::Export { page_size, output } => {
            if let Some(size) = page_size.filter(|s| *s > 0) {
                config.page_size = size;
            }
            cli::run_export(&config, output.as_deref()).await?;
        }
    }

    Ok(())
}
