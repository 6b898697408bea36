//! pagewatch CLI
//!
//! Single-run entry point, meant to be invoked by cron or a CI schedule.
//! Exits 0 when the check completes (changed or not) and 1 on any
//! configuration, pipeline or notification failure.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pagewatch::{
    error::Result,
    models::Config,
    notifier::SmtpNotifier,
    pipeline,
    services::HttpFetcher,
    storage::{BaselineStore, LocalStorage},
};

/// pagewatch - Web Page Change Monitor
#[derive(Parser, Debug)]
#[command(
    name = "pagewatch",
    version,
    about = "Watches a web page for meaningful changes and sends an email alert"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "pagewatch.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the page once and notify if it changed
    Check {
        /// Print the evaluation result as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration
    Validate,

    /// Show the watched page and the stored baseline
    Info,
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let storage = LocalStorage::current_dir();

    match cli.command {
        Command::Check { json } => {
            config.validate()?;
            log::info!("Monitoring URL: {}", config.monitor.url);

            let target = config.watch_target();
            let fetcher = HttpFetcher::new(&config.monitor)?;
            let notifier = SmtpNotifier::new(&config.email)?;

            let outcome = pipeline::run_check(&target, &fetcher, &storage, &notifier).await?;
            if json {
                println!("{}", serde_json::to_string(&outcome.result)?);
            }

            log::info!("Monitor completed successfully");
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            config.validate()?;
            log::info!("✓ Config OK");
        }

        Command::Info => {
            let target = config.watch_target();
            log::info!("Monitored URL: {}", target.url);
            log::info!(
                "Selector: {}",
                target.selector.as_deref().unwrap_or("(whole page)")
            );
            log::info!("Baseline: {}", storage.path(&target.baseline_key).display());
            match storage.load(&target.baseline_key).await {
                Some(baseline) => log::info!("Stored fingerprint: {}", baseline),
                None => log::info!("No baseline yet."),
            }
        }
    }

    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load_layered(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            init_logging(cli.verbose, "info");
            log::error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(cli.verbose, &config.logging.level);

    log::info!("pagewatch starting...");

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
