//! Migrate CLI - moves the legacy document archive into ekorre

mod output;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use migrate_lib::{
    Credentials, CredentialsError, CredentialsProvider, DEFAULT_UPLOAD_PATH, EnvCredentials,
    MigrateError, PromptCredentials, RunOptions, migrate_hehe, migrate_meetings,
};
use owo_colors::OwoColorize;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use crate::output::{print_hehe_report, print_meeting_report, print_warning};

#[derive(Parser)]
#[command(name = "migrate")]
#[command(
    about = "Migrate legacy meeting documents and HeHE issues into ekorre",
    long_about = None
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    log_verbosity: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate meeting documents from a `<year>/<file>.pdf` archive
    Meetings(RunArgs),

    /// Migrate HeHE issues from a directory of `<year>-<number>.pdf` files
    Hehe(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Directory to read documents from
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Base URL of the ekorre API (e.g. https://api.medieteknik.com)
    #[arg(value_name = "API_URL")]
    api_url: Url,

    /// Classify and report only; do not log in or upload anything
    #[arg(long)]
    dry_run: bool,

    /// Storage directory in ekorre to upload files into
    #[arg(long, value_name = "PATH", default_value = DEFAULT_UPLOAD_PATH)]
    upload_path: String,

    /// HTTP request timeout in seconds
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,
}

impl RunArgs {
    fn options(&self) -> Result<RunOptions, CliError> {
        if !self.upload_path.starts_with('/') {
            return Err(CliError::RelativeUploadPath(self.upload_path.clone()));
        }
        Ok(RunOptions {
            upload_path: self.upload_path.clone(),
            dry_run: self.dry_run,
            timeout: Duration::from_secs(self.timeout),
        })
    }
}

/// Environment credentials when both variables are set, otherwise an
/// interactive prompt.
enum CliCredentials {
    Env(EnvCredentials),
    Prompt(PromptCredentials),
}

impl CliCredentials {
    fn detect() -> Self {
        if EnvCredentials::is_available() {
            Self::Env(EnvCredentials)
        } else {
            Self::Prompt(PromptCredentials)
        }
    }
}

impl CredentialsProvider for CliCredentials {
    fn credentials(&self) -> Result<Credentials, CredentialsError> {
        match self {
            Self::Env(env) => env.credentials(),
            Self::Prompt(prompt) => prompt.credentials(),
        }
    }
}

/// Initialize tracing subscriber with appropriate filters and formatting.
fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn,migrate_lib=info".to_string(),
            1 => "info,migrate_lib=debug".to_string(),
            _ => "debug,migrate_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(verbose >= 1)
                    .with_level(true)
                    .with_thread_ids(false)
                    .with_file(verbose >= 2)
                    .with_line_number(verbose >= 2)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

/// Failures that end a CLI run.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("upload path must be absolute, got '{0}'")]
    RelativeUploadPath(String),

    #[error(transparent)]
    Migrate(#[from] MigrateError),
}

async fn run(command: Commands, credentials: &CliCredentials) -> Result<(), CliError> {
    match command {
        Commands::Meetings(args) => {
            let options = args.options()?;
            let report =
                migrate_meetings(&args.source, &args.api_url, credentials, &options).await?;
            print_meeting_report(&report);
            if report.upload.as_ref().is_some_and(|u| !u.is_clean()) {
                print_warning("Some documents were not migrated, see above");
            }
        }
        Commands::Hehe(args) => {
            let options = args.options()?;
            let report = migrate_hehe(&args.source, &args.api_url, credentials, &options).await?;
            print_hehe_report(&report);
            if report.upload.as_ref().is_some_and(|u| !u.is_clean()) {
                print_warning("Some papers were not migrated, see above");
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_verbosity, cli.json);

    tracing::debug!("Migrate CLI starting");

    let credentials = CliCredentials::detect();
    if let Err(e) = run(cli.command, &credentials).await {
        eprintln!("{} {e}", "Error:".bold().red());
        std::process::exit(1);
    }
}
