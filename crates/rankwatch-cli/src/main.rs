mod clients;
mod collect;
mod snapshot;
mod submit;
#[cfg(test)]
mod test_support;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rankwatch_core::AppConfig;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rankwatch")]
#[command(about = "Track keyword rankings in Google Sheets via DataForSEO")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Read targets from every spreadsheet and submit ranking tasks
    Submit {
        /// Read and batch targets without writing to any sheet or calling the SERP provider
        #[arg(long)]
        dry_run: bool,

        /// Also write the submitted targets to a local snapshot file
        #[arg(long, value_name = "PATH")]
        snapshot: Option<PathBuf>,

        /// Exit non-zero when the provider rejected any batch or task
        #[arg(long)]
        strict: bool,
    },
    /// Collect finished tasks and append dated rank columns
    Collect {
        /// Read targets from a snapshot written by `submit --snapshot`
        #[arg(long, value_name = "PATH")]
        snapshot: Option<PathBuf>,

        /// Exit non-zero when any ready task was skipped
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = rankwatch_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let result = run(cli.command, &config).await;
    if let Err(e) = &result {
        tracing::error!(error = %format!("{e:#}"), "rankwatch run failed");
    }
    result
}

async fn run(command: Commands, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Commands::Submit {
            dry_run,
            snapshot,
            strict,
        } => {
            let sheets = clients::sheets_client(config)?;
            let serp = if dry_run {
                None
            } else {
                Some(clients::serp_client(config)?)
            };
            let report =
                submit::run_submit(config, &sheets, serp.as_ref(), snapshot.as_deref()).await?;
            println!("{report}");
            fail_if_strict(strict, report.diagnostics())
        }
        Commands::Collect { snapshot, strict } => {
            let sheets = clients::sheets_client(config)?;
            let serp = clients::serp_client(config)?;
            let today = chrono::Local::now().date_naive();
            let report =
                collect::run_collect(config, &sheets, &serp, snapshot.as_deref(), today).await?;
            println!("{report}");
            fail_if_strict(strict, report.diagnostics())
        }
    }
}

fn fail_if_strict(strict: bool, diagnostics: usize) -> anyhow::Result<()> {
    if strict && diagnostics > 0 {
        anyhow::bail!("strict mode: run finished with {diagnostics} provider diagnostics");
    }
    Ok(())
}

/// Blocking pause between spreadsheets to stay under the Sheets quota.
async fn pause(config: &AppConfig) {
    if config.inter_request_delay_ms > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(
            config.inter_request_delay_ms,
        ))
        .await;
    }
}
