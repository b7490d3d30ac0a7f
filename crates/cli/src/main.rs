use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::Parser;
use jira_transition::{Driver, RunOptions};
use jira_transition_config::Config;
use jira_transition_output::{OutputFormat, OutputRenderer};
use tracing::{error, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Reads `jira_username`, `jira_password`, `jira_instance_url`,
/// `issue_id_or_key_list` and `transition_id` from the environment.
#[derive(Parser, Debug)]
#[command(
    name = "jira-transition",
    version,
    about = "Move Jira issues through a workflow transition",
    long_about = None
)]
struct Cli {
    /// Output format for the final per-issue report
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Validate and build every request without sending it
    #[arg(long)]
    dry_run: bool,

    /// Show a progress bar while issues are processed
    #[arg(long)]
    progress: bool,

    /// Enable verbose logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_tracing(cli.debug) {
        eprintln!("{err:#}");
    }

    let renderer = OutputRenderer::new(cli.output);
    let options = RunOptions {
        dry_run: cli.dry_run,
        show_progress: cli.progress,
    };

    let mut driver = Driver::new(Config::from_env(), options, &renderer);
    let result = driver.run().await;

    if !driver.outcomes().is_empty() {
        if let Err(err) = renderer.render_outcomes(driver.outcomes()) {
            warn!(error = %err, "Failed to render outcome report");
        }
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            if let Some(hint) = err.suggestion() {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(err.exit_code())
        }
    }
}

fn init_tracing(debug: bool) -> Result<()> {
    let default = if debug {
        "info,jira_transition=debug,jira_transition_api=debug,jira_transition_runner=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logger: {err}"))
}
