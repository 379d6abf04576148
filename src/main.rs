mod config;
mod docker;
mod env;
mod error;
mod fetch;
mod prompt;
mod questionnaire;
mod secret;
mod ui;

use anyhow::Result;
use clap::Parser;
use config::Variant;
use error::SetupError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Download and configure a self-hosted SupaLLM stack.
#[derive(Debug, Parser)]
#[command(name = "supallm-setup", version, about)]
struct Cli {
    /// Directory to write docker-compose.yml and .env into.
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Questionnaire to run.
    #[arg(long, value_enum, env = "SUPALLM_SETUP_VARIANT", default_value_t = Variant::Standard)]
    variant: Variant,
}

fn init_tracing() {
    // Diagnostics go to stderr so they never interleave with the prompts.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let cwd = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let cfg = config::get_config(&cwd, cli.variant);
    let client = fetch::http_client();

    let result = ui::run(&cfg, &mut prompt::TerminalPrompter, &client).await;
    exit_code(result).map(ExitCode::from)
}

/// 0 on success or cancellation, 1 when a download failed. Any other error
/// propagates.
fn exit_code(result: error::Result<ui::Outcome>) -> Result<u8> {
    match result {
        Ok(ui::Outcome::Completed {
            dashboard_port,
            launched,
        }) => {
            info!(%dashboard_port, launched, "setup complete");
            Ok(0)
        }
        Ok(ui::Outcome::Cancelled) => Ok(0),
        Err(SetupError::Interrupted) => {
            ui::print_cancelled();
            Ok(0)
        }
        Err(err @ SetupError::Download { .. }) => {
            error!(error = %err, "setup aborted");
            Ok(1)
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use error::DownloadFailure;

    #[test]
    fn completed_and_cancelled_runs_exit_zero() {
        let completed = ui::Outcome::Completed {
            dashboard_port: "3000".to_string(),
            launched: false,
        };
        assert_eq!(exit_code(Ok(completed)).unwrap(), 0);
        assert_eq!(exit_code(Ok(ui::Outcome::Cancelled)).unwrap(), 0);
    }

    #[test]
    fn interrupted_prompt_exits_zero() {
        assert_eq!(exit_code(Err(SetupError::Interrupted)).unwrap(), 0);
    }

    #[test]
    fn download_failure_exits_one() {
        let err = SetupError::Download {
            dest: ".env".to_string(),
            source: DownloadFailure::Io(std::io::Error::other("connection reset")),
        };
        assert_eq!(exit_code(Err(err)).unwrap(), 1);
    }

    #[test]
    fn other_errors_propagate() {
        let err = SetupError::Prompt("terminal is not a tty".to_string());
        let propagated = exit_code(Err(err)).unwrap_err();
        assert!(propagated.to_string().contains("terminal is not a tty"));
    }
}
