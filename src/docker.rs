use crate::error::{Result, SetupError};
use std::path::Path;
use tokio::process::Command;
use tracing::{info, warn};

/// Flags passed after `compose`: build images, then start detached.
pub const COMPOSE_UP_ARGS: [&str; 3] = ["up", "-d", "--build"];

/// What the launcher runs, as shown while it starts.
pub fn compose_up_command(docker_bin: &str) -> String {
    format!("{docker_bin} compose {}", COMPOSE_UP_ARGS.join(" "))
}

/// The plain start command suggested in the next steps.
pub fn compose_start_command(docker_bin: &str) -> String {
    format!("{docker_bin} compose up -d")
}

/// Run `docker compose up -d --build` in `cwd` with the operator's terminal
/// attached, and wait for it. Returns the exit code.
pub async fn compose_up(docker_bin: &str, cwd: &Path) -> Result<i32> {
    info!(bin = docker_bin, cwd = %cwd.display(), "starting compose stack");

    let status = Command::new(docker_bin)
        .current_dir(cwd)
        .arg("compose")
        .args(COMPOSE_UP_ARGS)
        .status()
        .await
        .map_err(|source| SetupError::Launch {
            bin: docker_bin.to_string(),
            source,
        })?;

    let code = status.code().unwrap_or(if status.success() { 0 } else { 1 });
    if code != 0 {
        warn!(code, "compose exited with a non-zero status");
    }
    Ok(code)
}
