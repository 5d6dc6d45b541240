use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;

/// Runs the post-command with inherited stdio and returns its exit code.
/// No command means there is nothing to hand over to, which counts as success.
pub async fn run_post_command(argv: &[String]) -> Result<u8> {
    let Some((program, args)) = argv.split_first() else {
        return Ok(0);
    };

    tracing::debug!(program = %program, ?args, "Running post command");

    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .with_context(|| format!("failed to run `{program}`"))?;

    // killed by a signal, or an exit code outside what a process can report
    Ok(status.code().and_then(|code| u8::try_from(code).ok()).unwrap_or(1))
}
