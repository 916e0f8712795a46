use anyhow::{Context, Result};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::debug;

/// Everything captured from one finished child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub stdout: String,
    pub stderr: String,
    pub returncode: i32,
}

impl CommandOutcome {
    pub fn succeeded(&self) -> bool {
        self.returncode == 0
    }

    /// Exit status this wrapper should terminate with.
    pub fn exit_code(&self) -> i32 {
        if self.returncode < 0 {
            128 - self.returncode
        } else {
            self.returncode
        }
    }
}

/// Runs `argv` to completion, buffering stdout and stderr in memory.
pub async fn run_command(argv: &[String]) -> Result<CommandOutcome> {
    let (program, args) = argv
        .split_first()
        .context("Command to execute is empty")?;

    debug!(program = %program, args = ?args, "Launching command");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .with_context(|| format!("Failed to spawn command: {}", program))?;

    let outcome = CommandOutcome {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        returncode: returncode(output.status),
    };

    debug!(
        returncode = outcome.returncode,
        stdout_bytes = output.stdout.len(),
        stderr_bytes = output.stderr.len(),
        "Command finished"
    );
    Ok(outcome)
}

/// The command line as a single space-separated string.
pub fn command_line(argv: &[String]) -> String {
    argv.join(" ")
}

// Killed by a signal: negative signal number.
fn returncode(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    1
}
