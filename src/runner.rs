// Local runner - executes the student's file with the configured interpreter
//
// A run fails when the interpreter cannot be spawned, exits non-zero, or
// writes anything to stderr. Failures are not errors of this program: the
// dispatcher turns them into a debugging request for the backend.

use crate::config::RunnerConfig;
use std::path::Path;
use tokio::process::Command;

/// Result of running a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded { stdout: String },
    Failed { error_output: String },
}

#[derive(Debug, Clone)]
pub struct Runner {
    interpreter: String,
}

impl Runner {
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            interpreter: config.interpreter.clone(),
        }
    }

    /// Run `<interpreter> <path>` to completion, capturing both streams
    pub async fn run(&self, path: &Path) -> RunOutcome {
        tracing::info!("Running {} {}", self.interpreter, path.display());

        let output = match Command::new(&self.interpreter)
            .arg(path)
            .kill_on_drop(true)
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("Failed to spawn {}: {}", self.interpreter, e);
                return RunOutcome::Failed {
                    error_output: classify_failure(
                        "",
                        Some(&format!("Failed to run {}: {}", self.interpreter, e)),
                    ),
                };
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        tracing::debug!(
            status = ?output.status.code(),
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            "Run finished"
        );

        if output.status.success() && stderr.is_empty() {
            return RunOutcome::Succeeded { stdout };
        }

        let status_message = (!output.status.success())
            .then(|| format!("Command failed with {}", output.status));
        RunOutcome::Failed {
            error_output: classify_failure(&stderr, status_message.as_deref()),
        }
    }
}

/// Error text for a failed run: stderr, else the process error, else a fallback
fn classify_failure(stderr: &str, process_error: Option<&str>) -> String {
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    match process_error {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => "Unknown Error".to_string(),
    }
}
