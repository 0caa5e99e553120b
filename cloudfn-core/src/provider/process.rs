// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Captured execution of external commands.

use std::process::Stdio;

use tokio::process::Command;

use crate::error::CommandError;

/// Output of a command that exited successfully.
#[derive(Debug, Clone, Default)]
pub(crate) struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    /// stdout followed by stderr.
    pub fn combined(&self) -> String {
        combine(&self.stdout, &self.stderr)
    }
}

/// Run `command` to completion and capture both streams.
///
/// A non-zero exit becomes [`CommandError::Failed`] carrying the combined output.
pub(crate) async fn run_captured(mut command: Command) -> Result<CapturedOutput, CommandError> {
    let rendered = render(command.as_std());
    let program = command.as_std().get_program().to_string_lossy().into_owned();

    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    tracing::debug!(command = %rendered, "Running external command");

    let output = command
        .output()
        .await
        .map_err(|source| CommandError::Spawn { program, source })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(CommandError::Failed {
            command: rendered,
            status: output.status.to_string(),
            output: combine(&stdout, &stderr).trim_end().to_string(),
        });
    }

    Ok(CapturedOutput { stdout, stderr })
}

fn combine(stdout: &str, stderr: &str) -> String {
    let mut combined = String::with_capacity(stdout.len() + stderr.len() + 1);
    combined.push_str(stdout);
    if !stdout.is_empty() && !stdout.ends_with('\n') && !stderr.is_empty() {
        combined.push('\n');
    }
    combined.push_str(stderr);
    combined
}

fn render(command: &std::process::Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
