// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! [`BuildToolchain`] that runs the configured build command.

use std::path::PathBuf;

use tokio::process::Command;

use super::process::run_captured;
use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::service::BuildToolchain;

/// Environment variable holding the build target for the build command.
pub const BUILD_TARGET_ENV: &str = "CLOUDFN_FUNCTION";

/// Runs e.g. `go build -o function ./cmd/function` and captures its output.
#[derive(Debug, Clone)]
pub struct CommandToolchain {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl CommandToolchain {
    pub fn new(config: &BuildConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            working_dir: config.working_dir.clone(),
        }
    }
}

impl BuildToolchain for CommandToolchain {
    async fn build(&self, target: &str) -> Result<(), BuildError> {
        if self.program.is_empty() {
            return Err(BuildError::EmptyCommand);
        }

        let mut command = Command::new(&self.program);
        command.args(&self.args).env(BUILD_TARGET_ENV, target);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let output = run_captured(command).await?.combined();
        tracing::debug!(build_target = %target, output = %output.trim_end(), "Build finished");
        Ok(())
    }
}
