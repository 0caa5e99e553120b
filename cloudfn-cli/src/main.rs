// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! cloudfn CLI
//!
//! Command-line interface for deploying and describing a cloud function.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cloudfn_core::{CloudFnError, CloudFnResult, ConfigLoader, DeploymentRequest};

mod commands;

/// cloudfn - Deploy and inspect a cloud function
#[derive(Parser)]
#[command(name = "cloudfn")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults to cloudfn.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build and deploy a function
    Deploy {
        /// Name of the function to deploy
        function: String,

        /// Target environment (sandbox, dev, or pro)
        #[arg(short, long, default_value = "dev")]
        environment: String,

        /// Revision label attached to the deployment
        #[arg(short = 'v', long)]
        revision: Option<String>,

        /// Delete the existing function and rebuild before deploying
        #[arg(short, long)]
        clean: bool,
    },

    /// Get details of a deployed function
    Describe {
        /// Name of the function to describe
        function: String,

        /// Print the description as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

/// Dispatch to command handlers. Errors are returned, never exited on.
async fn run(cli: Cli) -> CloudFnResult<()> {
    let config = ConfigLoader::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Deploy {
            function,
            environment,
            revision,
            clean,
        } => {
            let mut request = DeploymentRequest::new(function, environment).with_clean(clean);
            if let Some(revision) = revision {
                request = request.with_revision(revision);
            }
            commands::deploy::execute(&config, &request).await
        }
        Commands::Describe { function, json } => {
            commands::describe::execute(&config, &function, json).await
        }
    }
}

fn report(error: &CloudFnError) {
    eprint!("{}", render_report(error));
}

/// Error message, the failed deploy step, and the raw collaborator output
/// when the message does not already carry it.
fn render_report(error: &CloudFnError) -> String {
    let message = error.to_string();
    let mut report = format!("✗ {}\n", message);
    if let CloudFnError::Deploy(e) = error {
        report.push_str(&format!("  (failed at the {} step)\n", e.step()));
    }
    if let Some(output) = error.diagnostic() {
        if !output.is_empty() && !message.contains(output) {
            report.push_str("  Output:\n");
            for line in output.lines() {
                report.push_str(&format!("    {}\n", line));
            }
        }
    }
    report
}
