// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Custom error types for cloudfn.
//!
//! Every failure is an explicit enum variant - no `Box<dyn Error>`, no
//! `anyhow::Result`. Errors raised by external collaborators keep the raw
//! output of the command that failed so the CLI can show it verbatim.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::environment::Environment;

/// Top-level error type, used at the CLI boundary.
#[derive(Debug, Error)]
pub enum CloudFnError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    Describe(#[from] DescribeError),

    #[error("Provider setup failed: {0}")]
    Provider(#[from] ServiceError),

    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

impl CloudFnError {
    /// Raw collaborator output attached to the error, if any.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Config(_) | Self::Render(_) => None,
            Self::Deploy(e) => e.diagnostic(),
            Self::Describe(e) => e.diagnostic(),
            Self::Provider(e) => e.diagnostic(),
        }
    }
}

// =========================================================================
// Orchestration Errors
// =========================================================================

/// Step of the deploy sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStep {
    Validate,
    Delete,
    Build,
    Deploy,
}

impl DeployStep {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::Delete => "delete",
            Self::Build => "build",
            Self::Deploy => "deploy",
        }
    }
}

impl fmt::Display for DeployStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure of a deploy request. Terminal: nothing is retried or rolled back.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Invalid environment '{environment}': must be one of sandbox, dev, pro")]
    InvalidEnvironment { environment: String },

    #[error("Failed to delete existing function '{function}': {source}")]
    DeleteFailed {
        function: String,
        #[source]
        source: ServiceError,
    },

    #[error("Failed to build function '{function}': {source}")]
    BuildFailed {
        function: String,
        #[source]
        source: BuildError,
    },

    #[error("Failed to deploy function '{function}' to {environment}: {source}")]
    DeployFailed {
        function: String,
        environment: Environment,
        #[source]
        source: ServiceError,
    },
}

impl DeployError {
    /// The step that failed.
    pub fn step(&self) -> DeployStep {
        match self {
            Self::InvalidInput { .. } | Self::InvalidEnvironment { .. } => DeployStep::Validate,
            Self::DeleteFailed { .. } => DeployStep::Delete,
            Self::BuildFailed { .. } => DeployStep::Build,
            Self::DeployFailed { .. } => DeployStep::Deploy,
        }
    }

    /// Raw output of the collaborator that failed.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { .. } | Self::InvalidEnvironment { .. } => None,
            Self::DeleteFailed { source, .. } | Self::DeployFailed { source, .. } => {
                source.diagnostic()
            }
            Self::BuildFailed { source, .. } => source.diagnostic(),
        }
    }
}

/// Failure of a describe request.
#[derive(Debug, Error)]
pub enum DescribeError {
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Function '{function}' not found")]
    NotFound { function: String, diagnostic: String },

    #[error("Failed to describe function '{function}': {source}")]
    DescribeFailed {
        function: String,
        #[source]
        source: ServiceError,
    },
}

impl DescribeError {
    /// Raw output of the provider query, if any.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { .. } => None,
            Self::NotFound { diagnostic, .. } => Some(diagnostic),
            Self::DescribeFailed { source, .. } => source.diagnostic(),
        }
    }
}

// =========================================================================
// Collaborator Errors
// =========================================================================

/// Errors reported by a [`FunctionService`](crate::service::FunctionService).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Function '{name}' does not exist")]
    NotFound { name: String, output: String },

    #[error("Unexpected provider response: {message}")]
    MalformedResponse { message: String, output: String },

    #[error("Provider setting '{key}' is not configured: {reason}")]
    MissingSetting { key: &'static str, reason: String },
}

impl ServiceError {
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Command(e) => e.output(),
            Self::NotFound { output, .. } | Self::MalformedResponse { output, .. } => Some(output),
            Self::MissingSetting { .. } => None,
        }
    }
}

/// Errors reported by a [`BuildToolchain`](crate::service::BuildToolchain).
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Build command is empty")]
    EmptyCommand,
}

impl BuildError {
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Command(e) => e.output(),
            Self::EmptyCommand => None,
        }
    }
}

/// External process failures.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' failed ({status})\nOutput: {output}")]
    Failed {
        command: String,
        status: String,
        output: String,
    },
}

impl CommandError {
    /// Combined stdout/stderr of a command that ran and failed.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Spawn { .. } => None,
            Self::Failed { output, .. } => Some(output),
        }
    }
}

// =========================================================================
// Configuration Errors - Fail-Fast on Invalid Config
// =========================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Environment name outside the deployable set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid environment '{0}': must be one of sandbox, dev, pro")]
pub struct UnknownEnvironment(pub String);

/// Result type alias using CloudFnError.
pub type CloudFnResult<T> = Result<T, CloudFnError>;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
