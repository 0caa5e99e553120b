// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Contracts for the external collaborators driven by the core.
//!
//! The provider control plane and the local build toolchain are reached
//! only through these traits. Concrete implementations live in
//! [`crate::provider`]; tests substitute recording doubles.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::environment::Environment;
use crate::error::{BuildError, ServiceError};
use crate::types::FunctionLifecycle;

/// Per-environment configuration handed to the provider on deploy.
///
/// Opaque to the orchestrator: it is resolved from the tool configuration
/// by environment name and passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfigRef(PathBuf);

impl EnvConfigRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for EnvConfigRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Describe response as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFunctionInfo {
    pub name: String,
    pub status: FunctionLifecycle,
    pub version: String,
    pub last_modified: DateTime<Utc>,
    pub runtime: String,
    pub environment: String,
}

/// Provider-side lifecycle of a deployed function.
pub trait FunctionService {
    /// Delete the deployed function `name`. Deleting a function that does
    /// not exist succeeds.
    fn delete_function(&self, name: &str) -> impl Future<Output = Result<(), ServiceError>>;

    /// Create or update the function `name` in `environment`.
    fn deploy_function(
        &self,
        name: &str,
        environment: Environment,
        env_config: &EnvConfigRef,
        revision: Option<&str>,
    ) -> impl Future<Output = Result<(), ServiceError>>;

    /// Fetch the live description of `name`.
    ///
    /// Must return [`ServiceError::NotFound`] when the function does not exist.
    fn describe_function(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<RemoteFunctionInfo, ServiceError>>;
}

/// Local toolchain that produces the deployable artifact.
pub trait BuildToolchain {
    /// Compile/package the deployable unit for `target`.
    fn build(&self, target: &str) -> impl Future<Output = Result<(), BuildError>>;
}
