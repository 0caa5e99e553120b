// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Request and status records exchanged with the orchestration core.
//!
//! These are plain per-call values: built for one deploy or describe,
//! handed to the caller, then dropped. Nothing is cached.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A request to deploy one function.
///
/// Fields are kept as given by the caller; [`Deployer::deploy`](crate::Deployer::deploy)
/// validates them before any side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub function: String,
    pub environment: String,
    pub revision: Option<String>,
    pub clean: bool,
}

impl DeploymentRequest {
    pub fn new(function: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            environment: environment.into(),
            revision: None,
            clean: false,
        }
    }

    /// Attach a revision label. Empty labels are treated as absent.
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        let revision = revision.into();
        self.revision = (!revision.is_empty()).then_some(revision);
        self
    }

    /// Delete any existing deployment before building.
    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }
}

/// Lifecycle state reported by the provider for a deployed function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunctionLifecycle {
    Active,
    Offline,
    DeployInProgress,
    DeleteInProgress,
    Failed,
    Unknown,
}

impl FunctionLifecycle {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Offline => "OFFLINE",
            Self::DeployInProgress => "DEPLOY_IN_PROGRESS",
            Self::DeleteInProgress => "DELETE_IN_PROGRESS",
            Self::Failed => "FAILED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Map a provider status string. Accepts both the v1 `status` and the
    /// v2 `state` vocabularies; anything else is `Unknown`.
    pub fn from_provider(raw: &str) -> Self {
        match raw {
            "ACTIVE" => Self::Active,
            "OFFLINE" => Self::Offline,
            "DEPLOY_IN_PROGRESS" | "DEPLOYING" => Self::DeployInProgress,
            "DELETE_IN_PROGRESS" | "DELETING" => Self::DeleteInProgress,
            "FAILED" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for FunctionLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalized description of a deployed function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionStatus {
    pub name: String,
    pub status: FunctionLifecycle,
    pub version: String,
    pub last_modified: DateTime<Utc>,
    pub runtime: String,
    pub environment: String,
}
