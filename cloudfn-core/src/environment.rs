// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Deployment target environments.
//!
//! The set of environments is closed: `sandbox`, `dev` and `pro`.
//! Every entry point that accepts an environment string parses it into an
//! [`Environment`] before anything touches the provider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownEnvironment;

/// All environments, in promotion order.
pub const ENVIRONMENTS: [Environment; 3] =
    [Environment::Sandbox, Environment::Dev, Environment::Pro];

/// Returns true iff `environment` names one of the deployable environments.
///
/// Matching is exact: no case folding, no trimming, no aliases (`prod` is not `pro`).
pub fn is_valid(environment: &str) -> bool {
    environment.parse::<Environment>().is_ok()
}

/// Deployment target tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Environment {
    Sandbox,
    Dev,
    Pro,
}

impl Environment {
    /// Wire name used on the command line, in config files and in provider labels.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Dev => "dev",
            Self::Pro => "pro",
        }
    }

    /// Default env-vars file for this environment (`env.<name>.yaml`).
    pub fn default_env_file(&self) -> String {
        format!("env.{}.yaml", self.as_str())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ENVIRONMENTS
            .into_iter()
            .find(|env| env.as_str() == s)
            .ok_or_else(|| UnknownEnvironment(s.to_string()))
    }
}

impl TryFrom<String> for Environment {
    type Error = UnknownEnvironment;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Environment> for String {
    fn from(env: Environment) -> Self {
        env.as_str().to_string()
    }
}
