// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! cloudfn Core Library
//!
//! Deployment orchestration for a single cloud function: environment
//! policy, the validate → delete → build → deploy sequence, the describe
//! fetcher, tool configuration, and `gcloud`-backed collaborators.

pub mod config;
pub mod deploy;
pub mod describe;
pub mod environment;
pub mod error;
pub mod provider;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use config::{BuildConfig, Config, ConfigLoader, ProviderConfig, DEFAULT_CONFIG_FILE};
pub use deploy::Deployer;
pub use describe::{validate_function_name, DescriptionFetcher};
pub use environment::{is_valid, Environment, ENVIRONMENTS};
pub use error::{
    BuildError, CloudFnError, CloudFnResult, CommandError, ConfigError, DeployError, DeployStep,
    DescribeError, ServiceError,
};
pub use provider::{CommandToolchain, GcloudService};
pub use service::{BuildToolchain, EnvConfigRef, FunctionService, RemoteFunctionInfo};
pub use types::{DeploymentRequest, FunctionLifecycle, FunctionStatus};
