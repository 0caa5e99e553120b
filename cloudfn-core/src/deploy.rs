// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Deployment orchestration.
//!
//! Sequence: validate → delete (clean only) → build → deploy.
//! Each step gates the next and the first failure aborts the request.
//! There is no rollback: a clean deploy whose build fails leaves the
//! function deleted.

use std::collections::HashMap;

use crate::environment::Environment;
use crate::error::{DeployError, UnknownEnvironment};
use crate::service::{BuildToolchain, EnvConfigRef, FunctionService};
use crate::types::DeploymentRequest;

/// Drives one deploy request through the provider and build toolchain.
#[derive(Debug)]
pub struct Deployer<S, B> {
    service: S,
    toolchain: B,
    env_configs: HashMap<Environment, EnvConfigRef>,
}

impl<S, B> Deployer<S, B>
where
    S: FunctionService,
    B: BuildToolchain,
{
    /// Create a deployer using the default env file (`env.<environment>.yaml`)
    /// for every environment.
    pub fn new(service: S, toolchain: B) -> Self {
        Self {
            service,
            toolchain,
            env_configs: HashMap::new(),
        }
    }

    /// Override the configuration reference used for some environments.
    pub fn with_env_configs(
        mut self,
        configs: impl IntoIterator<Item = (Environment, EnvConfigRef)>,
    ) -> Self {
        self.env_configs.extend(configs);
        self
    }

    /// Configuration reference passed to the provider for `environment`.
    pub fn env_config(&self, environment: Environment) -> EnvConfigRef {
        self.env_configs
            .get(&environment)
            .cloned()
            .unwrap_or_else(|| EnvConfigRef::new(environment.default_env_file()))
    }

    /// Deploy the requested function.
    pub async fn deploy(&self, request: &DeploymentRequest) -> Result<(), DeployError> {
        let environment = request.validate()?;
        let function = request.function.as_str();
        let revision = request.revision.as_deref();

        tracing::info!(
            function = %function,
            environment = %environment,
            revision = revision.unwrap_or("-"),
            clean = request.clean,
            "Deploying function"
        );

        if request.clean {
            tracing::info!(function = %function, "Deleting existing function before rebuild");
            self.service
                .delete_function(function)
                .await
                .map_err(|source| DeployError::DeleteFailed {
                    function: function.to_string(),
                    source,
                })?;
        }

        tracing::debug!(function = %function, "Building deployable artifact");
        self.toolchain
            .build(function)
            .await
            .map_err(|source| DeployError::BuildFailed {
                function: function.to_string(),
                source,
            })?;

        let env_config = self.env_config(environment);
        tracing::debug!(function = %function, env_config = %env_config, "Deploying to provider");
        self.service
            .deploy_function(function, environment, &env_config, revision)
            .await
            .map_err(|source| DeployError::DeployFailed {
                function: function.to_string(),
                environment,
                source,
            })?;

        tracing::info!(
            function = %function,
            environment = %environment,
            "Successfully deployed function"
        );
        Ok(())
    }
}

impl DeploymentRequest {
    /// Local checks only, no I/O. Returns the parsed environment.
    ///
    /// The environment is checked first so a rejected tier is reported even
    /// when the name is also missing.
    pub fn validate(&self) -> Result<Environment, DeployError> {
        let environment: Environment = self.environment.parse().map_err(
            |UnknownEnvironment(environment)| DeployError::InvalidEnvironment { environment },
        )?;

        if self.function.is_empty() {
            return Err(DeployError::InvalidInput {
                field: "function",
                reason: "Function name cannot be empty".to_string(),
            });
        }

        Ok(environment)
    }
}
