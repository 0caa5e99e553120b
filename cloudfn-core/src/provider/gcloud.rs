// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! [`FunctionService`] backed by the `gcloud` CLI.
//!
//! Environment and revision are written as function labels on deploy and
//! read back on describe, since the provider has no native notion of either.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::process::Command;

use super::process::run_captured;
use crate::config::ProviderConfig;
use crate::environment::Environment;
use crate::error::{CommandError, ServiceError};
use crate::service::{EnvConfigRef, FunctionService, RemoteFunctionInfo};
use crate::types::FunctionLifecycle;

/// Label carrying the deployment environment.
const ENVIRONMENT_LABEL: &str = "environment";
/// Label carrying the caller-supplied revision.
const REVISION_LABEL: &str = "revision";
/// Provider limit on label value length.
const MAX_LABEL_LEN: usize = 63;

/// Provider client that shells out to `gcloud functions ...`.
#[derive(Debug, Clone)]
pub struct GcloudService {
    gcloud: PathBuf,
    project: String,
    region: String,
    runtime: String,
    trigger_http: bool,
    allow_unauthenticated: bool,
    source_dir: Option<PathBuf>,
    entry_point: Option<String>,
}

impl GcloudService {
    /// Create a client for an explicit project and region.
    pub fn new(
        config: &ProviderConfig,
        project: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            gcloud: config.gcloud_path.clone(),
            project: project.into(),
            region: region.into(),
            runtime: config.runtime.clone(),
            trigger_http: config.trigger_http,
            allow_unauthenticated: config.allow_unauthenticated,
            source_dir: config.source_dir.clone(),
            entry_point: config.entry_point.clone(),
        }
    }

    /// Create a client, asking `gcloud config` for project/region when the
    /// configuration leaves them unset.
    pub async fn from_config(config: &ProviderConfig) -> Result<Self, ServiceError> {
        let project = match &config.project {
            Some(project) => project.clone(),
            None => resolve_setting(config, "project").await?,
        };
        let region = match &config.region {
            Some(region) => region.clone(),
            None => resolve_setting(config, "region").await?,
        };

        tracing::debug!(project = %project, region = %region, "Resolved provider settings");
        Ok(Self::new(config, project, region))
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Arguments for `gcloud functions delete`.
    pub fn delete_args(&self, name: &str) -> Vec<String> {
        let mut args = vec!["functions".to_string(), "delete".to_string(), name.to_string()];
        self.push_location(&mut args);
        args.push("--quiet".to_string());
        args
    }

    /// Arguments for `gcloud functions deploy`.
    pub fn deploy_args(
        &self,
        name: &str,
        environment: Environment,
        env_config: &EnvConfigRef,
        revision: Option<&str>,
    ) -> Vec<String> {
        let mut args = vec![
            "functions".to_string(),
            "deploy".to_string(),
            name.to_string(),
            "--runtime".to_string(),
            self.runtime.clone(),
        ];
        if self.trigger_http {
            args.push("--trigger-http".to_string());
        }
        if self.allow_unauthenticated {
            args.push("--allow-unauthenticated".to_string());
        }
        self.push_location(&mut args);
        args.push("--env-vars-file".to_string());
        args.push(env_config.to_string());

        let mut labels = format!("{}={}", ENVIRONMENT_LABEL, environment);
        if let Some(revision) = revision {
            labels.push_str(&format!(",{}={}", REVISION_LABEL, sanitize_label(revision)));
        }
        args.push("--update-labels".to_string());
        args.push(labels);

        if let Some(source_dir) = &self.source_dir {
            args.push("--source".to_string());
            args.push(source_dir.display().to_string());
        }
        if let Some(entry_point) = &self.entry_point {
            args.push("--entry-point".to_string());
            args.push(entry_point.clone());
        }
        args
    }

    /// Arguments for `gcloud functions describe`.
    pub fn describe_args(&self, name: &str) -> Vec<String> {
        let mut args = vec!["functions".to_string(), "describe".to_string(), name.to_string()];
        self.push_location(&mut args);
        args.push("--format".to_string());
        args.push("json".to_string());
        args
    }

    fn push_location(&self, args: &mut Vec<String>) {
        args.push("--project".to_string());
        args.push(self.project.clone());
        args.push("--region".to_string());
        args.push(self.region.clone());
    }

    fn command(&self, args: Vec<String>) -> Command {
        let mut command = Command::new(&self.gcloud);
        command.args(args);
        command
    }
}

impl FunctionService for GcloudService {
    async fn delete_function(&self, name: &str) -> Result<(), ServiceError> {
        match run_captured(self.command(self.delete_args(name)))
            .await
            .map_err(|e| classify(name, e))
        {
            Ok(_) => {
                tracing::info!(function = %name, "Deleted function");
                Ok(())
            }
            Err(ServiceError::NotFound { .. }) => {
                tracing::info!(function = %name, "No existing function to delete");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn deploy_function(
        &self,
        name: &str,
        environment: Environment,
        env_config: &EnvConfigRef,
        revision: Option<&str>,
    ) -> Result<(), ServiceError> {
        let output = run_captured(self.command(self.deploy_args(
            name,
            environment,
            env_config,
            revision,
        )))
        .await?
        .combined();
        tracing::debug!(function = %name, output = %output.trim_end(), "gcloud deploy finished");
        Ok(())
    }

    async fn describe_function(&self, name: &str) -> Result<RemoteFunctionInfo, ServiceError> {
        let output = run_captured(self.command(self.describe_args(name)))
            .await
            .map_err(|e| classify(name, e))?;
        parse_describe_output(name, &output.stdout)
    }
}

async fn resolve_setting(
    config: &ProviderConfig,
    key: &'static str,
) -> Result<String, ServiceError> {
    let mut command = Command::new(&config.gcloud_path);
    command.args(["config", "get-value", key]);

    let output = run_captured(command).await?;
    let value = output.stdout.trim();
    if value.is_empty() || value == "(unset)" {
        return Err(ServiceError::MissingSetting {
            key,
            reason: format!(
                "set provider.{} in the config file or run `gcloud config set {} ...`",
                key, key
            ),
        });
    }
    Ok(value.to_string())
}

/// Turn a failed command into `NotFound` when the provider says the function
/// itself is missing.
fn classify(name: &str, error: CommandError) -> ServiceError {
    match error {
        CommandError::Failed { output, .. } if is_not_found(name, &output) => {
            ServiceError::NotFound {
                name: name.to_string(),
                output,
            }
        }
        other => ServiceError::Command(other),
    }
}

/// A missing project or region also reports NOT_FOUND, so the error must
/// name the function resource.
fn is_not_found(name: &str, output: &str) -> bool {
    let function_resource = format!("functions/{}", name);
    let mentions_function = output.lines().any(|line| {
        line.contains(&function_resource)
            || line.contains(&format!("'{}'", name))
            || line.contains(&format!("function {} ", name))
    });
    mentions_function && (output.contains("NOT_FOUND") || output.contains("does not exist"))
}

/// Map a revision onto the provider's label charset: lowercase letters,
/// digits, `-` and `_`, at most 63 characters.
pub fn sanitize_label(value: &str) -> String {
    value
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .take(MAX_LABEL_LEN)
        .collect()
}

/// Subset of the describe JSON we read. Covers both the v1 and v2 shapes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescribeResponse {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    version_id: Option<serde_json::Value>,
    #[serde(default)]
    update_time: Option<String>,
    #[serde(default)]
    runtime: Option<String>,
    #[serde(default)]
    build_config: Option<DescribeBuildConfig>,
    #[serde(default)]
    labels: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct DescribeBuildConfig {
    #[serde(default)]
    runtime: Option<String>,
}

/// Parse `gcloud functions describe --format json` output.
pub fn parse_describe_output(
    requested: &str,
    json: &str,
) -> Result<RemoteFunctionInfo, ServiceError> {
    let malformed = |message: String| ServiceError::MalformedResponse {
        message,
        output: json.to_string(),
    };

    let response: DescribeResponse =
        serde_json::from_str(json).map_err(|e| malformed(format!("invalid JSON: {}", e)))?;

    let name = response
        .name
        .as_deref()
        .and_then(|full| full.rsplit('/').next())
        .filter(|short| !short.is_empty())
        .unwrap_or(requested)
        .to_string();

    let status = response
        .status
        .as_deref()
        .or(response.state.as_deref())
        .map(FunctionLifecycle::from_provider)
        .unwrap_or(FunctionLifecycle::Unknown);

    let version = match response.version_id {
        Some(serde_json::Value::String(v)) => v,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => response.labels.get(REVISION_LABEL).cloned().unwrap_or_default(),
    };

    let update_time = response
        .update_time
        .ok_or_else(|| malformed("missing updateTime".to_string()))?;
    let last_modified = DateTime::parse_from_rfc3339(&update_time)
        .map_err(|e| malformed(format!("invalid updateTime '{}': {}", update_time, e)))?
        .with_timezone(&Utc);

    let runtime = response
        .runtime
        .or_else(|| response.build_config.and_then(|b| b.runtime))
        .unwrap_or_default();

    let environment = response
        .labels
        .get(ENVIRONMENT_LABEL)
        .cloned()
        .unwrap_or_default();

    Ok(RemoteFunctionInfo {
        name,
        status,
        version,
        last_modified,
        runtime,
        environment,
    })
}
