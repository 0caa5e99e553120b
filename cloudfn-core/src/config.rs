// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML tool configuration with strict validation.
//!
//! Settings for the provider CLI, the build command and the per-environment
//! env-vars files. Every field has a default, so the tool runs without a
//! config file; any value that is present must validate or loading fails.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::environment::Environment;
use crate::error::{ConfigError, ConfigResult};
use crate::service::EnvConfigRef;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "cloudfn.yaml";

/// Raw provider settings as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
struct RawProviderConfig {
    #[serde(default)]
    project: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default = "default_runtime")]
    runtime: String,
    #[serde(default = "default_true")]
    trigger_http: bool,
    #[serde(default = "default_true")]
    allow_unauthenticated: bool,
    #[serde(default)]
    source_dir: Option<String>,
    #[serde(default)]
    entry_point: Option<String>,
    #[serde(default = "default_gcloud_path")]
    gcloud_path: String,
}

fn default_runtime() -> String {
    "go121".to_string()
}

fn default_true() -> bool {
    true
}

fn default_gcloud_path() -> String {
    "gcloud".to_string()
}

impl Default for RawProviderConfig {
    fn default() -> Self {
        Self {
            project: None,
            region: None,
            runtime: default_runtime(),
            trigger_http: true,
            allow_unauthenticated: true,
            source_dir: None,
            entry_point: None,
            gcloud_path: default_gcloud_path(),
        }
    }
}

/// Raw build settings.
#[derive(Debug, Deserialize)]
struct RawBuildConfig {
    #[serde(default = "default_build_command")]
    command: Vec<String>,
    #[serde(default)]
    working_dir: Option<String>,
}

fn default_build_command() -> Vec<String> {
    ["go", "build", "-o", "function", "./cmd/function"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for RawBuildConfig {
    fn default() -> Self {
        Self {
            command: default_build_command(),
            working_dir: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawEnvironmentConfig {
    env_file: String,
}

/// Raw root configuration file.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    provider: RawProviderConfig,
    #[serde(default)]
    build: RawBuildConfig,
    #[serde(default)]
    environments: HashMap<String, RawEnvironmentConfig>,
}

/// Validated provider settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Project id; resolved from the provider CLI when absent.
    pub project: Option<String>,
    /// Region; resolved from the provider CLI when absent.
    pub region: Option<String>,
    pub runtime: String,
    pub trigger_http: bool,
    pub allow_unauthenticated: bool,
    pub source_dir: Option<PathBuf>,
    pub entry_point: Option<String>,
    pub gcloud_path: PathBuf,
}

/// Validated build command.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

/// Complete validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderConfig,
    pub build: BuildConfig,
    /// Env-vars file overrides; environments not listed use `env.<name>.yaml`.
    pub environments: HashMap<Environment, EnvConfigRef>,
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the configuration the CLI should use.
    ///
    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// read if present and built-in defaults apply otherwise.
    pub fn load(path: Option<&Path>) -> ConfigResult<Config> {
        match path {
            Some(path) => Self::load_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load_file(DEFAULT_CONFIG_FILE),
            None => {
                tracing::debug!("No configuration file, using defaults");
                Self::validate(RawConfig::default())
            }
        }
    }

    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> ConfigResult<Config> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            context: "reading config file",
            source: e,
        })?;

        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Self::load_string(&content)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> ConfigResult<Config> {
        if content.trim().is_empty() {
            return Self::validate(RawConfig::default());
        }

        let raw: RawConfig = serde_yaml::from_str(content).map_err(|e| ConfigError::ConfigParse {
            message: format!("YAML parse error: {}", e),
        })?;

        Self::validate(raw)
    }

    /// Validate raw configuration and convert to validated types.
    fn validate(raw: RawConfig) -> ConfigResult<Config> {
        let provider = Self::validate_provider(raw.provider)?;
        let build = Self::validate_build(raw.build)?;

        let mut environments = HashMap::with_capacity(raw.environments.len());
        for (name, raw_env) in raw.environments {
            let env: Environment = name.parse().map_err(|_| ConfigError::InvalidFieldValue {
                field: "environments",
                value: name.clone(),
                reason: "Environment must be one of: sandbox, dev, pro".to_string(),
            })?;

            if raw_env.env_file.trim().is_empty() {
                return Err(ConfigError::InvalidFieldValue {
                    field: "env_file",
                    value: format!("empty path for environment {}", env),
                    reason: "Env file path cannot be empty".to_string(),
                });
            }

            environments.insert(env, EnvConfigRef::new(raw_env.env_file));
        }

        Ok(Config {
            provider,
            build,
            environments,
        })
    }

    fn validate_provider(raw: RawProviderConfig) -> ConfigResult<ProviderConfig> {
        let project = non_empty_optional("project", raw.project)?;
        let region = non_empty_optional("region", raw.region)?;
        let entry_point = non_empty_optional("entry_point", raw.entry_point)?;

        if raw.runtime.trim().is_empty() {
            return Err(ConfigError::InvalidFieldValue {
                field: "runtime",
                value: raw.runtime,
                reason: "Runtime identifier cannot be empty".to_string(),
            });
        }

        if raw.gcloud_path.trim().is_empty() {
            return Err(ConfigError::InvalidFieldValue {
                field: "gcloud_path",
                value: raw.gcloud_path,
                reason: "Provider CLI path cannot be empty".to_string(),
            });
        }

        Ok(ProviderConfig {
            project,
            region,
            runtime: raw.runtime,
            trigger_http: raw.trigger_http,
            allow_unauthenticated: raw.allow_unauthenticated,
            source_dir: raw.source_dir.map(PathBuf::from),
            entry_point,
            gcloud_path: PathBuf::from(raw.gcloud_path),
        })
    }

    fn validate_build(raw: RawBuildConfig) -> ConfigResult<BuildConfig> {
        let mut command = raw.command.into_iter();
        let program = match command.next() {
            Some(program) if !program.trim().is_empty() => program,
            _ => {
                return Err(ConfigError::InvalidFieldValue {
                    field: "build.command",
                    value: "[]".to_string(),
                    reason: "Build command must name a program".to_string(),
                })
            }
        };

        Ok(BuildConfig {
            program,
            args: command.collect(),
            working_dir: raw.working_dir.map(PathBuf::from),
        })
    }
}

fn non_empty_optional(field: &'static str, value: Option<String>) -> ConfigResult<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => Err(ConfigError::InvalidFieldValue {
            field,
            value: v,
            reason: "Value cannot be empty when set".to_string(),
        }),
        other => Ok(other),
    }
}
