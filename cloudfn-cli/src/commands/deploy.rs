// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `cloudfn deploy` command - Build and deploy a function.
//!
//! Validates the request before resolving provider settings, so a bad
//! environment never reaches `gcloud`.

use cloudfn_core::{
    CloudFnResult, CommandToolchain, Config, Deployer, DeploymentRequest, GcloudService,
};

pub async fn execute(config: &Config, request: &DeploymentRequest) -> CloudFnResult<()> {
    let environment = request.validate()?;

    println!(
        "Deploying function '{}' to {} environment",
        request.function, environment
    );
    if let Some(revision) = &request.revision {
        println!("Using revision: {}", revision);
    }
    if request.clean {
        println!("Cleaning and rebuilding before deployment...");
    }

    let service = GcloudService::from_config(&config.provider).await?;
    tracing::debug!(project = %service.project(), region = %service.region(), "Using provider");

    let deployer = Deployer::new(service, CommandToolchain::new(&config.build))
        .with_env_configs(config.environments.clone());
    deployer.deploy(request).await?;

    println!(
        "✓ Function '{}' deployed to {}",
        request.function, environment
    );
    Ok(())
}
