// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `cloudfn describe` command - Show the live state of a function.
//!
//! The name is checked before provider settings are resolved, so an empty
//! name never reaches `gcloud`.

use cloudfn_core::{
    validate_function_name, CloudFnResult, Config, DescriptionFetcher, FunctionStatus,
    GcloudService,
};

pub async fn execute(config: &Config, function: &str, json: bool) -> CloudFnResult<()> {
    validate_function_name(function)?;
    tracing::info!(function = %function, "Getting function details");

    let service = GcloudService::from_config(&config.provider).await?;
    let status = DescriptionFetcher::new(service).describe(function).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print!("{}", render(&status));
    }
    Ok(())
}

fn render(status: &FunctionStatus) -> String {
    let environment = if status.environment.is_empty() {
        "(unset)"
    } else {
        status.environment.as_str()
    };
    let version = if status.version.is_empty() {
        "(unset)"
    } else {
        status.version.as_str()
    };

    format!(
        "Function:       {}\n\
         Status:         {}\n\
         Version:        {}\n\
         Last Modified:  {}\n\
         Runtime:        {}\n\
         Environment:    {}\n",
        status.name,
        status.status,
        version,
        status.last_modified.to_rfc3339(),
        status.runtime,
        environment
    )
}
