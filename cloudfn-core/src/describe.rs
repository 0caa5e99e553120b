// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Description fetcher.
//!
//! One fresh provider read per call, mapped field-for-field into
//! [`FunctionStatus`]. No caching, no retry.

use crate::error::{DescribeError, ServiceError};
use crate::service::{FunctionService, RemoteFunctionInfo};
use crate::types::FunctionStatus;

/// Queries the provider for the live state of a function.
#[derive(Debug)]
pub struct DescriptionFetcher<S> {
    service: S,
}

impl<S: FunctionService> DescriptionFetcher<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub async fn describe(&self, function: &str) -> Result<FunctionStatus, DescribeError> {
        validate_function_name(function)?;
        tracing::debug!(function = %function, "Describing function");

        match self.service.describe_function(function).await {
            Ok(info) => Ok(info.into()),
            Err(ServiceError::NotFound { output, .. }) => Err(DescribeError::NotFound {
                function: function.to_string(),
                diagnostic: output,
            }),
            Err(source) => Err(DescribeError::DescribeFailed {
                function: function.to_string(),
                source,
            }),
        }
    }
}

/// Local check on a describe target, no I/O.
pub fn validate_function_name(function: &str) -> Result<(), DescribeError> {
    if function.is_empty() {
        return Err(DescribeError::InvalidInput {
            field: "function",
            reason: "Function name cannot be empty".to_string(),
        });
    }
    Ok(())
}

impl From<RemoteFunctionInfo> for FunctionStatus {
    fn from(info: RemoteFunctionInfo) -> Self {
        Self {
            name: info.name,
            status: info.status,
            version: info.version,
            last_modified: info.last_modified,
            runtime: info.runtime,
            environment: info.environment,
        }
    }
}
