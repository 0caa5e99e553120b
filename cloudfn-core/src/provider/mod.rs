// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Concrete collaborators backed by external commands.
//!
//! - [`GcloudService`]: provider control plane through the `gcloud` CLI.
//! - [`CommandToolchain`]: local build through a configured command.

mod gcloud;
mod process;
mod toolchain;

pub use gcloud::{parse_describe_output, sanitize_label, GcloudService};
pub use toolchain::{CommandToolchain, BUILD_TARGET_ENV};
