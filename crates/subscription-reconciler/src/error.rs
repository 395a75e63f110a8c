// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::logs_api::LogsApiError;

/// Errors raised while building the reconciler configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing required environment variable: {0}")]
    MissingVariable(&'static str),
}

/// Errors that abort log group discovery, and with it the whole run
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Failed to list log groups: {0}")]
    Listing(#[from] LogsApiError),
}
