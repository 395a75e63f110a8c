// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;

use crate::catalog::{CatalogFilter, DEFAULT_LOG_GROUP_PREFIX};
use crate::decision::{Mode, ReconciliationConfig};
use crate::error::ConfigError;
use crate::executor::DEFAULT_MAX_THROTTLE_RETRIES;

const FILTER_NAME_PREFIX: &str = "LogsForSplunkForwarderLambda";
const FORWARDER_FUNCTION_PREFIX: &str = "LoggingService-SplunkForwarder";
const DEFAULT_REGION: &str = "ap-southeast-2";

/// Configuration for the reconciler, read from the function's environment
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Environment name (e.g. Dev, Prod); namespaces the filter name
    pub environment: String,
    /// ARN every managed subscription filter points at
    pub destination_arn: String,
    /// `true` detaches the managed filter, `false` attaches it
    pub remove_subscriptions: bool,
    /// Log level (e.g., trace, debug, info, warn, error)
    pub log_level: String,
    /// Pattern given to created filters; empty forwards every event
    pub filter_pattern: String,
    pub log_group_prefix: String,
    /// Throttling retries allowed across a whole run
    pub max_throttle_retries: u32,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            environment: "Dev".to_string(),
            destination_arn: String::new(),
            remove_subscriptions: false,
            log_level: "info".to_string(),
            filter_pattern: String::new(),
            log_group_prefix: DEFAULT_LOG_GROUP_PREFIX.to_string(),
            max_throttle_retries: DEFAULT_MAX_THROTTLE_RETRIES,
        }
    }
}

impl ReconcilerConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = env::var("ENV").map_err(|_| ConfigError::MissingVariable("ENV"))?;

        let remove_subscriptions = env::var("REMOVE_SUBSCRIPTIONS")
            .map_err(|_| ConfigError::MissingVariable("REMOVE_SUBSCRIPTIONS"))
            .and_then(|val| parse_bool("REMOVE_SUBSCRIPTIONS", &val))?;

        // Without an explicit ARN, point at this environment's forwarder in the same account
        let destination_arn = match env::var("DESTINATION_ARN") {
            Ok(arn) => arn,
            Err(_) => {
                let account_id = env::var("ACCOUNT_ID")
                    .map_err(|_| ConfigError::MissingVariable("DESTINATION_ARN"))?;
                let region =
                    env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string());
                format!(
                    "arn:aws:lambda:{region}:{account_id}:function:\
                     {FORWARDER_FUNCTION_PREFIX}-{environment}"
                )
            }
        };

        let log_level = env::var("LOG_LEVEL")
            .map(|val| val.to_lowercase())
            .unwrap_or_else(|_| "info".to_string());
        let filter_pattern = env::var("FILTER_PATTERN").unwrap_or_default();
        let log_group_prefix = env::var("LOG_GROUP_PREFIX")
            .unwrap_or_else(|_| DEFAULT_LOG_GROUP_PREFIX.to_string());
        let max_throttle_retries = match env::var("MAX_THROTTLE_RETRIES") {
            Ok(val) => val.trim().parse::<u32>().map_err(|_| {
                ConfigError::InvalidConfig(format!(
                    "MAX_THROTTLE_RETRIES must be a non-negative integer, got '{val}'"
                ))
            })?,
            Err(_) => DEFAULT_MAX_THROTTLE_RETRIES,
        };

        let config = Self {
            environment,
            destination_arn,
            remove_subscriptions,
            log_level,
            filter_pattern,
            log_group_prefix,
            max_throttle_retries,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment.trim().is_empty() {
            return Err(ConfigError::InvalidConfig("ENV cannot be empty".to_string()));
        }

        if self.destination_arn.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "DESTINATION_ARN cannot be empty".to_string(),
            ));
        }

        if self.log_group_prefix.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "LOG_GROUP_PREFIX cannot be empty".to_string(),
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidConfig(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }

    pub fn filter_name(&self) -> String {
        format!("{FILTER_NAME_PREFIX}-{}", self.environment)
    }

    pub fn mode(&self) -> Mode {
        if self.remove_subscriptions {
            Mode::Detach
        } else {
            Mode::Attach
        }
    }

    pub fn reconciliation_config(&self) -> ReconciliationConfig {
        ReconciliationConfig {
            desired_destination_arn: self.destination_arn.clone(),
            mode: self.mode(),
            filter_name: self.filter_name(),
            filter_pattern: self.filter_pattern.clone(),
        }
    }

    pub fn catalog_filter(&self) -> CatalogFilter {
        CatalogFilter {
            prefix: self.log_group_prefix.clone(),
            ..Default::default()
        }
    }
}

fn parse_bool(name: &str, val: &str) -> Result<bool, ConfigError> {
    match val.trim().to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ConfigError::InvalidConfig(format!(
            "{name} must be 'true' or 'false', got '{other}'"
        ))),
    }
}
