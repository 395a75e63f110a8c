// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Applies reconciliation actions to log groups.
//!
//! Every provider call made on behalf of a log group goes through [`with_throttle_retry`],
//! which retries throttled calls with exponential backoff. The retry budget is owned by
//! the run and shared by every log group in it, so sustained throttling on one log group
//! leaves fewer retries for the ones after it.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::aggregator::Outcome;
use crate::decision::{Action, ReconciliationConfig};
use crate::logs_api::{LogsApi, LogsApiError};

pub const DEFAULT_MAX_THROTTLE_RETRIES: u32 = 15;

/// Run-wide count of throttling retries.
#[derive(Debug)]
pub struct RetryBudget {
    used: u32,
    max: u32,
}

impl RetryBudget {
    pub fn new(max: u32) -> Self {
        RetryBudget { used: 0, max }
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.max
    }

    /// Counts one throttled call. Returns the delay to wait before retrying, or `None`
    /// once the budget is spent.
    fn record_throttle(&mut self) -> Option<Duration> {
        self.used = self.used.saturating_add(1);
        if self.used < self.max {
            Some(backoff_for_attempt(self.used))
        } else {
            None
        }
    }
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_THROTTLE_RETRIES)
    }
}

/// `2^attempt` seconds, no jitter and no cap.
pub fn backoff_for_attempt(attempt: u32) -> Duration {
    Duration::from_secs(2_u64.saturating_pow(attempt))
}

/// Runs `operation`, retrying it while it fails with throttling and `budget` allows.
/// Non-throttling failures are returned immediately.
pub async fn with_throttle_retry<T, F, Fut>(
    budget: &mut RetryBudget,
    log_group: &str,
    mut operation: F,
) -> Result<T, LogsApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LogsApiError>>,
{
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_throttling() => err,
            Err(err) => return Err(err),
        };

        match budget.record_throttle() {
            Some(delay) => {
                warn!(
                    "{} throttled for {log_group}. Retrying in {}s (retry count: {}/{})",
                    err.operation,
                    delay.as_secs(),
                    budget.used(),
                    budget.max()
                );
                tokio::time::sleep(delay).await;
            }
            None => {
                error!(
                    "{} throttled for {log_group} and the retry budget is exhausted ({}/{})",
                    err.operation,
                    budget.used(),
                    budget.max()
                );
                return Err(err);
            }
        }
    }
}

/// Performs create and delete actions against the provider.
pub struct MutationExecutor<'a> {
    api: &'a dyn LogsApi,
    config: &'a ReconciliationConfig,
}

impl<'a> MutationExecutor<'a> {
    pub fn new(api: &'a dyn LogsApi, config: &'a ReconciliationConfig) -> Self {
        MutationExecutor { api, config }
    }

    pub async fn execute(
        &self,
        action: &Action,
        log_group: &str,
        budget: &mut RetryBudget,
    ) -> Outcome {
        let api = self.api;
        let config = self.config;
        match action {
            Action::CreateFilter => {
                let result = with_throttle_retry(budget, log_group, move || {
                    api.put_subscription_filter(
                        log_group,
                        &config.filter_name,
                        &config.desired_destination_arn,
                        &config.filter_pattern,
                    )
                })
                .await;
                match result {
                    Ok(()) => {
                        info!("Created subscription filter for log group '{log_group}'");
                        Outcome::Added(log_group.to_string())
                    }
                    Err(e) => {
                        error!(
                            "Error creating subscription filter for log group '{log_group}': {e}"
                        );
                        Outcome::Failed {
                            log_group: log_group.to_string(),
                            cause: e.to_string(),
                        }
                    }
                }
            }
            Action::DeleteFilter { filter_name } => {
                let result = with_throttle_retry(budget, log_group, move || {
                    api.delete_subscription_filter(log_group, filter_name)
                })
                .await;
                match result {
                    Ok(()) => {
                        info!("Removed subscription filter '{filter_name}' from '{log_group}'");
                        Outcome::Removed(log_group.to_string())
                    }
                    Err(e) => {
                        error!(
                            "Error removing subscription filter from log group '{log_group}': {e}"
                        );
                        Outcome::Failed {
                            log_group: log_group.to_string(),
                            cause: e.to_string(),
                        }
                    }
                }
            }
            Action::SkipQuotaExceeded => {
                warn!(
                    "Log group {log_group} already has two subscription filters. \
                     One filter needs to be removed to add the {} filter.",
                    config.filter_name
                );
                Outcome::SkippedQuota(log_group.to_string())
            }
            Action::NoOpAlreadyConverged => {
                debug!("Log group {log_group} already converged");
                Outcome::Unchanged(log_group.to_string())
            }
        }
    }
}
