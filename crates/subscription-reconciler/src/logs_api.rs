// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The provider operations the reconciler depends on.
//!
//! [`LogsApi`] is the seam between the reconciliation logic and CloudWatch Logs. The
//! production implementation lives in [`crate::cloudwatch`]; tests script their own.

use async_trait::async_trait;

/// A subscription filter attached to a log group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionFilter {
    pub filter_name: String,
    pub destination_arn: String,
}

impl SubscriptionFilter {
    pub fn new(filter_name: impl Into<String>, destination_arn: impl Into<String>) -> Self {
        Self {
            filter_name: filter_name.into(),
            destination_arn: destination_arn.into(),
        }
    }
}

/// One page of the account's log group listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogGroupPage {
    pub names: Vec<String>,
    /// Continuation token; `None` on the last page
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogsApiErrorKind {
    /// Rate-limit rejection, safe to retry after backing off
    Throttling,
    /// Anything else: permissions, validation, missing resources
    Other,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{operation} failed: {message}")]
pub struct LogsApiError {
    pub kind: LogsApiErrorKind,
    pub operation: &'static str,
    pub message: String,
}

impl LogsApiError {
    pub fn throttling(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: LogsApiErrorKind::Throttling,
            operation,
            message: message.into(),
        }
    }

    pub fn other(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: LogsApiErrorKind::Other,
            operation,
            message: message.into(),
        }
    }

    pub fn is_throttling(&self) -> bool {
        self.kind == LogsApiErrorKind::Throttling
    }
}

#[async_trait]
pub trait LogsApi: Send + Sync {
    /// Fetches one page of log groups, starting from `next_token` when given.
    async fn list_log_groups(&self, next_token: Option<String>)
        -> Result<LogGroupPage, LogsApiError>;

    async fn list_subscription_filters(
        &self,
        log_group: &str,
    ) -> Result<Vec<SubscriptionFilter>, LogsApiError>;

    /// Creates the filter, or overwrites an existing filter with the same name.
    async fn put_subscription_filter(
        &self,
        log_group: &str,
        filter_name: &str,
        destination_arn: &str,
        filter_pattern: &str,
    ) -> Result<(), LogsApiError>;

    async fn delete_subscription_filter(
        &self,
        log_group: &str,
        filter_name: &str,
    ) -> Result<(), LogsApiError>;
}
