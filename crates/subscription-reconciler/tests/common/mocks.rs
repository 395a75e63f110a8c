// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! In-memory CloudWatch Logs account for driving the reconciler in tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use subscription_reconciler::{LogGroupPage, LogsApi, LogsApiError, SubscriptionFilter};

pub const DESCRIBE_FILTERS: &str = "DescribeSubscriptionFilters";
pub const PUT_FILTER: &str = "PutSubscriptionFilter";
pub const DELETE_FILTER: &str = "DeleteSubscriptionFilter";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListLogGroups(Option<String>),
    DescribeFilters(String),
    Put {
        log_group: String,
        filter_name: String,
        destination_arn: String,
    },
    Delete {
        log_group: String,
        filter_name: String,
    },
}

#[derive(Default)]
struct MockState {
    pages: Vec<Vec<String>>,
    listing_error: Option<LogsApiError>,
    filters: HashMap<String, Vec<SubscriptionFilter>>,
    /// Errors returned, in order, before an operation on a log group succeeds
    failures: HashMap<(String, &'static str), VecDeque<LogsApiError>>,
    calls: Vec<Call>,
}

/// Mock account whose mutations update its own filter state, so repeated runs observe
/// the effect of earlier ones.
#[derive(Default)]
pub struct MockLogsApi {
    state: Mutex<MockState>,
}

impl MockLogsApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each inner vector is served as one page of the listing.
    pub fn with_pages(self, pages: Vec<Vec<&str>>) -> Self {
        self.state.lock().unwrap().pages = pages
            .into_iter()
            .map(|page| page.into_iter().map(str::to_string).collect())
            .collect();
        self
    }

    pub fn with_log_groups(self, names: Vec<&str>) -> Self {
        self.with_pages(vec![names])
    }

    pub fn with_filters(self, log_group: &str, filters: Vec<(&str, &str)>) -> Self {
        self.state.lock().unwrap().filters.insert(
            log_group.to_string(),
            filters
                .into_iter()
                .map(|(name, arn)| SubscriptionFilter::new(name, arn))
                .collect(),
        );
        self
    }

    pub fn with_listing_error(self, error: LogsApiError) -> Self {
        self.state.lock().unwrap().listing_error = Some(error);
        self
    }

    pub fn with_failures(
        self,
        log_group: &str,
        operation: &'static str,
        errors: Vec<LogsApiError>,
    ) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert((log_group.to_string(), operation), errors.into());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Put { .. } | Call::Delete { .. }))
            .collect()
    }

    pub fn filters(&self, log_group: &str) -> Vec<SubscriptionFilter> {
        self.state
            .lock()
            .unwrap()
            .filters
            .get(log_group)
            .cloned()
            .unwrap_or_default()
    }

    fn scripted_failure(
        state: &mut MockState,
        log_group: &str,
        operation: &'static str,
    ) -> Option<LogsApiError> {
        state
            .failures
            .get_mut(&(log_group.to_string(), operation))
            .and_then(VecDeque::pop_front)
    }
}

pub fn throttled(operation: &'static str, n: usize) -> Vec<LogsApiError> {
    (0..n)
        .map(|_| LogsApiError::throttling(operation, "Rate exceeded"))
        .collect()
}

#[async_trait]
impl LogsApi for MockLogsApi {
    async fn list_log_groups(
        &self,
        next_token: Option<String>,
    ) -> Result<LogGroupPage, LogsApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListLogGroups(next_token.clone()));
        if let Some(error) = state.listing_error.clone() {
            return Err(error);
        }

        let index = match next_token {
            None => 0,
            Some(token) => token
                .strip_prefix("token-")
                .and_then(|i| i.parse::<usize>().ok())
                .expect("unknown continuation token"),
        };
        let names = state.pages.get(index).cloned().unwrap_or_default();
        let next_token = (index + 1 < state.pages.len()).then(|| format!("token-{}", index + 1));
        Ok(LogGroupPage { names, next_token })
    }

    async fn list_subscription_filters(
        &self,
        log_group: &str,
    ) -> Result<Vec<SubscriptionFilter>, LogsApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DescribeFilters(log_group.to_string()));
        if let Some(error) = Self::scripted_failure(&mut state, log_group, DESCRIBE_FILTERS) {
            return Err(error);
        }
        Ok(state.filters.get(log_group).cloned().unwrap_or_default())
    }

    async fn put_subscription_filter(
        &self,
        log_group: &str,
        filter_name: &str,
        destination_arn: &str,
        _filter_pattern: &str,
    ) -> Result<(), LogsApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Put {
            log_group: log_group.to_string(),
            filter_name: filter_name.to_string(),
            destination_arn: destination_arn.to_string(),
        });
        if let Some(error) = Self::scripted_failure(&mut state, log_group, PUT_FILTER) {
            return Err(error);
        }

        let filters = state.filters.entry(log_group.to_string()).or_default();
        filters.retain(|f| f.filter_name != filter_name);
        if filters.len() >= 2 {
            return Err(LogsApiError::other(
                PUT_FILTER,
                "LimitExceededException: Resource limit exceeded.",
            ));
        }
        filters.push(SubscriptionFilter::new(filter_name, destination_arn));
        Ok(())
    }

    async fn delete_subscription_filter(
        &self,
        log_group: &str,
        filter_name: &str,
    ) -> Result<(), LogsApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Delete {
            log_group: log_group.to_string(),
            filter_name: filter_name.to_string(),
        });
        if let Some(error) = Self::scripted_failure(&mut state, log_group, DELETE_FILTER) {
            return Err(error);
        }

        let filters = state.filters.entry(log_group.to_string()).or_default();
        let before = filters.len();
        filters.retain(|f| f.filter_name != filter_name);
        if filters.len() == before {
            return Err(LogsApiError::other(
                DELETE_FILTER,
                "ResourceNotFoundException: The specified subscription filter does not exist.",
            ));
        }
        Ok(())
    }
}
