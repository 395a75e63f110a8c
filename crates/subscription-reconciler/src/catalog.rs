// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Discovery of the log groups the reconciler manages.
//!
//! The catalog walks the account's full log group listing page by page and yields only
//! candidate names. Listing failures end discovery; they are never retried here.

use std::collections::VecDeque;
use tracing::debug;

use crate::error::DiscoveryError;
use crate::logs_api::LogsApi;

pub const DEFAULT_LOG_GROUP_PREFIX: &str = "/aws/lambda/";
/// The log forwarding function the filters point at
pub const FORWARDER_EXCLUSION: &str = "LoggingService-SplunkForwarder";
/// The reconciler's own function
pub const RECONCILER_EXCLUSION: &str = "LoggingService-SubscriptionFilterHandler";

/// Which log group names count as candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFilter {
    pub prefix: String,
    /// Names containing any of these substrings are skipped
    pub exclusions: Vec<String>,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_LOG_GROUP_PREFIX.to_string(),
            exclusions: vec![
                FORWARDER_EXCLUSION.to_string(),
                RECONCILER_EXCLUSION.to_string(),
            ],
        }
    }
}

impl CatalogFilter {
    pub fn is_candidate(&self, name: &str) -> bool {
        name.starts_with(&self.prefix)
            && !self
                .exclusions
                .iter()
                .any(|exclusion| name.contains(exclusion.as_str()))
    }
}

/// Lazy, single-pass iterator over candidate log group names.
pub struct LogGroupCatalog<'a> {
    api: &'a dyn LogsApi,
    filter: &'a CatalogFilter,
    buffered: VecDeque<String>,
    next_token: Option<String>,
    exhausted: bool,
    pages_fetched: usize,
}

impl<'a> LogGroupCatalog<'a> {
    pub fn new(api: &'a dyn LogsApi, filter: &'a CatalogFilter) -> Self {
        LogGroupCatalog {
            api,
            filter,
            buffered: VecDeque::new(),
            next_token: None,
            exhausted: false,
            pages_fetched: 0,
        }
    }

    /// Returns the next candidate, fetching further pages as needed. `Ok(None)` once the
    /// provider stops returning a continuation token and the buffer is drained.
    pub async fn next_log_group(&mut self) -> Result<Option<String>, DiscoveryError> {
        loop {
            if let Some(name) = self.buffered.pop_front() {
                return Ok(Some(name));
            }
            if self.exhausted {
                return Ok(None);
            }

            let page = self.api.list_log_groups(self.next_token.take()).await?;
            self.pages_fetched += 1;

            let filter = self.filter;
            let before = self.buffered.len();
            self.buffered.extend(
                page.names
                    .into_iter()
                    .filter(|name| filter.is_candidate(name)),
            );
            debug!(
                "Fetched log group page {} with {} candidates",
                self.pages_fetched,
                self.buffered.len() - before
            );

            match page.next_token {
                Some(token) => self.next_token = Some(token),
                None => self.exhausted = true,
            }
        }
    }

    /// Drains the catalog. Any listing error discards everything collected so far.
    pub async fn collect_candidates(mut self) -> Result<Vec<String>, DiscoveryError> {
        let mut candidates = Vec::new();
        while let Some(name) = self.next_log_group().await? {
            candidates.push(name);
        }
        debug!(
            "Discovery read {} pages and found {} candidates",
            self.pages_fetched(),
            candidates.len()
        );
        Ok(candidates)
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}
