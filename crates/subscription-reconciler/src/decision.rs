// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::logs_api::SubscriptionFilter;

/// CloudWatch Logs allows at most two subscription filters per log group.
pub const MAX_FILTERS_PER_LOG_GROUP: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Attach,
    Detach,
}

/// Desired state for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationConfig {
    pub desired_destination_arn: String,
    pub mode: Mode,
    pub filter_name: String,
    pub filter_pattern: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CreateFilter,
    /// Delete the filter currently pointing at the desired destination
    DeleteFilter { filter_name: String },
    SkipQuotaExceeded,
    NoOpAlreadyConverged,
}

/// Maps the filters a log group has today onto the single action that converges it.
///
/// Filters are matched on destination ARN only. Two filters with the same destination
/// but different names are indistinguishable here.
pub fn decide(existing: &[SubscriptionFilter], config: &ReconciliationConfig) -> Action {
    let matching = existing
        .iter()
        .find(|filter| filter.destination_arn == config.desired_destination_arn);

    match (config.mode, matching) {
        (Mode::Detach, Some(filter)) => Action::DeleteFilter {
            filter_name: filter.filter_name.clone(),
        },
        (Mode::Detach, None) | (Mode::Attach, Some(_)) => Action::NoOpAlreadyConverged,
        (Mode::Attach, None) if existing.len() < MAX_FILTERS_PER_LOG_GROUP => {
            Action::CreateFilter
        }
        (Mode::Attach, None) => Action::SkipQuotaExceeded,
    }
}
