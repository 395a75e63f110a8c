// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Drives one reconciliation run.
//!
//! A run discovers every candidate log group first, then processes them one at a time in
//! discovery order: inspect, decide, execute, record. A discovery failure ends the run
//! before any log group is touched; a failure on one log group only affects that log group.

use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};

use crate::aggregator::{Outcome, RunAggregator, RunStatus, RunSummary};
use crate::catalog::{CatalogFilter, LogGroupCatalog};
use crate::decision::{decide, ReconciliationConfig};
use crate::executor::{
    with_throttle_retry, MutationExecutor, RetryBudget, DEFAULT_MAX_THROTTLE_RETRIES,
};
use crate::inspector;
use crate::logs_api::LogsApi;

/// Identifiers of the invocation that triggered a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationContext {
    pub request_id: String,
    pub trace_id: Option<String>,
}

/// State owned by a single run. Built fresh by [`Reconciler::run`] and never shared.
struct RunContext {
    budget: RetryBudget,
    aggregator: RunAggregator,
    span: Span,
}

impl RunContext {
    fn new(max_throttle_retries: u32, invocation: &InvocationContext) -> Self {
        let span = info_span!(
            "reconcile",
            request_id = %invocation.request_id,
            trace_id = invocation.trace_id.as_deref().unwrap_or("-"),
        );
        RunContext {
            budget: RetryBudget::new(max_throttle_retries),
            aggregator: RunAggregator::new(),
            span,
        }
    }
}

pub struct Reconciler {
    api: Arc<dyn LogsApi>,
    catalog_filter: CatalogFilter,
    max_throttle_retries: u32,
}

impl Reconciler {
    pub fn new(api: Arc<dyn LogsApi>, catalog_filter: CatalogFilter) -> Self {
        Reconciler {
            api,
            catalog_filter,
            max_throttle_retries: DEFAULT_MAX_THROTTLE_RETRIES,
        }
    }

    #[must_use]
    pub fn with_max_throttle_retries(mut self, max_throttle_retries: u32) -> Self {
        self.max_throttle_retries = max_throttle_retries;
        self
    }

    pub async fn run(
        &self,
        config: &ReconciliationConfig,
        invocation: &InvocationContext,
    ) -> RunSummary {
        let mut ctx = RunContext::new(self.max_throttle_retries, invocation);
        let span = ctx.span.clone();
        self.run_with_context(config, &mut ctx).instrument(span).await
    }

    async fn run_with_context(
        &self,
        config: &ReconciliationConfig,
        ctx: &mut RunContext,
    ) -> RunSummary {
        info!(
            "Starting reconciliation in {:?} mode for destination {}",
            config.mode, config.desired_destination_arn
        );

        let catalog = LogGroupCatalog::new(self.api.as_ref(), &self.catalog_filter);
        let log_groups = match catalog.collect_candidates().await {
            Ok(log_groups) => log_groups,
            Err(e) => {
                error!("{e}. No log groups were processed");
                return RunSummary::aborted();
            }
        };
        info!("Found {} log groups to check subscriptions for", log_groups.len());

        let executor = MutationExecutor::new(self.api.as_ref(), config);
        for log_group in &log_groups {
            let span = info_span!(parent: &ctx.span, "log_group", name = %log_group);
            let outcome = self
                .reconcile_log_group(config, &executor, &mut ctx.budget, log_group)
                .instrument(span)
                .await;
            ctx.aggregator.record(outcome);
        }

        let aggregator = std::mem::take(&mut ctx.aggregator);
        let summary = aggregator.finalize();
        log_summary(&summary, &ctx.budget);
        summary
    }

    async fn reconcile_log_group(
        &self,
        config: &ReconciliationConfig,
        executor: &MutationExecutor<'_>,
        budget: &mut RetryBudget,
        log_group: &str,
    ) -> Outcome {
        let api = self.api.as_ref();
        let filters = match with_throttle_retry(budget, log_group, move || {
            inspector::describe_filters(api, log_group)
        })
        .await
        {
            Ok(filters) => filters,
            Err(e) => {
                error!("Error describing subscription filters for log group '{log_group}': {e}");
                return Outcome::Failed {
                    log_group: log_group.to_string(),
                    cause: e.to_string(),
                };
            }
        };

        let action = decide(&filters, config);
        debug!("Decided {action:?} for {log_group}");
        executor.execute(&action, log_group, budget).await
    }
}

fn log_summary(summary: &RunSummary, budget: &RetryBudget) {
    info!(
        "Processed {} log groups: added subscription filters to {}, removed from {}, {} unchanged",
        summary.processed(),
        summary.added.len(),
        summary.removed.len(),
        summary.unchanged.len()
    );
    if budget.is_exhausted() {
        warn!("Throttling retry budget exhausted ({}/{})", budget.used(), budget.max());
    } else if budget.used() > 0 {
        info!("Used {}/{} throttling retries", budget.used(), budget.max());
    }
    if !summary.skipped_quota.is_empty() {
        warn!(
            "Skipped {} log groups already at the subscription filter quota: {:?}",
            summary.skipped_quota.len(),
            summary.skipped_quota
        );
    }
    if !summary.failed.is_empty() {
        error!(
            "Failed to reconcile {} log groups: {:?}",
            summary.failed.len(),
            summary.failed
        );
    }
    match summary.status {
        RunStatus::Success => info!("Reconciliation completed successfully"),
        RunStatus::Warning | RunStatus::Error => {
            warn!("Reconciliation finished: {}", summary.status.message())
        }
    }
}
