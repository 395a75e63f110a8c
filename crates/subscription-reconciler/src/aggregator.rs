// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;

/// What happened to one log group during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(String),
    Removed(String),
    Failed { log_group: String, cause: String },
    SkippedQuota(String),
    /// The log group already matched the desired state
    Unchanged(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    Success,
    Warning,
    Error,
}

impl RunStatus {
    /// The status string returned to the invoker.
    pub fn message(&self) -> &'static str {
        match self {
            RunStatus::Success => "Success",
            RunStatus::Warning => "Complete with warnings. Check logs",
            RunStatus::Error => "Complete with errors. Check logs",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub failed: Vec<String>,
    pub skipped_quota: Vec<String>,
    pub unchanged: Vec<String>,
    pub status: RunStatus,
}

impl RunSummary {
    /// Summary of a run whose discovery failed before any log group was processed.
    pub fn aborted() -> Self {
        RunSummary {
            added: Vec::new(),
            removed: Vec::new(),
            failed: Vec::new(),
            skipped_quota: Vec::new(),
            unchanged: Vec::new(),
            status: RunStatus::Error,
        }
    }

    pub fn processed(&self) -> usize {
        self.added.len()
            + self.removed.len()
            + self.failed.len()
            + self.skipped_quota.len()
            + self.unchanged.len()
    }
}

/// Collects outcomes for a single run.
#[derive(Debug, Default)]
pub struct RunAggregator {
    added: Vec<String>,
    removed: Vec<String>,
    failed: Vec<String>,
    skipped_quota: Vec<String>,
    unchanged: Vec<String>,
}

impl RunAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Added(log_group) => self.added.push(log_group),
            Outcome::Removed(log_group) => self.removed.push(log_group),
            Outcome::Failed { log_group, .. } => self.failed.push(log_group),
            Outcome::SkippedQuota(log_group) => self.skipped_quota.push(log_group),
            Outcome::Unchanged(log_group) => self.unchanged.push(log_group),
        }
    }

    pub fn finalize(self) -> RunSummary {
        let status = if !self.failed.is_empty() {
            RunStatus::Error
        } else if !self.skipped_quota.is_empty() {
            RunStatus::Warning
        } else {
            RunStatus::Success
        };

        RunSummary {
            added: self.added,
            removed: self.removed,
            failed: self.failed,
            skipped_quota: self.skipped_quota,
            unchanged: self.unchanged,
            status,
        }
    }
}
