// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Reconciles CloudWatch Logs subscription filters across an account.
//!
//! A run lists every candidate log group, compares its subscription filters against a
//! single desired filter, and creates or deletes that filter so the account converges.
//! Nothing is persisted between runs; each run rediscovers the account from scratch.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod aggregator;
pub mod catalog;
pub mod cloudwatch;
pub mod config;
pub mod decision;
pub mod error;
pub mod executor;
pub mod handler;
pub mod inspector;
pub mod logger;
pub mod logs_api;
pub mod orchestrator;

pub use aggregator::{Outcome, RunStatus, RunSummary};
pub use config::ReconcilerConfig;
pub use decision::{Action, Mode, ReconciliationConfig};
pub use error::{ConfigError, DiscoveryError};
pub use handler::{handle_invocation, InvocationResponse};
pub use logs_api::{LogGroupPage, LogsApi, LogsApiError, SubscriptionFilter};
pub use orchestrator::{InvocationContext, Reconciler};
