// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decision::ReconciliationConfig;
use crate::orchestrator::{InvocationContext, Reconciler};

/// Body returned to the invoker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    pub status: String,
}

/// Runs one reconciliation. The trigger event only starts the run; its contents are ignored.
pub async fn handle_invocation(
    reconciler: &Reconciler,
    config: &ReconciliationConfig,
    _event: serde_json::Value,
    context: InvocationContext,
) -> InvocationResponse {
    let summary = reconciler.run(config, &context).await;
    match serde_json::to_string(&summary) {
        Ok(json) => debug!("Run summary for request {}: {json}", context.request_id),
        Err(e) => debug!("Could not serialize run summary for request {}: {e}", context.request_id),
    }
    InvocationResponse {
        status: summary.status.message().to_string(),
    }
}
