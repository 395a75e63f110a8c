// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::sync::Arc;

use anyhow::{anyhow, Context};
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use tracing::{debug, error};

use subscription_reconciler::{
    cloudwatch::CloudWatchLogsApi, handle_invocation, logger, InvocationContext,
    InvocationResponse, Reconciler, ReconcilerConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match ReconcilerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            // the subscriber is not installed yet
            eprintln!("Error creating config on subscription reconciler startup: {e}");
            return Err(e.into());
        }
    };

    logger::init(&config.log_level).map_err(|e| anyhow!("could not initialize logging: {e}"))?;
    debug!("Logging subsystem enabled");

    let api = Arc::new(CloudWatchLogsApi::from_env().await);
    let reconciler = Arc::new(
        Reconciler::new(api, config.catalog_filter())
            .with_max_throttle_retries(config.max_throttle_retries),
    );
    let reconciliation_config = Arc::new(config.reconciliation_config());

    let result = lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let reconciler = Arc::clone(&reconciler);
        let reconciliation_config = Arc::clone(&reconciliation_config);
        async move {
            let (payload, context) = event.into_parts();
            let invocation = InvocationContext {
                request_id: context.request_id,
                trace_id: context.xray_trace_id,
            };
            let response =
                handle_invocation(&reconciler, &reconciliation_config, payload, invocation).await;
            Ok::<InvocationResponse, lambda_runtime::Error>(response)
        }
    }))
    .await;

    if let Err(e) = &result {
        error!("Lambda runtime exited with error: {e}");
    }
    result
        .map_err(|e| anyhow!(e))
        .context("subscription reconciler runtime failed")
}
