// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use tracing::debug;

use crate::logs_api::{LogsApi, LogsApiError, SubscriptionFilter};

/// Reads the subscription filters currently attached to `log_group`.
pub async fn describe_filters(
    api: &dyn LogsApi,
    log_group: &str,
) -> Result<Vec<SubscriptionFilter>, LogsApiError> {
    let filters = api.list_subscription_filters(log_group).await?;
    debug!("{log_group} has {} subscription filter(s)", filters.len());
    Ok(filters)
}
