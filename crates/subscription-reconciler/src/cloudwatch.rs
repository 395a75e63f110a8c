// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use aws_config::{retry::RetryConfig, BehaviorVersion, ConfigLoader};
use aws_sdk_cloudwatchlogs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudwatchlogs::Client;
use std::fmt::Debug;
use tracing::debug;

use crate::logs_api::{LogGroupPage, LogsApi, LogsApiError, SubscriptionFilter};

const THROTTLING_ERROR_CODE: &str = "ThrottlingException";

/// [`LogsApi`] backed by the AWS SDK CloudWatch Logs client
#[derive(Debug, Clone)]
pub struct CloudWatchLogsApi {
    client: Client,
}

impl CloudWatchLogsApi {
    pub fn new(client: Client) -> Self {
        CloudWatchLogsApi { client }
    }

    /// Builds a client from the default credential and region chain.
    pub async fn from_env() -> Self {
        let sdk_config = sdk_config_loader().load().await;
        debug!("Loaded AWS config for region {:?}", sdk_config.region());
        Self::new(Client::new(&sdk_config))
    }
}

/// Default AWS config with SDK retries turned off. Throttling is retried only by the
/// executor against the run's budget, and discovery is never retried.
pub fn sdk_config_loader() -> ConfigLoader {
    aws_config::defaults(BehaviorVersion::latest()).retry_config(RetryConfig::disabled())
}

fn map_sdk_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> LogsApiError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: Debug,
{
    let is_throttling = err.code() == Some(THROTTLING_ERROR_CODE);
    let message = DisplayErrorContext(&err).to_string();
    if is_throttling {
        LogsApiError::throttling(operation, message)
    } else {
        LogsApiError::other(operation, message)
    }
}

#[async_trait]
impl LogsApi for CloudWatchLogsApi {
    async fn list_log_groups(
        &self,
        next_token: Option<String>,
    ) -> Result<LogGroupPage, LogsApiError> {
        let output = self
            .client
            .describe_log_groups()
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| map_sdk_error("DescribeLogGroups", e))?;

        let names = output
            .log_groups()
            .iter()
            .filter_map(|group| group.log_group_name().map(str::to_string))
            .collect();

        Ok(LogGroupPage {
            names,
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn list_subscription_filters(
        &self,
        log_group: &str,
    ) -> Result<Vec<SubscriptionFilter>, LogsApiError> {
        let output = self
            .client
            .describe_subscription_filters()
            .log_group_name(log_group)
            .send()
            .await
            .map_err(|e| map_sdk_error("DescribeSubscriptionFilters", e))?;

        Ok(output
            .subscription_filters()
            .iter()
            .map(|filter| SubscriptionFilter {
                filter_name: filter.filter_name().unwrap_or_default().to_string(),
                destination_arn: filter.destination_arn().unwrap_or_default().to_string(),
            })
            .collect())
    }

    async fn put_subscription_filter(
        &self,
        log_group: &str,
        filter_name: &str,
        destination_arn: &str,
        filter_pattern: &str,
    ) -> Result<(), LogsApiError> {
        self.client
            .put_subscription_filter()
            .log_group_name(log_group)
            .filter_name(filter_name)
            .filter_pattern(filter_pattern)
            .destination_arn(destination_arn)
            .send()
            .await
            .map_err(|e| map_sdk_error("PutSubscriptionFilter", e))?;
        Ok(())
    }

    async fn delete_subscription_filter(
        &self,
        log_group: &str,
        filter_name: &str,
    ) -> Result<(), LogsApiError> {
        self.client
            .delete_subscription_filter()
            .log_group_name(log_group)
            .filter_name(filter_name)
            .send()
            .await
            .map_err(|e| map_sdk_error("DeleteSubscriptionFilter", e))?;
        Ok(())
    }
}
