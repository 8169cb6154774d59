//! SNS publishing for report notifications

use crate::audit::operations::NotifyOperations;
use crate::aws::context::{AwsContext, FromAwsContext};
use anyhow::{Context, Result};
use aws_sdk_sns::Client;
use tracing::debug;

/// SNS client used to publish the stale report
pub struct SnsNotifier {
    client: Client,
}

impl FromAwsContext for SnsNotifier {
    fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.sns_client(),
        }
    }
}

impl SnsNotifier {
    /// Build a notifier in the topic's own region.
    ///
    /// Falls back to the SDK default region when the ARN has no region
    /// segment; the publish call then reports the problem.
    pub async fn for_topic(topic_arn: &str) -> Self {
        let ctx = match topic_region(topic_arn) {
            Some(region) => AwsContext::new(region).await,
            None => {
                debug!(topic_arn, "No region in topic ARN, using default region");
                AwsContext::from_default_region().await
            }
        };
        Self::from_context(&ctx)
    }

    pub async fn publish_message(&self, topic_arn: &str, message: &str) -> Result<String> {
        let response = self
            .client
            .publish()
            .topic_arn(topic_arn)
            .message(message)
            .send()
            .await
            .with_context(|| format!("Failed to publish to SNS topic {topic_arn}"))?;

        Ok(response.message_id().unwrap_or_default().to_string())
    }
}

impl NotifyOperations for SnsNotifier {
    async fn publish(&self, destination: &str, message: &str) -> Result<String> {
        self.publish_message(destination, message).await
    }
}

/// Region segment of an SNS topic ARN (`arn:aws:sns:<region>:<account>:<name>`)
pub fn topic_region(topic_arn: &str) -> Option<&str> {
    let mut parts = topic_arn.split(':');
    if parts.next() != Some("arn") {
        return None;
    }
    let _partition = parts.next()?;
    if parts.next() != Some("sns") {
        return None;
    }
    parts.next().filter(|region| !region.is_empty())
}
