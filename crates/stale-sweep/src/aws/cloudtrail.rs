//! CloudTrail event lookup for recent administrative activity

use crate::audit::operations::{ActivityOperations, ActivityPage};
use crate::aws::context::{AwsContext, FromAwsContext};
use crate::aws::regional::Regional;
use crate::aws::to_utc;
use anyhow::{Context, Result};
use aws_sdk_cloudtrail::{
    Client,
    primitives::DateTime as SdkDateTime,
    types::{Event, LookupAttribute, LookupAttributeKey},
};
use chrono::{DateTime, Utc};
use stale_sweep_common::defaults::LOOKUP_EVENTS_PAGE_SIZE;
use stale_sweep_common::{ActivityRecord, ActivityResource, ResourceKind};

/// CloudTrail client for one region
pub struct CloudTrailLog {
    client: Client,
}

impl FromAwsContext for CloudTrailLog {
    fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.cloudtrail_client(),
        }
    }
}

impl CloudTrailLog {
    /// Fetch one page of events referencing `kind` resources since `start_time`
    pub async fn lookup_page(
        &self,
        kind: ResourceKind,
        start_time: DateTime<Utc>,
        next_token: Option<String>,
    ) -> Result<ActivityPage> {
        let attribute = LookupAttribute::builder()
            .attribute_key(LookupAttributeKey::ResourceType)
            .attribute_value(kind.cloudtrail_type())
            .build()
            .context("Failed to build CloudTrail lookup attribute")?;

        let response = self
            .client
            .lookup_events()
            .lookup_attributes(attribute)
            .start_time(SdkDateTime::from_secs(start_time.timestamp()))
            .max_results(LOOKUP_EVENTS_PAGE_SIZE)
            .set_next_token(next_token)
            .send()
            .await
            .with_context(|| format!("Failed to look up CloudTrail events for {kind}"))?;

        Ok(ActivityPage {
            events: response.events().iter().map(activity_record).collect(),
            next_token: response.next_token().map(|s| s.to_string()),
        })
    }
}

impl ActivityOperations for Regional<CloudTrailLog> {
    async fn lookup_events_page(
        &self,
        region: &str,
        kind: ResourceKind,
        start_time: DateTime<Utc>,
        next_token: Option<String>,
    ) -> Result<ActivityPage> {
        self.get(region)?
            .lookup_page(kind, start_time, next_token)
            .await
    }
}

fn activity_record(event: &Event) -> ActivityRecord {
    ActivityRecord {
        event_id: event.event_id().map(|s| s.to_string()),
        event_name: event.event_name().map(|s| s.to_string()),
        event_time: event.event_time().and_then(to_utc),
        username: event.username().map(|s| s.to_string()),
        resources: event
            .resources()
            .iter()
            .map(|r| ActivityResource {
                resource_type: r.resource_type().map(|s| s.to_string()),
                resource_name: r.resource_name().map(|s| s.to_string()),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_cloudtrail::types::Resource;

    #[test]
    fn test_activity_record_conversion() {
        let event = Event::builder()
            .event_id("evt-1")
            .event_name("DetachVolume")
            .event_time(SdkDateTime::from_secs(1_700_000_000))
            .username("ops")
            .resources(
                Resource::builder()
                    .resource_type("AWS::EC2::Volume")
                    .resource_name("vol-0abc")
                    .build(),
            )
            .resources(
                Resource::builder()
                    .resource_type("AWS::EC2::Instance")
                    .resource_name("i-0123")
                    .build(),
            )
            .build();

        let record = activity_record(&event);
        assert_eq!(record.event_name.as_deref(), Some("DetachVolume"));
        assert_eq!(record.event_time.map(|t| t.timestamp()), Some(1_700_000_000));
        assert_eq!(
            record.resources,
            vec![
                ActivityResource::new("AWS::EC2::Volume", "vol-0abc"),
                ActivityResource::new("AWS::EC2::Instance", "i-0123"),
            ]
        );
    }

    #[test]
    fn test_event_without_resources() {
        let record = activity_record(&Event::builder().event_id("evt-2").build());
        assert!(record.resources.is_empty());
        assert!(record.event_time.is_none());
    }
}
