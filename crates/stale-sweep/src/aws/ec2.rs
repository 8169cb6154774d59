//! EC2 listing of idle volumes and instances

use crate::audit::operations::{InventoryOperations, ResourcePage};
use crate::aws::context::{AwsContext, FromAwsContext};
use crate::aws::regional::Regional;
use crate::aws::to_utc;
use anyhow::{Context, Result};
use aws_sdk_ec2::{
    Client,
    types::{Filter, Instance, InstanceBlockDeviceMapping, Volume},
};
use stale_sweep_common::{
    BlockDeviceMapping, CandidateResource, EbsAttachment, InstanceRecord, ResourceKind,
    VolumeRecord,
};
use tracing::debug;

/// EC2 client for one region
pub struct Ec2Inventory {
    client: Client,
}

impl FromAwsContext for Ec2Inventory {
    fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.ec2_client(),
        }
    }
}

impl Ec2Inventory {
    /// Fetch one page of resources of `kind` in an idle state
    pub async fn list_page(
        &self,
        kind: ResourceKind,
        next_token: Option<String>,
    ) -> Result<ResourcePage> {
        match kind {
            ResourceKind::Volume => self.list_volumes_page(next_token).await,
            ResourceKind::Instance => self.list_instances_page(next_token).await,
        }
    }

    async fn list_volumes_page(&self, next_token: Option<String>) -> Result<ResourcePage> {
        let response = self
            .client
            .describe_volumes()
            .filters(idle_filter(ResourceKind::Volume))
            .set_next_token(next_token)
            .send()
            .await
            .context("Failed to describe volumes")?;

        let resources = response
            .volumes()
            .iter()
            .filter_map(volume_record)
            .map(CandidateResource::from)
            .collect();

        Ok(ResourcePage {
            resources,
            next_token: response.next_token().map(|s| s.to_string()),
        })
    }

    async fn list_instances_page(&self, next_token: Option<String>) -> Result<ResourcePage> {
        let response = self
            .client
            .describe_instances()
            .filters(idle_filter(ResourceKind::Instance))
            .set_next_token(next_token)
            .send()
            .await
            .context("Failed to describe instances")?;

        let resources = response
            .reservations()
            .iter()
            .flat_map(|reservation| reservation.instances())
            .filter_map(instance_record)
            .map(CandidateResource::from)
            .collect();

        Ok(ResourcePage {
            resources,
            next_token: response.next_token().map(|s| s.to_string()),
        })
    }
}

impl InventoryOperations for Regional<Ec2Inventory> {
    async fn list_resources_page(
        &self,
        region: &str,
        kind: ResourceKind,
        next_token: Option<String>,
    ) -> Result<ResourcePage> {
        self.get(region)?.list_page(kind, next_token).await
    }
}

/// Describe filter matching the kind's idle states
fn idle_filter(kind: ResourceKind) -> Filter {
    kind.idle_states()
        .iter()
        .fold(
            Filter::builder().name(kind.state_filter_name()),
            |builder, state| builder.values(*state),
        )
        .build()
}

fn volume_record(volume: &Volume) -> Option<VolumeRecord> {
    let Some(volume_id) = volume.volume_id() else {
        debug!("Skipping volume without an id");
        return None;
    };
    let Some(create_time) = volume.create_time().and_then(to_utc) else {
        debug!(volume_id, "Skipping volume without a creation time");
        return None;
    };

    Some(VolumeRecord {
        state: volume
            .state()
            .map(|s| s.as_str().to_string())
            .unwrap_or_default(),
        volume_id: volume_id.to_string(),
        create_time,
        size: volume.size(),
        volume_type: volume.volume_type().map(|t| t.as_str().to_string()),
        availability_zone: volume.availability_zone().map(|s| s.to_string()),
    })
}

fn instance_record(instance: &Instance) -> Option<InstanceRecord> {
    let Some(instance_id) = instance.instance_id() else {
        debug!("Skipping instance without an id");
        return None;
    };
    let Some(launch_time) = instance.launch_time().and_then(to_utc) else {
        debug!(instance_id, "Skipping instance without a launch time");
        return None;
    };

    Some(InstanceRecord {
        instance_id: instance_id.to_string(),
        launch_time,
        state: instance
            .state()
            .and_then(|s| s.name())
            .map(|n| n.as_str().to_string())
            .unwrap_or_default(),
        instance_type: instance.instance_type().map(|t| t.as_str().to_string()),
        block_device_mappings: instance
            .block_device_mappings()
            .iter()
            .map(block_device_mapping)
            .collect(),
    })
}

fn block_device_mapping(mapping: &InstanceBlockDeviceMapping) -> BlockDeviceMapping {
    BlockDeviceMapping {
        device_name: mapping.device_name().map(|s| s.to_string()),
        ebs: mapping.ebs().map(|ebs| EbsAttachment {
            attach_time: ebs.attach_time().and_then(to_utc),
            delete_on_termination: ebs.delete_on_termination(),
            status: ebs.status().map(|s| s.as_str().to_string()),
            volume_id: ebs.volume_id().map(|s| s.to_string()),
        }),
    }
}
