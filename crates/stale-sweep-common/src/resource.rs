//! Candidate resource records
//!
//! Records are built by the enumerator from EC2 describe responses and are
//! not modified afterwards. Field names follow the EC2 API so the report reads
//! like the console/CLI output operators already know.

use crate::ResourceKind;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Unattached EBS volume
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VolumeRecord {
    pub state: String,
    pub volume_id: String,
    pub create_time: DateTime<Utc>,
    /// Size in GiB
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
}

/// Device attached to an instance, shaped like EC2's `BlockDeviceMappings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlockDeviceMapping {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebs: Option<EbsAttachment>,
}

/// EBS side of a block device mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EbsAttachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attach_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_on_termination: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_id: Option<String>,
}

/// Running or stopped EC2 instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceRecord {
    pub instance_id: String,
    pub launch_time: DateTime<Utc>,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    pub block_device_mappings: Vec<BlockDeviceMapping>,
}

/// A resource that is idle and old enough to be reported, pending the
/// activity check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CandidateResource {
    Volume(VolumeRecord),
    Instance(InstanceRecord),
}

impl CandidateResource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            CandidateResource::Volume(_) => ResourceKind::Volume,
            CandidateResource::Instance(_) => ResourceKind::Instance,
        }
    }

    /// Value of the kind's identifier field (`VolumeId` / `InstanceId`)
    pub fn id(&self) -> &str {
        match self {
            CandidateResource::Volume(v) => &v.volume_id,
            CandidateResource::Instance(i) => &i.instance_id,
        }
    }

    /// Current state as reported by EC2
    pub fn state(&self) -> &str {
        match self {
            CandidateResource::Volume(v) => &v.state,
            CandidateResource::Instance(i) => &i.state,
        }
    }

    /// Volume creation time or instance launch time
    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            CandidateResource::Volume(v) => v.create_time,
            CandidateResource::Instance(i) => i.launch_time,
        }
    }
}

impl From<VolumeRecord> for CandidateResource {
    fn from(record: VolumeRecord) -> Self {
        CandidateResource::Volume(record)
    }
}

impl From<InstanceRecord> for CandidateResource {
    fn from(record: InstanceRecord) -> Self {
        CandidateResource::Instance(record)
    }
}
