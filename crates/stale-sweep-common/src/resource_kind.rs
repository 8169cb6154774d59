//! Audited AWS resource kinds
//!
//! Each kind carries everything the pipeline needs to know about it: how
//! CloudTrail names it, which EC2 filter selects its idle states, and which
//! field identifies it in the report. Adding a kind means adding a variant
//! here and a listing arm in the EC2 collaborator.

use serde::{Deserialize, Serialize};

/// Kinds of resources audited for staleness
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ResourceKind {
    /// EC2 instance, idle while running or stopped
    #[serde(rename = "AWS::EC2::Instance")]
    Instance,
    /// EBS volume, idle while unattached
    #[serde(rename = "AWS::EC2::Volume")]
    Volume,
}

impl ResourceKind {
    /// Every kind, in report order
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Instance, ResourceKind::Volume];

    /// CloudTrail `ResourceType` value for this kind
    pub fn cloudtrail_type(self) -> &'static str {
        match self {
            ResourceKind::Instance => "AWS::EC2::Instance",
            ResourceKind::Volume => "AWS::EC2::Volume",
        }
    }

    /// Name of the identifier field in a serialized record
    pub fn id_field(self) -> &'static str {
        match self {
            ResourceKind::Instance => "InstanceId",
            ResourceKind::Volume => "VolumeId",
        }
    }

    /// EC2 describe filter that selects resources by state
    pub fn state_filter_name(self) -> &'static str {
        match self {
            ResourceKind::Instance => "instance-state-name",
            ResourceKind::Volume => "status",
        }
    }

    /// States in which a resource of this kind counts as idle
    pub fn idle_states(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Instance => &["running", "stopped"],
            ResourceKind::Volume => &["available"],
        }
    }

    pub fn is_idle_state(self, state: &str) -> bool {
        self.idle_states().contains(&state)
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.cloudtrail_type())
    }
}
