//! CloudTrail activity records and touched-resource extraction

use crate::ResourceKind;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Resource referenced by an activity record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityResource {
    /// CloudTrail resource type, e.g. `AWS::EC2::Volume`
    pub resource_type: Option<String>,
    /// Resource name; for EC2 this is the volume/instance id
    pub resource_name: Option<String>,
}

impl ActivityResource {
    pub fn new(resource_type: impl Into<String>, resource_name: impl Into<String>) -> Self {
        Self {
            resource_type: Some(resource_type.into()),
            resource_name: Some(resource_name.into()),
        }
    }
}

/// Administrative event from the activity log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityRecord {
    pub event_id: Option<String>,
    pub event_name: Option<String>,
    pub event_time: Option<DateTime<Utc>>,
    pub username: Option<String>,
    pub resources: Vec<ActivityResource>,
}

/// Add the ids of `kind` resources referenced by records at or after `since`.
///
/// Records without a timestamp are trusted to fall inside the queried range.
pub fn extend_touched_ids<'a>(
    ids: &mut HashSet<String>,
    records: impl IntoIterator<Item = &'a ActivityRecord>,
    kind: ResourceKind,
    since: DateTime<Utc>,
) {
    let wanted = kind.cloudtrail_type();
    for record in records {
        if record.event_time.is_some_and(|t| t < since) {
            continue;
        }
        for resource in &record.resources {
            if resource.resource_type.as_deref() != Some(wanted) {
                continue;
            }
            if let Some(name) = &resource.resource_name {
                ids.insert(name.clone());
            }
        }
    }
}
