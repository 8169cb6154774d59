//! Collaborator traits for the audit pipeline
//!
//! The pipeline only needs three capabilities from AWS: list one page of
//! idle resources, look up one page of activity events, and publish a
//! message. Abstracting them lets the pagination and degradation logic run
//! against in-memory fakes.
//!
//! Note: tokens are passed as `Option<String>` rather than `Option<&str>` to
//! work around mockall lifetime limitations.

use anyhow::Result;
use chrono::{DateTime, Utc};
use stale_sweep_common::{ActivityRecord, CandidateResource, ResourceKind};

/// One page of a resource listing
#[derive(Debug, Clone, Default)]
pub struct ResourcePage {
    pub resources: Vec<CandidateResource>,
    pub next_token: Option<String>,
}

/// One page of activity events
#[derive(Debug, Clone, Default)]
pub struct ActivityPage {
    pub events: Vec<ActivityRecord>,
    pub next_token: Option<String>,
}

/// Lists resources of a kind whose state is in the kind's idle set.
#[allow(async_fn_in_trait)] // Internal use only, awaited on a single task
#[cfg_attr(test, mockall::automock)]
pub trait InventoryOperations {
    async fn list_resources_page(
        &self,
        region: &str,
        kind: ResourceKind,
        next_token: Option<String>,
    ) -> Result<ResourcePage>;
}

/// Looks up administrative events that reference resources of a kind.
#[allow(async_fn_in_trait)]
#[cfg_attr(test, mockall::automock)]
pub trait ActivityOperations {
    async fn lookup_events_page(
        &self,
        region: &str,
        kind: ResourceKind,
        start_time: DateTime<Utc>,
        next_token: Option<String>,
    ) -> Result<ActivityPage>;
}

/// Publishes a text message to a notification destination.
#[allow(async_fn_in_trait)]
#[cfg_attr(test, mockall::automock)]
pub trait NotifyOperations {
    /// Returns the message id assigned by the destination
    async fn publish(&self, destination: &str, message: &str) -> Result<String>;
}
