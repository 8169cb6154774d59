//! Stale resource audit pipeline
//!
//! Runs strictly in sequence: enumerate idle resources, scan the activity
//! log, subtract, then print and optionally publish the report.

pub mod activity;
pub mod enumerator;
pub mod operations;
pub mod reporter;

pub use operations::{
    ActivityOperations, ActivityPage, InventoryOperations, NotifyOperations, ResourcePage,
};
pub use reporter::NotificationStatus;

use anyhow::Result;
use chrono::{DateTime, Utc};
use stale_sweep_common::report::resolve;
use stale_sweep_common::window::cutoff;
use stale_sweep_common::{AuditConfig, ResourceKind, StaleReport};
use std::io::Write;
use tracing::info;

/// Pipeline stage a degraded query belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum AuditStage {
    #[display("enumeration")]
    Enumeration,
    #[display("activity-lookup")]
    ActivityLookup,
}

/// A region/kind query that failed part-way through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegradedQuery {
    pub region: String,
    pub kind: ResourceKind,
    pub stage: AuditStage,
    pub reason: String,
}

impl DegradedQuery {
    pub fn new(region: &str, kind: ResourceKind, stage: AuditStage, error: &anyhow::Error) -> Self {
        Self {
            region: region.to_string(),
            kind,
            stage,
            reason: format!("{error:#}"),
        }
    }
}

/// Result of one audit run
#[derive(Debug)]
pub struct AuditOutcome {
    pub report: StaleReport,
    /// Exact text printed and published
    pub payload: String,
    pub degraded: Vec<DegradedQuery>,
    pub notification: NotificationStatus,
}

/// Runs the audit against a set of collaborators
pub struct Auditor<I, A, N> {
    inventory: I,
    activity: A,
    notifier: N,
}

impl<I, A, N> Auditor<I, A, N>
where
    I: InventoryOperations,
    A: ActivityOperations,
    N: NotifyOperations,
{
    pub fn new(inventory: I, activity: A, notifier: N) -> Self {
        Self {
            inventory,
            activity,
            notifier,
        }
    }

    /// Audit every configured region as of `now`, writing the report to `out`.
    ///
    /// Only a failure to serialize or write the report is an error; upstream
    /// failures degrade the affected region/kind and publish failures are
    /// logged.
    pub async fn run(
        &self,
        config: &AuditConfig,
        now: DateTime<Utc>,
        out: &mut impl Write,
    ) -> Result<AuditOutcome> {
        let cutoff = cutoff(now, config.ignore_window_days);
        let regions = config.unique_regions();

        info!(
            regions = ?regions,
            ignore_window_days = config.ignore_window_days,
            cutoff = %cutoff.to_rfc3339(),
            "Starting stale resource audit"
        );

        let (inventory, mut degraded) =
            enumerator::enumerate(&self.inventory, &regions, cutoff).await;
        let (activity, activity_degraded) = activity::scan(&self.activity, &regions, cutoff).await;
        degraded.extend(activity_degraded);

        let report = resolve(&inventory, &activity);
        let payload = reporter::write_report(&report, out)?;
        reporter::log_summary(&report, &degraded);

        let notification = if config.detailed_notifications {
            reporter::notify(&self.notifier, &config.sns_arn, &payload).await
        } else {
            NotificationStatus::Disabled
        };

        Ok(AuditOutcome {
            report,
            payload,
            degraded,
            notification,
        })
    }
}
