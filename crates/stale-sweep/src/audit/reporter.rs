//! Report output and best-effort notification

use super::DegradedQuery;
use super::operations::NotifyOperations;
use crate::aws::classify_anyhow_error;
use anyhow::{Context, Result};
use stale_sweep_common::StaleReport;
use std::io::Write;
use tracing::{info, warn};

/// What happened to the SNS notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationStatus {
    /// DETAILED_NOTIFICATIONS is FALSE
    Disabled,
    Sent { message_id: String },
    /// Publish failed; the run still succeeds
    Failed { reason: String },
}

/// Serialize the report and write it to `out`, returning the payload.
pub fn write_report(report: &StaleReport, out: &mut impl Write) -> Result<String> {
    let payload = report
        .to_json_pretty()
        .context("Failed to serialize stale report")?;
    writeln!(out, "{payload}").context("Failed to write stale report")?;
    out.flush().context("Failed to flush report output")?;
    Ok(payload)
}

/// Log per-region/per-kind counts and any degraded queries.
pub fn log_summary(report: &StaleReport, degraded: &[DegradedQuery]) {
    for (region, kind, count) in report.counts() {
        info!(region, kind = %kind, stale = count, "Stale resources");
    }
    for query in degraded {
        warn!(
            region = %query.region,
            kind = %query.kind,
            stage = %query.stage,
            reason = %query.reason,
            "Results for this region and kind are incomplete"
        );
    }
    info!(
        total = report.total(),
        degraded = degraded.len(),
        "Audit complete"
    );
}

/// Publish `payload` verbatim to `destination`. Failures are logged, never
/// propagated.
pub async fn notify<N: NotifyOperations>(
    notifier: &N,
    destination: &str,
    payload: &str,
) -> NotificationStatus {
    match notifier.publish(destination, payload).await {
        Ok(message_id) => {
            info!(destination, message_id = %message_id, "Published stale report");
            NotificationStatus::Sent { message_id }
        }
        Err(e) => {
            let classified = classify_anyhow_error(&e);
            warn!(
                destination,
                category = classified.category(),
                error = %format!("{e:#}"),
                "Failed to publish stale report, continuing"
            );
            NotificationStatus::Failed {
                reason: format!("{e:#}"),
            }
        }
    }
}
