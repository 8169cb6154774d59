//! Activity-log scan: ids of resources touched inside the ignore window

use super::operations::ActivityOperations;
use super::{AuditStage, DegradedQuery};
use crate::aws::classify_anyhow_error;
use chrono::{DateTime, Utc};
use stale_sweep_common::activity::extend_touched_ids;
use stale_sweep_common::{ActivityIndex, KindMap, ResourceKind};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Touched ids for one region and kind
#[derive(Debug, Default)]
pub struct ActivityScan {
    pub touched: HashSet<String>,
    /// Set when the lookup stopped early; `touched` then holds what was read
    pub degraded: Option<DegradedQuery>,
}

/// Page through all events for `kind` in `region` since `since` and collect
/// the ids they reference.
pub async fn scan_kind<A: ActivityOperations>(
    activity: &A,
    region: &str,
    kind: ResourceKind,
    since: DateTime<Utc>,
) -> ActivityScan {
    let mut scan = ActivityScan::default();
    let mut next_token: Option<String> = None;
    let mut pages = 0usize;
    let mut events = 0usize;

    loop {
        let page = match activity
            .lookup_events_page(region, kind, since, next_token.take())
            .await
        {
            Ok(page) => page,
            Err(e) => {
                let classified = classify_anyhow_error(&e);
                warn!(
                    region,
                    kind = %kind,
                    pages,
                    category = classified.category(),
                    error = %format!("{e:#}"),
                    "Activity lookup failed, continuing with partial results"
                );
                scan.degraded = Some(DegradedQuery::new(
                    region,
                    kind,
                    AuditStage::ActivityLookup,
                    &e,
                ));
                break;
            }
        };
        pages += 1;
        events += page.events.len();

        extend_touched_ids(&mut scan.touched, &page.events, kind, since);

        match page.next_token {
            Some(token) if !token.is_empty() => next_token = Some(token),
            _ => break,
        }
    }

    debug!(
        region,
        kind = %kind,
        pages,
        events,
        touched = scan.touched.len(),
        "Scanned activity log"
    );
    scan
}

/// Scan every kind in every region.
pub async fn scan<A: ActivityOperations>(
    activity: &A,
    regions: &[&str],
    since: DateTime<Utc>,
) -> (ActivityIndex, Vec<DegradedQuery>) {
    let mut index = ActivityIndex::new();
    let mut degraded = Vec::new();

    for region in regions {
        let mut kinds = KindMap::new();
        for kind in ResourceKind::ALL {
            let scan = scan_kind(activity, region, kind, since).await;
            degraded.extend(scan.degraded);
            kinds.insert(kind, scan.touched);
        }
        index.insert(region.to_string(), kinds);
    }

    (index, degraded)
}
