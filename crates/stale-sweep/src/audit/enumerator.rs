//! Resource enumeration: idle resources created before the cutoff

use super::operations::InventoryOperations;
use super::{AuditStage, DegradedQuery};
use crate::aws::classify_anyhow_error;
use chrono::{DateTime, Utc};
use stale_sweep_common::window::created_before_cutoff;
use stale_sweep_common::{CandidateResource, Inventory, KindMap, ResourceKind};
use tracing::{debug, warn};

/// Candidates for one region and kind
#[derive(Debug, Default)]
pub struct Enumeration {
    pub resources: Vec<CandidateResource>,
    /// Set when listing stopped early; `resources` then holds what was read
    pub degraded: Option<DegradedQuery>,
}

/// Page through every idle resource of `kind` in `region`, keeping those
/// created on a day before the cutoff.
pub async fn enumerate_kind<I: InventoryOperations>(
    inventory: &I,
    region: &str,
    kind: ResourceKind,
    cutoff: DateTime<Utc>,
) -> Enumeration {
    let mut enumeration = Enumeration::default();
    let mut next_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = match inventory
            .list_resources_page(region, kind, next_token.take())
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
                    "Resource listing failed, continuing with partial results"
                );
                enumeration.degraded = Some(DegradedQuery::new(
                    region,
                    kind,
                    AuditStage::Enumeration,
                    &e,
                ));
                break;
            }
        };
        pages += 1;

        enumeration.resources.extend(
            page.resources
                .into_iter()
                .filter(|r| is_candidate(r, kind, cutoff)),
        );

        // Handle pagination
        match page.next_token {
            Some(token) if !token.is_empty() => next_token = Some(token),
            _ => break,
        }
    }

    debug!(
        region,
        kind = %kind,
        pages,
        count = enumeration.resources.len(),
        "Enumerated idle resources"
    );
    enumeration
}

/// Enumerate every kind in every region.
pub async fn enumerate<I: InventoryOperations>(
    inventory: &I,
    regions: &[&str],
    cutoff: DateTime<Utc>,
) -> (Inventory, Vec<DegradedQuery>) {
    let mut result = Inventory::new();
    let mut degraded = Vec::new();

    for region in regions {
        let mut kinds = KindMap::new();
        for kind in ResourceKind::ALL {
            let enumeration = enumerate_kind(inventory, region, kind, cutoff).await;
            degraded.extend(enumeration.degraded);
            kinds.insert(kind, enumeration.resources);
        }
        result.insert(region.to_string(), kinds);
    }

    (result, degraded)
}

fn is_candidate(resource: &CandidateResource, kind: ResourceKind, cutoff: DateTime<Utc>) -> bool {
    resource.kind() == kind
        && kind.is_idle_state(resource.state())
        && created_before_cutoff(resource.created_at(), cutoff)
}
