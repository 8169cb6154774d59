//! Stale report and the resolver that produces it

use crate::{CandidateResource, ResourceKind};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Per-kind values within one region
pub type KindMap<T> = BTreeMap<ResourceKind, T>;

/// Per-region, per-kind values, regions in the order they were audited
pub type RegionMap<T> = IndexMap<String, KindMap<T>>;

/// Idle, old-enough resources as enumerated, before the activity check
pub type Inventory = RegionMap<Vec<CandidateResource>>;

/// Ids with activity inside the ignore window
pub type ActivityIndex = RegionMap<HashSet<String>>;

/// Region -> kind -> stale resources, in enumeration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StaleReport(RegionMap<Vec<CandidateResource>>);

impl StaleReport {
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Stale resources for one region and kind (empty if the pair is absent)
    pub fn resources(&self, region: &str, kind: ResourceKind) -> &[CandidateResource] {
        self.0
            .get(region)
            .and_then(|kinds| kinds.get(&kind))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of stale resources per (region, kind)
    pub fn counts(&self) -> Vec<(&str, ResourceKind, usize)> {
        self.0
            .iter()
            .flat_map(|(region, kinds)| {
                kinds
                    .iter()
                    .map(move |(kind, resources)| (region.as_str(), *kind, resources.len()))
            })
            .collect()
    }

    pub fn total(&self) -> usize {
        self.0.values().flat_map(|kinds| kinds.values()).map(Vec::len).sum()
    }

    /// Pretty-printed JSON, the exact payload printed and published
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Drop every candidate whose id shows up in the matching activity set.
///
/// A region or kind missing from `activity` is treated as having no activity.
pub fn resolve(inventory: &Inventory, activity: &ActivityIndex) -> StaleReport {
    let no_activity = HashSet::new();

    let map = inventory
        .iter()
        .map(|(region, kinds)| {
            let stale = kinds
                .iter()
                .map(|(kind, candidates)| {
                    let touched = activity
                        .get(region)
                        .and_then(|k| k.get(kind))
                        .unwrap_or(&no_activity);
                    let remaining = candidates
                        .iter()
                        .filter(|c| !touched.contains(c.id()))
                        .cloned()
                        .collect();
                    (*kind, remaining)
                })
                .collect();
            (region.clone(), stale)
        })
        .collect();

    StaleReport(map)
}
