//! Per-region client sets
//!
//! The audit walks several regions with one collaborator each. `Regional`
//! holds one client per loaded region and routes each call by region name.

use crate::aws::context::{AwsContext, FromAwsContext};
use anyhow::{Result, anyhow};
use std::collections::HashMap;

/// One `T` per region
pub struct Regional<T> {
    clients: HashMap<String, T>,
}

impl<T: FromAwsContext> Regional<T> {
    /// Build a client for every context
    pub fn from_contexts<'a>(contexts: impl IntoIterator<Item = &'a AwsContext>) -> Self {
        let clients = contexts
            .into_iter()
            .map(|ctx| (ctx.region().to_string(), T::from_context(ctx)))
            .collect();
        Self { clients }
    }
}

impl<T> Regional<T> {
    /// Client for `region`, or an error if the region was never loaded
    pub fn get(&self, region: &str) -> Result<&T> {
        self.clients
            .get(region)
            .ok_or_else(|| anyhow!("No AWS client loaded for region {region}"))
    }
}

impl<T> FromIterator<(String, T)> for Regional<T> {
    fn from_iter<It: IntoIterator<Item = (String, T)>>(iter: It) -> Self {
        Self {
            clients: iter.into_iter().collect(),
        }
    }
}
