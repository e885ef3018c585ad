//! Identity-keyed flow catalogs.
mod builder;

use std::collections::HashMap;
use tracing::warn;

use crate::model::FlowDetails;
pub use builder::{CatalogBuilder, SourceLocation};

/// Two records claimed the same id. The first one stays in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionWarning {
    pub id: String,
    pub kept: String,
    pub dropped: String,
}

/// Flows from one scan, in discovery order, unique by `id`.
#[derive(Debug, Clone, Default)]
pub struct FlowCatalog {
    flows: Vec<FlowDetails>,
    index: HashMap<String, usize>,
    collisions: Vec<CollisionWarning>,
}

impl FlowCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a flow, refusing (and recording) one whose id is taken.
    pub fn insert(&mut self, flow: FlowDetails) -> bool {
        if let Some(&existing) = self.index.get(&flow.id) {
            let collision = CollisionWarning {
                id: flow.id.clone(),
                kept: self.flows[existing].source_relative.clone(),
                dropped: flow.source_relative.clone(),
            };
            warn!(
                id = %collision.id,
                kept = %collision.kept,
                dropped = %collision.dropped,
                "duplicate flow id, keeping the first record"
            );
            self.collisions.push(collision);
            return false;
        }
        self.index.insert(flow.id.clone(), self.flows.len());
        self.flows.push(flow);
        true
    }

    /// Unions another catalog (e.g. a shard scanned separately) into this one.
    pub fn merge(&mut self, other: FlowCatalog) {
        self.collisions.extend(other.collisions);
        for flow in other.flows {
            self.insert(flow);
        }
    }

    pub fn get(&self, id: &str) -> Option<&FlowDetails> {
        self.index.get(id).map(|&i| &self.flows[i])
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlowDetails> {
        self.flows.iter()
    }

    pub fn collisions(&self) -> &[CollisionWarning] {
        &self.collisions
    }

    pub fn into_flows(self) -> Vec<FlowDetails> {
        self.flows
    }
}

impl FromIterator<FlowDetails> for FlowCatalog {
    fn from_iter<I: IntoIterator<Item = FlowDetails>>(iter: I) -> Self {
        let mut catalog = FlowCatalog::new();
        for flow in iter {
            catalog.insert(flow);
        }
        catalog
    }
}
