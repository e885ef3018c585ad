//! Selective refetch: narrowing a catalog to the flows or deployments a
//! caller asked for.
//!
//! Every criterion is optional. `None` means the criterion was not
//! supplied; `Some(vec![])` means it was supplied and matches nothing.
//! When no criterion is supplied the input passes through untouched,
//! otherwise a candidate is kept if it matches any supplied criterion.
use std::collections::HashSet;

use crate::model::{normalize_name, DeploymentDetails, FlowDetails};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowFilter {
    /// Reference flows, matched on display name plus relative source path.
    pub flows_to_fetch: Option<Vec<FlowDetails>>,
    /// Top-level groups (first `grouping` segment).
    pub flow_groups: Option<Vec<String>>,
}

impl FlowFilter {
    pub fn new(flows_to_fetch: Option<Vec<FlowDetails>>, flow_groups: Option<Vec<String>>) -> Self {
        Self {
            flows_to_fetch,
            flow_groups,
        }
    }

    pub fn groups<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(None, Some(groups.into_iter().map(Into::into).collect()))
    }

    pub fn is_unfiltered(&self) -> bool {
        self.flows_to_fetch.is_none() && self.flow_groups.is_none()
    }

    pub fn matches(&self, flow: &FlowDetails) -> bool {
        if self.is_unfiltered() {
            return true;
        }
        let by_reference = self.flows_to_fetch.as_ref().is_some_and(|refs| {
            refs.iter()
                .any(|reference| reference.refetch_key() == flow.refetch_key())
        });
        let by_group = self.flow_groups.as_ref().is_some_and(|groups| {
            flow.group()
                .is_some_and(|group| groups.iter().any(|g| g == group))
        });
        by_reference || by_group
    }

    /// Keeps matching flows in their original order, one per `id`.
    pub fn apply(&self, flows: Vec<FlowDetails>) -> Vec<FlowDetails> {
        if self.is_unfiltered() {
            return flows;
        }
        let mut seen = HashSet::new();
        flows
            .into_iter()
            .filter(|flow| self.matches(flow) && seen.insert(flow.id.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeploymentFilter {
    /// Reference deployments, matched on native `id`.
    pub deployments_to_fetch: Option<Vec<DeploymentDetails>>,
    /// Reference flows, matched on `flow_name` against the flow's display name.
    pub flows_to_fetch: Option<Vec<FlowDetails>>,
    /// Project names.
    pub groups: Option<Vec<String>>,
}

impl DeploymentFilter {
    pub fn is_unfiltered(&self) -> bool {
        self.deployments_to_fetch.is_none() && self.flows_to_fetch.is_none() && self.groups.is_none()
    }

    pub fn matches(&self, deployment: &DeploymentDetails) -> bool {
        if self.is_unfiltered() {
            return true;
        }
        let by_id = self
            .deployments_to_fetch
            .as_ref()
            .is_some_and(|refs| refs.iter().any(|r| r.id == deployment.id));
        let by_flow = self.flows_to_fetch.as_ref().is_some_and(|flows| {
            let flow_name = normalize_name(&deployment.flow_name);
            flows.iter().any(|flow| flow.name == flow_name)
        });
        let by_group = self
            .groups
            .as_ref()
            .is_some_and(|groups| groups.iter().any(|g| *g == deployment.project_name));
        by_id || by_flow || by_group
    }

    /// Keeps matching deployments in their original order, one per `id`.
    pub fn apply(&self, deployments: Vec<DeploymentDetails>) -> Vec<DeploymentDetails> {
        if self.is_unfiltered() {
            return deployments;
        }
        let mut seen = HashSet::new();
        deployments
            .into_iter()
            .filter(|d| self.matches(d) && seen.insert(d.id.clone()))
            .collect()
    }
}
