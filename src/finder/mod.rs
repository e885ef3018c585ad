//! Finders produce catalogs: flows from source trees, deployments from
//! remote listings or their cached snapshots.
mod snapshot;
mod source;

pub use snapshot::{deployments_from_json, flows_from_json, JsonDeploymentFinder};
pub use source::{ScanOutcome, ScanReport, SourceFlowFinder};

use crate::error::Result;
use crate::model::{DeploymentDetails, FlowDetails};
use crate::refetch::{DeploymentFilter, FlowFilter};

pub trait FlowFinder {
    /// Builds a fresh, unfiltered catalog.
    fn scan_flows(&self) -> Result<Vec<FlowDetails>>;

    /// Full catalog, narrowed by `filter` when it carries any criteria.
    fn find_flows(&self, filter: &FlowFilter) -> Result<Vec<FlowDetails>> {
        Ok(filter.apply(self.scan_flows()?))
    }
}

pub trait DeploymentFinder {
    fn list_deployments(&self) -> Result<Vec<DeploymentDetails>>;

    fn get_deployments(&self, filter: &DeploymentFilter) -> Result<Vec<DeploymentDetails>> {
        Ok(filter.apply(self.list_deployments()?))
    }
}
