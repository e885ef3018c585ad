//! Portal flow finder
//!
//! Statically discovers Prefect flows and Airflow DAGs in Python source
//! trees with Tree-sitter, and normalizes them (and deployment listings)
//! into records a deployment portal can filter and round-trip as JSON.
pub mod catalog;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod finder;
pub mod logging;
pub mod model;
pub mod output;
pub mod parser;
pub mod platform;
pub mod refetch;
pub mod utils;
pub mod visitor;

pub use catalog::{CatalogBuilder, CollisionWarning, FlowCatalog};
pub use config::ScanConfig;
pub use error::{Error, Result};
pub use finder::{
    DeploymentFinder, FlowFinder, JsonDeploymentFinder, ScanOutcome, ScanReport,
    SourceFlowFinder,
};
pub use model::{DeploymentDetails, DeploymentName, FlowDetails, ObjType, ParentType};
pub use platform::Platform;
pub use refetch::{DeploymentFilter, FlowFilter};
