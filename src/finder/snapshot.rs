use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::DeploymentFinder;
use crate::error::{IoError, ModelError, Result};
use crate::model::{DeploymentDetails, FlowDetails};

/// Serves deployments from a JSON array of `to_dict` records, such as a
/// disk cache written by a remote finder.
#[derive(Debug, Clone)]
pub struct JsonDeploymentFinder {
    path: PathBuf,
}

impl JsonDeploymentFinder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DeploymentFinder for JsonDeploymentFinder {
    fn list_deployments(&self) -> Result<Vec<DeploymentDetails>> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| IoError::read_error(&self.path, e))?;
        let deployments = deployments_from_json(&content)?;
        debug!(
            path = %self.path.display(),
            deployments = deployments.len(),
            "loaded deployment snapshot"
        );
        Ok(deployments)
    }
}

pub fn flows_from_json(content: &str) -> std::result::Result<Vec<FlowDetails>, ModelError> {
    records(content, "FlowDetails")?
        .iter()
        .map(FlowDetails::from_dict)
        .collect()
}

pub fn deployments_from_json(
    content: &str,
) -> std::result::Result<Vec<DeploymentDetails>, ModelError> {
    records(content, "DeploymentDetails")?
        .iter()
        .map(DeploymentDetails::from_dict)
        .collect()
}

fn records(content: &str, entity: &'static str) -> std::result::Result<Vec<serde_json::Value>, ModelError> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| ModelError::decode(entity, e))?;
    match value {
        serde_json::Value::Array(items) => Ok(items),
        other => Err(ModelError::not_a_list(entity, &other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RemoteMetadata;
    use crate::refetch::DeploymentFilter;
    use tempfile::TempDir;

    fn snapshot() -> String {
        let deployments: Vec<_> = [("proj--main--etl--dev", "d1"), ("other--main--etl--dev", "d2")]
            .into_iter()
            .map(|(name, id)| {
                DeploymentDetails::from_tagged(
                    name,
                    vec!["COMMIT_HASH=abc123".to_string()],
                    RemoteMetadata {
                        id: id.to_string(),
                        ..RemoteMetadata::default()
                    },
                )
                .to_dict()
            })
            .collect();
        serde_json::Value::Array(deployments).to_string()
    }

    #[test]
    fn test_json_finder_lists_and_filters() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("deployments.json");
        fs::write(&path, snapshot()).unwrap();

        let finder = JsonDeploymentFinder::new(&path);
        let all = finder.list_deployments().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].commit_hash, "abc123");

        let filter = DeploymentFilter {
            groups: Some(vec!["other".to_string()]),
            ..DeploymentFilter::default()
        };
        let filtered = finder.get_deployments(&filter).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "d2");
    }

    #[test]
    fn test_json_finder_missing_file() {
        let finder = JsonDeploymentFinder::new("/nonexistent/deployments.json");
        let err = finder.list_deployments().unwrap_err();
        assert!(err.to_string().contains("failed to read file"));
    }

    #[test]
    fn test_records_must_be_a_list() {
        let err = flows_from_json(r#"{"name": "x"}"#).unwrap_err();
        assert!(matches!(err, ModelError::NotAList { .. }));
    }

    #[test]
    fn test_flows_from_json_reads_minimal_records() {
        let flows = flows_from_json(
            r#"[{"name": "etl", "original_name": "etl", "description": "", "id": "etl_0",
                 "source_path": "/r/etl.py", "source_relative": "etl.py"}]"#,
        )
        .unwrap();
        assert_eq!(flows.len(), 1);
        assert_eq!(flows[0].refetch_key(), ("etl", "etl.py"));
        assert!(flows[0].child_attributes.is_empty());
    }
}
