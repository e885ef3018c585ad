use std::fmt;

use serde::{Deserialize, Serialize};

use super::{expect_object, normalize_name, ChildAttributes};
use crate::error::ModelError;

const NAME_SEPARATOR: &str = "--";

pub const TAG_PROJECT: &str = "PROJECT";
pub const TAG_BRANCH: &str = "BRANCH";
pub const TAG_ENV: &str = "ENV";
pub const TAG_COMMIT_HASH: &str = "COMMIT_HASH";
pub const TAG_PACKAGE_VERSION: &str = "PACKAGE_VERSION";

/// A deployed instance of a flow, as reported by a remote orchestrator.
///
/// Linked to a [`super::FlowDetails`] by `flow_name` only; there is no
/// referential integrity between the two.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentDetails {
    pub name: String,
    pub project_name: String,
    pub branch: String,
    pub flow_name: String,
    pub env: String,
    pub commit_hash: String,
    pub package_version: String,
    pub tags: Vec<String>,
    /// Platform-native id: a UUID for Prefect, the DAG id for Airflow.
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub flow_id: String,
    pub url: String,
    #[serde(default)]
    pub child_attributes: ChildAttributes,
}

/// Remote fields that cannot be derived from a deployment's name or tags.
#[derive(Debug, Clone, Default)]
pub struct RemoteMetadata {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub flow_id: String,
    pub url: String,
}

impl DeploymentDetails {
    /// Builds a record from a raw deployment name and `KEY=VALUE` tags.
    ///
    /// Project, branch, flow and env come from the name when it follows
    /// the `PROJECT--BRANCH--FLOW--ENV` convention, otherwise from tags.
    pub fn from_tagged(name: impl Into<String>, tags: Vec<String>, remote: RemoteMetadata) -> Self {
        let name = name.into();
        let parsed = DeploymentName::parse(&name).ok();
        let tag = |key: &str| tag_lookup(&tags, key).unwrap_or_default().to_string();

        let (project_name, branch, flow_name, env) = match parsed {
            Some(parsed) => (
                parsed.project,
                parsed.branch,
                normalize_name(&parsed.flow),
                parsed.env,
            ),
            None => (
                tag(TAG_PROJECT),
                tag(TAG_BRANCH),
                normalize_name(&name),
                tag(TAG_ENV),
            ),
        };

        Self {
            commit_hash: tag(TAG_COMMIT_HASH),
            package_version: tag(TAG_PACKAGE_VERSION),
            name,
            project_name,
            branch,
            flow_name,
            env,
            tags,
            id: remote.id,
            created_at: remote.created_at,
            updated_at: remote.updated_at,
            flow_id: remote.flow_id,
            url: remote.url,
            child_attributes: ChildAttributes::new(),
        }
    }

    /// Value of the first `KEY=VALUE` tag with the given key.
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        tag_lookup(&self.tags, key)
    }

    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn from_dict(data: &serde_json::Value) -> Result<Self, ModelError> {
        expect_object("DeploymentDetails", data)?;
        serde_json::from_value(data.clone())
            .map_err(|e| ModelError::decode("DeploymentDetails", e))
    }
}

fn tag_lookup<'a>(tags: &'a [String], key: &str) -> Option<&'a str> {
    tags.iter().find_map(|tag| {
        let (k, v) = tag.split_once('=')?;
        (k == key).then_some(v)
    })
}

/// The `PROJECT--BRANCH--FLOW--ENV` deployment naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentName {
    pub project: String,
    pub branch: String,
    pub flow: String,
    pub env: String,
}

impl DeploymentName {
    pub fn new(
        project: impl Into<String>,
        branch: impl Into<String>,
        flow: impl Into<String>,
        env: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            branch: branch.into(),
            flow: flow.into(),
            env: env.into(),
        }
    }

    /// Parses a composed name. Extra `--` segments belong to the flow.
    pub fn parse(name: &str) -> Result<Self, ModelError> {
        let parts: Vec<&str> = name.split(NAME_SEPARATOR).collect();
        if parts.len() < 4 || parts.iter().any(|p| p.is_empty()) {
            return Err(ModelError::invalid_deployment_name(name));
        }
        let last = parts.len() - 1;
        Ok(Self::new(
            parts[0],
            parts[1],
            parts[2..last].join(NAME_SEPARATOR),
            parts[last],
        ))
    }
}

impl fmt::Display for DeploymentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}",
            self.project,
            self.branch,
            self.flow,
            self.env,
            sep = NAME_SEPARATOR
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_deployment() -> DeploymentDetails {
        DeploymentDetails {
            name: "project1--main--flow1--dev".to_string(),
            project_name: "project1".to_string(),
            branch: "main".to_string(),
            flow_name: "flow1".to_string(),
            env: "dev".to_string(),
            commit_hash: "abc123".to_string(),
            package_version: "1.0.0".to_string(),
            tags: vec!["COMMIT_HASH=abc123".to_string()],
            id: "deploy1_id".to_string(),
            created_at: "2023-01-01".to_string(),
            updated_at: "2023-01-02".to_string(),
            flow_id: "flow1_id".to_string(),
            url: "http://example.com/deploy1".to_string(),
            child_attributes: ChildAttributes::new(),
        }
    }

    #[test]
    fn test_parse_deployment_name() {
        let parsed = DeploymentName::parse("acme-project--main--data-processing--dev").unwrap();
        assert_eq!(parsed.project, "acme-project");
        assert_eq!(parsed.branch, "main");
        assert_eq!(parsed.flow, "data-processing");
        assert_eq!(parsed.env, "dev");
        assert_eq!(parsed.to_string(), "acme-project--main--data-processing--dev");
    }

    #[test]
    fn test_parse_deployment_name_rejects_short_names() {
        assert!(DeploymentName::parse("project--main--flow").is_err());
        assert!(DeploymentName::parse("project----flow--dev").is_err());
    }

    #[test]
    fn test_from_tagged_prefers_name_segments() {
        let tags = vec![
            "PROJECT=acme-project".to_string(),
            "BRANCH=main".to_string(),
            "ENV=dev".to_string(),
            "COMMIT_HASH=abc123".to_string(),
        ];
        let deployment = DeploymentDetails::from_tagged(
            "acme-project--main--data-processing--dev",
            tags,
            RemoteMetadata {
                id: "acme-project--main--data-processing--dev".to_string(),
                ..Default::default()
            },
        );

        assert_eq!(deployment.project_name, "acme-project");
        assert_eq!(deployment.branch, "main");
        assert_eq!(deployment.flow_name, "data_processing");
        assert_eq!(deployment.env, "dev");
        assert_eq!(deployment.commit_hash, "abc123");
        assert_eq!(deployment.package_version, "");
    }

    #[test]
    fn test_from_tagged_falls_back_to_tags() {
        let tags = vec!["PROJECT=p".to_string(), "ENV=prod".to_string()];
        let deployment =
            DeploymentDetails::from_tagged("nightly-report", tags, RemoteMetadata::default());
        assert_eq!(deployment.project_name, "p");
        assert_eq!(deployment.env, "prod");
        assert_eq!(deployment.branch, "");
        assert_eq!(deployment.flow_name, "nightly_report");
    }

    #[test]
    fn test_tag_value_splits_on_first_equals() {
        let mut deployment = sample_deployment();
        deployment.tags.push("QUERY=a=b".to_string());
        assert_eq!(deployment.tag_value("COMMIT_HASH"), Some("abc123"));
        assert_eq!(deployment.tag_value("QUERY"), Some("a=b"));
        assert_eq!(deployment.tag_value("MISSING"), None);
    }

    #[test]
    fn test_round_trip_keeps_child_attributes_nested() {
        let mut deployment = sample_deployment();
        deployment
            .child_attributes
            .insert("schedule".to_string(), json!({ "cron": "0 * * * *" }));

        let dict = deployment.to_dict();
        assert!(dict.get("schedule").is_none());
        assert_eq!(dict["child_attributes"]["schedule"]["cron"], "0 * * * *");

        let restored = DeploymentDetails::from_dict(&dict).unwrap();
        assert_eq!(restored, deployment);
    }

    #[test]
    fn test_from_dict_without_child_attributes() {
        let mut dict = sample_deployment().to_dict();
        dict.as_object_mut().unwrap().remove("child_attributes");

        let restored = DeploymentDetails::from_dict(&dict).unwrap();
        assert!(restored.child_attributes.is_empty());
        assert_eq!(restored.id, "deploy1_id");
    }
}
