use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("expected a JSON object for {entity}, found {found}")]
    NotAnObject { entity: &'static str, found: String },

    #[error("expected a JSON array of {entity} records, found {found}")]
    NotAList { entity: &'static str, found: String },

    #[error("invalid {entity} document")]
    Decode {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid deployment name '{name}': expected PROJECT--BRANCH--FLOW--ENV")]
    InvalidDeploymentName { name: String },
}

impl ModelError {
    pub fn not_an_object(entity: &'static str, value: &serde_json::Value) -> Self {
        Self::NotAnObject {
            entity,
            found: json_kind(value).to_string(),
        }
    }

    pub fn not_a_list(entity: &'static str, value: &serde_json::Value) -> Self {
        Self::NotAList {
            entity,
            found: json_kind(value).to_string(),
        }
    }

    pub fn decode(entity: &'static str, source: serde_json::Error) -> Self {
        Self::Decode { entity, source }
    }

    pub fn invalid_deployment_name(name: impl Into<String>) -> Self {
        Self::InvalidDeploymentName { name: name.into() }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
