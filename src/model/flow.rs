use serde::{Deserialize, Serialize};

use super::{expect_object, ChildAttributes};
use crate::error::ModelError;

/// Syntactic shape a flow was declared with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjType {
    /// `my_dag = DAG(...)` at module or class-body level.
    Object,
    /// `@dag(...)` / `@flow(...)` on a plain function.
    #[default]
    Function,
    /// A decorated function defined directly in a class body.
    Method,
}

impl ObjType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjType::Object => "object",
            ObjType::Function => "function",
            ObjType::Method => "method",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentType {
    #[default]
    Module,
    Class,
}

impl ParentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParentType::Module => "module",
            ParentType::Class => "class",
        }
    }
}

/// A flow (or DAG) declaration discovered in source code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowDetails {
    /// Display name: `original_name` with hyphens replaced by underscores.
    pub name: String,
    pub original_name: String,
    pub description: String,
    /// Unique within one scan.
    pub id: String,
    #[serde(default)]
    pub obj_type: ObjType,
    #[serde(default)]
    pub obj_name: String,
    #[serde(default)]
    pub obj_parent_type: ParentType,
    #[serde(default)]
    pub obj_parent: String,
    #[serde(default)]
    pub module: String,
    pub source_path: String,
    pub source_relative: String,
    #[serde(default)]
    pub import_path: String,
    #[serde(default)]
    pub line_number: Option<usize>,
    #[serde(default)]
    pub grouping: Vec<String>,
    #[serde(default)]
    pub child_attributes: ChildAttributes,
}

impl FlowDetails {
    pub fn new(
        original_name: impl Into<String>,
        id: impl Into<String>,
        source_path: impl Into<String>,
        source_relative: impl Into<String>,
    ) -> Self {
        let original_name = original_name.into();
        Self {
            name: super::normalize_name(&original_name),
            original_name,
            id: id.into(),
            source_path: source_path.into(),
            source_relative: source_relative.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_grouping<I, S>(mut self, grouping: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grouping = grouping.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_child_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.child_attributes.insert(key.into(), value.into());
        self
    }

    /// Key used by selective refetch: display name plus relative source path.
    pub fn refetch_key(&self) -> (&str, &str) {
        (&self.name, &self.source_relative)
    }

    /// First grouping segment, the flow's top-level group.
    pub fn group(&self) -> Option<&str> {
        self.grouping.first().map(String::as_str)
    }

    pub fn to_dict(&self) -> serde_json::Value {
        // Plain strings, numbers, arrays and string-keyed maps cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn from_dict(data: &serde_json::Value) -> Result<Self, ModelError> {
        expect_object("FlowDetails", data)?;
        serde_json::from_value(data.clone()).map_err(|e| ModelError::decode("FlowDetails", e))
    }
}
