use std::path::{Component, Path, PathBuf};

use crate::model::{normalize_name, ChildAttributes, FlowDetails};
use crate::platform::Platform;
use crate::visitor::Declaration;

/// Where a source file sits relative to the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub source_path: String,
    /// Relative path with the platform's native separator.
    pub source_relative: String,
    /// Directory names between the root and the file.
    pub grouping: Vec<String>,
    pub import_path: String,
    pub module: String,
}

/// Derives location fields and turns declarations into [`FlowDetails`].
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    root: PathBuf,
    package_name: String,
}

impl CatalogBuilder {
    pub fn new(root: &Path) -> Self {
        let package_name = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            root: root.to_path_buf(),
            package_name,
        }
    }

    /// Base name of the root directory, the first import path segment.
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn locate(&self, path: &Path) -> SourceLocation {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let segments: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        let module = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (grouping, import_path) = match segments.split_last() {
            Some((_, dirs)) => {
                let mut parts: Vec<&str> = Vec::with_capacity(dirs.len() + 2);
                if !self.package_name.is_empty() {
                    parts.push(&self.package_name);
                }
                parts.extend(dirs.iter().map(String::as_str));
                parts.push(&module);
                (dirs.to_vec(), parts.join("."))
            }
            None => (Vec::new(), module.clone()),
        };

        SourceLocation {
            source_path: path.to_string_lossy().into_owned(),
            source_relative: relative.to_string_lossy().into_owned(),
            grouping,
            import_path,
            module,
        }
    }

    pub fn build(
        &self,
        declaration: Declaration,
        location: &SourceLocation,
        platform: Platform,
    ) -> FlowDetails {
        let mut child_attributes = ChildAttributes::new();
        child_attributes.insert("platform".to_string(), platform.as_str().into());
        if !declaration.kwargs.is_empty() {
            child_attributes.insert(
                "kwargs".to_string(),
                serde_json::Value::Object(declaration.kwargs),
            );
        }
        if let Some(function) = declaration.enclosing_function {
            child_attributes.insert("enclosing_function".to_string(), function.into());
        }

        FlowDetails {
            name: normalize_name(&declaration.declared_id),
            original_name: declaration.declared_id,
            description: declaration.description,
            id: declaration.key,
            obj_type: declaration.obj_type,
            obj_name: declaration.obj_name,
            obj_parent_type: declaration.parent_type,
            obj_parent: declaration.parent,
            module: location.module.clone(),
            source_path: location.source_path.clone(),
            source_relative: location.source_relative.clone(),
            import_path: location.import_path.clone(),
            line_number: Some(declaration.line_number),
            grouping: location.grouping.clone(),
            child_attributes,
        }
    }
}
