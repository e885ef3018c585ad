//! Normalized records shared with the portal UI and remote deployment finders.
//!
//! Both entity types carry a fixed schema plus `child_attributes`, an open
//! string-keyed bag for platform-specific data. The bag always serializes
//! as its own nested `child_attributes` key and is never flattened into
//! the top level.
mod deployment;
mod flow;

pub use deployment::{DeploymentDetails, DeploymentName, RemoteMetadata};
pub use flow::{FlowDetails, ObjType, ParentType};

/// Platform-specific extension attributes.
pub type ChildAttributes = serde_json::Map<String, serde_json::Value>;

/// Separator used in declared identifiers and deployment names.
pub const DECLARED_SEPARATOR: char = '-';

/// Canonical separator for display names.
pub const CANONICAL_SEPARATOR: char = '_';

/// Converts a declared identifier into its display form.
pub fn normalize_name(declared: &str) -> String {
    declared.replace(DECLARED_SEPARATOR, &CANONICAL_SEPARATOR.to_string())
}

pub(crate) fn expect_object<'a>(
    entity: &'static str,
    value: &'a serde_json::Value,
) -> Result<&'a serde_json::Map<String, serde_json::Value>, crate::error::ModelError> {
    value
        .as_object()
        .ok_or_else(|| crate::error::ModelError::not_an_object(entity, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name_replaces_every_hyphen() {
        assert_eq!(
            normalize_name("proj--main--etl--dev"),
            "proj__main__etl__dev"
        );
        assert_eq!(normalize_name("plain_name"), "plain_name");
    }
}
