use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;

pub const FILE_EXTENSIONS: &[&str] = &["py"];

pub const EXCLUDED_DIRS: &[&str] = &[".git", "__pycache__", ".pytest_cache", ".mypy_cache"];

pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Tunables for walking a source tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// File extensions (without the dot) treated as source files.
    pub extensions: Vec<String>,
    /// Directory names skipped wherever they appear below the root.
    pub excluded_dirs: Vec<String>,
    /// Follow symbolic links. Link cycles are detected and skipped.
    pub follow_links: bool,
    pub max_depth: Option<usize>,
    pub max_file_size: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: FILE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            excluded_dirs: EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
            follow_links: false,
            max_depth: None,
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

impl ScanConfig {
    pub fn from_yaml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::parse(origin, e))
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
        Self::from_yaml_str(&content, path)
    }

    pub fn is_source_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dirs.iter().any(|d| d == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert!(config.is_source_extension("py"));
        assert!(config.is_source_extension("PY"));
        assert!(!config.is_source_extension("pyc"));
        assert!(config.is_excluded_dir("__pycache__"));
        assert!(!config.follow_links);
        assert_eq!(config.max_file_size, MAX_FILE_SIZE);
    }

    #[test]
    fn test_yaml_overrides_keep_defaults_for_missing_keys() {
        let config = ScanConfig::from_yaml_str(
            "excluded_dirs: [build]\nfollow_links: true\n",
            Path::new("inline.yaml"),
        )
        .unwrap();
        assert_eq!(config.excluded_dirs, vec!["build".to_string()]);
        assert!(config.follow_links);
        assert_eq!(config.extensions, vec!["py".to_string()]);
        assert_eq!(config.max_depth, None);
    }

    #[test]
    fn test_yaml_rejects_unknown_keys() {
        let err = ScanConfig::from_yaml_str("exclude: [x]\n", Path::new("bad.yaml")).unwrap_err();
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn test_from_yaml_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.yaml");
        assert!(matches!(
            ScanConfig::from_yaml_file(&missing),
            Err(ConfigError::Read { .. })
        ));

        let present = temp_dir.path().join("scan.yaml");
        fs::write(&present, "max_depth: 3\n").unwrap();
        assert_eq!(
            ScanConfig::from_yaml_file(&present).unwrap().max_depth,
            Some(3)
        );
    }
}
