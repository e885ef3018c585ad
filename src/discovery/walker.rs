use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use super::{DiagnosticStage, ScanDiagnostic};
use crate::config::ScanConfig;
use crate::error::{error_chain, IoError};

/// Files found under a root, plus the subtrees that had to be skipped.
#[derive(Debug, Default)]
pub struct SourceWalk {
    /// Sorted by path components, so repeated walks agree.
    pub files: Vec<PathBuf>,
    pub diagnostics: Vec<ScanDiagnostic>,
}

/// Recursively collects source files under `root`.
///
/// Unreadable entries and symlink loops are reported as diagnostics and
/// skipped; only a missing or non-directory root is an error.
pub fn walk_source_files(root: &Path, config: &ScanConfig) -> Result<SourceWalk, IoError> {
    if !root.exists() {
        return Err(IoError::directory_not_found(root));
    }
    if !root.is_dir() {
        return Err(IoError::not_a_directory(root));
    }

    let mut walker = WalkDir::new(root)
        .follow_links(config.follow_links)
        .sort_by_file_name();
    if let Some(depth) = config.max_depth {
        walker = walker.max_depth(depth);
    }

    let mut walk = SourceWalk::default();
    let entries = walker
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded_dir(e, config));

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                walk.diagnostics
                    .push(ScanDiagnostic::new(path, DiagnosticStage::Walk, e.to_string()));
                continue;
            }
        };

        if !is_regular_file(&entry) || !has_source_extension(entry.path(), config) {
            continue;
        }

        if let Ok(meta) = entry.metadata() {
            if meta.len() > config.max_file_size {
                let err = IoError::file_too_large(entry.path(), meta.len(), config.max_file_size);
                debug!(error = %err, "skipping large file");
                walk.diagnostics.push(ScanDiagnostic::new(
                    entry.path(),
                    DiagnosticStage::Walk,
                    error_chain(&err),
                ));
                continue;
            }
        }

        walk.files.push(entry.into_path());
    }

    debug!(
        root = %root.display(),
        files = walk.files.len(),
        skipped = walk.diagnostics.len(),
        "walk complete"
    );
    Ok(walk)
}

fn is_excluded_dir(entry: &DirEntry, config: &ScanConfig) -> bool {
    entry.file_type().is_dir() && config.is_excluded_dir(&entry.file_name().to_string_lossy())
}

fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

fn has_source_extension(path: &Path, config: &ScanConfig) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| config.is_source_extension(ext))
}
