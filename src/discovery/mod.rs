//! Source tree discovery.
pub mod walker;

use std::fmt;
use std::path::PathBuf;

pub use walker::{walk_source_files, SourceWalk};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticStage {
    Walk,
    Read,
    Parse,
    Collision,
}

impl DiagnosticStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticStage::Walk => "walk",
            DiagnosticStage::Read => "read",
            DiagnosticStage::Parse => "parse",
            DiagnosticStage::Collision => "collision",
        }
    }
}

/// A recoverable problem met while scanning. The scan continues past it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDiagnostic {
    pub path: PathBuf,
    pub stage: DiagnosticStage,
    pub message: String,
}

impl ScanDiagnostic {
    pub fn new(path: impl Into<PathBuf>, stage: DiagnosticStage, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for ScanDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.stage.as_str(),
            self.path.display(),
            self.message
        )
    }
}
