use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::FlowFinder;
use crate::catalog::{CatalogBuilder, FlowCatalog};
use crate::config::ScanConfig;
use crate::discovery::{walk_source_files, DiagnosticStage, ScanDiagnostic, SourceWalk};
use crate::error::{error_chain, Error, IoError, Result};
use crate::model::FlowDetails;
use crate::parser::PythonParser;
use crate::platform::Platform;
use crate::visitor::{DeclarationVisitor, Discriminator};

/// Files that went into a scan and the problems met along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub files_scanned: usize,
    pub diagnostics: Vec<ScanDiagnostic>,
}

impl ScanReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub catalog: FlowCatalog,
    pub report: ScanReport,
    /// Where the next shard's discriminator should start.
    pub next_discriminator: u64,
}

impl ScanOutcome {
    /// Combines two independently scanned shards.
    pub fn merge(&mut self, other: ScanOutcome) {
        self.catalog.merge(other.catalog);
        self.report.files_scanned += other.report.files_scanned;
        self.report.diagnostics.extend(other.report.diagnostics);
        self.next_discriminator = self.next_discriminator.max(other.next_discriminator);
    }

    /// Per-file diagnostics followed by one entry per id collision.
    pub fn diagnostics(&self) -> Vec<ScanDiagnostic> {
        let collisions = self.catalog.collisions().iter().map(|c| {
            ScanDiagnostic::new(
                &c.dropped,
                DiagnosticStage::Collision,
                format!("duplicate flow id '{}', kept the record from {}", c.id, c.kept),
            )
        });
        self.report
            .diagnostics
            .iter()
            .cloned()
            .chain(collisions)
            .collect()
    }
}

/// Scans a source tree for one platform's flow declarations.
#[derive(Debug, Clone)]
pub struct SourceFlowFinder {
    root: PathBuf,
    platform: Platform,
    config: ScanConfig,
}

impl SourceFlowFinder {
    pub fn new(root: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            root: root.into(),
            platform,
            config: ScanConfig::default(),
        }
    }

    pub fn prefect(root: impl Into<PathBuf>) -> Self {
        Self::new(root, Platform::Prefect)
    }

    pub fn airflow(root: impl Into<PathBuf>) -> Self {
        Self::new(root, Platform::Airflow)
    }

    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Absolute form of the scan root.
    pub fn resolved_root(&self) -> Result<PathBuf> {
        if !self.root.exists() {
            return Err(IoError::directory_not_found(&self.root).into());
        }
        if !self.root.is_dir() {
            return Err(IoError::not_a_directory(&self.root).into());
        }
        fs::canonicalize(&self.root).map_err(|e| IoError::read_error(&self.root, e).into())
    }

    /// Walks the root and returns the files a scan would visit, in order.
    pub fn source_files(&self) -> Result<SourceWalk> {
        let root = self.resolved_root()?;
        Ok(walk_source_files(&root, &self.config)?)
    }

    pub fn scan(&self) -> Result<ScanOutcome> {
        let walk = self.source_files()?;
        let mut outcome = self.scan_files(&walk.files, Discriminator::default())?;

        let mut diagnostics = walk.diagnostics;
        diagnostics.append(&mut outcome.report.diagnostics);
        outcome.report.diagnostics = diagnostics;

        info!(
            root = %self.root.display(),
            platform = self.platform.as_str(),
            files = outcome.report.files_scanned,
            flows = outcome.catalog.len(),
            diagnostics = outcome.report.diagnostics.len(),
            "scan complete"
        );
        Ok(outcome)
    }

    /// Scans an explicit list of files under the root.
    ///
    /// Shards of one walk can be scanned independently and merged with
    /// [`ScanOutcome::merge`]; give each shard a discriminator range that
    /// does not overlap the others or the merge reports collisions.
    pub fn scan_files(&self, files: &[PathBuf], discriminator: Discriminator) -> Result<ScanOutcome> {
        let root = self.resolved_root()?;
        let builder = CatalogBuilder::new(&root);
        let mut parser = PythonParser::new()?;
        let mut discriminator = discriminator;
        let mut outcome = ScanOutcome::default();

        for path in files {
            outcome.report.files_scanned += 1;
            match self.scan_file(&mut parser, &builder, path, &mut discriminator) {
                Ok(flows) => {
                    debug!(file_path = %path.display(), flows = flows.len(), "scanned file");
                    for flow in flows {
                        outcome.catalog.insert(flow);
                    }
                }
                Err(err) => {
                    let stage = match err {
                        Error::Parser(_) => DiagnosticStage::Parse,
                        _ => DiagnosticStage::Read,
                    };
                    let message = error_chain(&err);
                    warn!(file_path = %path.display(), error = %message, "skipping file");
                    outcome
                        .report
                        .diagnostics
                        .push(ScanDiagnostic::new(path, stage, message));
                }
            }
        }

        outcome.next_discriminator = discriminator.peek();
        Ok(outcome)
    }

    fn scan_file(
        &self,
        parser: &mut PythonParser,
        builder: &CatalogBuilder,
        path: &Path,
        discriminator: &mut Discriminator,
    ) -> Result<Vec<FlowDetails>> {
        let source = fs::read_to_string(path).map_err(|e| IoError::read_error(path, e))?;
        let tree = parser.parse(&source, path)?;
        let location = builder.locate(path);
        let visitor = DeclarationVisitor::new(self.platform, &location.module);

        Ok(visitor
            .visit(&tree, &source, discriminator)
            .into_iter()
            .map(|declaration| builder.build(declaration, &location, self.platform))
            .collect())
    }
}

impl FlowFinder for SourceFlowFinder {
    fn scan_flows(&self) -> Result<Vec<FlowDetails>> {
        Ok(self.scan()?.catalog.into_flows())
    }
}
