use anyhow::{Context as AnyhowContext, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::platform::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Parser, Debug)]
#[command(name = "flow-finder")]
#[command(about = "Discover Prefect flows and Airflow DAGs in Python source trees", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan a source tree for flow declarations
    Flows(FlowsArgs),
    /// List deployments from a JSON snapshot
    Deployments(DeploymentsArgs),
}

#[derive(ClapArgs, Debug)]
pub struct FlowsArgs {
    /// Root directory to scan
    #[arg(long, value_name = "DIR")]
    pub path: PathBuf,

    /// Orchestration platform whose declarations are recognized
    #[arg(long, default_value = "prefect")]
    pub platform: Platform,

    /// Only return flows in this top-level group. Can be repeated.
    #[arg(long, value_name = "GROUP")]
    pub group: Vec<String>,

    /// JSON list of previously found flows to refetch
    #[arg(long, value_name = "FILE")]
    pub refetch: Option<PathBuf>,

    /// YAML scan configuration
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (json, text)
    #[arg(short = 'f', long, default_value = "json")]
    pub format: OutputFormat,

    /// Output file path (prints to stdout if not specified)
    #[arg(short = 'O', long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct DeploymentsArgs {
    /// JSON list of deployment records
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,

    /// Only return deployments with this id. Can be repeated.
    #[arg(long, value_name = "ID")]
    pub id: Vec<String>,

    /// Only return deployments of this flow name. Can be repeated.
    #[arg(long, value_name = "NAME")]
    pub flow: Vec<String>,

    /// Only return deployments of this project. Can be repeated.
    #[arg(long, value_name = "GROUP")]
    pub group: Vec<String>,

    /// Output format (json, text)
    #[arg(short = 'f', long, default_value = "json")]
    pub format: OutputFormat,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Flows(flows) => flows.validate(),
            Command::Deployments(deployments) => deployments.validate(),
        }
    }
}

impl FlowsArgs {
    pub fn validate(&self) -> Result<()> {
        validate_path(&self.path)?;
        if !self.path.is_dir() {
            anyhow::bail!("Scan root is not a directory: {}", self.path.display());
        }
        if let Some(ref refetch) = self.refetch {
            validate_file(refetch, "Refetch")?;
        }
        if let Some(ref config) = self.config {
            validate_file(config, "Config")?;
        }
        Ok(())
    }
}

impl DeploymentsArgs {
    pub fn validate(&self) -> Result<()> {
        validate_file(&self.file, "Deployments")
    }
}

pub fn validate_path(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    if path.is_file() {
        std::fs::metadata(path).with_context(|| format!("Cannot read file: {}", path.display()))?;
    } else if path.is_dir() {
        std::fs::metadata(path)
            .with_context(|| format!("Cannot read directory: {}", path.display()))?;
    } else {
        anyhow::bail!("Path is neither a file nor a directory: {}", path.display());
    }

    Ok(())
}

fn validate_file(path: &Path, what: &str) -> Result<()> {
    if !path.is_file() {
        anyhow::bail!("{what} file does not exist: {}", path.display());
    }
    Ok(())
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
        }
    }
}
