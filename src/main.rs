use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use std::fs;
use tracing::{info, warn};

use portal_flow_finder::cli::{self, Command, DeploymentsArgs, FlowsArgs};
use portal_flow_finder::finder::flows_from_json;
use portal_flow_finder::logging::{self, Verbosity};
use portal_flow_finder::output::OutputFormatter;
use portal_flow_finder::{
    DeploymentDetails, DeploymentFilter, DeploymentFinder, FlowDetails, FlowFilter,
    JsonDeploymentFinder, ScanConfig, SourceFlowFinder,
};

fn main() -> Result<()> {
    let args = cli::Args::parse();
    logging::init(Verbosity::from_flags(args.verbose, args.quiet));
    args.validate().context("Invalid arguments")?;

    match args.command {
        Command::Flows(flows) => run_flows(flows),
        Command::Deployments(deployments) => run_deployments(deployments),
    }
}

fn run_flows(args: FlowsArgs) -> Result<()> {
    let config = match args.config {
        Some(ref path) => ScanConfig::from_yaml_file(path)?,
        None => ScanConfig::default(),
    };

    let flows_to_fetch = match args.refetch {
        Some(ref path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Cannot read refetch file: {}", path.display()))?;
            Some(flows_from_json(&content).with_context(|| {
                format!("Invalid refetch file: {}", path.display())
            })?)
        }
        None => None,
    };
    let flow_groups = (!args.group.is_empty()).then_some(args.group);
    let filter = FlowFilter::new(flows_to_fetch, flow_groups);

    let finder = SourceFlowFinder::new(&args.path, args.platform).with_config(config);
    let outcome = finder
        .scan()
        .with_context(|| format!("Failed to scan {}", args.path.display()))?;

    for diagnostic in outcome.diagnostics() {
        warn!("{diagnostic}");
    }

    let flows: Vec<FlowDetails> = filter.apply(outcome.catalog.into_flows());
    info!(flows = flows.len(), "selected flows");

    let rendered = OutputFormatter::format_flows(&flows, args.format)?;
    match args.output_file {
        Some(ref path) => fs::write(path, rendered)
            .with_context(|| format!("Cannot write output file: {}", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}

fn run_deployments(args: DeploymentsArgs) -> Result<()> {
    // `--id` and `--flow` become reference records carrying only the matched field.
    let deployments_to_fetch = (!args.id.is_empty()).then(|| {
        args.id
            .into_iter()
            .map(|id| DeploymentDetails {
                id,
                ..DeploymentDetails::default()
            })
            .collect()
    });
    let flows_to_fetch = (!args.flow.is_empty()).then(|| {
        args.flow
            .into_iter()
            .map(|name| FlowDetails::new(name, "", "", ""))
            .collect()
    });
    let filter = DeploymentFilter {
        deployments_to_fetch,
        flows_to_fetch,
        groups: (!args.group.is_empty()).then_some(args.group),
    };

    let finder = JsonDeploymentFinder::new(&args.file);
    let deployments = finder
        .get_deployments(&filter)
        .with_context(|| format!("Failed to load deployments from {}", args.file.display()))?;

    println!(
        "{}",
        OutputFormatter::format_deployments(&deployments, args.format)?
    );
    Ok(())
}
