use anyhow::Result;
use std::fmt::Write;

use crate::cli::OutputFormat;
use crate::model::{DeploymentDetails, FlowDetails};

pub struct OutputFormatter;

impl OutputFormatter {
    /// JSON renders the `to_dict` records, so `--refetch` can read the output back.
    pub fn format_flows(flows: &[FlowDetails], format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => {
                let records: Vec<_> = flows.iter().map(FlowDetails::to_dict).collect();
                Ok(serde_json::to_string_pretty(&records)?)
            }
            OutputFormat::Text => Ok(Self::flows_table(flows)),
        }
    }

    pub fn format_deployments(
        deployments: &[DeploymentDetails],
        format: OutputFormat,
    ) -> Result<String> {
        match format {
            OutputFormat::Json => {
                let records: Vec<_> = deployments.iter().map(DeploymentDetails::to_dict).collect();
                Ok(serde_json::to_string_pretty(&records)?)
            }
            OutputFormat::Text => Ok(Self::deployments_table(deployments)),
        }
    }

    fn flows_table(flows: &[FlowDetails]) -> String {
        let mut out = String::new();
        for flow in flows {
            let location = match flow.line_number {
                Some(line) => format!("{}:{line}", flow.source_relative),
                None => flow.source_relative.clone(),
            };
            let _ = writeln!(
                out,
                "{}  {}  {}  {}.{}  {}",
                flow.id,
                flow.name,
                flow.obj_type.as_str(),
                flow.obj_parent,
                flow.obj_name,
                location
            );
        }
        let _ = writeln!(out, "{} flow(s)", flows.len());
        out
    }

    fn deployments_table(deployments: &[DeploymentDetails]) -> String {
        let mut out = String::new();
        for deployment in deployments {
            let _ = writeln!(
                out,
                "{}  {}  project={} branch={} flow={} env={}",
                deployment.id,
                deployment.name,
                deployment.project_name,
                deployment.branch,
                deployment.flow_name,
                deployment.env
            );
        }
        let _ = writeln!(out, "{} deployment(s)", deployments.len());
        out
    }
}
