//! ddd-catalog build command

use super::{print_json, RunContext};
use crate::render;
use builder::{CatalogResult, CatalogSummary};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct BuildCommand {
    /// Marker file, directory or glob pattern
    pub input: String,

    /// Write the JSON report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Full catalog report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub input: &'a str,
    pub summary: CatalogSummary,
    #[serde(flatten)]
    pub result: &'a CatalogResult,
}

impl<'a> BuildReport<'a> {
    pub fn new(input: &'a str, result: &'a CatalogResult) -> Self {
        Self {
            generated_at: Utc::now(),
            input,
            summary: result.summary(),
            result,
        }
    }
}

impl BuildCommand {
    pub fn run(&self, ctx: &RunContext) -> anyhow::Result<()> {
        let result = ctx.build_catalog(&self.input)?;
        let report = BuildReport::new(&self.input, &result);

        if let Some(path) = &self.output {
            std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
            println!("Catalog written to {}", path.display());
            render::print_summary(&report.summary);
        } else if ctx.json {
            print_json(&report)?;
        } else {
            render::print_summary(&report.summary);
            if !result.diagnostics.is_empty() {
                println!();
                render::print_diagnostics(&result.diagnostics);
            }
        }

        Ok(())
    }
}
