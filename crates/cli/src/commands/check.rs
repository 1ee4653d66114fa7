//! ddd-catalog check command

use super::{print_json, RunContext};
use crate::render;
use clap::Args;
use shared::Severity;

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Marker file, directory or glob pattern
    pub input: String,

    /// Override the failing severity from the configuration
    #[arg(long)]
    pub fail_on: Option<Severity>,
}

impl CheckCommand {
    pub fn run(&self, ctx: &RunContext) -> anyhow::Result<()> {
        let result = ctx.build_catalog(&self.input)?;
        let threshold = self.fail_on.unwrap_or(ctx.config.fail_on);

        if ctx.json {
            print_json(&result.diagnostics)?;
        } else if result.diagnostics.is_empty() {
            println!("No findings in {} records", result.catalog.len());
        } else {
            render::print_diagnostics(&result.diagnostics);
            println!();
            println!(
                "{} error(s), {} warning(s)",
                result.error_count(),
                result.warning_count()
            );
        }

        if result.fails(threshold) {
            anyhow::bail!("catalog check failed at severity '{}'", threshold);
        }
        Ok(())
    }
}
