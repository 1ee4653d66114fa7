//! ddd-catalog kinds command

use super::{print_json, RunContext};
use clap::Args;
use serde::Serialize;
use shared::PatternKind;

#[derive(Debug, Args)]
pub struct KindsCommand {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct KindRow {
    kind: PatternKind,
    display_name: &'static str,
    annotation: &'static str,
}

impl KindsCommand {
    pub fn run(&self, ctx: &RunContext) -> anyhow::Result<()> {
        let rows: Vec<KindRow> = PatternKind::ALL
            .iter()
            .map(|kind| KindRow {
                kind: *kind,
                display_name: kind.display_name(),
                annotation: kind.annotation_name(),
            })
            .collect();

        if ctx.json {
            return print_json(&rows);
        }

        println!("{:<24} {:<24} {}", "KIND", "NAME", "ANNOTATION");
        for row in &rows {
            println!(
                "{:<24} {:<24} {}",
                row.kind.as_str(),
                row.display_name,
                row.annotation
            );
        }
        Ok(())
    }
}
