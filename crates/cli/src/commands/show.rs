//! ddd-catalog show command

use super::{print_json, RunContext};
use crate::render;
use builder::CatalogResult;
use clap::Args;
use shared::{PatternKind, RecordId};

#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Marker file, directory or glob pattern
    pub input: String,

    /// Only records of this kind (e.g. entity, DddAggregateRoot)
    #[arg(short, long)]
    pub kind: Option<PatternKind>,

    /// Only records with this name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Only the record with this id (requires --kind)
    #[arg(long, requires = "kind")]
    pub id: Option<String>,
}

impl ShowCommand {
    pub fn run(&self, ctx: &RunContext) -> anyhow::Result<()> {
        let result = ctx.build_catalog(&self.input)?;
        let selected = self.select(&result);

        if ctx.json {
            let records: Vec<_> = selected
                .iter()
                .filter_map(|rid| result.catalog.get(*rid))
                .collect();
            return print_json(&records);
        }

        if selected.is_empty() {
            println!("No matching records");
            return Ok(());
        }

        for rid in selected {
            print_record(&result, rid);
        }
        Ok(())
    }

    /// Record ids matching every given filter, in catalog order
    pub fn select(&self, result: &CatalogResult) -> Vec<RecordId> {
        let catalog = &result.catalog;

        if let (Some(kind), Some(id)) = (self.kind, self.id.as_deref()) {
            return catalog
                .find_by_id(kind, id)
                .map(|(rid, _)| rid)
                .into_iter()
                .collect();
        }

        let mut selected: Vec<RecordId> = match self.name.as_deref() {
            Some(name) => catalog.find_by_name(name).map(|(rid, _)| rid).collect(),
            None => catalog.iter().map(|(rid, _)| rid).collect(),
        };
        if let Some(kind) = self.kind {
            selected.retain(|rid| catalog.get(*rid).map(|r| r.kind()) == Some(kind));
        }
        selected.sort();
        selected
    }
}

fn print_record(result: &CatalogResult, rid: RecordId) {
    let Some(record) = result.catalog.get(rid) else {
        return;
    };

    println!("{}", render::describe_record(record));
    if let Some(description) = &record.description {
        println!("  {}", description);
    }
    for attribute in &record.attributes {
        println!("  @{}={}", attribute.key, attribute.val);
    }
    for container in result.catalog.containers_of(rid) {
        if let Some(container) = result.catalog.get(container) {
            println!("  in {}", render::describe_record(container));
        }
    }
    for link in result.links_of(rid) {
        println!("  {}", render::describe_link(result, link));
    }
}
