//! Human-readable output

use builder::{CatalogResult, CatalogSummary};
use console::style;
use shared::{Diagnostic, ElementRecord, RecordId, ReferenceLink, Severity};

/// Severity label, colored when the terminal supports it
pub fn severity_label(severity: Severity) -> String {
    match severity {
        Severity::Error => style("error").red().bold().to_string(),
        Severity::Warning => style("warning").yellow().bold().to_string(),
    }
}

/// One-line description of a record
pub fn describe_record(record: &ElementRecord) -> String {
    let mut line = if record.name.is_empty() {
        format!("{} <{}>", record.kind(), record.element_ref)
    } else {
        format!("{} '{}' <{}>", record.kind(), record.name, record.element_ref)
    };
    if let Some(id) = &record.id {
        line.push_str(&format!(" id={}", id));
    }
    line
}

/// `source -[relation]-> target` using record names
pub fn describe_link(result: &CatalogResult, link: &ReferenceLink) -> String {
    format!(
        "{} -[{}]-> {}",
        record_label(result, link.source),
        link.relation,
        record_label(result, link.target)
    )
}

fn record_label(result: &CatalogResult, id: RecordId) -> String {
    match result.catalog.get(id) {
        Some(record) if !record.name.is_empty() => record.name.clone(),
        Some(record) => record.element_ref.to_string(),
        None => id.to_string(),
    }
}

pub fn print_summary(summary: &CatalogSummary) {
    println!("{}", style("Catalog").bold());
    println!("  records: {}", summary.records);
    for (kind, count) in &summary.records_by_kind {
        println!("    {:<24} {}", kind.display_name(), count);
    }
    println!("  links: {}", summary.links);
    for (relation, count) in &summary.links_by_relation {
        println!("    {:<24} {}", relation.as_str(), count);
    }
    println!(
        "  diagnostics: {} error(s), {} warning(s)",
        summary.errors, summary.warnings
    );
}

pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        println!(
            "{}[{}]: {}",
            severity_label(diagnostic.severity),
            diagnostic.code,
            diagnostic.message
        );
        for record in &diagnostic.records {
            println!("    at {}", record);
        }
    }
}
