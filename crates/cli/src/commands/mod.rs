//! CLI Commands

pub mod build;
pub mod check;
pub mod show;
pub mod kinds;

pub use build::BuildCommand;
pub use check::CheckCommand;
pub use show::ShowCommand;
pub use kinds::KindsCommand;

use anyhow::Context;
use builder::{CatalogBuilder, CatalogResult, TracingLogger};
use loader::MarkerLoader;
use shared::CatalogConfig;
use std::path::Path;
use std::sync::Arc;

/// Settings shared by every command
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub config: CatalogConfig,
    pub json: bool,
}

impl RunContext {
    /// Read the configuration file, or fall back to defaults
    pub fn load(config_path: Option<&Path>, json: bool) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(path) => CatalogConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => CatalogConfig::default(),
        };
        Ok(Self { config, json })
    }

    /// Load markers from `input` and run the builder over them
    pub fn build_catalog(&self, input: &str) -> anyhow::Result<CatalogResult> {
        let mut loader = MarkerLoader::new();
        let count = loader
            .load_input(input)
            .with_context(|| format!("failed to load markers from {}", input))?;
        tracing::debug!(count, input, "Markers loaded");

        let builder = CatalogBuilder::new(Arc::new(TracingLogger), self.config.clone());
        let result = builder
            .run(loader.markers())
            .context("catalog run failed")?;
        Ok(result)
    }
}

/// Print a value as pretty JSON
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
