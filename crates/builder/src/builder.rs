//! CatalogBuilder - Staged driver for one analysis run

use crate::result::CatalogResult;
use catalog::{Catalog, RecordNormalizer};
use resolver::{CrossReferenceResolver, Resolution, Validator};
use shared::{CatalogConfig, Diagnostic, Logger, OutOfOrderError, RawMarker, Result};
use std::fmt;
use std::sync::Arc;

/// Where a builder is in its pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    /// Accepting markers
    Collecting,
    /// References resolved, awaiting validation
    Resolved,
    /// Ready to finish
    Validated,
    /// A fault occurred; nothing more can be done with this builder
    Failed,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuildStage::Collecting => "collecting",
            BuildStage::Resolved => "resolved",
            BuildStage::Validated => "validated",
            BuildStage::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Builds a `CatalogResult` from raw markers
///
/// Each builder owns its catalog and serves exactly one run. Independent
/// builders can run on separate threads.
pub struct CatalogBuilder {
    logger: Arc<dyn Logger>,
    config: CatalogConfig,
    normalizer: RecordNormalizer,
    stage: BuildStage,
    catalog: Catalog,
    /// Normalizer findings, in input order
    normalized: Vec<Diagnostic>,
    resolution: Resolution,
    validated: Vec<Diagnostic>,
}

impl CatalogBuilder {
    /// Create a new CatalogBuilder
    pub fn new(logger: Arc<dyn Logger>, config: CatalogConfig) -> Self {
        Self {
            logger,
            normalizer: RecordNormalizer::new(&config),
            config,
            stage: BuildStage::Collecting,
            catalog: Catalog::new(),
            normalized: Vec::new(),
            resolution: Resolution::default(),
            validated: Vec::new(),
        }
    }

    pub fn stage(&self) -> BuildStage {
        self.stage
    }

    /// Records collected so far
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Normalize markers and add them to the catalog
    ///
    /// A fault (unknown kind, malformed field, duplicate id) fails the
    /// builder for good.
    pub fn ingest<'a>(&mut self, markers: impl IntoIterator<Item = &'a RawMarker>) -> Result<usize> {
        self.expect_stage(BuildStage::Collecting, "ingest markers")?;

        let mut added = 0;
        for marker in markers {
            if let Err(err) = self.ingest_one(marker) {
                tracing::error!(element_ref = %marker.element_ref, error = %err, "Marker rejected");
                self.stage = BuildStage::Failed;
                return Err(err);
            }
            added += 1;
        }

        tracing::debug!(added, total = self.catalog.len(), "Ingested markers");
        Ok(added)
    }

    fn ingest_one(&mut self, marker: &RawMarker) -> Result<()> {
        let normalized = self.normalizer.normalize(marker)?;
        self.catalog.add(normalized.record)?;
        self.normalized.extend(normalized.diagnostics);
        Ok(())
    }

    /// Resolve cross-references between collected records
    pub fn resolve(&mut self) -> Result<()> {
        self.expect_stage(BuildStage::Collecting, "resolve references")?;

        let resolver = CrossReferenceResolver::new(self.logger.clone());
        self.resolution = resolver.resolve(&self.catalog);
        self.stage = BuildStage::Resolved;

        tracing::info!(
            records = self.catalog.len(),
            links = self.resolution.links.len(),
            diagnostics = self.resolution.diagnostics.len(),
            "References resolved"
        );
        Ok(())
    }

    /// Check global invariants; requires a prior `resolve`
    pub fn validate(&mut self) -> Result<()> {
        self.expect_stage(BuildStage::Resolved, "validate the catalog")?;

        let validator = Validator::new(self.logger.clone());
        self.validated = validator.validate(&self.catalog, &self.resolution);
        self.stage = BuildStage::Validated;

        tracing::info!(diagnostics = self.validated.len(), "Catalog validated");
        Ok(())
    }

    /// Hand over the result; requires a prior `validate`
    pub fn finish(self) -> Result<CatalogResult> {
        self.expect_stage(BuildStage::Validated, "finish the run")?;

        let config = &self.config;
        let diagnostics = self
            .normalized
            .into_iter()
            .chain(self.resolution.diagnostics)
            .chain(self.validated)
            .map(|mut d| {
                d.severity = config.severity_for(d.code);
                d
            })
            .collect();

        Ok(CatalogResult {
            catalog: self.catalog,
            links: self.resolution.links,
            diagnostics,
        })
    }

    /// Run the whole pipeline over `markers`
    pub fn run<'a>(mut self, markers: impl IntoIterator<Item = &'a RawMarker>) -> Result<CatalogResult> {
        self.ingest(markers)?;
        self.resolve()?;
        self.validate()?;
        let result = self.finish()?;

        tracing::info!(
            records = result.catalog.len(),
            links = result.links.len(),
            errors = result.error_count(),
            warnings = result.warning_count(),
            "Catalog run complete"
        );
        Ok(result)
    }

    fn expect_stage(&self, expected: BuildStage, operation: &str) -> Result<()> {
        if self.stage != expected {
            return Err(OutOfOrderError {
                operation: operation.to_string(),
                stage: self.stage.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
