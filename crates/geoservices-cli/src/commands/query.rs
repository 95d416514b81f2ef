//! Query command implementation

use anyhow::{Context, Result};
use geoservices_core::models::{Dataset, QueryParams};
use geoservices_engine::MemoryEngine;
use geoservices_query::Geoservices;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::cli::QueryArgs;
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::render::EnvelopeRenderer;

pub fn execute(args: QueryArgs, config_file: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config(config_file, &args.overrides)?.resolve();

    let dataset = load_dataset(&args.dataset)?;
    let params = QueryParams::from_pairs(args.params).context("Failed to parse query parameters")?;

    info!(
        dataset = %args.dataset.display(),
        features = dataset.features.len(),
        "Running query"
    );

    let service = Geoservices::new(MemoryEngine::new(config.clone()), EnvelopeRenderer)
        .with_config(config);

    let response = service.query(dataset, params).context("Query failed")?;

    output.result(response)
}

/// Read a dataset file: a GeoJSON FeatureCollection plus optional provider members
fn load_dataset(path: &Path) -> Result<Dataset> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse dataset {}", path.display()))
}
