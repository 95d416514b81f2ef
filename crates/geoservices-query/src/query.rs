use geojson::FeatureCollection;
use geoservices_core::config::QueryConfig;
use geoservices_core::error::Result;
use geoservices_core::models::{CountResponse, Dataset, QueryParams, QueryResponse};
use geoservices_core::ports::{QueryEngine, ResponseRenderer};
use tracing::debug;

use crate::post::post_query;
use crate::statistics::statistics_response;

/// Feature query interpreter
///
/// Owns the filtering engine, the response renderer and the query settings.
/// [`Geoservices::query`] picks the response shape; everything else is
/// delegated.
pub struct Geoservices<E, R>
where
    E: QueryEngine,
    R: ResponseRenderer,
{
    engine: E,
    renderer: R,
    config: QueryConfig,
}

impl<E, R> Geoservices<E, R>
where
    E: QueryEngine,
    R: ResponseRenderer,
{
    /// Create an interpreter with default settings
    pub fn new(engine: E, renderer: R) -> Self {
        Self { engine, renderer, config: QueryConfig::default() }
    }

    /// Replace the query settings
    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Answer a feature query
    ///
    /// Precomputed statistics and counts short-circuit before the engine runs.
    /// Otherwise features get synthetic identifiers if they lack one, the
    /// engine filters them, and `f=geojson` gets a `FeatureCollection` while
    /// every other format goes through Geoservices shaping.
    pub fn query(&self, mut dataset: Dataset, mut params: QueryParams) -> Result<QueryResponse> {
        normalize_params(&dataset, &mut params);

        if let Some(rows) = dataset.statistics.take() {
            debug!(rows = rows.len(), "Answering with precomputed statistics");
            return Ok(QueryResponse::Statistics(statistics_response(rows, &self.config)));
        }

        if params.return_count_only {
            if let Some(count) = dataset.count.filter(|count| *count > 0) {
                debug!(count, "Answering with precomputed count");
                return Ok(QueryResponse::Count(CountResponse { count }));
            }
        }

        let id_field = dataset.id_field(&self.config.id_field).to_string();

        if !params.has_out_statistics() && dataset.needs_synthetic_ids(&id_field) {
            debug!(id_field = %id_field, features = dataset.features.len(), "Assigning synthetic identifiers");
            dataset.assign_sequential_ids(&id_field);
        }

        if !params.f.is_geojson() {
            params.to_esri = true;
        }

        let output = self.engine.query(&dataset, &params)?;
        debug!(results = output.len(), to_esri = params.to_esri, "Engine query finished");

        if params.f.is_geojson() {
            return Ok(QueryResponse::GeoJson(FeatureCollection {
                bbox: None,
                features: output.into_geojson_features(),
                foreign_members: None,
            }));
        }

        post_query(&self.renderer, &dataset, output, params, &id_field)
    }
}

/// Drop filters the provider already applied, and the no-op `1=1`
pub fn normalize_params(dataset: &Dataset, params: &mut QueryParams) {
    if dataset.filters_applied.geometry {
        params.geometry = None;
    }

    if dataset.filters_applied.where_clause || params.where_clause.as_deref() == Some("1=1") {
        params.where_clause = None;
    }
}
