use geojson::Feature;
use geoservices_core::config::QueryConfig;
use geoservices_core::error::{GeoservicesError, Result};
use geoservices_core::models::{is_listed_id, Dataset, EsriFeature, JsonObject, QueryParams};
use geoservices_core::ports::{EngineOutput, QueryEngine};
use tracing::debug;

use crate::filter::WhereClause;
use crate::geometry::{parse_filter_geometry, to_geo_geometry};
use crate::spatial::SpatialRelation;

/// In-memory query engine
///
/// Applies `objectIds`, `where`, `geometry`/`spatialRel`, `outFields` and
/// paging to the features of a dataset. Count and identifier requests see every match;
/// paging only limits feature responses, and never returns more than
/// `max_record_count` features.
#[derive(Debug, Clone, Default)]
pub struct MemoryEngine {
    config: QueryConfig,
}

impl MemoryEngine {
    pub fn new(config: QueryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    fn page_limit(&self, params: &QueryParams) -> usize {
        params
            .result_record_count
            .map_or(self.config.max_record_count, |n| n.min(self.config.max_record_count))
    }
}

impl QueryEngine for MemoryEngine {
    fn query(&self, dataset: &Dataset, params: &QueryParams) -> Result<EngineOutput> {
        if params.has_out_statistics() {
            return Err(GeoservicesError::UnsupportedOperation {
                operation: "outStatistics".to_string(),
            });
        }

        let clause = match params.where_clause.as_deref() {
            Some(text) => WhereClause::parse(text)?,
            None => WhereClause::parse("1=1")?,
        };

        let spatial = match params.geometry.as_ref().filter(|_| params.has_geometry()) {
            Some(value) => Some((
                parse_filter_geometry(value)?,
                SpatialRelation::parse(params.spatial_rel.as_deref())?,
            )),
            None => None,
        };

        let id_field = dataset.id_field(&self.config.id_field);
        let fields = OutFields::parse(params.out_fields.as_deref());
        let object_ids = params.object_id_list();

        // objectIds narrows before paging so listed features past the first page survive
        let matches = dataset.features.iter().filter(|feature| {
            if let Some(ids) = &object_ids {
                let id = feature.properties.as_ref().and_then(|p| p.get(id_field));
                if !is_listed_id(id, ids) {
                    return false;
                }
            }
            if !clause.matches(feature.properties.as_ref()) {
                return false;
            }
            match &spatial {
                Some((filter, relation)) => feature
                    .geometry
                    .as_ref()
                    .and_then(to_geo_geometry)
                    .is_some_and(|geometry| relation.evaluate(&geometry, filter)),
                None => true,
            }
        });

        let selected: Vec<Feature> = if params.return_count_only || params.return_ids_only {
            matches.cloned().collect()
        } else {
            matches
                .skip(params.result_offset.unwrap_or(0))
                .take(self.page_limit(params))
                .map(|feature| fields.apply(feature, id_field))
                .collect()
        };

        debug!(
            total = dataset.features.len(),
            selected = selected.len(),
            to_esri = params.to_esri,
            "Memory engine filtered features"
        );

        if params.to_esri {
            Ok(EngineOutput::Esri(selected.into_iter().map(EsriFeature::from_geojson).collect()))
        } else {
            Ok(EngineOutput::GeoJson(selected))
        }
    }
}

/// Parsed `outFields`
#[derive(Debug, Clone, PartialEq)]
enum OutFields {
    All,
    Only(Vec<String>),
}

impl OutFields {
    fn parse(raw: Option<&str>) -> Self {
        let names: Vec<String> = raw
            .unwrap_or("*")
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        if names.is_empty() || names.iter().any(|name| name == "*") {
            OutFields::All
        } else {
            OutFields::Only(names)
        }
    }

    /// Copy of the feature with only the selected properties plus the identifier
    fn apply(&self, feature: &Feature, id_field: &str) -> Feature {
        match self {
            OutFields::All => feature.clone(),
            OutFields::Only(names) => {
                let mut feature = feature.clone();
                if let Some(properties) = feature.properties.take() {
                    let kept: JsonObject = properties
                        .into_iter()
                        .filter(|(key, _)| key == id_field || names.iter().any(|name| name == key))
                        .collect();
                    feature.properties = Some(kept);
                }
                feature
            }
        }
    }
}
