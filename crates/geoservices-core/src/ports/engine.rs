use geojson::{Feature, JsonObject};

use crate::error::Result;
use crate::models::{Dataset, EsriFeature, QueryParams};

/// Port for the filtering/statistics engine
///
/// Implementations apply `where`, `geometry`, `outFields`, paging and
/// `outStatistics` to a dataset. When `params.to_esri` is set they should
/// answer with Esri-shaped features.
pub trait QueryEngine {
    fn query(&self, dataset: &Dataset, params: &QueryParams) -> Result<EngineOutput>;
}

/// Raw result of an engine query
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutput {
    /// GeoJSON features with properties
    GeoJson(Vec<Feature>),
    /// Esri features with attributes
    Esri(Vec<EsriFeature>),
    /// Aggregated statistics rows
    Statistics(Vec<JsonObject>),
}

impl EngineOutput {
    pub fn len(&self) -> usize {
        match self {
            EngineOutput::GeoJson(features) => features.len(),
            EngineOutput::Esri(features) => features.len(),
            EngineOutput::Statistics(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// GeoJSON features; Esri features and statistics rows keep only their attributes
    pub fn into_geojson_features(self) -> Vec<Feature> {
        match self {
            EngineOutput::GeoJson(features) => features,
            EngineOutput::Esri(features) => {
                features.into_iter().map(EsriFeature::into_geojson).collect()
            }
            EngineOutput::Statistics(rows) => rows
                .into_iter()
                .map(|row| EsriFeature::from_attributes(row).into_geojson())
                .collect(),
        }
    }

    /// Esri features; GeoJSON features are converted
    pub fn into_esri_features(self) -> Vec<EsriFeature> {
        match self {
            EngineOutput::GeoJson(features) => {
                features.into_iter().map(EsriFeature::from_geojson).collect()
            }
            EngineOutput::Esri(features) => features,
            EngineOutput::Statistics(rows) => {
                rows.into_iter().map(EsriFeature::from_attributes).collect()
            }
        }
    }
}
