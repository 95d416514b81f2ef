use geojson::{FeatureCollection, JsonObject};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::esri::EsriFeature;
use crate::error::Result;

/// Response produced for a feature query
///
/// Serialized untagged, so each variant is exactly its JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResponse {
    /// `{ "count": N }`
    Count(CountResponse),
    /// `{ "objectIdField": ..., "objectIds": [...] }`
    ObjectIds(ObjectIdsResponse),
    /// Statistics feature set built from precomputed rows
    Statistics(StatisticsResponse),
    /// GeoJSON `FeatureCollection`
    GeoJson(FeatureCollection),
    /// Output of the response renderer
    Rendered(Value),
}

impl QueryResponse {
    pub fn count(count: usize) -> Self {
        QueryResponse::Count(CountResponse { count: count as u64 })
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectIdsResponse {
    pub object_id_field: String,

    /// Identifier values in feature order; missing identifiers are `null`
    pub object_ids: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    pub display_field_name: String,

    /// Every statistics field mapped to itself
    pub field_aliases: JsonObject,

    pub fields: Vec<StatisticsField>,

    pub features: Vec<EsriFeature>,
}

/// Field descriptor in a statistics response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsField {
    pub name: String,

    /// Inferred type; `null` when no value could be classified
    #[serde(rename = "type")]
    pub field_type: Option<EsriFieldType>,

    pub alias: String,

    /// Only present for string fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EsriFieldType {
    #[serde(rename = "esriFieldTypeString")]
    String,
    #[serde(rename = "esriFieldTypeDouble")]
    Double,
}
