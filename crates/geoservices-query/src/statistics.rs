//! Statistics response built from precomputed rows.

use geoservices_core::config::QueryConfig;
use geoservices_core::models::{
    EsriFeature, EsriFieldType, JsonObject, StatisticsField, StatisticsResponse,
};
use serde_json::Value;

/// Build a statistics feature set from provider rows
///
/// Field names come from the first row, in its key order. An empty row list
/// produces empty alias, field and feature tables.
pub fn statistics_response(rows: Vec<JsonObject>, config: &QueryConfig) -> StatisticsResponse {
    let names: Vec<String> = rows.first().map(|row| row.keys().cloned().collect()).unwrap_or_default();

    let field_aliases = names
        .iter()
        .map(|name| (name.clone(), Value::String(name.clone())))
        .collect();

    let fields = names
        .iter()
        .map(|name| statistics_field(name, &rows, config.string_field_length))
        .collect();

    StatisticsResponse {
        display_field_name: String::new(),
        field_aliases,
        fields,
        features: rows.into_iter().map(EsriFeature::from_attributes).collect(),
    }
}

fn statistics_field(name: &str, rows: &[JsonObject], string_length: u32) -> StatisticsField {
    let field_type = rows
        .iter()
        .filter_map(|row| row.get(name))
        .find(|value| !value.is_null())
        .and_then(detect_type);

    StatisticsField {
        name: name.to_string(),
        field_type,
        alias: name.to_string(),
        length: matches!(field_type, Some(EsriFieldType::String)).then_some(string_length),
    }
}

/// Strings are `esriFieldTypeString`, numbers `esriFieldTypeDouble`
///
/// Only null, boolean and nested values are untyped. `0` is still a
/// number and `""` is still a string.
pub fn detect_type(value: &Value) -> Option<EsriFieldType> {
    match value {
        Value::String(_) => Some(EsriFieldType::String),
        Value::Number(_) => Some(EsriFieldType::Double),
        _ => None,
    }
}
