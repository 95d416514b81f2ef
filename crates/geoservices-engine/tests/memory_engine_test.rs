//! End-to-end queries through the interpreter backed by the memory engine

use geoservices_core::config::QueryConfig;
use geoservices_core::error::Result;
use geoservices_core::models::{Dataset, EsriFeature, QueryParams};
use geoservices_core::ports::{RenderContext, ResponseRenderer, Template};
use geoservices_engine::MemoryEngine;
use geoservices_query::Geoservices;
use proptest::prelude::*;
use serde_json::{json, Value};

struct FeatureSetRenderer;

impl ResponseRenderer for FeatureSetRenderer {
    fn render(
        &self,
        template: Template,
        features: &[EsriFeature],
        context: &RenderContext,
    ) -> Result<Value> {
        Ok(json!({
            "template": template.name(),
            "objectIdField": context.object_id_field,
            "geometryType": context.geometry_type,
            "extent": context.extent,
            "features": features,
        }))
    }
}

fn interpreter() -> Geoservices<MemoryEngine, FeatureSetRenderer> {
    Geoservices::new(MemoryEngine::default(), FeatureSetRenderer)
}

fn parks() -> Dataset {
    serde_json::from_value(json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [-122.33, 47.61] },
                "properties": { "name": "Cal Anderson", "acres": 7.4 }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [-122.68, 45.52] },
                "properties": { "name": "Forest Park", "acres": 5200 }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [-123.14, 49.30] },
                "properties": { "name": "Stanley Park", "acres": 1001 }
            }
        ]
    }))
    .unwrap()
}

fn query(pairs: &[(&str, &str)]) -> Value {
    let params = QueryParams::from_pairs(pairs.iter().copied()).unwrap();
    interpreter().query(parks(), params).unwrap().to_json().unwrap()
}

#[test]
fn test_count_with_where() {
    assert_eq!(query(&[("where", "acres > 1000"), ("returnCountOnly", "true")]), json!({ "count": 2 }));
}

#[test]
fn test_ids_use_synthetic_identifiers() {
    assert_eq!(
        query(&[("where", "name <> 'Forest Park'"), ("returnIdsOnly", "true")]),
        json!({ "objectIdField": "OBJECTID", "objectIds": [0, 2] })
    );
}

#[test]
fn test_envelope_filter_with_object_ids() {
    let response = query(&[("geometry", "-124,45,-122,48"), ("objectIds", "1")]);

    let features = response["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["attributes"]["name"], json!("Forest Park"));
    assert_eq!(features[0]["geometry"], json!({ "x": -122.68, "y": 45.52 }));
    assert_eq!(response["geometryType"], json!("esriGeometryPoint"));
    assert_eq!(response["extent"]["xmin"], json!(-122.68));
}

#[test]
fn test_geojson_output_with_out_fields() {
    let response = query(&[("f", "geojson"), ("outFields", "name"), ("where", "acres < 10")]);

    assert_eq!(response["type"], json!("FeatureCollection"));
    assert_eq!(
        response["features"][0]["properties"],
        json!({ "name": "Cal Anderson", "OBJECTID": 0 })
    );
}

#[test]
fn test_statistics_request_is_refused() {
    let params =
        QueryParams::from_pairs([("outStatistics", r#"[{"statisticType":"sum","onStatisticField":"acres"}]"#)])
            .unwrap();
    assert!(interpreter().query(parks(), params).is_err());
}

#[test]
fn test_precomputed_statistics_skip_the_engine() {
    let dataset = parks().with_statistics(vec![json!({ "total_acres": 6208.4 })
        .as_object()
        .cloned()
        .unwrap()]);
    let params = QueryParams::from_pairs([("outStatistics", "[]"), ("where", "not sql at all")]).unwrap();

    let response = interpreter().query(dataset, params).unwrap().to_json().unwrap();
    assert_eq!(response["fields"][0]["type"], json!("esriFieldTypeDouble"));
}

#[test]
fn test_custom_identifier_field() {
    let engine = MemoryEngine::new(QueryConfig { id_field: "FID".to_string(), ..Default::default() });
    let service = Geoservices::new(engine, FeatureSetRenderer)
        .with_config(QueryConfig { id_field: "FID".to_string(), ..Default::default() });

    let params = QueryParams::from_pairs([("returnIdsOnly", "true")]).unwrap();
    let response = service.query(parks(), params).unwrap().to_json().unwrap();
    assert_eq!(response, json!({ "objectIdField": "FID", "objectIds": [0, 1, 2] }));
}

proptest! {
    #[test]
    fn prop_where_count_matches_manual_filter(
        values in prop::collection::vec(-1000i64..1000, 0..40),
        threshold in -1000i64..1000,
    ) {
        let features: Vec<Value> = values
            .iter()
            .map(|v| json!({ "type": "Feature", "geometry": null, "properties": { "v": v } }))
            .collect();
        let dataset: Dataset = serde_json::from_value(json!({ "features": features })).unwrap();

        let clause = format!("v >= {}", threshold);
        let params = QueryParams::from_pairs([("where", clause.as_str()), ("returnCountOnly", "true")]).unwrap();
        let response = interpreter().query(dataset, params).unwrap().to_json().unwrap();

        let expected = values.iter().filter(|v| **v >= threshold).count();
        prop_assert_eq!(response, json!({ "count": expected }));
    }
}

#[test]
fn test_object_id_beyond_record_cap() {
    let features: Vec<Value> = (0..3000)
        .map(|i| json!({ "type": "Feature", "geometry": null, "properties": { "name": format!("site {}", i) } }))
        .collect();
    let dataset: Dataset = serde_json::from_value(json!({ "features": features })).unwrap();
    let params = QueryParams::from_pairs([("objectIds", "2500")]).unwrap();

    let response = interpreter().query(dataset, params).unwrap().to_json().unwrap();

    let features = response["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["attributes"]["OBJECTID"], json!(2500));
    assert_eq!(features[0]["attributes"]["name"], json!("site 2500"));
}

#[test]
fn test_default_request_keeps_attributes() {
    for pairs in [vec![], vec![("outFields", "*")]] {
        let params = QueryParams::from_pairs(pairs).unwrap();
        let response = interpreter().query(parks(), params).unwrap().to_json().unwrap();

        let attributes = &response["features"][2]["attributes"];
        assert_eq!(attributes["name"], json!("Stanley Park"));
        assert_eq!(attributes["acres"], json!(1001));
        assert_eq!(attributes["OBJECTID"], json!(2));
    }
}
