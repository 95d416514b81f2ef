//! Shared test doubles for interpreter integration tests

#![allow(dead_code)]

use geoservices_core::error::Result;
use geoservices_core::models::{Dataset, EsriFeature, JsonObject, QueryParams};
use geoservices_core::ports::{
    EngineOutput, QueryEngine, RenderContext, ResponseRenderer, Template,
};
use serde_json::{json, Value};
use std::cell::RefCell;

/// Engine that returns every feature unfiltered and records what it saw
#[derive(Default)]
pub struct PassthroughEngine {
    pub seen: RefCell<Option<(Dataset, QueryParams)>>,
    /// Rows returned when `outStatistics` is requested
    pub statistics: Vec<JsonObject>,
}

impl PassthroughEngine {
    pub fn with_statistics(rows: Vec<JsonObject>) -> Self {
        Self { statistics: rows, ..Default::default() }
    }

    pub fn seen_params(&self) -> QueryParams {
        self.seen.borrow().as_ref().map(|(_, p)| p.clone()).expect("engine was not called")
    }

    pub fn seen_dataset(&self) -> Dataset {
        self.seen.borrow().as_ref().map(|(d, _)| d.clone()).expect("engine was not called")
    }

    pub fn was_called(&self) -> bool {
        self.seen.borrow().is_some()
    }
}

impl QueryEngine for PassthroughEngine {
    fn query(&self, dataset: &Dataset, params: &QueryParams) -> Result<EngineOutput> {
        *self.seen.borrow_mut() = Some((dataset.clone(), params.clone()));

        if params.has_out_statistics() {
            return Ok(EngineOutput::Statistics(self.statistics.clone()));
        }

        let features = dataset.features.clone();
        Ok(if params.to_esri {
            EngineOutput::Esri(features.into_iter().map(EsriFeature::from_geojson).collect())
        } else {
            EngineOutput::GeoJson(features)
        })
    }
}

/// Renderer that echoes its inputs so tests can inspect them
pub struct EchoRenderer;

impl ResponseRenderer for EchoRenderer {
    fn render(
        &self,
        template: Template,
        features: &[EsriFeature],
        context: &RenderContext,
    ) -> Result<Value> {
        Ok(json!({
            "template": template.name(),
            "features": features,
            "context": context,
        }))
    }
}

pub fn point(x: f64, y: f64, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [x, y] },
        "properties": properties
    })
}

pub fn dataset(value: Value) -> Dataset {
    serde_json::from_value(value).expect("valid dataset")
}

/// Three unnumbered points
pub fn city_points() -> Dataset {
    dataset(json!({
        "type": "FeatureCollection",
        "features": [
            point(-122.4, 47.6, json!({ "name": "Seattle" })),
            point(-122.7, 45.5, json!({ "name": "Portland" })),
            point(-123.1, 49.3, json!({ "name": "Vancouver" }))
        ]
    }))
}

pub fn rows(value: Value) -> Vec<JsonObject> {
    value
        .as_array()
        .expect("array of rows")
        .iter()
        .map(|row| row.as_object().cloned().expect("object row"))
        .collect()
}
