use geoservices_core::error::{GeoservicesError, Result};
use geoservices_core::models::EsriFeature;
use geoservices_core::ports::{RenderContext, ResponseRenderer, Template};
use serde::Serialize;
use serde_json::{json, Value};

/// Renderer that hands back its inputs as one JSON document
///
/// Output is `{ template, context, features }`, with `context` holding the
/// extent, geometry type, spatial reference, attribute sample and request
/// parameters a template would see.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeRenderer;

impl ResponseRenderer for EnvelopeRenderer {
    fn render(
        &self,
        template: Template,
        features: &[EsriFeature],
        context: &RenderContext,
    ) -> Result<Value> {
        Ok(json!({
            "template": template.name(),
            "context": to_render_value(context)?,
            "features": to_render_value(features)?,
        }))
    }
}

fn to_render_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| GeoservicesError::Render { reason: e.to_string() })
}
