use geojson::JsonObject;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::models::{EsriFeature, EsriGeometryType, Extent, QueryParams};

/// Response templates known to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    Features,
    Statistics,
}

impl Template {
    pub fn name(&self) -> &'static str {
        match self {
            Template::Features => "features",
            Template::Statistics => "statistics",
        }
    }
}

/// Values a renderer needs besides the features themselves
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderContext {
    pub object_id_field: String,

    /// Bounding box of the queried features
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent: Option<Extent>,

    /// Geometry type of the source dataset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry_type: Option<EsriGeometryType>,

    /// Requested `outSR`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<Value>,

    /// Properties of the first source feature, for field inference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_sample: Option<JsonObject>,

    /// The normalized request parameters
    pub params: QueryParams,
}

/// Port for the response templating engine
pub trait ResponseRenderer {
    fn render(
        &self,
        template: Template,
        features: &[EsriFeature],
        context: &RenderContext,
    ) -> Result<Value>;
}
