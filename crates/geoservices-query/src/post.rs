//! Geoservices response shaping after the engine has run.

use geoservices_core::error::Result;
use geoservices_core::models::{
    is_listed_id, Dataset, EsriFeature, ObjectIdsResponse, QueryParams, QueryResponse,
};
use geoservices_core::ports::{EngineOutput, RenderContext, ResponseRenderer, Template};
use serde_json::Value;
use tracing::debug;

use crate::context;

/// Shape engine output into a Geoservices response
///
/// `objectIds` narrows the features unless this is a statistics request.
/// Then the first of `returnCountOnly`, `returnIdsOnly`, `outStatistics`
/// decides the shape; with none of them the features template is rendered.
pub fn post_query<R: ResponseRenderer>(
    renderer: &R,
    dataset: &Dataset,
    output: EngineOutput,
    params: QueryParams,
    id_field: &str,
) -> Result<QueryResponse> {
    let statistics_request = params.has_out_statistics();
    let mut features = output.into_esri_features();

    if !statistics_request {
        if let Some(ids) = params.object_id_list() {
            features.retain(|f| has_listed_id(f, id_field, &ids));
            debug!(requested = ids.len(), matched = features.len(), "Applied objectIds filter");
        }
    }

    if params.return_count_only {
        return Ok(QueryResponse::count(features.len()));
    }

    if params.return_ids_only {
        return Ok(ids_only(&features, id_field));
    }

    if statistics_request {
        let render_context = RenderContext {
            object_id_field: id_field.to_string(),
            params,
            ..Default::default()
        };
        let rendered = renderer.render(Template::Statistics, &features, &render_context)?;
        return Ok(QueryResponse::Rendered(rendered));
    }

    let render_context = RenderContext {
        object_id_field: id_field.to_string(),
        extent: context::extent(&features, params.out_sr.as_ref()),
        geometry_type: context::geometry_type(dataset),
        spatial_reference: params.out_sr.clone(),
        attribute_sample: dataset.attribute_sample().cloned(),
        params,
    };
    let rendered = renderer.render(Template::Features, &features, &render_context)?;
    Ok(QueryResponse::Rendered(rendered))
}

/// Identifier values of the features, in order
pub fn ids_only(features: &[EsriFeature], id_field: &str) -> QueryResponse {
    QueryResponse::ObjectIds(ObjectIdsResponse {
        object_id_field: id_field.to_string(),
        object_ids: features
            .iter()
            .map(|f| f.attributes.get(id_field).cloned().unwrap_or(Value::Null))
            .collect(),
    })
}

/// Only numeric identifiers can match; `"3"` is not `3`
fn has_listed_id(feature: &EsriFeature, id_field: &str, ids: &[i64]) -> bool {
    is_listed_id(feature.attributes.get(id_field), ids)
}
