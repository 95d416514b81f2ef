//! Values computed for the features template.

use geo::{BoundingRect, MultiPoint, Point};
use geoservices_core::models::{Dataset, EsriFeature, EsriGeometryType, Extent};
use serde_json::Value;

/// Bounding box over every coordinate of the features
///
/// Returns `None` when no feature carries a geometry.
pub fn extent(features: &[EsriFeature], spatial_reference: Option<&Value>) -> Option<Extent> {
    let points: MultiPoint<f64> = features
        .iter()
        .filter_map(|f| f.geometry.as_ref())
        .flat_map(|g| g.coords())
        .map(Point::from)
        .collect();

    let rect = points.bounding_rect()?;

    Some(Extent {
        xmin: rect.min().x,
        ymin: rect.min().y,
        xmax: rect.max().x,
        ymax: rect.max().y,
        spatial_reference: spatial_reference.cloned(),
    })
}

/// Esri geometry type of a dataset
///
/// Declared metadata wins; otherwise the first feature with a geometry decides.
pub fn geometry_type(dataset: &Dataset) -> Option<EsriGeometryType> {
    let declared = dataset
        .metadata
        .as_ref()
        .and_then(|m| m.geometry_type.as_deref())
        .and_then(EsriGeometryType::parse);

    declared.or_else(|| {
        dataset
            .features
            .iter()
            .find_map(|f| f.geometry.as_ref())
            .and_then(EsriGeometryType::of_geojson)
    })
}
