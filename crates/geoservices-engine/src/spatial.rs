use geo::algorithm::intersects::Intersects;
use geo::{BoundingRect, Geometry as GeoGeometry, Rect};
use geoservices_core::error::{GeoservicesError, Result};

/// Spatial relationship between a feature and the filter geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpatialRelation {
    /// Geometries share at least one point
    #[default]
    Intersects,
    /// Bounding boxes share at least one point
    EnvelopeIntersects,
}

impl SpatialRelation {
    /// Parse a `spatialRel` parameter; absent means intersects
    pub fn parse(name: Option<&str>) -> Result<Self> {
        match name.map(str::trim) {
            None | Some("") | Some("esriSpatialRelIntersects") => Ok(SpatialRelation::Intersects),
            Some("esriSpatialRelEnvelopeIntersects") => Ok(SpatialRelation::EnvelopeIntersects),
            Some(other) => Err(GeoservicesError::UnsupportedOperation {
                operation: format!("spatialRel {}", other),
            }),
        }
    }

    /// Evaluate the relationship
    pub fn evaluate(&self, geometry: &GeoGeometry<f64>, filter: &GeoGeometry<f64>) -> bool {
        match self {
            SpatialRelation::Intersects => geometry.intersects(filter),
            SpatialRelation::EnvelopeIntersects => {
                match (geometry.bounding_rect(), filter.bounding_rect()) {
                    (Some(a), Some(b)) => bounding_boxes_intersect(&a, &b),
                    _ => false,
                }
            }
        }
    }
}

/// Check if two bounding boxes intersect
fn bounding_boxes_intersect(a: &Rect, b: &Rect) -> bool {
    a.min().x <= b.max().x && a.max().x >= b.min().x && a.min().y <= b.max().y && a.max().y >= b.min().y
}
