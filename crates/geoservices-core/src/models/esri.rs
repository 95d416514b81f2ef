//! Esri JSON feature and geometry shapes.
//!
//! Conversion from GeoJSON only rearranges coordinates into the Esri layout
//! and fixes ring winding. Coordinates are never reprojected.

use geo::{LineString, Winding};
use geojson::{Feature, JsonObject};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Esri feature: an attribute map plus an optional Esri geometry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EsriFeature {
    pub attributes: JsonObject,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<EsriGeometry>,
}

impl EsriFeature {
    /// Attribute-only feature (statistics rows)
    pub fn from_attributes(attributes: JsonObject) -> Self {
        Self { attributes, geometry: None }
    }

    /// Convert a GeoJSON feature, moving properties into attributes
    pub fn from_geojson(feature: Feature) -> Self {
        Self {
            geometry: feature.geometry.as_ref().and_then(EsriGeometry::from_geojson),
            attributes: feature.properties.unwrap_or_default(),
        }
    }

    /// Attribute-only GeoJSON feature
    ///
    /// Esri geometries are not converted back.
    pub fn into_geojson(self) -> Feature {
        Feature {
            bbox: None,
            geometry: None,
            id: None,
            properties: Some(self.attributes),
            foreign_members: None,
        }
    }
}

/// Esri JSON geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EsriGeometry {
    Point {
        x: f64,
        y: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        z: Option<f64>,
    },
    Multipoint {
        points: Vec<Vec<f64>>,
    },
    Polyline {
        paths: Vec<Vec<Vec<f64>>>,
    },
    Polygon {
        rings: Vec<Vec<Vec<f64>>>,
    },
    Envelope {
        xmin: f64,
        ymin: f64,
        xmax: f64,
        ymax: f64,
    },
}

impl EsriGeometry {
    /// Convert a GeoJSON geometry
    ///
    /// Returns `None` for geometry collections and empty points.
    pub fn from_geojson(geometry: &geojson::Geometry) -> Option<Self> {
        use geojson::Value as G;

        match &geometry.value {
            G::Point(position) => {
                if position.len() < 2 {
                    return None;
                }
                Some(EsriGeometry::Point { x: position[0], y: position[1], z: position.get(2).copied() })
            }
            G::MultiPoint(points) => Some(EsriGeometry::Multipoint { points: points.clone() }),
            G::LineString(line) => Some(EsriGeometry::Polyline { paths: vec![line.clone()] }),
            G::MultiLineString(lines) => Some(EsriGeometry::Polyline { paths: lines.clone() }),
            G::Polygon(rings) => Some(EsriGeometry::Polygon { rings: orient_rings(rings) }),
            G::MultiPolygon(polygons) => Some(EsriGeometry::Polygon {
                rings: polygons.iter().flat_map(|rings| orient_rings(rings)).collect(),
            }),
            G::GeometryCollection(_) => None,
        }
    }

    /// Every `(x, y)` pair in the geometry
    pub fn coords(&self) -> Vec<(f64, f64)> {
        fn xy(positions: &[Vec<f64>]) -> impl Iterator<Item = (f64, f64)> + '_ {
            positions.iter().filter(|p| p.len() >= 2).map(|p| (p[0], p[1]))
        }

        match self {
            EsriGeometry::Point { x, y, .. } => vec![(*x, *y)],
            EsriGeometry::Multipoint { points } => xy(points).collect(),
            EsriGeometry::Polyline { paths: parts } | EsriGeometry::Polygon { rings: parts } => {
                parts.iter().flat_map(|part| xy(part)).collect()
            }
            EsriGeometry::Envelope { xmin, ymin, xmax, ymax } => {
                vec![(*xmin, *ymin), (*xmax, *ymax)]
            }
        }
    }
}

/// Reorder GeoJSON polygon rings into Esri winding
///
/// The first ring is the exterior and becomes clockwise; the remaining rings
/// are holes and become counter-clockwise.
fn orient_rings(rings: &[Vec<Vec<f64>>]) -> Vec<Vec<Vec<f64>>> {
    rings
        .iter()
        .enumerate()
        .map(|(idx, ring)| {
            let outline: LineString<f64> = ring
                .iter()
                .filter(|p| p.len() >= 2)
                .map(|p| (p[0], p[1]))
                .collect::<Vec<_>>()
                .into();

            let reverse = if idx == 0 { outline.is_ccw() } else { outline.is_cw() };

            let mut ring = ring.clone();
            if reverse {
                ring.reverse();
            }
            ring
        })
        .collect()
}

/// Esri geometry type names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EsriGeometryType {
    #[serde(rename = "esriGeometryPoint")]
    Point,
    #[serde(rename = "esriGeometryMultipoint")]
    Multipoint,
    #[serde(rename = "esriGeometryPolyline")]
    Polyline,
    #[serde(rename = "esriGeometryPolygon")]
    Polygon,
    #[serde(rename = "esriGeometryEnvelope")]
    Envelope,
}

impl EsriGeometryType {
    /// Parse a GeoJSON or Esri geometry type name
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Point" | "esriGeometryPoint" => Some(Self::Point),
            "MultiPoint" | "esriGeometryMultipoint" => Some(Self::Multipoint),
            "LineString" | "MultiLineString" | "esriGeometryPolyline" => Some(Self::Polyline),
            "Polygon" | "MultiPolygon" | "esriGeometryPolygon" => Some(Self::Polygon),
            "esriGeometryEnvelope" => Some(Self::Envelope),
            _ => None,
        }
    }

    /// Esri type of a GeoJSON geometry
    pub fn of_geojson(geometry: &geojson::Geometry) -> Option<Self> {
        use geojson::Value as G;

        match &geometry.value {
            G::Point(_) => Some(Self::Point),
            G::MultiPoint(_) => Some(Self::Multipoint),
            G::LineString(_) | G::MultiLineString(_) => Some(Self::Polyline),
            G::Polygon(_) | G::MultiPolygon(_) => Some(Self::Polygon),
            G::GeometryCollection(_) => None,
        }
    }
}

/// Bounding box of a feature set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<Value>,
}
