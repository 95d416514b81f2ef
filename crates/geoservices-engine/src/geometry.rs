//! Conversions into `geo` geometries.
//!
//! Feature geometries arrive as GeoJSON. Filter geometries arrive in any of
//! the Geoservices request forms: an Esri envelope object, an
//! `xmin,ymin,xmax,ymax` string, an Esri point/multipoint/polyline/polygon,
//! or a GeoJSON geometry.

use geo::{Coord, Geometry as GeoGeometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon, Rect};
use geoservices_core::error::{GeoservicesError, Result};
use geoservices_core::models::EsriGeometry;
use serde_json::Value;

type Position = Vec<f64>;

/// Convert a GeoJSON geometry to a `geo::Geometry`
///
/// Returns `None` for points with fewer than two coordinates.
pub fn to_geo_geometry(geometry: &geojson::Geometry) -> Option<GeoGeometry<f64>> {
    from_geojson_value(&geometry.value)
}

fn from_geojson_value(value: &geojson::Value) -> Option<GeoGeometry<f64>> {
    use geojson::Value as G;

    let geometry = match value {
        G::Point(position) => GeoGeometry::Point(point(position)?),
        G::MultiPoint(positions) => {
            GeoGeometry::MultiPoint(MultiPoint::new(positions.iter().filter_map(|p| point(p)).collect()))
        }
        G::LineString(line) => GeoGeometry::LineString(line_string(line)),
        G::MultiLineString(lines) => {
            GeoGeometry::MultiLineString(MultiLineString::new(lines.iter().map(|l| line_string(l)).collect()))
        }
        G::Polygon(rings) => GeoGeometry::Polygon(polygon(rings)),
        G::MultiPolygon(polygons) => {
            GeoGeometry::MultiPolygon(MultiPolygon::new(polygons.iter().map(|p| polygon(p)).collect()))
        }
        G::GeometryCollection(members) => GeoGeometry::GeometryCollection(
            members.iter().filter_map(|g| from_geojson_value(&g.value)).collect(),
        ),
    };

    Some(geometry)
}

/// Convert an Esri geometry to a `geo::Geometry`
///
/// Polygon rings are split into polygons at every clockwise ring; each
/// counter-clockwise ring is a hole in the polygon before it.
fn esri_to_geo_geometry(geometry: &EsriGeometry) -> GeoGeometry<f64> {
    match geometry {
        EsriGeometry::Point { x, y, .. } => GeoGeometry::Point(Point::new(*x, *y)),
        EsriGeometry::Multipoint { points } => {
            GeoGeometry::MultiPoint(MultiPoint::new(points.iter().filter_map(|p| point(p)).collect()))
        }
        EsriGeometry::Polyline { paths } => {
            GeoGeometry::MultiLineString(MultiLineString::new(paths.iter().map(|p| line_string(p)).collect()))
        }
        EsriGeometry::Polygon { rings } => GeoGeometry::MultiPolygon(esri_polygons(rings)),
        EsriGeometry::Envelope { xmin, ymin, xmax, ymax } => {
            GeoGeometry::Rect(Rect::new(Coord { x: *xmin, y: *ymin }, Coord { x: *xmax, y: *ymax }))
        }
    }
}

/// Parse the `geometry` request parameter
pub fn parse_filter_geometry(value: &Value) -> Result<GeoGeometry<f64>> {
    match value {
        Value::String(text) => parse_filter_text(text),
        Value::Object(object) if object.contains_key("type") => {
            let geometry: geojson::Geometry = serde_json::from_value(value.clone())
                .map_err(|e| invalid(format!("invalid GeoJSON geometry: {}", e)))?;
            to_geo_geometry(&geometry).ok_or_else(|| invalid("empty GeoJSON geometry"))
        }
        Value::Object(_) => {
            let geometry: EsriGeometry = serde_json::from_value(value.clone())
                .map_err(|_| invalid("unrecognized Esri geometry"))?;
            Ok(esri_to_geo_geometry(&geometry))
        }
        other => Err(invalid(format!("unsupported geometry value {}", other))),
    }
}

/// `xmin,ymin,xmax,ymax` envelope, `x,y` point, or a JSON document
fn parse_filter_text(text: &str) -> Result<GeoGeometry<f64>> {
    let trimmed = text.trim();

    if trimmed.starts_with('{') {
        let value: Value = serde_json::from_str(trimmed)
            .map_err(|e| invalid(format!("invalid geometry JSON: {}", e)))?;
        return parse_filter_geometry(&value);
    }

    let numbers = trimmed
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<f64>, _>>()
        .map_err(|_| invalid(format!("'{}' is not a list of numbers", trimmed)))?;

    match numbers.as_slice() {
        [x, y] => Ok(GeoGeometry::Point(Point::new(*x, *y))),
        [xmin, ymin, xmax, ymax] => Ok(GeoGeometry::Rect(Rect::new(
            Coord { x: *xmin, y: *ymin },
            Coord { x: *xmax, y: *ymax },
        ))),
        _ => Err(invalid(format!("expected 2 or 4 coordinates, got {}", numbers.len()))),
    }
}

fn point(position: &[f64]) -> Option<Point<f64>> {
    match position {
        [x, y, ..] => Some(Point::new(*x, *y)),
        _ => None,
    }
}

fn line_string(positions: &[Position]) -> LineString<f64> {
    LineString::new(
        positions
            .iter()
            .filter(|p| p.len() >= 2)
            .map(|p| Coord { x: p[0], y: p[1] })
            .collect(),
    )
}

fn polygon(rings: &[Vec<Position>]) -> Polygon<f64> {
    let mut rings = rings.iter().map(|ring| line_string(ring));
    let exterior = rings.next().unwrap_or_else(|| LineString::new(vec![]));
    Polygon::new(exterior, rings.collect())
}

fn esri_polygons(rings: &[Vec<Position>]) -> MultiPolygon<f64> {
    use geo::Winding;

    let mut polygons: Vec<Polygon<f64>> = Vec::new();

    for ring in rings.iter().map(|ring| line_string(ring)) {
        match polygons.last_mut() {
            Some(current) if ring.is_ccw() => current.interiors_push(ring),
            _ => polygons.push(Polygon::new(ring, vec![])),
        }
    }

    MultiPolygon::new(polygons)
}

fn invalid(reason: impl Into<String>) -> GeoservicesError {
    GeoservicesError::invalid_parameter("geometry", reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_string() {
        let geometry = parse_filter_geometry(&json!("-10, -5, 10, 5")).unwrap();
        match geometry {
            GeoGeometry::Rect(rect) => {
                assert_eq!(rect.min(), Coord { x: -10.0, y: -5.0 });
                assert_eq!(rect.max(), Coord { x: 10.0, y: 5.0 });
            }
            other => panic!("expected rect, got {:?}", other),
        }
    }

    #[test]
    fn test_point_string() {
        let geometry = parse_filter_geometry(&json!("1.5,2")).unwrap();
        assert_eq!(geometry, GeoGeometry::Point(Point::new(1.5, 2.0)));
    }

    #[test]
    fn test_esri_envelope_object() {
        let geometry =
            parse_filter_geometry(&json!({ "xmin": 0, "ymin": 0, "xmax": 2, "ymax": 3 })).unwrap();
        assert!(matches!(geometry, GeoGeometry::Rect(_)));
    }

    #[test]
    fn test_esri_point_object_with_spatial_reference() {
        let geometry = parse_filter_geometry(
            &json!({ "x": 4.0, "y": 5.0, "spatialReference": { "wkid": 4326 } }),
        )
        .unwrap();
        assert_eq!(geometry, GeoGeometry::Point(Point::new(4.0, 5.0)));
    }

    #[test]
    fn test_json_text_is_parsed() {
        let geometry = parse_filter_geometry(&json!("{\"x\": 1, \"y\": 2}")).unwrap();
        assert_eq!(geometry, GeoGeometry::Point(Point::new(1.0, 2.0)));
    }

    #[test]
    fn test_geojson_polygon_object() {
        let geometry = parse_filter_geometry(&json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]]]
        }))
        .unwrap();

        match geometry {
            GeoGeometry::Polygon(polygon) => assert_eq!(polygon.exterior().0.len(), 5),
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_esri_rings_split_into_polygons() {
        // Clockwise exterior, counter-clockwise hole, second clockwise exterior
        let rings = vec![
            vec![vec![0.0, 0.0], vec![0.0, 10.0], vec![10.0, 10.0], vec![10.0, 0.0], vec![0.0, 0.0]],
            vec![vec![2.0, 2.0], vec![4.0, 2.0], vec![4.0, 4.0], vec![2.0, 4.0], vec![2.0, 2.0]],
            vec![vec![20.0, 0.0], vec![20.0, 5.0], vec![25.0, 5.0], vec![25.0, 0.0], vec![20.0, 0.0]],
        ];

        match esri_to_geo_geometry(&EsriGeometry::Polygon { rings }) {
            GeoGeometry::MultiPolygon(multi) => {
                assert_eq!(multi.0.len(), 2);
                assert_eq!(multi.0[0].interiors().len(), 1);
                assert!(multi.0[1].interiors().is_empty());
            }
            other => panic!("expected multipolygon, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_filter_geometry(&json!("a,b,c,d")).is_err());
        assert!(parse_filter_geometry(&json!("1,2,3")).is_err());
        assert!(parse_filter_geometry(&json!(42)).is_err());
        assert!(parse_filter_geometry(&json!({ "foo": 1 })).is_err());
    }

    #[test]
    fn test_short_point_has_no_geometry() {
        let geometry = geojson::Geometry::new(geojson::Value::Point(vec![1.0]));
        assert!(to_geo_geometry(&geometry).is_none());
    }
}
