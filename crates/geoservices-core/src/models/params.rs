use geojson::JsonObject;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{GeoservicesError, Result};

/// Parameters whose string form should be read as an integer
const NUMERIC_PARAMS: &[&str] = &["resultOffset", "resultRecordCount", "outSR"];

/// Feature query request parameters
///
/// Field names follow the Geoservices REST conventions. Parameters the
/// interpreter does not look at are kept in `extra` and still reach the
/// query engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    /// SQL-like attribute filter
    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<String>,

    /// Spatial filter geometry (Esri JSON, GeoJSON, or `xmin,ymin,xmax,ymax`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Value>,

    /// Type of the filter geometry (`esriGeometryEnvelope`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry_type: Option<String>,

    /// Spatial relationship of the filter geometry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_rel: Option<String>,

    /// Statistics definitions; any non-empty value marks an aggregation request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_statistics: Option<Value>,

    #[serde(default, deserialize_with = "flag")]
    pub return_count_only: bool,

    #[serde(default, deserialize_with = "flag")]
    pub return_ids_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_ids: Option<ObjectIds>,

    /// Output format
    #[serde(default)]
    pub f: OutputFormat,

    /// Output spatial reference, carried through to the response
    #[serde(rename = "outSR", default, skip_serializing_if = "Option::is_none")]
    pub out_sr: Option<Value>,

    /// `*` or comma-separated field list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_fields: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_offset: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_record_count: Option<usize>,

    /// Ask the engine for Esri-shaped features
    #[serde(default, deserialize_with = "flag")]
    pub to_esri: bool,

    /// Parameters not modelled above
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl QueryParams {
    /// Build parameters from raw `key=value` pairs such as a URL query string
    ///
    /// `true`/`false` become booleans, values that look like JSON objects or
    /// arrays are parsed as JSON, and integer-valued parameters are parsed as
    /// numbers. Everything else stays a string.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut object = JsonObject::new();
        for (key, value) in pairs {
            let key = key.as_ref();
            object.insert(key.to_string(), coerce_param(key, value.as_ref()));
        }

        serde_json::from_value(Value::Object(object))
            .map_err(|e| GeoservicesError::invalid_parameter("query", e.to_string()))
    }

    /// Whether this is a statistics/aggregation request
    pub fn has_out_statistics(&self) -> bool {
        is_truthy(self.out_statistics.as_ref())
    }

    /// Parsed `objectIds`, or `None` when the parameter is absent or empty
    pub fn object_id_list(&self) -> Option<Vec<i64>> {
        self.object_ids.as_ref().filter(|ids| !ids.is_empty()).map(ObjectIds::parse)
    }

    /// Whether a spatial filter was requested
    pub fn has_geometry(&self) -> bool {
        is_truthy(self.geometry.as_ref())
    }
}

fn coerce_param(key: &str, raw: &str) -> Value {
    let trimmed = raw.trim();

    match trimmed {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
            return parsed;
        }
    }

    if NUMERIC_PARAMS.contains(&key) {
        if let Ok(n) = trimmed.parse::<i64>() {
            return Value::from(n);
        }
    }

    Value::String(raw.to_string())
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Text(String),
    Number(i64),
}

fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawFlag>::deserialize(deserializer)? {
        Some(RawFlag::Bool(b)) => b,
        Some(RawFlag::Text(s)) => s.eq_ignore_ascii_case("true"),
        Some(RawFlag::Number(n)) => n != 0,
        None => false,
    })
}

/// Requested object identifiers
///
/// Accepts `"1,2,3"`, a single number, or an array of numbers or strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectIds {
    List(Vec<Value>),
    Single(i64),
    Text(String),
}

impl ObjectIds {
    pub fn is_empty(&self) -> bool {
        match self {
            ObjectIds::List(_) | ObjectIds::Single(_) => false,
            ObjectIds::Text(s) => s.is_empty(),
        }
    }

    /// Parse to integers, dropping entries that are not numbers
    pub fn parse(&self) -> Vec<i64> {
        match self {
            ObjectIds::Single(id) => vec![*id],
            ObjectIds::Text(s) => s.split(',').filter_map(parse_leading_int).collect(),
            ObjectIds::List(values) => values
                .iter()
                .filter_map(|v| match v {
                    Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
                    Value::String(s) => parse_leading_int(s),
                    _ => None,
                })
                .collect(),
        }
    }
}

/// Whether an identifier value is one of `ids`
///
/// Only numeric values match (`3` and `3.0`, never `"3"`); a missing value
/// never matches.
pub fn is_listed_id(value: Option<&Value>, ids: &[i64]) -> bool {
    value.and_then(as_integer).is_some_and(|id| ids.contains(&id))
}

fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// Read the leading base-10 integer of `s`, ignoring surrounding junk
///
/// `" 12abc"` parses as 12; `"abc"` does not parse.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };

    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Output format requested with `f`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OutputFormat {
    #[default]
    Json,
    Pjson,
    GeoJson,
    Other(String),
}

impl OutputFormat {
    pub fn is_geojson(&self) -> bool {
        matches!(self, OutputFormat::GeoJson)
    }
}

impl From<String> for OutputFormat {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "pjson" => OutputFormat::Pjson,
            "geojson" => OutputFormat::GeoJson,
            _ => OutputFormat::Other(s),
        }
    }
}

impl From<OutputFormat> for String {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => "json".to_string(),
            OutputFormat::Pjson => "pjson".to_string(),
            OutputFormat::GeoJson => "geojson".to_string(),
            OutputFormat::Other(s) => s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_pairs_coerces_values() {
        let params = QueryParams::from_pairs([
            ("where", "STATUS = 'open'"),
            ("returnCountOnly", "true"),
            ("outStatistics", r#"[{"statisticType":"count","onStatisticField":"OBJECTID"}]"#),
            ("resultRecordCount", "25"),
            ("outSR", "102100"),
            ("f", "geojson"),
            ("token", "abc"),
        ])
        .unwrap();

        assert_eq!(params.where_clause.as_deref(), Some("STATUS = 'open'"));
        assert!(params.return_count_only);
        assert!(!params.return_ids_only);
        assert!(params.has_out_statistics());
        assert_eq!(params.result_record_count, Some(25));
        assert_eq!(params.out_sr, Some(json!(102100)));
        assert!(params.f.is_geojson());
        assert_eq!(params.extra["token"], json!("abc"));
    }

    #[test]
    fn test_from_pairs_rejects_bad_numbers() {
        let result = QueryParams::from_pairs([("resultOffset", "ten")]);
        assert!(matches!(result, Err(GeoservicesError::InvalidParameter { .. })));
    }

    #[test]
    fn test_flags_accept_strings() {
        let params: QueryParams =
            serde_json::from_value(json!({ "returnIdsOnly": "TRUE", "returnCountOnly": "no" }))
                .unwrap();
        assert!(params.return_ids_only);
        assert!(!params.return_count_only);
    }

    #[test]
    fn test_out_statistics_truthiness() {
        let mut params = QueryParams::default();
        assert!(!params.has_out_statistics());

        params.out_statistics = Some(json!(""));
        assert!(!params.has_out_statistics());

        params.out_statistics = Some(json!([]));
        assert!(params.has_out_statistics());
    }

    #[test]
    fn test_object_ids_forms() {
        assert_eq!(ObjectIds::Text("1, 2,x,3abc".to_string()).parse(), vec![1, 2, 3]);
        assert_eq!(ObjectIds::Single(9).parse(), vec![9]);
        assert_eq!(
            ObjectIds::List(vec![json!(4), json!("5"), json!(null), json!(6.7)]).parse(),
            vec![4, 5, 6]
        );
    }

    #[test]
    fn test_empty_object_ids_are_ignored() {
        let params = QueryParams {
            object_ids: Some(ObjectIds::Text(String::new())),
            ..Default::default()
        };
        assert!(params.object_id_list().is_none());
    }

    #[test]
    fn test_object_ids_deserialize_from_array() {
        let params: QueryParams = serde_json::from_value(json!({ "objectIds": [1, 2] })).unwrap();
        assert_eq!(params.object_id_list(), Some(vec![1, 2]));
    }

    #[test]
    fn test_output_format() {
        assert_eq!(OutputFormat::from("GeoJSON".to_string()), OutputFormat::GeoJson);
        assert_eq!(OutputFormat::from("pjson".to_string()), OutputFormat::Pjson);
        assert_eq!(
            OutputFormat::from("html".to_string()),
            OutputFormat::Other("html".to_string())
        );
        assert!(!OutputFormat::default().is_geojson());
    }
}
