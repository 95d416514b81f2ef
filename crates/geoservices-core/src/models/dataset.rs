use geojson::{Feature, JsonObject};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A queried feature set handed over by a data provider
///
/// Deserializes from a GeoJSON `FeatureCollection` carrying optional
/// provider members (`metadata`, `statistics`, `filtersApplied`, `count`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Features with property maps and optional geometry
    #[serde(default)]
    pub features: Vec<Feature>,

    /// Provider metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DatasetMetadata>,

    /// Precomputed statistics rows
    ///
    /// Providers may send a single object or an array of objects.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub statistics: Option<Vec<JsonObject>>,

    /// Filters the provider already applied upstream
    #[serde(default)]
    pub filters_applied: FiltersApplied,

    /// Precomputed feature count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

/// Dataset metadata supplied by the provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetadata {
    /// Name of the unique identifier field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_field: Option<String>,

    /// Geometry type name (GeoJSON or `esriGeometry*`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry_type: Option<String>,

    /// Layer name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Any other provider metadata, carried through untouched
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Flags for filters a provider has already applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiltersApplied {
    #[serde(rename = "where", default)]
    pub where_clause: bool,

    #[serde(default)]
    pub geometry: bool,
}

impl Dataset {
    /// Create a dataset from bare features
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features, ..Default::default() }
    }

    /// Set the identifier field name in the metadata
    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.metadata.get_or_insert_with(DatasetMetadata::default).id_field =
            Some(id_field.into());
        self
    }

    /// Attach precomputed statistics rows
    pub fn with_statistics(mut self, statistics: Vec<JsonObject>) -> Self {
        self.statistics = Some(statistics);
        self
    }

    /// Attach a precomputed count
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// Identifier field declared by the provider, or `default`
    pub fn id_field<'a>(&'a self, default: &'a str) -> &'a str {
        self.metadata
            .as_ref()
            .and_then(|m| m.id_field.as_deref())
            .unwrap_or(default)
    }

    /// Whether the first feature lacks `id_field`
    ///
    /// An empty dataset never needs synthetic identifiers.
    pub fn needs_synthetic_ids(&self, id_field: &str) -> bool {
        match self.features.first() {
            Some(feature) => feature
                .properties
                .as_ref()
                .map_or(true, |props| !props.contains_key(id_field)),
            None => false,
        }
    }

    /// Set `id_field` on every feature to its position in the sequence
    pub fn assign_sequential_ids(&mut self, id_field: &str) {
        for (idx, feature) in self.features.iter_mut().enumerate() {
            feature
                .properties
                .get_or_insert_with(JsonObject::new)
                .insert(id_field.to_string(), Value::from(idx));
        }
    }

    /// Properties of the first feature, if any
    pub fn attribute_sample(&self) -> Option<&JsonObject> {
        self.features.first().and_then(|f| f.properties.as_ref())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(JsonObject),
    Many(Vec<JsonObject>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<JsonObject>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        OneOrMany::One(row) => vec![row],
        OneOrMany::Many(rows) => rows,
    }))
}
