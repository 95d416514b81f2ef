pub mod dataset;
pub mod esri;
pub mod params;
pub mod response;

pub use dataset::{Dataset, DatasetMetadata, FiltersApplied};
pub use esri::{EsriFeature, EsriGeometry, EsriGeometryType, Extent};
pub use params::{is_listed_id, ObjectIds, OutputFormat, QueryParams};
pub use response::{
    CountResponse, EsriFieldType, ObjectIdsResponse, QueryResponse, StatisticsField,
    StatisticsResponse,
};

/// JSON object used for feature properties, attributes, and statistics rows
pub use geojson::JsonObject;
