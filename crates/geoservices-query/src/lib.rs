//! Geoservices Query - Request interpretation and response shaping
//!
//! This crate turns a dataset plus request parameters into a count, an
//! object-ID list, a statistics table, a GeoJSON `FeatureCollection`, or a
//! rendered Geoservices feature response. Filtering is delegated to a
//! [`QueryEngine`](geoservices_core::ports::QueryEngine) and templating to a
//! [`ResponseRenderer`](geoservices_core::ports::ResponseRenderer).

pub mod context;
pub mod post;
pub mod query;
pub mod statistics;

pub use query::{normalize_params, Geoservices};
pub use statistics::statistics_response;
