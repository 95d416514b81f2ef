//! Geoservices Core - Domain models, configuration, and port definitions
//!
//! This crate contains the request/response models and the port traits that
//! the query interpreter is written against.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{GeoservicesError, Result};
