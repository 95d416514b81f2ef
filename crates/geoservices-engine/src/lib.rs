//! Geoservices Engine - In-memory reference query engine
//!
//! This crate provides a [`MemoryEngine`] that applies attribute and spatial
//! filters, field selection and paging to a dataset held in memory. It does
//! not compute `outStatistics` aggregates.

pub mod filter;
pub mod geometry;
pub mod memory;
pub mod spatial;

pub use filter::WhereClause;
pub use memory::MemoryEngine;
