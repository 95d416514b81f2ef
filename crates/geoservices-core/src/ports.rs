//! Port trait definitions
//!
//! The query interpreter owns no filtering or rendering logic of its own.
//! These traits are the seams where those collaborators plug in.

pub mod engine;
pub mod render;

pub use engine::{EngineOutput, QueryEngine};
pub use render::{RenderContext, ResponseRenderer, Template};
