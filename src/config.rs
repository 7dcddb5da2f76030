//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema (catalog sources, audio,
//! UI, controls, logging) and helpers to load it from disk and environment.

mod load;
mod schema;

pub use load::*;
pub use schema::*;
