//! Catalog loading: album/song JSON documents flattened into track lists.
//!
//! `load_catalog` is the synchronous, fail-soft entry point. `CatalogLoader`
//! runs it off the UI thread and tags each result with a sequence number so
//! the runtime can drop responses that were overtaken by a newer request.

mod load;
mod loader;
mod model;
mod sources;

pub use load::*;
pub use loader::*;
pub use model::*;
pub use sources::*;
