//! The archive and the stores it is composed of.

#[allow(clippy::module_inception)]
mod archive;
pub use archive::Archive;

mod connection;

mod content_store;
pub use content_store::ContentStore;

mod coordinate_index;
pub use coordinate_index::{CoordinateIndex, TileColumn};

mod metadata;
pub use metadata::Metadata;

mod schema;

mod tile_batches;
pub use tile_batches::TileBatches;
