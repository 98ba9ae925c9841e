//! Contains tile coordinates, tile payloads, content hashes and open modes.

mod blob;
pub use blob::*;

mod content_hash;
pub use content_hash::*;

mod open_mode;
pub use open_mode::*;

mod tile;
pub use tile::*;

mod tile_coord;
pub use tile_coord::*;
