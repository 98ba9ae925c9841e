//! Value types shared by the mbtiles crates: tile coordinates, tile payloads,
//! content hashes, open modes, archive options and the typed usage errors.

pub mod config;
pub use config::*;

mod error;
pub use error::*;

pub mod types;
pub use types::*;
