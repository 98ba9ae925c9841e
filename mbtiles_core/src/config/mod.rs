//! Options controlling how archives are opened, written and closed.

mod archive_options;
pub use archive_options::*;
