//! Content loaders for reading game data from files.
//!
//! Every loader has a `load` function taking a path and a `parse` function
//! taking the file contents.

pub mod config;
pub mod encounter;
pub mod item;

pub use config::ConfigLoader;
pub use encounter::{EncounterLoader, EncounterSpec, FacingSpec, LightSpec, UnitSpec};
pub use item::{ItemCatalog, ItemLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
