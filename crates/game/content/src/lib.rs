//! Data-driven content definitions and loaders.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Combat rules (data-driven via TOML)
//! - Handheld item catalogs (data-driven via RON)
//! - Encounter layouts with their units (data-driven via RON)
//!
//! A small skirmish ships in [`bundled`] so binaries run without a data
//! directory.
//!
//! All loaders use tactics-core types directly with serde for RON/TOML deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, EncounterLoader, EncounterSpec, FacingSpec, ItemCatalog, ItemLoader, LightSpec,
    LoadResult, UnitSpec,
};

/// Data files compiled into the crate.
pub mod bundled {
    pub const CONFIG: &str = include_str!("../data/config.toml");
    pub const ITEMS: &str = include_str!("../data/items.ron");
    pub const SKIRMISH: &str = include_str!("../data/skirmish.ron");
}
