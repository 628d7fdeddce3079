//! Item catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::HandheldItem;

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<HandheldItem>,
}

impl ItemCatalog {
    /// Finds an item by name, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&HandheldItem> {
        self.items
            .iter()
            .find(|item| item.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<ItemCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parses a catalog and rejects duplicate names and inverted ranges.
    pub fn parse(content: &str) -> LoadResult<ItemCatalog> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        for (index, item) in catalog.items.iter().enumerate() {
            if item.min_range > item.max_range {
                anyhow::bail!(
                    "item '{}' has min range {} above max range {}",
                    item.name,
                    item.min_range,
                    item.max_range
                );
            }
            if catalog.items[..index]
                .iter()
                .any(|other| other.name.eq_ignore_ascii_case(&item.name))
            {
                anyhow::bail!("item '{}' is defined twice", item.name);
            }
        }
        Ok(catalog)
    }
}
