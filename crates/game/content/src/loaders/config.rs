//! Combat rules loader.

use std::path::Path;

use tactics_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
///
/// Missing keys keep their [`GameConfig::new`] defaults.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.grid_width == 0 || config.grid_height == 0 {
            anyhow::bail!(
                "grid must not be empty (got {}x{})",
                config.grid_width,
                config.grid_height
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = ConfigLoader::parse("grid_width = 12\npoison_damage = 7\n").unwrap();
        assert_eq!(config.grid_width, 12);
        assert_eq!(config.poison_damage, 7);
        assert_eq!(config.grid_height, GameConfig::DEFAULT_GRID_SIZE);
        assert_eq!(config.bulwark_armor, GameConfig::new().bulwark_armor);
    }

    #[test]
    fn empty_grid_is_rejected() {
        assert!(ConfigLoader::parse("grid_height = 0").is_err());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_action_points = 30").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.base_action_points, 30);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let error = ConfigLoader::load(&path).unwrap_err().to_string();
        assert!(error.contains("absent.toml"));
    }
}
