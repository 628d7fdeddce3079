//! CLI-specific configuration.
use std::env;
use std::path::PathBuf;

/// Where content comes from and what gets printed.
#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Directory holding `config.toml`, `items.ron` and `skirmish.ron`.
    /// The bundled skirmish is used when unset.
    pub data_dir: Option<PathBuf>,
    /// Print the board before and after the fight.
    pub show_board: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            show_board: true,
        }
    }
}

impl CliConfig {
    /// Construct CLI configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TACTICS_DATA_DIR` - Content directory (default: bundled data)
    /// - `TACTICS_SHOW_BOARD` - `true`/`false` (default: true)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("TACTICS_DATA_DIR") {
            config.data_dir = Some(dir);
        }
        if let Some(show) = read_env::<bool>("TACTICS_SHOW_BOARD") {
            config.show_board = show;
        }

        config
    }

    /// A positional argument overrides the data directory.
    pub fn with_args(mut self, mut args: impl Iterator<Item = String>) -> Self {
        if let Some(dir) = args.next() {
            self.data_dir = Some(PathBuf::from(dir));
        }
        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
