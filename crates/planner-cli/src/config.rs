use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use planner_core::models::DEFAULT_LIST_LIMIT;
use serde::Deserialize;

/// Config file looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "planner.toml";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// SQLite database file, created on first use.
    pub database_path: PathBuf,
    /// Row cap for `list` when `--limit` is not given.
    pub list_limit: u32,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("scheduler.db"),
            list_limit: DEFAULT_LIST_LIMIT,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Layers the TOML file (if present) under `PLANNER_*` environment
    /// variables.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let file = path.unwrap_or_else(|| Path::new(CONFIG_FILE));
        Self::figment(file).extract()
    }

    fn figment(file: &Path) -> Figment {
        Figment::new()
            .merge(Toml::file(file))
            .merge(Env::prefixed("PLANNER_"))
    }
}
