//! Battle configuration loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the configuration bundled with this crate.
    pub fn builtin() -> LoadResult<BattleConfig> {
        Self::parse(include_str!("../../data/battle.toml"))
    }

    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Missing keys fall back to [`BattleConfig::default`].
    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    }
}
