//! Content factory for building battle inputs from a data directory.

use std::path::{Path, PathBuf};

use battle_core::{BattleConfig, Party};

use crate::ContentCatalog;
use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult, PartyLoader};

/// Content factory that loads battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── battle.toml
/// ├── moves.ron
/// ├── abilities.ron
/// ├── items.ron
/// └── parties/
///     ├── player.ron
///     └── wild.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle configuration from `battle.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        ConfigLoader::load(&self.data_dir.join("battle.toml"))
    }

    /// Load the move, ability, and held-item catalog.
    pub fn load_catalog(&self) -> LoadResult<ContentCatalog> {
        CatalogLoader::load_dir(&self.data_dir)
    }

    /// Load a party from `parties/{name}.ron`.
    pub fn load_party(&self, name: &str, catalog: &ContentCatalog) -> LoadResult<Party> {
        let path = self.data_dir.join("parties").join(format!("{}.ron", name));
        PartyLoader::load(&path, catalog)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
