//! Move, ability, and held-item catalog loader.

use std::path::Path;

use anyhow::Context;
use battle_core::{AbilityData, HeldItemData, MoveData};
use serde::{Deserialize, Serialize};

use crate::ContentCatalog;
use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveCatalog {
    pub moves: Vec<MoveData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityCatalog {
    pub abilities: Vec<AbilityData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeldItemCatalog {
    pub items: Vec<HeldItemData>,
}

/// Loader for the content catalog.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Loads the catalog bundled with this crate.
    pub fn builtin() -> LoadResult<ContentCatalog> {
        Self::parse(
            include_str!("../../data/moves.ron"),
            include_str!("../../data/abilities.ron"),
            include_str!("../../data/items.ron"),
        )
    }

    /// Loads `moves.ron`, `abilities.ron`, and `items.ron` from `dir`.
    pub fn load_dir(dir: &Path) -> LoadResult<ContentCatalog> {
        let moves = read_file(&dir.join("moves.ron"))?;
        let abilities = read_file(&dir.join("abilities.ron"))?;
        let items = read_file(&dir.join("items.ron"))?;
        Self::parse(&moves, &abilities, &items)
    }

    /// Parses the three catalog documents and validates the result.
    pub fn parse(moves: &str, abilities: &str, items: &str) -> LoadResult<ContentCatalog> {
        let moves: MoveCatalog = ron::from_str(moves).context("Failed to parse move catalog RON")?;
        let abilities: AbilityCatalog =
            ron::from_str(abilities).context("Failed to parse ability catalog RON")?;
        let items: HeldItemCatalog =
            ron::from_str(items).context("Failed to parse held item catalog RON")?;

        let catalog = ContentCatalog::new(moves.moves, abilities.abilities, items.items);
        catalog
            .validate()
            .context("Move catalog has no usable fallback move")?;
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use battle_core::{
        AbilityId, ContentOracle, ItemId, ItemTurnEffect, MoveEffect, MoveFlags, MoveId,
        MoveTarget, StatusKind,
    };

    use super::*;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = CatalogLoader::builtin().unwrap();

        let struggle = catalog.move_data(MoveId::STRUGGLE).unwrap();
        assert!(struggle.flags.contains(MoveFlags::FALLBACK));
        assert_eq!(struggle.effect, MoveEffect::Recoil { divisor: 4 });

        let focus_punch = catalog.move_data(MoveId(8)).unwrap();
        assert!(focus_punch.announces());
        assert_eq!(focus_punch.priority, -3);

        let wave = catalog.move_data(MoveId(3)).unwrap();
        assert_eq!(wave.target, MoveTarget::SelectedOpponent);
        assert_eq!(
            wave.effect,
            MoveEffect::Inflict {
                status: StatusKind::Paralysis,
                chance: 100
            }
        );

        assert!(catalog.ability(AbilityId(1)).unwrap().trigger.is_some());
        assert_eq!(
            catalog.held_item(ItemId(1)).unwrap().end_of_turn,
            Some(ItemTurnEffect::Heal { divisor: 16 })
        );
    }

    #[test]
    fn loads_catalog_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("moves.ron"),
            r#"MoveCatalog(moves: [
                (id: MoveId(0), name: "Struggle", power: 50, pp: 1,
                 target: RandomOpponent, flags: "FALLBACK"),
                (id: MoveId(40), name: "Peck", power: 35, pp: 35, target: SelectedOpponent),
            ])"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("abilities.ron"), "AbilityCatalog(abilities: [])").unwrap();
        std::fs::write(dir.path().join("items.ron"), "HeldItemCatalog(items: [])").unwrap();

        let catalog = CatalogLoader::load_dir(dir.path()).unwrap();

        assert_eq!(catalog.move_count(), 2);
        assert_eq!(catalog.move_data(MoveId(40)).unwrap().name, "Peck");
    }

    #[test]
    fn missing_fallback_is_rejected() {
        let err = CatalogLoader::parse(
            "MoveCatalog(moves: [])",
            "AbilityCatalog(abilities: [])",
            "HeldItemCatalog(items: [])",
        )
        .unwrap_err();

        assert!(err.to_string().contains("fallback"));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = CatalogLoader::load_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("moves.ron"));
    }
}
