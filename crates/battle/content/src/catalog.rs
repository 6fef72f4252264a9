//! In-memory content catalog.

use std::collections::HashMap;

use battle_core::{
    AbilityData, AbilityId, ContentOracle, HeldItemData, ItemId, MoveData, MoveId, OracleError,
};

/// Lookup table over every move, ability, and held item known to a battle.
#[derive(Debug, Clone, Default)]
pub struct ContentCatalog {
    moves: HashMap<MoveId, MoveData>,
    abilities: HashMap<AbilityId, AbilityData>,
    items: HashMap<ItemId, HeldItemData>,
}

impl ContentCatalog {
    pub fn new(
        moves: impl IntoIterator<Item = MoveData>,
        abilities: impl IntoIterator<Item = AbilityData>,
        items: impl IntoIterator<Item = HeldItemData>,
    ) -> Self {
        Self {
            moves: moves.into_iter().map(|m| (m.id, m)).collect(),
            abilities: abilities.into_iter().map(|a| (a.id, a)).collect(),
            items: items.into_iter().map(|i| (i.id, i)).collect(),
        }
    }

    /// Adds or replaces a move.
    pub fn insert_move(&mut self, data: MoveData) -> Option<MoveData> {
        self.moves.insert(data.id, data)
    }

    pub fn insert_ability(&mut self, data: AbilityData) -> Option<AbilityData> {
        self.abilities.insert(data.id, data)
    }

    pub fn insert_item(&mut self, data: HeldItemData) -> Option<HeldItemData> {
        self.items.insert(data.id, data)
    }

    /// Looks up a move, failing when it is missing.
    pub fn require_move(&self, id: MoveId) -> Result<&MoveData, OracleError> {
        self.moves.get(&id).ok_or(OracleError::UnknownMove(id))
    }

    pub fn require_ability(&self, id: AbilityId) -> Result<&AbilityData, OracleError> {
        self.abilities
            .get(&id)
            .ok_or(OracleError::UnknownAbility(id))
    }

    pub fn require_item(&self, id: ItemId) -> Result<&HeldItemData, OracleError> {
        self.items.get(&id).ok_or(OracleError::UnknownItem(id))
    }

    /// Checks that the fallback move exists and is flagged as such.
    pub fn validate(&self) -> Result<(), OracleError> {
        let fallback = self.require_move(self.fallback_move())?;
        if !fallback.is_fallback() {
            return Err(OracleError::UnknownMove(fallback.id));
        }
        Ok(())
    }

    pub fn moves(&self) -> impl Iterator<Item = &MoveData> {
        self.moves.values()
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }
}

impl ContentOracle for ContentCatalog {
    fn move_data(&self, id: MoveId) -> Option<&MoveData> {
        self.moves.get(&id)
    }

    fn ability(&self, id: AbilityId) -> Option<&AbilityData> {
        self.abilities.get(&id)
    }

    fn held_item(&self, id: ItemId) -> Option<&HeldItemData> {
        self.items.get(&id)
    }
}
