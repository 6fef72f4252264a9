//! Content catalog oracle: moves, abilities, and held items.
//!
//! The catalog is a read-only lookup by identifier. Move execution, turn
//! ordering, lifecycle hooks, and the end-of-turn sweep all consume the
//! descriptors defined here; none of them mutate the catalog.

use std::fmt;

use crate::state::{StatusKind, Terrain, Weather};

/// Identifier of a move in the content catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveId(pub u16);

impl MoveId {
    /// Universal fallback action used when no move has uses left.
    pub const STRUGGLE: Self = Self(0);
}

impl fmt::Display for MoveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "move#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityId(pub u16);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u16);

/// Which combatants a move can be aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveTarget {
    /// One opponent, chosen by the user.
    SelectedOpponent,
    /// Any other combatant on the field (opponent or ally), chosen by the user.
    SelectedAny,
    /// Every active opponent.
    AllOpponents,
    /// The user itself.
    User,
    /// One opponent picked at random when the move executes.
    RandomOpponent,
}

impl MoveTarget {
    /// Returns true when the user must pick one target from a candidate set.
    pub const fn requires_selection(self) -> bool {
        matches!(self, MoveTarget::SelectedOpponent | MoveTarget::SelectedAny)
    }
}

bitflags::bitflags! {
    /// Behavioural flags attached to a move.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct MoveFlags: u8 {
        /// Move announces itself at the start of the turn, before any action.
        const ANNOUNCE = 0b0000_0001;
        /// Move is usable without power points and bypasses restrictions.
        const FALLBACK = 0b0000_0010;
    }
}

/// Secondary effect applied after a move's damage step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveEffect {
    #[default]
    None,
    /// Inflict a status condition with `chance` percent probability.
    Inflict { status: StatusKind, chance: u8 },
    SetWeather { weather: Weather, turns: u8 },
    SetTerrain { terrain: Terrain, turns: u8 },
    /// Force each target to repeat its last move for `turns` turns.
    Encore { turns: u8 },
    /// Heal the user by `percent` of its maximum health.
    HealUser { percent: u8 },
    /// User loses `1 / divisor` of its maximum health.
    Recoil { divisor: u8 },
}

/// Static description of a move.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveData {
    pub id: MoveId,
    pub name: String,
    /// Base power. Zero for status moves.
    pub power: u16,
    /// Priority tier. Higher tiers act first regardless of speed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: i8,
    pub pp: u8,
    pub target: MoveTarget,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: MoveFlags,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: MoveEffect,
}

impl MoveData {
    pub fn is_damaging(&self) -> bool {
        self.power > 0
    }

    pub fn announces(&self) -> bool {
        self.flags.contains(MoveFlags::ANNOUNCE)
    }

    pub fn is_fallback(&self) -> bool {
        self.flags.contains(MoveFlags::FALLBACK)
    }
}

/// When an ability's trigger fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerStage {
    BattleStart,
    TurnStart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityEffect {
    SetWeather { weather: Weather, turns: u8 },
    SetTerrain { terrain: Terrain, turns: u8 },
    BoostSpeed { stages: i8 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityTrigger {
    pub stage: TriggerStage,
    pub effect: AbilityEffect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityData {
    pub id: AbilityId,
    pub name: String,
    /// Percent chance to act first within its priority tier each turn.
    #[cfg_attr(feature = "serde", serde(default))]
    pub bypass_speed_chance: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub trigger: Option<AbilityTrigger>,
    /// Restores 1/16 of max HP at end of turn while this weather is up.
    #[cfg_attr(feature = "serde", serde(default))]
    pub heals_in: Option<Weather>,
}

/// Effect a held item applies during the end-of-turn sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemTurnEffect {
    /// Heal `1 / divisor` of maximum health.
    Heal { divisor: u8 },
    /// With `chance` percent, take the held item of a random opponent.
    Steal { chance: u8 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeldItemData {
    pub id: ItemId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bypass_speed_chance: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub end_of_turn: Option<ItemTurnEffect>,
}

/// Read-only lookup over moves, abilities, and held items.
pub trait ContentOracle: Send + Sync {
    fn move_data(&self, id: MoveId) -> Option<&MoveData>;

    fn ability(&self, id: AbilityId) -> Option<&AbilityData>;

    fn held_item(&self, id: ItemId) -> Option<&HeldItemData>;

    /// Move used when a combatant has no legal move left.
    fn fallback_move(&self) -> MoveId {
        MoveId::STRUGGLE
    }

    /// Priority tier of a move, 0 for unknown moves.
    fn move_priority(&self, id: MoveId) -> i8 {
        self.move_data(id).map_or(0, |data| data.priority)
    }
}
