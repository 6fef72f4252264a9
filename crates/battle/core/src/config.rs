//! Static battle configuration.
//!
//! A [`BattleConfig`] is fixed for the lifetime of one encounter. It selects
//! the formation, the kind of encounter, the base seed for every random draw,
//! and the turn limit after which the battle ends in a draw.

/// Number of combatants each side fields at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Formation {
    #[default]
    Single,
    Double,
}

impl Formation {
    /// Number of active field slots per side.
    pub const fn slots_per_side(self) -> usize {
        match self {
            Formation::Single => 1,
            Formation::Double => 2,
        }
    }

    pub const fn is_double(self) -> bool {
        matches!(self, Formation::Double)
    }
}

/// Kind of opposition the player faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncounterKind {
    /// Wild encounter: capture devices and fleeing are allowed.
    #[default]
    Wild,
    /// Trainer encounter: the opponent may swap combatants, but the player
    /// can neither capture nor flee.
    Trainer { boss: bool },
}

impl EncounterKind {
    pub const fn is_wild(self) -> bool {
        matches!(self, EncounterKind::Wild)
    }

    pub const fn is_boss(self) -> bool {
        matches!(self, EncounterKind::Trainer { boss: true })
    }
}

/// Battle-wide configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    pub formation: Formation,
    pub encounter: EncounterKind,
    /// Base seed for every random draw in the encounter.
    pub seed: u64,
    /// Turn number at which an undecided battle ends in a draw.
    pub turn_limit: u32,
    pub max_party_size: usize,
}

impl BattleConfig {
    pub const DEFAULT_TURN_LIMIT: u32 = 1000;
    pub const MAX_PARTY_SIZE: usize = 6;
    /// Upper bound on volatile effects tracked per combatant.
    pub const MAX_VOLATILES: usize = 8;
    /// Moves a combatant can know.
    pub const MAX_MOVES: usize = 4;

    pub fn new(formation: Formation, encounter: EncounterKind, seed: u64) -> Self {
        Self {
            formation,
            encounter,
            seed,
            ..Self::default()
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            formation: Formation::Single,
            encounter: EncounterKind::Wild,
            seed: 0,
            turn_limit: Self::DEFAULT_TURN_LIMIT,
            max_party_size: Self::MAX_PARTY_SIZE,
        }
    }
}
