use std::fmt;

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::env::{AbilityId, ItemId, MoveId};

/// Opaque reference to one battle slot.
///
/// Player slots are `0..2`, opponent slots are `2..4`. A single formation
/// uses slot 0 on each side. The roster owns the combatant occupying a slot;
/// everything else refers to it by this index only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u8);

impl CombatantId {
    pub const SLOTS_PER_SIDE: u8 = 2;

    pub const PLAYER: Self = Self(0);
    pub const PLAYER_2: Self = Self(1);
    pub const ENEMY: Self = Self(2);
    pub const ENEMY_2: Self = Self(3);

    pub const ALL: [Self; 4] = [Self::PLAYER, Self::PLAYER_2, Self::ENEMY, Self::ENEMY_2];

    /// Slot at `field_index` on `side`.
    pub const fn new(side: Side, field_index: usize) -> Self {
        let base = match side {
            Side::Player => 0,
            Side::Enemy => Self::SLOTS_PER_SIDE,
        };
        Self(base + field_index as u8)
    }

    pub const fn side(self) -> Side {
        if self.0 < Self::SLOTS_PER_SIDE {
            Side::Player
        } else {
            Side::Enemy
        }
    }

    /// Position of the slot within its side (0 or 1).
    pub const fn field_index(self) -> usize {
        (self.0 % Self::SLOTS_PER_SIDE) as usize
    }

    /// The other slot on the same side.
    pub const fn partner(self) -> Self {
        Self::new(self.side(), 1 - self.field_index())
    }

    #[inline]
    pub const fn is_player(self) -> bool {
        matches!(self.side(), Side::Player)
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side() {
            Side::Player => write!(f, "player[{}]", self.field_index()),
            Side::Enemy => write!(f, "enemy[{}]", self.field_index()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub const fn opposite(self) -> Self {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

/// Base battle stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleStats {
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

/// Temporary stat stages, each clamped to `-6..=6`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatStages {
    pub attack: i8,
    pub defense: i8,
    pub speed: i8,
}

impl StatStages {
    pub const MIN: i8 = -6;
    pub const MAX: i8 = 6;

    /// Applies a stage to a stat: `(2 + s) / 2` when raised, `2 / (2 - s)` when lowered.
    pub fn apply(stat: u32, stage: i8) -> u32 {
        let stage = stage.clamp(Self::MIN, Self::MAX) as i32;
        let (num, den) = if stage >= 0 {
            (2 + stage, 2)
        } else {
            (2, 2 - stage)
        };
        stat * num as u32 / den as u32
    }

    /// Raises or lowers speed, returning the applied change.
    pub fn boost_speed(&mut self, stages: i8) -> i8 {
        let before = self.speed;
        self.speed = (self.speed + stages).clamp(Self::MIN, Self::MAX);
        self.speed - before
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    Poison,
    Burn,
    Paralysis,
    Sleep,
}

/// Non-volatile status. Survives switching out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusCondition {
    pub kind: StatusKind,
    /// Remaining turns for timed conditions (sleep), 0 otherwise.
    pub turns: u8,
}

impl StatusCondition {
    pub const SLEEP_TURNS: u8 = 3;

    pub fn new(kind: StatusKind) -> Self {
        let turns = match kind {
            StatusKind::Sleep => Self::SLEEP_TURNS,
            _ => 0,
        };
        Self { kind, turns }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VolatileKind {
    /// Forced to repeat the given move.
    Encore(MoveId),
    /// Given move cannot be selected.
    Disable(MoveId),
    /// Loses its next action this turn.
    Flinch,
}

/// Temporary effect cleared on switch-out or when its duration lapses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolatileEffect {
    pub kind: VolatileKind,
    pub turns_left: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveSlot {
    pub move_id: MoveId,
    pub pp: u8,
    pub max_pp: u8,
}

impl MoveSlot {
    pub fn new(move_id: MoveId, max_pp: u8) -> Self {
        Self {
            move_id,
            pp: max_pp,
            max_pp,
        }
    }

    pub fn has_uses(&self) -> bool {
        self.pp > 0
    }
}

/// End-of-turn boosts granted to opponent-side combatants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyBoosts {
    /// Percent of max health healed every turn.
    pub turn_heal_percent: u8,
    /// Percent chance to cure a status every turn.
    pub status_cure_chance: u8,
}

impl EnemyBoosts {
    pub fn is_empty(&self) -> bool {
        self.turn_heal_percent == 0 && self.status_cure_chance == 0
    }
}

/// Per-turn transient counters, reset at every turn start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnData {
    pub acted: bool,
    pub damage_taken: u32,
    pub switched_in: bool,
    pub bypassed_speed: bool,
}

/// Data tied to the current stint on the field, cleared on switch-out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummonData {
    pub turns_on_field: u32,
    pub last_move: Option<MoveId>,
}

/// One roster member.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantState {
    pub name: String,
    pub level: u8,
    pub hp: u32,
    pub max_hp: u32,
    pub stats: BattleStats,
    pub stages: StatStages,
    pub moves: ArrayVec<MoveSlot, { BattleConfig::MAX_MOVES }>,
    pub status: Option<StatusCondition>,
    pub volatiles: ArrayVec<VolatileEffect, { BattleConfig::MAX_VOLATILES }>,
    pub ability: Option<AbilityId>,
    pub held_item: Option<ItemId>,
    pub is_boss: bool,
    pub enemy_boosts: EnemyBoosts,
    pub transformed: bool,
    pub turn_data: TurnData,
    pub summon: SummonData,
}

impl CombatantState {
    pub fn new(name: impl Into<String>, level: u8, max_hp: u32, stats: BattleStats) -> Self {
        Self {
            name: name.into(),
            level,
            hp: max_hp,
            max_hp,
            stats,
            stages: StatStages::default(),
            moves: ArrayVec::new(),
            status: None,
            volatiles: ArrayVec::new(),
            ability: None,
            held_item: None,
            is_boss: false,
            enemy_boosts: EnemyBoosts::default(),
            transformed: false,
            turn_data: TurnData::default(),
            summon: SummonData::default(),
        }
    }

    /// Adds a move, ignoring it once the move set is full.
    pub fn with_move(mut self, move_id: MoveId, pp: u8) -> Self {
        let _ = self.moves.try_push(MoveSlot::new(move_id, pp));
        self
    }

    pub fn with_ability(mut self, ability: AbilityId) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn with_held_item(mut self, item: ItemId) -> Self {
        self.held_item = Some(item);
        self
    }

    pub fn with_boss(mut self, is_boss: bool) -> Self {
        self.is_boss = is_boss;
        self
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    /// Speed after stages and paralysis.
    pub fn effective_speed(&self) -> u32 {
        let speed = StatStages::apply(self.stats.speed, self.stages.speed);
        match self.status {
            Some(StatusCondition {
                kind: StatusKind::Paralysis,
                ..
            }) => speed / 2,
            _ => speed,
        }
    }

    pub fn effective_attack(&self) -> u32 {
        let attack = StatStages::apply(self.stats.attack, self.stages.attack);
        match self.status {
            Some(StatusCondition {
                kind: StatusKind::Burn,
                ..
            }) => attack / 2,
            _ => attack,
        }
    }

    pub fn effective_defense(&self) -> u32 {
        StatStages::apply(self.stats.defense, self.stages.defense).max(1)
    }

    pub fn move_slot(&self, move_id: MoveId) -> Option<&MoveSlot> {
        self.moves.iter().find(|slot| slot.move_id == move_id)
    }

    pub fn move_slot_mut(&mut self, move_id: MoveId) -> Option<&mut MoveSlot> {
        self.moves.iter_mut().find(|slot| slot.move_id == move_id)
    }

    /// Adds or refreshes a volatile effect of the same kind.
    pub fn add_volatile(&mut self, kind: VolatileKind, turns: u8) {
        if let Some(existing) = self.volatiles.iter_mut().find(|v| v.kind == kind) {
            existing.turns_left = existing.turns_left.max(turns);
            return;
        }
        let _ = self.volatiles.try_push(VolatileEffect {
            kind,
            turns_left: turns,
        });
    }

    /// Move this combatant is forced to repeat, if any.
    pub fn encored_move(&self) -> Option<MoveId> {
        self.volatiles.iter().find_map(|v| match v.kind {
            VolatileKind::Encore(move_id) => Some(move_id),
            _ => None,
        })
    }

    pub fn is_disabled(&self, move_id: MoveId) -> bool {
        self.volatiles
            .iter()
            .any(|v| v.kind == VolatileKind::Disable(move_id))
    }

    /// Applies damage and returns the amount actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        self.turn_data.damage_taken += dealt;
        dealt
    }

    /// Heals and returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_hp - self.hp);
        self.hp += restored;
        restored
    }

    /// Clears state that does not survive leaving the field.
    pub fn reset_on_switch_out(&mut self) {
        self.stages = StatStages::default();
        self.volatiles.clear();
        self.summon = SummonData::default();
    }
}
