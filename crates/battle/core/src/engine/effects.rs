use crate::command::{CaptureDevice, MoveUseMode, SwitchKind};
use crate::env::{AbilityId, ItemId, MoveId};
use crate::state::{BattleOutcome, CombatantId, StatusKind, Terrain, VolatileKind, Weather};

/// Why a move did not go off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveFailure {
    NoTarget,
    Flinched,
    Asleep,
    Paralyzed,
    NoPowerPoints,
}

/// Observable change produced by the engine.
///
/// The runtime republishes these on its event bus; nothing in the engine
/// reads them back.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEffect {
    MoveAnnounced {
        user: CombatantId,
        move_id: MoveId,
    },
    MoveUsed {
        user: CombatantId,
        move_id: MoveId,
        use_mode: MoveUseMode,
    },
    MoveFailed {
        user: CombatantId,
        move_id: MoveId,
        reason: MoveFailure,
    },
    Damage {
        target: CombatantId,
        amount: u32,
        remaining: u32,
    },
    Healed {
        target: CombatantId,
        amount: u32,
    },
    StatusInflicted {
        target: CombatantId,
        status: StatusKind,
    },
    StatusCured {
        target: CombatantId,
        status: StatusKind,
    },
    VolatileApplied {
        target: CombatantId,
        kind: VolatileKind,
    },
    VolatileExpired {
        target: CombatantId,
        kind: VolatileKind,
    },
    SpeedChanged {
        target: CombatantId,
        stages: i8,
    },
    AbilityActivated {
        combatant: CombatantId,
        ability: AbilityId,
    },
    WeatherSet {
        weather: Weather,
        turns: u8,
    },
    WeatherEnded {
        weather: Weather,
    },
    TerrainSet {
        terrain: Terrain,
        turns: u8,
    },
    TerrainEnded {
        terrain: Terrain,
    },
    ItemStolen {
        thief: CombatantId,
        victim: CombatantId,
        item: ItemId,
    },
    Transformed {
        combatant: CombatantId,
    },
    Switched {
        slot: CombatantId,
        kind: SwitchKind,
        from: Option<usize>,
        to: usize,
    },
    Fainted {
        combatant: CombatantId,
    },
    CaptureAttempted {
        thrower: CombatantId,
        target: CombatantId,
        device: CaptureDevice,
        success: bool,
    },
    FleeAttempted {
        combatant: CombatantId,
        success: bool,
    },
}

/// Everything one engine call changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionReport {
    pub effects: Vec<BattleEffect>,
    /// Combatants whose health reached zero during this call, in order.
    pub fainted: Vec<CombatantId>,
    /// Set when the action decided the encounter outright (capture, escape).
    pub decided: Option<BattleOutcome>,
}

impl ActionReport {
    pub fn push(&mut self, effect: BattleEffect) {
        self.effects.push(effect);
    }

    pub(crate) fn record_damage(&mut self, target: CombatantId, amount: u32, remaining: u32) {
        self.push(BattleEffect::Damage {
            target,
            amount,
            remaining,
        });
        if remaining == 0 && !self.fainted.contains(&target) {
            self.fainted.push(target);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && self.decided.is_none()
    }
}
