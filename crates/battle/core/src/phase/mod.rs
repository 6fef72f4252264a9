//! Discrete simulation steps and the worklist that orders them.
//!
//! A [`Phase`] is a single-use unit of battle work. Phases are a closed set:
//! the runtime dispatches every variant through one exhaustive match, and
//! shared behaviour lives in helper functions rather than a base type.

mod queue;

pub use queue::{PhaseQueue, SchedulerError};

use crate::command::{CaptureDevice, MoveUseMode, SwitchKind, TargetList};
use crate::env::MoveId;
use crate::state::{BattleOutcome, CombatantId};

/// End-of-turn sweep steps, in the order they always run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SweepStep {
    /// Temporary status and volatile effects lapse.
    LapseEffects,
    /// Terrain and weather driven healing.
    FieldHealing,
    /// Opponent-side passive healing and status-cure chances.
    EnemyPassives,
    /// Poison and burn damage.
    StatusDamage,
    /// Held-item end-of-turn effects, including item transfers.
    HeldItems,
    /// Per-combatant counters.
    TurnCounters,
    /// Weather and terrain duration decrement and removal.
    FieldDuration,
}

impl SweepStep {
    pub const ORDER: [SweepStep; 7] = [
        SweepStep::LapseEffects,
        SweepStep::FieldHealing,
        SweepStep::EnemyPassives,
        SweepStep::StatusDamage,
        SweepStep::HeldItems,
        SweepStep::TurnCounters,
        SweepStep::FieldDuration,
    ];

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Runs battle-start hooks once, before the first turn.
    BattleStart,
    /// Resets per-turn state and schedules command collection.
    TurnInit,
    /// Collects one command for a combatant.
    CommandEntry { combatant: CombatantId },
    /// Resolves the target of a single-target move interactively.
    TargetSelect {
        combatant: CombatantId,
        move_id: MoveId,
    },
    /// Resolves the turn order and dispatches every command.
    TurnStart,
    PreTurnTransform { combatant: CombatantId },
    /// Pre-announcement for moves that act at the start of the turn.
    MoveAnnounce {
        combatant: CombatantId,
        move_id: MoveId,
    },
    MoveExecute {
        combatant: CombatantId,
        targets: TargetList,
        move_id: MoveId,
        use_mode: MoveUseMode,
    },
    Switch {
        kind: SwitchKind,
        combatant: CombatantId,
        /// Party index of the incoming combatant.
        destination: usize,
        force_switch_in: bool,
    },
    CaptureAttempt {
        combatant: CombatantId,
        target: CombatantId,
        device: CaptureDevice,
    },
    FleeAttempt { combatant: CombatantId },
    Faint { combatant: CombatantId },
    /// Schedules the end-of-turn sweep.
    TurnEnd,
    Sweep(SweepStep),
    CheckBattleEnd,
    /// Terminal phase. Records the outcome and schedules nothing.
    BattleEnd(BattleOutcome),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Combatant this phase acts for, if it belongs to one.
    pub fn combatant(&self) -> Option<CombatantId> {
        match self {
            Phase::CommandEntry { combatant }
            | Phase::TargetSelect { combatant, .. }
            | Phase::PreTurnTransform { combatant }
            | Phase::MoveAnnounce { combatant, .. }
            | Phase::MoveExecute { combatant, .. }
            | Phase::Switch { combatant, .. }
            | Phase::CaptureAttempt { combatant, .. }
            | Phase::FleeAttempt { combatant }
            | Phase::Faint { combatant } => Some(*combatant),
            Phase::BattleStart
            | Phase::TurnInit
            | Phase::TurnStart
            | Phase::TurnEnd
            | Phase::Sweep(_)
            | Phase::CheckBattleEnd
            | Phase::BattleEnd(_) => None,
        }
    }
}
