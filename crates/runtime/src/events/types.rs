//! Event types for different topics.

use battle_core::{
    BattleEffect, BattleOutcome, CombatantId, EncounterKind, Formation, SelectionError,
    TurnCommand,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    Started {
        turn: u32,
    },
    /// Execution order fixed for the rest of the turn.
    OrderResolved {
        turn: u32,
        order: Vec<CombatantId>,
        bypassed: Vec<CombatantId>,
    },
    Ended {
        turn: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseEvent {
    Started {
        phase: String,
        combatant: Option<CombatantId>,
    },
    /// The phase is waiting on a command provider.
    Suspended {
        phase: String,
        combatant: CombatantId,
    },
    Ended {
        phase: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    Started {
        formation: Formation,
        encounter: EncounterKind,
    },
    CommandRecorded {
        combatant: CombatantId,
        command: TurnCommand,
    },
    /// A selection was refused; the same step is offered again.
    CommandRejected {
        combatant: CombatantId,
        error: SelectionError,
    },
    CommandCancelled {
        combatant: CombatantId,
    },
    Effect(BattleEffect),
    Decided(BattleOutcome),
}
