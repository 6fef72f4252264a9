//! State mutations requested by running phases.
//!
//! The [`BattleEngine`] is the only component that changes roster health,
//! field slots, and field conditions. Each entry point performs one discrete
//! piece of work (a move, a switch, one sweep step) and returns an
//! [`ActionReport`] describing what changed, so the caller can schedule
//! follow-up phases (faints, battle end) and publish events.
//!
//! Command legality lives in [`validation`]; it only reads state.

mod actions;
mod effects;
mod errors;
mod outcome;
mod sweep;
pub mod validation;

pub use actions::{capture_rate, damage_roll, escape_odds};
pub use effects::{ActionReport, BattleEffect, MoveFailure};
pub use errors::{EngineError, SelectionError};

use crate::env::{ContentOracle, RandomSource};
use crate::state::{BattleState, CombatantId, CombatantState};

/// Mutates one battle on behalf of the phase that is running.
pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
    content: &'a dyn ContentOracle,
    rng: &'a mut dyn RandomSource,
}

impl<'a> BattleEngine<'a> {
    pub fn new(
        state: &'a mut BattleState,
        content: &'a dyn ContentOracle,
        rng: &'a mut dyn RandomSource,
    ) -> Self {
        Self {
            state,
            content,
            rng,
        }
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    fn combatant(&self, id: CombatantId) -> Result<&CombatantState, EngineError> {
        self.state
            .combatant(id)
            .ok_or(EngineError::CombatantNotFound(id))
    }

    fn combatant_mut(&mut self, id: CombatantId) -> Result<&mut CombatantState, EngineError> {
        self.state
            .combatant_mut(id)
            .ok_or(EngineError::CombatantNotFound(id))
    }

    fn turn(&self) -> u32 {
        self.state.turn.turn_number
    }
}
