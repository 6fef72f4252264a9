//! Asynchronous abstraction for sourcing combatant commands.
//!
//! Runtime users plug in [`CommandProvider`] implementations so a battle can
//! run with interactive input, scripted fixtures, or automated decisions.
//! The runtime asks one provider per side whenever a command-entry or
//! target-selection phase suspends.
use std::sync::Arc;

use async_trait::async_trait;
use battle_core::{BattleState, CombatantId, ContentOracle, MoveId, SelectionError, TargetList};
use serde::{Deserialize, Serialize};

use super::errors::Result;

/// Read-only view of the battle handed to providers.
#[derive(Clone, Copy)]
pub struct BattleView<'a> {
    pub state: &'a BattleState,
    pub content: &'a dyn ContentOracle,
}

impl<'a> BattleView<'a> {
    pub fn new(state: &'a BattleState, content: &'a dyn ContentOracle) -> Self {
        Self { state, content }
    }
}

/// Legal command surface offered to one combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub combatant: CombatantId,
    pub turn: u32,
    /// Move-slot cursors that pass validation. Empty means any fight choice
    /// degrades to the fallback move.
    pub legal_moves: Vec<usize>,
    /// Party indices that can be switched in.
    pub bench: Vec<usize>,
    pub can_transform: bool,
    pub can_capture: bool,
    pub can_flee: bool,
    /// Why the previous selection for this step was refused.
    pub rejection: Option<SelectionError>,
    /// Seed for any random choice the provider makes.
    pub decision_seed: u64,
}

/// Target set offered for a move that needs an explicit target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRequest {
    pub combatant: CombatantId,
    pub move_id: MoveId,
    pub legal: TargetList,
    pub rejection: Option<SelectionError>,
    pub decision_seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandChoice {
    Fight { cursor: usize },
    /// Transform before the turn, then use the move in `cursor`.
    Transform { cursor: usize },
    Switch { party_index: usize },
    Capture { device: usize, target: CombatantId },
    Flee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandResponse {
    Selected(CommandChoice),
    /// Backs out of the prompt. The same prompt is offered again.
    Cancelled,
}

/// Source of commands for the combatants on one side.
#[async_trait]
pub trait CommandProvider: Send + Sync {
    /// Picks the combatant's command for this turn.
    async fn select_command(
        &self,
        request: &CommandRequest,
        view: BattleView<'_>,
    ) -> Result<CommandResponse>;

    /// Picks targets for a move. An empty list cancels back to command entry.
    async fn select_targets(
        &self,
        request: &TargetRequest,
        view: BattleView<'_>,
    ) -> Result<Vec<CombatantId>>;
}

#[async_trait]
impl<T: CommandProvider + ?Sized> CommandProvider for Arc<T> {
    async fn select_command(
        &self,
        request: &CommandRequest,
        view: BattleView<'_>,
    ) -> Result<CommandResponse> {
        (**self).select_command(request, view).await
    }

    async fn select_targets(
        &self,
        request: &TargetRequest,
        view: BattleView<'_>,
    ) -> Result<Vec<CombatantId>> {
        (**self).select_targets(request, view).await
    }
}
