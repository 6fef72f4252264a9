//! Provider that replays a fixed script.
//!
//! Each combatant slot has its own queue of steps. Once a slot's script runs
//! out the provider falls back to the first legal move and the first legal
//! target, so a partial script still finishes the battle.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use battle_core::CombatantId;
use tokio::sync::Mutex;

use crate::api::{
    BattleView, CommandChoice, CommandProvider, CommandRequest, CommandResponse, Result,
    TargetRequest,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum ScriptedStep {
    Command(CommandResponse),
    Targets(Vec<CombatantId>),
}

#[derive(Debug, Default)]
struct Script {
    steps: HashMap<CombatantId, VecDeque<ScriptedStep>>,
    commands_seen: Vec<CommandRequest>,
    targets_seen: Vec<TargetRequest>,
}

#[derive(Debug, Default)]
pub struct ScriptedProvider {
    script: Mutex<Script>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a command-entry answer for `combatant`.
    pub fn command(self, combatant: CombatantId, response: CommandResponse) -> Self {
        self.push(combatant, ScriptedStep::Command(response))
    }

    pub fn fight(self, combatant: CombatantId, cursor: usize) -> Self {
        self.command(
            combatant,
            CommandResponse::Selected(CommandChoice::Fight { cursor }),
        )
    }

    /// Queues a target-selection answer. An empty list cancels.
    pub fn targets(self, combatant: CombatantId, targets: Vec<CombatantId>) -> Self {
        self.push(combatant, ScriptedStep::Targets(targets))
    }

    fn push(mut self, combatant: CombatantId, step: ScriptedStep) -> Self {
        self.script
            .get_mut()
            .steps
            .entry(combatant)
            .or_default()
            .push_back(step);
        self
    }

    /// Every command request received so far, in order.
    pub async fn command_requests(&self) -> Vec<CommandRequest> {
        self.script.lock().await.commands_seen.clone()
    }

    pub async fn target_requests(&self) -> Vec<TargetRequest> {
        self.script.lock().await.targets_seen.clone()
    }

    /// Steps not consumed yet, across all combatants.
    pub async fn remaining(&self) -> usize {
        self.script.lock().await.steps.values().map(VecDeque::len).sum()
    }
}

#[async_trait]
impl CommandProvider for ScriptedProvider {
    async fn select_command(
        &self,
        request: &CommandRequest,
        _view: BattleView<'_>,
    ) -> Result<CommandResponse> {
        let mut script = self.script.lock().await;
        script.commands_seen.push(request.clone());

        let queue = script.steps.entry(request.combatant).or_default();
        if let Some(ScriptedStep::Command(response)) = queue.front().cloned() {
            queue.pop_front();
            return Ok(response);
        }

        let cursor = request.legal_moves.first().copied().unwrap_or(0);
        Ok(CommandResponse::Selected(CommandChoice::Fight { cursor }))
    }

    async fn select_targets(
        &self,
        request: &TargetRequest,
        _view: BattleView<'_>,
    ) -> Result<Vec<CombatantId>> {
        let mut script = self.script.lock().await;
        script.targets_seen.push(request.clone());

        let queue = script.steps.entry(request.combatant).or_default();
        if let Some(ScriptedStep::Targets(targets)) = queue.front().cloned() {
            queue.pop_front();
            return Ok(targets);
        }

        Ok(request.legal.first().copied().into_iter().collect())
    }
}
