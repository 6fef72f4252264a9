//! Phase execution.
//!
//! Every [`Phase`] variant is handled by one exhaustive match in
//! [`run_phase`]. A phase either ends, or suspends with a [`PendingInput`]
//! when it needs a command provider; the driver then calls [`resume_phase`]
//! with the provider's answer, on the same phase, until it ends.
//!
//! - [`collector`] gathers one command per combatant
//! - [`dispatcher`] turns resolved commands into phases
//! - [`lifecycle`] drives turn init, turn start, the sweep, and battle end
//! - [`execution`] runs the per-combatant action phases

mod collector;
mod context;
mod dispatcher;
mod execution;
mod lifecycle;

pub use context::BattleContext;

use battle_core::{CombatantId, Phase};

use crate::api::{CommandRequest, CommandResponse, Result, RuntimeError, TargetRequest};

/// Input a suspended phase is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingInput {
    Command(CommandRequest),
    Targets(TargetRequest),
}

impl PendingInput {
    pub fn combatant(&self) -> CombatantId {
        match self {
            PendingInput::Command(request) => request.combatant,
            PendingInput::Targets(request) => request.combatant,
        }
    }
}

/// Answer to a [`PendingInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResponse {
    Command(CommandResponse),
    /// Chosen targets. Empty cancels back to command entry.
    Targets(Vec<CombatantId>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseOutcome {
    Ended,
    Suspended(PendingInput),
}

/// Starts `phase`. The caller must already have popped it from the queue.
pub fn run_phase(ctx: &mut BattleContext, phase: &Phase) -> Result<PhaseOutcome> {
    match phase {
        Phase::BattleStart => lifecycle::battle_start(ctx)?,
        Phase::TurnInit => lifecycle::turn_init(ctx)?,
        Phase::CommandEntry { combatant } => {
            return collector::begin_command_entry(ctx, *combatant);
        }
        Phase::TargetSelect {
            combatant,
            move_id,
        } => return collector::begin_target_select(ctx, *combatant, *move_id),
        Phase::TurnStart => lifecycle::turn_start(ctx)?,
        Phase::PreTurnTransform { combatant } => execution::transform(ctx, *combatant)?,
        Phase::MoveAnnounce {
            combatant,
            move_id,
        } => execution::announce(ctx, *combatant, *move_id)?,
        Phase::MoveExecute {
            combatant,
            targets,
            move_id,
            use_mode,
        } => execution::execute_move(ctx, *combatant, targets, *move_id, *use_mode)?,
        Phase::Switch {
            kind,
            combatant,
            destination,
            force_switch_in,
        } => execution::switch(ctx, *kind, *combatant, *destination, *force_switch_in)?,
        Phase::CaptureAttempt {
            combatant,
            target,
            device,
        } => execution::capture(ctx, *combatant, *target, *device)?,
        Phase::FleeAttempt { combatant } => execution::flee(ctx, *combatant)?,
        Phase::Faint { combatant } => execution::faint(ctx, *combatant)?,
        Phase::TurnEnd => lifecycle::turn_end(ctx),
        Phase::Sweep(step) => lifecycle::sweep(ctx, *step)?,
        Phase::CheckBattleEnd => lifecycle::check_battle_end(ctx),
        Phase::BattleEnd(outcome) => lifecycle::battle_end(ctx, *outcome),
    }
    Ok(PhaseOutcome::Ended)
}

/// Feeds a provider's answer back into the suspended `phase`.
pub fn resume_phase(
    ctx: &mut BattleContext,
    phase: &Phase,
    response: InputResponse,
) -> Result<PhaseOutcome> {
    match (phase, response) {
        (Phase::CommandEntry { combatant }, InputResponse::Command(response)) => {
            collector::resume_command_entry(ctx, *combatant, response)
        }
        (
            Phase::TargetSelect {
                combatant,
                move_id,
            },
            InputResponse::Targets(chosen),
        ) => collector::resume_target_select(ctx, *combatant, *move_id, &chosen),
        (phase, _) => Err(RuntimeError::UnexpectedInput {
            phase: phase.name(),
        }),
    }
}
