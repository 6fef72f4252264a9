//! Command collection.
//!
//! One command-entry phase runs per active combatant before the turn order
//! is resolved. The phase suspends on the combatant's provider; rejected
//! selections and cancellations re-issue the same prompt without touching
//! any other combatant's command.

use battle_core::engine::validation;
use battle_core::{
    ActionState, CombatantId, CommandKind, MoveId, MoveIntent, Phase, PreTurnCommand,
    SchedulerError, SelectionError, Side, TargetList, TurnCommand,
};
use tracing::{debug, error, info};

use super::{BattleContext, PendingInput, PhaseOutcome};
use crate::api::{CommandChoice, CommandRequest, CommandResponse, Result, TargetRequest};
use crate::events::{BattleEvent, Event};

pub(crate) fn begin_command_entry(
    ctx: &mut BattleContext,
    combatant: CombatantId,
) -> Result<PhaseOutcome> {
    if !ctx.state.turn.has_open_slot(combatant) {
        error!(
            target: "runtime::collector",
            combatant = %combatant,
            "Command entry for a combatant without a command slot"
        );
        return Err(SchedulerError::NoCommandSlot(combatant).into());
    }
    if ctx.state.turn.command(combatant).is_some() {
        debug!(
            target: "runtime::collector",
            combatant = %combatant,
            "Command slot already filled, skipping entry"
        );
        return Ok(PhaseOutcome::Ended);
    }
    if !ctx.state.roster.is_active(combatant) {
        return Ok(PhaseOutcome::Ended);
    }

    Ok(prompt(ctx, combatant, None))
}

pub(crate) fn resume_command_entry(
    ctx: &mut BattleContext,
    combatant: CombatantId,
    response: CommandResponse,
) -> Result<PhaseOutcome> {
    let choice = match response {
        CommandResponse::Cancelled => {
            debug!(target: "runtime::collector", combatant = %combatant, "Command entry cancelled");
            ctx.publish(Event::Battle(BattleEvent::CommandCancelled { combatant }));
            return Ok(prompt(ctx, combatant, None));
        }
        CommandResponse::Selected(choice) => choice,
    };

    match apply_choice(ctx, combatant, choice) {
        Ok(()) => {
            track_switch_decision(ctx, combatant);
            Ok(PhaseOutcome::Ended)
        }
        Err(rejection) => {
            reject(ctx, combatant, &rejection);
            Ok(prompt(ctx, combatant, Some(rejection)))
        }
    }
}

pub(crate) fn begin_target_select(
    ctx: &mut BattleContext,
    combatant: CombatantId,
    move_id: MoveId,
) -> Result<PhaseOutcome> {
    if ctx.state.turn.command(combatant).is_none() {
        error!(
            target: "runtime::collector",
            combatant = %combatant,
            "Target selection without a committed command"
        );
        return Err(SchedulerError::CommandNotCommitted(combatant).into());
    }
    Ok(target_prompt(ctx, combatant, move_id, None))
}

/// Applies chosen targets. An empty choice cancels back to command entry:
/// the combatant's own command and pre-turn command are cleared and a fresh
/// command-entry phase runs next.
pub(crate) fn resume_target_select(
    ctx: &mut BattleContext,
    combatant: CombatantId,
    move_id: MoveId,
    chosen: &[CombatantId],
) -> Result<PhaseOutcome> {
    if chosen.is_empty() {
        info!(
            target: "runtime::collector",
            combatant = %combatant,
            "Target selection cancelled, returning to command entry"
        );
        let turn = &mut ctx.state.turn;
        turn.turn_commands.insert(combatant, None);
        turn.pre_turn_commands.remove(&combatant);
        turn.set_action_state(combatant, ActionState::Uncommitted);
        ctx.queue.insert_next(Phase::CommandEntry { combatant });
        ctx.publish(Event::Battle(BattleEvent::CommandCancelled { combatant }));
        return Ok(PhaseOutcome::Ended);
    }

    let legal = validation::legal_targets(&ctx.state, ctx.content.as_ref(), combatant, move_id);
    if let Err(rejection) = validation::validate_targets(&legal, chosen) {
        reject(ctx, combatant, &rejection);
        return Ok(target_prompt(ctx, combatant, move_id, Some(rejection)));
    }

    let targets: TargetList = chosen.iter().copied().take(legal.capacity()).collect();
    let command = ctx
        .state
        .turn
        .turn_commands
        .get_mut(&combatant)
        .and_then(Option::as_mut)
        .ok_or(SchedulerError::CommandNotCommitted(combatant))?;
    command.targets = targets;
    let command = command.clone();

    debug!(
        target: "runtime::collector",
        combatant = %combatant,
        targets = ?command.targets,
        "Targets chosen"
    );
    ctx.publish(Event::Battle(BattleEvent::CommandRecorded { combatant, command }));
    Ok(PhaseOutcome::Ended)
}

/// Legal command surface for `combatant` right now.
pub(crate) fn command_request(
    ctx: &BattleContext,
    combatant: CombatantId,
    rejection: Option<SelectionError>,
) -> CommandRequest {
    let state = &ctx.state;
    let bench = state
        .roster
        .party(combatant.side())
        .bench()
        .filter(|&index| validation::validate_switch(state, combatant, index).is_ok())
        .collect();

    CommandRequest {
        combatant,
        turn: state.turn.turn_number,
        legal_moves: validation::legal_moves(state, combatant),
        bench,
        can_transform: validation::validate_transform(state, combatant).is_ok(),
        can_capture: state.encounter.is_wild() && combatant.is_player(),
        can_flee: validation::validate_flee(state, combatant).is_ok(),
        rejection,
        decision_seed: ctx.decision_seed(combatant),
    }
}

fn prompt(
    ctx: &BattleContext,
    combatant: CombatantId,
    rejection: Option<SelectionError>,
) -> PhaseOutcome {
    let request = command_request(ctx, combatant, rejection);
    PhaseOutcome::Suspended(PendingInput::Command(request))
}

fn target_prompt(
    ctx: &BattleContext,
    combatant: CombatantId,
    move_id: MoveId,
    rejection: Option<SelectionError>,
) -> PhaseOutcome {
    PhaseOutcome::Suspended(PendingInput::Targets(TargetRequest {
        combatant,
        move_id,
        legal: validation::legal_targets(&ctx.state, ctx.content.as_ref(), combatant, move_id),
        rejection,
        decision_seed: ctx.decision_seed(combatant),
    }))
}

fn reject(ctx: &BattleContext, combatant: CombatantId, rejection: &SelectionError) {
    info!(
        target: "runtime::collector",
        combatant = %combatant,
        reason = %rejection,
        "Selection rejected"
    );
    ctx.publish(Event::Battle(BattleEvent::CommandRejected {
        combatant,
        error: rejection.clone(),
    }));
}

fn apply_choice(
    ctx: &mut BattleContext,
    combatant: CombatantId,
    choice: CommandChoice,
) -> std::result::Result<(), SelectionError> {
    match choice {
        CommandChoice::Fight { cursor } => record_fight(ctx, combatant, cursor, false),
        CommandChoice::Transform { cursor } => {
            validation::validate_transform(&ctx.state, combatant)?;
            record_fight(ctx, combatant, cursor, true)
        }
        CommandChoice::Switch { party_index } => {
            validation::validate_switch(&ctx.state, combatant, party_index)?;
            record(ctx, combatant, TurnCommand::switch(party_index));
            Ok(())
        }
        CommandChoice::Capture { device, target } => {
            let device = validation::validate_capture(&ctx.state, combatant, device, target)?;
            record(ctx, combatant, TurnCommand::capture(device, target));
            claim_partner(ctx, combatant, CommandKind::Item);
            Ok(())
        }
        CommandChoice::Flee => {
            validation::validate_flee(&ctx.state, combatant)?;
            record(ctx, combatant, TurnCommand::flee());
            claim_partner(ctx, combatant, CommandKind::Flee);
            Ok(())
        }
    }
}

/// Records a fight (or transform-then-fight) command.
///
/// With no legal move left the selection degrades to the fallback move and
/// skips validation. Moves that need an explicit target get a target-selection
/// phase scheduled to run next.
fn record_fight(
    ctx: &mut BattleContext,
    combatant: CombatantId,
    cursor: usize,
    transform: bool,
) -> std::result::Result<(), SelectionError> {
    let intent = if validation::legal_moves(&ctx.state, combatant).is_empty() {
        debug!(
            target: "runtime::collector",
            combatant = %combatant,
            "No legal move, using fallback"
        );
        MoveIntent::fallback(ctx.content.fallback_move())
    } else {
        validation::validate_fight(&ctx.state, combatant, cursor)?
    };

    let content = ctx.content.as_ref();
    let select = validation::needs_target_selection(&ctx.state, content, combatant, intent.move_id);
    let targets = if select {
        TargetList::new()
    } else {
        validation::legal_targets(&ctx.state, content, combatant, intent.move_id)
    };

    let command = if transform {
        TurnCommand::transform(cursor, intent, targets)
    } else {
        TurnCommand::fight(cursor, intent, targets)
    };
    record(ctx, combatant, command);

    if transform {
        ctx.state
            .turn
            .pre_turn_commands
            .insert(combatant, PreTurnCommand::Transform);
    }
    if select {
        ctx.queue.insert_next(Phase::TargetSelect {
            combatant,
            move_id: intent.move_id,
        });
    }
    Ok(())
}

fn record(ctx: &mut BattleContext, combatant: CombatantId, command: TurnCommand) {
    debug!(
        target: "runtime::collector",
        combatant = %combatant,
        kind = command.kind.as_str(),
        cursor = command.cursor,
        "Command recorded"
    );
    let turn = &mut ctx.state.turn;
    turn.turn_commands.insert(combatant, Some(command.clone()));
    turn.set_action_state(combatant, ActionState::Committed);
    ctx.publish(Event::Battle(BattleEvent::CommandRecorded { combatant, command }));
}

/// In doubles, a capture or flee command uses both slots of the side. The
/// partner's slot is filled with a skip marker if it has not chosen yet.
fn claim_partner(ctx: &mut BattleContext, combatant: CombatantId, kind: CommandKind) {
    if !ctx.state.turn.double_battle {
        return;
    }
    let partner = combatant.partner();
    let turn = &mut ctx.state.turn;
    if turn.has_open_slot(partner) && turn.command(partner).is_none() {
        debug!(
            target: "runtime::collector",
            combatant = %partner,
            claimed_by = %combatant,
            "Partner slot skipped"
        );
        turn.turn_commands.insert(partner, Some(TurnCommand::skipped(kind)));
        turn.set_action_state(partner, ActionState::Committed);
    }
}

/// Tracks automated swap decisions for trainer opponents.
///
/// The counter grows every turn an opponent with a usable bench keeps its
/// combatant in and resets once it swaps.
fn track_switch_decision(ctx: &mut BattleContext, combatant: CombatantId) {
    if combatant.side() != Side::Enemy || ctx.state.encounter.is_wild() {
        return;
    }
    let has_bench = ctx.state.roster.party(Side::Enemy).bench().next().is_some();
    let Some(kind) = ctx.state.turn.command(combatant).map(|command| command.kind) else {
        return;
    };

    let turn = &mut ctx.state.turn;
    if kind == CommandKind::Switch {
        turn.switch_attempt_counter = 0;
    } else if has_bench {
        turn.switch_attempt_counter = turn.switch_attempt_counter.saturating_add(1);
    } else {
        return;
    }
    debug!(
        target: "runtime::collector",
        combatant = %combatant,
        counter = turn.switch_attempt_counter,
        "Switch counter updated"
    );
}
