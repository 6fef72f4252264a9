//! Turn lifecycle: battle start, turn bootstrap, order resolution, the
//! end-of-turn sweep, and the battle-end check.

use std::sync::Arc;

use battle_core::{
    BattleOutcome, Phase, SchedulerError, SweepStep, TriggerStage, TurnData, TurnOrderResolver,
};
use tracing::{debug, error, info};

use super::{BattleContext, dispatcher, execution};
use crate::api::Result;
use crate::events::{BattleEvent, Event, TurnEvent};

pub(crate) fn battle_start(ctx: &mut BattleContext) -> Result<()> {
    info!(
        target: "runtime::lifecycle",
        formation = ?ctx.state.formation,
        encounter = ?ctx.state.encounter,
        seed = ctx.config.seed,
        "Battle started"
    );
    ctx.publish(Event::Battle(BattleEvent::Started {
        formation: ctx.state.formation,
        encounter: ctx.state.encounter,
    }));
    run_hooks(ctx, TriggerStage::BattleStart)?;
    ctx.queue.append(Phase::TurnInit);
    Ok(())
}

/// Opens the next turn.
///
/// Per-turn counters on the active combatants are reset and last turn's
/// commands are cleared; the switch-attempt counter and escape attempts carry
/// over. One command-entry phase is scheduled per active combatant, in field
/// order, followed by turn start.
pub(crate) fn turn_init(ctx: &mut BattleContext) -> Result<()> {
    ctx.state.turn.turn_number += 1;
    let turn = ctx.state.turn.turn_number;

    let active: Vec<_> = ctx.state.active_combatants().collect();
    for &id in &active {
        if let Some(member) = ctx.state.combatant_mut(id) {
            member.turn_data = TurnData::default();
        }
    }
    ctx.state.turn.open(active.iter().copied());

    debug!(target: "runtime::lifecycle", turn, active = ?active, "Turn opened");
    ctx.publish(Event::Turn(TurnEvent::Started { turn }));
    run_hooks(ctx, TriggerStage::TurnStart)?;

    for combatant in ctx.state.active_combatants().collect::<Vec<_>>() {
        ctx.queue.append(Phase::CommandEntry { combatant });
    }
    ctx.queue.append(Phase::TurnStart);
    Ok(())
}

/// Fixes the turn order and dispatches every command.
///
/// Every open command slot must be committed by now.
pub(crate) fn turn_start(ctx: &mut BattleContext) -> Result<()> {
    let uncommitted = ctx
        .state
        .turn
        .turn_commands
        .iter()
        .find_map(|(&id, command)| command.is_none().then_some(id));
    if let Some(combatant) = uncommitted {
        error!(
            target: "runtime::lifecycle",
            combatant = %combatant,
            "Turn started with an uncommitted command slot"
        );
        return Err(SchedulerError::CommandNotCommitted(combatant).into());
    }

    let resolved =
        TurnOrderResolver::new(&ctx.state, ctx.content.as_ref(), &ctx.rng).resolve();

    for &id in &resolved.bypassed {
        if let Some(member) = ctx.state.combatant_mut(id) {
            member.turn_data.bypassed_speed = true;
        }
    }
    ctx.state.turn.order = resolved.order.clone();

    let turn = ctx.state.turn.turn_number;
    debug!(
        target: "runtime::lifecycle",
        turn,
        order = ?resolved.order,
        bypassed = ?resolved.bypassed,
        "Turn order resolved"
    );
    ctx.publish(Event::Turn(TurnEvent::OrderResolved {
        turn,
        order: resolved.order.clone(),
        bypassed: resolved.bypassed,
    }));

    dispatcher::dispatch_turn(ctx, &resolved.order)?;
    ctx.queue.append(Phase::TurnEnd);
    Ok(())
}

/// Schedules the sweep steps in their fixed order, then the battle-end check.
pub(crate) fn turn_end(ctx: &mut BattleContext) {
    for step in SweepStep::ORDER {
        ctx.queue.append(Phase::Sweep(step));
    }
    ctx.queue.append(Phase::CheckBattleEnd);
}

pub(crate) fn sweep(ctx: &mut BattleContext, step: SweepStep) -> Result<()> {
    let report = ctx.engine().run_sweep_step(step)?;
    debug!(
        target: "runtime::lifecycle",
        step = step.as_str(),
        effects = report.effects.len(),
        "Sweep step"
    );
    execution::apply_report(ctx, None, report);
    Ok(())
}

pub(crate) fn check_battle_end(ctx: &mut BattleContext) {
    let turn = ctx.state.turn.turn_number;
    ctx.publish(Event::Turn(TurnEvent::Ended { turn }));

    let turn_limit = ctx.config.turn_limit;
    match ctx.engine().check_outcome(turn_limit) {
        Some(outcome) => ctx.queue.insert_next(Phase::BattleEnd(outcome)),
        None => ctx.queue.append(Phase::TurnInit),
    }
}

/// Records the outcome. Nothing is scheduled after this phase.
pub(crate) fn battle_end(ctx: &mut BattleContext, outcome: BattleOutcome) {
    ctx.state.outcome = Some(outcome);
    let dropped = ctx.queue.clear();
    info!(
        target: "runtime::lifecycle",
        ?outcome,
        turn = ctx.state.turn.turn_number,
        dropped,
        "Battle ended"
    );
    ctx.publish(Event::Battle(BattleEvent::Decided(outcome)));
}

fn run_hooks(ctx: &mut BattleContext, stage: TriggerStage) -> Result<()> {
    let hooks = Arc::clone(&ctx.hooks);
    let reports = hooks.run_stage(stage, &mut ctx.engine())?;
    for report in reports {
        execution::apply_report(ctx, None, report);
    }
    Ok(())
}
