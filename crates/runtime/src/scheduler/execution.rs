//! Per-combatant action phases.
//!
//! Each phase asks the engine for exactly one mutation and then schedules
//! whatever the resulting [`ActionReport`] calls for: a faint phase per
//! knocked-out combatant, or the end of the battle when the action decided it.

use battle_core::{
    ActionReport, ActionState, CaptureDevice, CombatantId, MoveId, MoveUseMode, Phase, SwitchKind,
};
use tracing::{debug, info, warn};

use super::BattleContext;
use crate::api::Result;
use crate::events::{BattleEvent, Event};

pub(crate) fn transform(ctx: &mut BattleContext, combatant: CombatantId) -> Result<()> {
    let report = ctx.engine().transform(combatant)?;
    apply_report(ctx, Some(combatant), report);
    Ok(())
}

pub(crate) fn announce(
    ctx: &mut BattleContext,
    combatant: CombatantId,
    move_id: MoveId,
) -> Result<()> {
    let report = ctx.engine().announce_move(combatant, move_id)?;
    apply_report(ctx, Some(combatant), report);
    Ok(())
}

pub(crate) fn execute_move(
    ctx: &mut BattleContext,
    combatant: CombatantId,
    targets: &[CombatantId],
    move_id: MoveId,
    use_mode: MoveUseMode,
) -> Result<()> {
    let report = ctx.engine().use_move(combatant, move_id, targets, use_mode)?;
    resolve(ctx, combatant);
    apply_report(ctx, Some(combatant), report);
    Ok(())
}

/// Puts party member `destination` into `combatant`'s slot.
///
/// A voluntary switch whose destination became ineligible (for example it
/// fainted or was already sent in) is dropped. A replacement only goes ahead
/// while the slot's occupant is fainted, unless forced.
pub(crate) fn switch(
    ctx: &mut BattleContext,
    kind: SwitchKind,
    combatant: CombatantId,
    destination: usize,
    force_switch_in: bool,
) -> Result<()> {
    let party = ctx.state.roster.party(combatant.side());
    let eligible = party
        .members
        .get(destination)
        .is_some_and(|member| !member.is_fainted())
        && !party.is_on_field(destination);
    let occupant_fainted = ctx
        .state
        .combatant(combatant)
        .is_none_or(|member| member.is_fainted());

    if !eligible || (kind == SwitchKind::Replace && !force_switch_in && !occupant_fainted) {
        warn!(
            target: "runtime::lifecycle",
            combatant = %combatant,
            destination,
            ?kind,
            "Switch dropped, destination no longer eligible"
        );
        resolve(ctx, combatant);
        return Ok(());
    }

    let report = ctx.engine().switch_in(combatant, destination, kind)?;
    if kind == SwitchKind::Switch {
        resolve(ctx, combatant);
    }
    apply_report(ctx, Some(combatant), report);
    Ok(())
}

pub(crate) fn capture(
    ctx: &mut BattleContext,
    combatant: CombatantId,
    target: CombatantId,
    device: CaptureDevice,
) -> Result<()> {
    let report = ctx.engine().capture(combatant, target, device)?;
    resolve(ctx, combatant);
    apply_report(ctx, Some(combatant), report);
    Ok(())
}

pub(crate) fn flee(ctx: &mut BattleContext, combatant: CombatantId) -> Result<()> {
    let report = ctx.engine().flee(combatant)?;
    resolve(ctx, combatant);
    apply_report(ctx, Some(combatant), report);
    Ok(())
}

/// Finalises a knocked-out combatant and, while the battle is still open,
/// schedules its replacement from the bench.
pub(crate) fn faint(ctx: &mut BattleContext, combatant: CombatantId) -> Result<()> {
    let mut report = ctx.engine().faint(combatant)?;
    let decided = report.decided.is_some();
    // The last pending faint of an action ends the battle.
    if decided
        && ctx
            .queue
            .upcoming()
            .any(|phase| matches!(phase, Phase::Faint { .. }))
    {
        report.decided = None;
    }
    apply_report(ctx, None, report);

    if decided || ctx.state.is_decided() {
        return Ok(());
    }
    if let Some(destination) = ctx.engine().replacement_for(combatant) {
        debug!(
            target: "runtime::lifecycle",
            combatant = %combatant,
            destination,
            "Replacement scheduled"
        );
        ctx.queue.insert_next(Phase::Switch {
            kind: SwitchKind::Replace,
            combatant,
            destination,
            force_switch_in: true,
        });
    }
    Ok(())
}

/// Publishes the report's effects and schedules its consequences.
///
/// A decided report ends the battle at once: every pending phase is dropped,
/// combatants that were dispatched but had not acted yet become
/// `Interrupted`, and the terminal phase runs next. Otherwise each fainted
/// combatant gets a faint phase, in the order they fainted.
pub(crate) fn apply_report(
    ctx: &mut BattleContext,
    actor: Option<CombatantId>,
    report: ActionReport,
) {
    for effect in report.effects {
        ctx.publish(Event::Battle(BattleEvent::Effect(effect)));
    }

    if let Some(outcome) = report.decided {
        let dropped = ctx.queue.clear();
        let turn = &mut ctx.state.turn;
        let interrupted: Vec<CombatantId> = turn
            .action_states
            .iter()
            .filter(|&(&id, &state)| Some(id) != actor && state == ActionState::Dispatched)
            .map(|(&id, _)| id)
            .collect();
        for &id in &interrupted {
            turn.set_action_state(id, ActionState::Interrupted);
        }
        info!(
            target: "runtime::lifecycle",
            ?outcome,
            dropped,
            ?interrupted,
            "Battle decided mid-turn"
        );
        ctx.queue.insert_next(Phase::BattleEnd(outcome));
        return;
    }

    for &combatant in report.fainted.iter().rev() {
        ctx.queue.insert_next(Phase::Faint { combatant });
    }
}

fn resolve(ctx: &mut BattleContext, combatant: CombatantId) {
    ctx.state
        .turn
        .set_action_state(combatant, ActionState::Resolved);
}
