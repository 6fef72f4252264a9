//! Turns the resolved order into action phases.

use battle_core::{
    ActionState, CaptureDevice, CombatantId, CommandKind, MoveUseMode, Phase, PreTurnCommand,
    SchedulerError, SideFilter, SpeedOrder, SwitchKind,
};
use tracing::{debug, error};

use super::BattleContext;
use crate::api::{Result, RuntimeError};

/// Schedules the phases for every command in `order`.
///
/// Pre-turn transforms go first, in speed order among the combatants that
/// declared one. Announcements and capture attempts are inserted to run
/// ahead of every appended phase, keeping turn order among themselves.
pub(crate) fn dispatch_turn(ctx: &mut BattleContext, order: &[CombatantId]) -> Result<()> {
    let mut interrupts = Vec::new();

    let transforming: Vec<CombatantId> = SpeedOrder::new(&ctx.state, &ctx.rng, SideFilter::Both)
        .filter(|id| {
            ctx.state.turn.pre_turn_commands.get(id) == Some(&PreTurnCommand::Transform)
        })
        .collect();
    for combatant in transforming {
        debug!(target: "runtime::dispatcher", combatant = %combatant, "Pre-turn transform");
        interrupts.push(Phase::PreTurnTransform { combatant });
    }

    for &combatant in order {
        dispatch_command(ctx, combatant, &mut interrupts)?;
    }

    for phase in interrupts.into_iter().rev() {
        ctx.queue.insert_next(phase);
    }
    Ok(())
}

fn dispatch_command(
    ctx: &mut BattleContext,
    combatant: CombatantId,
    interrupts: &mut Vec<Phase>,
) -> Result<()> {
    if !ctx.state.turn.has_open_slot(combatant) {
        error!(
            target: "runtime::dispatcher",
            combatant = %combatant,
            "Dispatch without a command slot"
        );
        return Err(SchedulerError::NoCommandSlot(combatant).into());
    }
    let Some(command) = ctx.state.turn.command(combatant).cloned() else {
        error!(
            target: "runtime::dispatcher",
            combatant = %combatant,
            "Dispatch of an uncommitted slot"
        );
        return Err(SchedulerError::CommandNotCommitted(combatant).into());
    };
    // Skip markers stay committed.
    if command.skip {
        return Ok(());
    }

    match command.kind {
        CommandKind::Fight | CommandKind::Transform => {
            let intent = command
                .move_intent
                .ok_or(RuntimeError::MalformedCommand(combatant))?;
            let known = ctx
                .state
                .combatant(combatant)
                .is_some_and(|member| member.move_slot(intent.move_id).is_some());
            // Moves lost mid-turn still go off, without spending power points.
            let use_mode = if !known && intent.use_mode == MoveUseMode::Normal {
                MoveUseMode::IgnorePp
            } else {
                intent.use_mode
            };

            if ctx
                .content
                .move_data(intent.move_id)
                .is_some_and(|data| data.announces())
            {
                interrupts.push(Phase::MoveAnnounce {
                    combatant,
                    move_id: intent.move_id,
                });
            }
            ctx.queue.append(Phase::MoveExecute {
                combatant,
                targets: command.targets.clone(),
                move_id: intent.move_id,
                use_mode,
            });
        }
        CommandKind::Switch => ctx.queue.append(Phase::Switch {
            kind: SwitchKind::Switch,
            combatant,
            destination: command.cursor,
            force_switch_in: false,
        }),
        CommandKind::Item => {
            let target = command
                .targets
                .first()
                .copied()
                .ok_or(RuntimeError::MalformedCommand(combatant))?;
            let device = CaptureDevice::from_cursor(command.cursor)
                .ok_or(RuntimeError::MalformedCommand(combatant))?;
            interrupts.push(Phase::CaptureAttempt {
                combatant,
                target,
                device,
            });
        }
        CommandKind::Flee => ctx.queue.append(Phase::FleeAttempt { combatant }),
    }
    ctx.state.turn.set_action_state(combatant, ActionState::Dispatched);

    debug!(
        target: "runtime::dispatcher",
        combatant = %combatant,
        kind = command.kind.as_str(),
        "Command dispatched"
    );
    Ok(())
}
