//! Command collection driven phase by phase.

mod common;

use battle_core::{
    ActionState, CombatantId, CommandKind, EncounterKind, Formation, Phase, SchedulerError,
    SelectionError,
};
use runtime::scheduler::run_phase;
use runtime::{
    BattleRuntime, CommandChoice, CommandResponse, InputResponse, PendingInput, PhaseOutcome,
    RuntimeError, ScriptedProvider,
};

use common::*;

fn wild_double() -> BattleRuntime {
    runtime(
        config(Formation::Double, EncounterKind::Wild),
        vec![member("a", 50), member("b", 40), member("c", 30)],
        vec![member("d", 60), member("e", 20)],
        ScriptedProvider::new(),
        ScriptedProvider::new(),
    )
}

fn select(choice: CommandChoice) -> InputResponse {
    InputResponse::Command(CommandResponse::Selected(choice))
}

#[test]
fn single_target_move_asks_for_target() {
    let mut runtime = wild_double();
    let ctx = runtime.context_mut();

    let (phase, input) = drive_until_input(ctx);
    assert_eq!(
        phase,
        Phase::CommandEntry {
            combatant: CombatantId::PLAYER
        }
    );
    assert!(matches!(input, PendingInput::Command(_)));
    assert_eq!(
        answer(ctx, &phase, select(CommandChoice::Fight { cursor: TACKLE_SLOT })),
        PhaseOutcome::Ended
    );

    let (phase, input) = drive_until_input(ctx);
    assert_eq!(
        phase,
        Phase::TargetSelect {
            combatant: CombatantId::PLAYER,
            move_id: TACKLE
        }
    );
    let PendingInput::Targets(request) = input else {
        panic!("expected a target prompt, got {input:?}");
    };
    assert_eq!(
        request.legal.as_slice(),
        &[CombatantId::ENEMY, CombatantId::ENEMY_2]
    );

    let rejected = answer(ctx, &phase, InputResponse::Targets(vec![CombatantId::PLAYER_2]));
    let PhaseOutcome::Suspended(PendingInput::Targets(retry)) = rejected else {
        panic!("expected the target prompt again, got {rejected:?}");
    };
    assert_eq!(
        retry.rejection,
        Some(SelectionError::InvalidTarget {
            target: CombatantId::PLAYER_2
        })
    );

    answer(ctx, &phase, InputResponse::Targets(vec![CombatantId::ENEMY_2]));
    let command = ctx
        .state()
        .turn
        .command(CombatantId::PLAYER)
        .expect("command recorded");
    assert_eq!(command.targets.as_slice(), &[CombatantId::ENEMY_2]);
    assert_eq!(
        ctx.state().turn.action_state(CombatantId::PLAYER),
        ActionState::Committed
    );
}

#[test]
fn cancel_and_rejection_reissue_same_prompt() {
    let mut runtime = wild_double();
    let ctx = runtime.context_mut();

    let (phase, _) = drive_until_input(ctx);
    answer(ctx, &phase, select(CommandChoice::Fight { cursor: SURF_SLOT }));
    let player_command = ctx.state().turn.command(CombatantId::PLAYER).cloned();
    assert!(player_command.is_some());

    let (phase, first) = drive_until_input(ctx);
    assert_eq!(first.combatant(), CombatantId::PLAYER_2);

    for _ in 0..2 {
        let again = answer(
            ctx,
            &phase,
            InputResponse::Command(CommandResponse::Cancelled),
        );
        assert_eq!(again, PhaseOutcome::Suspended(first.clone()));
        assert_eq!(
            ctx.state().turn.command(CombatantId::PLAYER).cloned(),
            player_command
        );
    }

    let rejected = answer(ctx, &phase, select(CommandChoice::Fight { cursor: 9 }));
    let PhaseOutcome::Suspended(PendingInput::Command(request)) = rejected else {
        panic!("expected the command prompt again, got {rejected:?}");
    };
    assert_eq!(
        request.rejection,
        Some(SelectionError::MoveSlotOutOfRange { cursor: 9 })
    );
    assert!(ctx.state().turn.command(CombatantId::PLAYER_2).is_none());

    assert_eq!(
        answer(ctx, &phase, select(CommandChoice::Switch { party_index: 2 })),
        PhaseOutcome::Ended
    );
    let command = ctx
        .state()
        .turn
        .command(CombatantId::PLAYER_2)
        .expect("switch recorded");
    assert_eq!(command.kind, CommandKind::Switch);
    assert_eq!(command.cursor, 2);
    assert_eq!(
        ctx.state().turn.command(CombatantId::PLAYER).cloned(),
        player_command
    );
}

#[test]
fn partner_cannot_switch_to_claimed_member() {
    let mut runtime = wild_double();
    let ctx = runtime.context_mut();

    let (phase, _) = drive_until_input(ctx);
    answer(ctx, &phase, select(CommandChoice::Switch { party_index: 2 }));

    let (phase, input) = drive_until_input(ctx);
    let PendingInput::Command(request) = input else {
        panic!("expected a command prompt, got {input:?}");
    };
    assert!(request.bench.is_empty());

    let rejected = answer(ctx, &phase, select(CommandChoice::Switch { party_index: 2 }));
    let PhaseOutcome::Suspended(PendingInput::Command(request)) = rejected else {
        panic!("expected the command prompt again, got {rejected:?}");
    };
    assert_eq!(
        request.rejection,
        Some(SelectionError::InvalidSwitchTarget { party_index: 2 })
    );
}

#[test]
fn empty_target_choice_rolls_back_own_command_only() {
    let mut runtime = wild_double();
    let ctx = runtime.context_mut();

    let (phase, _) = drive_until_input(ctx);
    answer(ctx, &phase, select(CommandChoice::Fight { cursor: SURF_SLOT }));
    let player_command = ctx.state().turn.command(CombatantId::PLAYER).cloned();

    let (phase, _) = drive_until_input(ctx);
    answer(ctx, &phase, select(CommandChoice::Transform { cursor: TACKLE_SLOT }));
    assert!(
        ctx.state()
            .turn
            .pre_turn_commands
            .contains_key(&CombatantId::PLAYER_2)
    );

    let (phase, input) = drive_until_input(ctx);
    assert!(matches!(input, PendingInput::Targets(_)));
    assert_eq!(
        answer(ctx, &phase, InputResponse::Targets(Vec::new())),
        PhaseOutcome::Ended
    );

    let turn = &ctx.state().turn;
    assert!(turn.command(CombatantId::PLAYER_2).is_none());
    assert!(!turn.pre_turn_commands.contains_key(&CombatantId::PLAYER_2));
    assert_eq!(
        turn.action_state(CombatantId::PLAYER_2),
        ActionState::Uncommitted
    );
    assert_eq!(turn.command(CombatantId::PLAYER).cloned(), player_command);
    assert_eq!(
        turn.action_state(CombatantId::PLAYER),
        ActionState::Committed
    );
    assert_eq!(
        ctx.queue().upcoming().next(),
        Some(&Phase::CommandEntry {
            combatant: CombatantId::PLAYER_2
        })
    );

    let (phase, input) = drive_until_input(ctx);
    assert_eq!(
        phase,
        Phase::CommandEntry {
            combatant: CombatantId::PLAYER_2
        }
    );
    assert!(matches!(input, PendingInput::Command(_)));
}

#[test]
fn trainer_battle_offers_no_capture_or_flee() {
    let mut runtime = runtime(
        config(Formation::Single, EncounterKind::Trainer { boss: false }),
        vec![member("a", 50)],
        vec![member("b", 40)],
        ScriptedProvider::new(),
        ScriptedProvider::new(),
    );
    let ctx = runtime.context_mut();

    let (phase, input) = drive_until_input(ctx);
    let PendingInput::Command(request) = input else {
        panic!("expected a command prompt, got {input:?}");
    };
    assert!(!request.can_capture);
    assert!(!request.can_flee);

    let rejected = answer(ctx, &phase, select(CommandChoice::Flee));
    let PhaseOutcome::Suspended(PendingInput::Command(request)) = rejected else {
        panic!("expected the command prompt again, got {rejected:?}");
    };
    assert_eq!(request.rejection, Some(SelectionError::FleeNotAllowed));
}

#[test]
fn turn_start_refuses_uncommitted_slot() {
    let mut runtime = runtime(
        config(Formation::Single, EncounterKind::Wild),
        vec![member("a", 50)],
        vec![member("b", 40)],
        ScriptedProvider::new(),
        ScriptedProvider::new(),
    );
    let ctx = runtime.context_mut();

    let (phase, _) = drive_until_input(ctx);
    answer(ctx, &phase, select(CommandChoice::Flee));
    let (phase, _) = drive_until_input(ctx);
    assert_eq!(
        phase,
        Phase::CommandEntry {
            combatant: CombatantId::ENEMY
        }
    );

    let err = run_phase(ctx, &Phase::TurnStart).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Scheduler(SchedulerError::CommandNotCommitted(CombatantId::ENEMY))
    ));
    assert!(ctx.state().turn.order.is_empty());
}

#[test]
fn command_entry_needs_an_open_slot() {
    let mut runtime = runtime(
        config(Formation::Single, EncounterKind::Wild),
        vec![member("a", 50), member("b", 40)],
        vec![member("c", 40)],
        ScriptedProvider::new(),
        ScriptedProvider::new(),
    );
    let ctx = runtime.context_mut();
    drive_until_input(ctx);

    let err = run_phase(
        ctx,
        &Phase::CommandEntry {
            combatant: CombatantId::PLAYER_2,
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Scheduler(SchedulerError::NoCommandSlot(CombatantId::PLAYER_2))
    ));
}
