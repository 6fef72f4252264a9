//! Turn order and dispatch through a running battle.

mod common;

use std::sync::Arc;

use battle_content::PartyLoader;
use battle_core::{
    ActionState, BattleEffect, BattleOutcome, BattleState, CombatantId, CommandKind,
    EncounterKind, Formation, MoveUseMode, Phase, Roster, SweepStep,
};
use runtime::{
    AiCommandProvider, BattleEvent, BattleRuntime, CommandChoice, CommandResponse, Event,
    ScriptedProvider, Topic, TurnEvent,
};

use common::*;

#[tokio::test]
async fn switch_acts_before_faster_fighter() {
    let player = ScriptedProvider::new().command(
        CombatantId::PLAYER,
        CommandResponse::Selected(CommandChoice::Switch { party_index: 1 }),
    );
    let enemy = ScriptedProvider::new().fight(CombatantId::ENEMY, QUICK_ATTACK_SLOT);
    let mut runtime = runtime(
        config(Formation::Single, EncounterKind::Trainer { boss: false }),
        vec![member("slow", 10), member("bench", 10)],
        vec![member("fast", 200)],
        player,
        enemy,
    );

    step_until(&mut runtime, "TurnStart").await;

    assert_eq!(
        runtime.state().turn.order,
        vec![CombatantId::PLAYER, CombatantId::ENEMY]
    );
    let upcoming: Vec<&Phase> = runtime.context().queue().upcoming().collect();
    assert!(matches!(upcoming[0], Phase::Switch { destination: 1, .. }));
    assert!(matches!(
        upcoming[1],
        Phase::MoveExecute {
            combatant: CombatantId::ENEMY,
            ..
        }
    ));
}

#[tokio::test]
async fn priority_tier_beats_speed() {
    let player = ScriptedProvider::new().fight(CombatantId::PLAYER, EXTREME_SPEED_SLOT);
    let enemy = ScriptedProvider::new().fight(CombatantId::ENEMY, QUICK_ATTACK_SLOT);
    let mut runtime = runtime(
        config(Formation::Single, EncounterKind::Wild),
        vec![member("slow", 10)],
        vec![member("fast", 200)],
        player,
        enemy,
    );

    step_until(&mut runtime, "TurnStart").await;

    assert_eq!(
        runtime.state().turn.order,
        vec![CombatantId::PLAYER, CombatantId::ENEMY]
    );
}

#[tokio::test]
async fn equal_priority_falls_back_to_speed() {
    let mut runtime = runtime(
        config(Formation::Double, EncounterKind::Wild),
        vec![member("a", 30), member("b", 90)],
        vec![member("c", 60), member("d", 120)],
        ScriptedProvider::new(),
        ScriptedProvider::new(),
    );

    step_until(&mut runtime, "TurnStart").await;

    assert_eq!(
        runtime.state().turn.order,
        vec![
            CombatantId::ENEMY_2,
            CombatantId::PLAYER_2,
            CombatantId::ENEMY,
            CombatantId::PLAYER
        ]
    );
}

#[tokio::test]
async fn same_seed_replays_identical_battle() {
    async fn play() -> (Vec<TurnEvent>, BattleState) {
        let catalog = catalog();
        let mut config = config(Formation::Double, EncounterKind::Trainer { boss: true });
        config.battle.turn_limit = 60;
        let mut runtime = BattleRuntime::builder()
            .config(config)
            .content(catalog.clone())
            .roster(Roster::new(
                PartyLoader::builtin("player", &catalog).unwrap(),
                PartyLoader::builtin("trainer", &catalog).unwrap(),
            ))
            .player_provider(AiCommandProvider::default())
            .build()
            .unwrap();
        let mut turns = runtime.subscribe(Topic::Turn);

        runtime.run().await.expect("battle should finish");

        let events = drain(&mut turns)
            .into_iter()
            .filter_map(|event| match event {
                Event::Turn(event) => Some(event),
                _ => None,
            })
            .collect();
        (events, runtime.state().clone())
    }

    let (first_events, first_state) = play().await;
    let (second_events, second_state) = play().await;

    assert!(!first_events.is_empty());
    assert_eq!(first_events, second_events);
    assert_eq!(first_state, second_state);
    assert!(first_state.outcome.is_some());
}

#[tokio::test]
async fn announcement_runs_ahead_of_every_action() {
    let player = ScriptedProvider::new().command(
        CombatantId::PLAYER,
        CommandResponse::Selected(CommandChoice::Fight { cursor: 1 }),
    );
    let mut puncher = member("puncher", 10);
    puncher.moves[1].move_id = FOCUS_PUNCH;
    let mut runtime = runtime(
        config(Formation::Single, EncounterKind::Wild),
        vec![puncher],
        vec![member("fast", 200)],
        player,
        ScriptedProvider::new(),
    );

    step_until(&mut runtime, "TurnStart").await;

    let upcoming: Vec<&Phase> = runtime.context().queue().upcoming().collect();
    assert_eq!(
        upcoming[0],
        &Phase::MoveAnnounce {
            combatant: CombatantId::PLAYER,
            move_id: FOCUS_PUNCH
        }
    );
    assert!(matches!(
        upcoming[1],
        Phase::MoveExecute {
            combatant: CombatantId::ENEMY,
            ..
        }
    ));
    assert!(matches!(
        upcoming[2],
        Phase::MoveExecute {
            combatant: CombatantId::PLAYER,
            move_id: FOCUS_PUNCH,
            ..
        }
    ));
}

#[tokio::test]
async fn capture_interrupts_pending_fights() {
    let player = Arc::new(ScriptedProvider::new().command(
        CombatantId::PLAYER,
        CommandResponse::Selected(CommandChoice::Capture {
            device: 3,
            target: CombatantId::ENEMY,
        }),
    ));
    let mut runtime = runtime(
        config(Formation::Double, EncounterKind::Wild),
        vec![member("a", 10), member("b", 10)],
        vec![member("c", 100), member("d", 120)],
        Arc::clone(&player),
        ScriptedProvider::new(),
    );

    step_until(&mut runtime, "TurnStart").await;

    let partner = runtime.state().turn.command(CombatantId::PLAYER_2).cloned();
    assert!(partner.is_some_and(|command| command.skip && command.kind == CommandKind::Item));
    assert!(
        player
            .command_requests()
            .await
            .iter()
            .all(|request| request.combatant == CombatantId::PLAYER)
    );

    let upcoming: Vec<&Phase> = runtime.context().queue().upcoming().collect();
    assert!(matches!(upcoming[0], Phase::CaptureAttempt { .. }));
    assert!(
        upcoming[1..3]
            .iter()
            .all(|phase| matches!(phase, Phase::MoveExecute { .. }))
    );

    let outcome = runtime.run().await.expect("battle should finish");
    assert_eq!(outcome, BattleOutcome::Captured(CombatantId::ENEMY));
    let turn = &runtime.state().turn;
    assert_eq!(turn.action_state(CombatantId::PLAYER), ActionState::Resolved);
    assert_eq!(turn.action_state(CombatantId::PLAYER_2), ActionState::Committed);
    assert_eq!(turn.action_state(CombatantId::ENEMY), ActionState::Interrupted);
    assert_eq!(turn.action_state(CombatantId::ENEMY_2), ActionState::Interrupted);
}

#[tokio::test]
async fn flee_ends_battle_before_opponent_moves() {
    let player = ScriptedProvider::new().command(
        CombatantId::PLAYER,
        CommandResponse::Selected(CommandChoice::Flee),
    );
    let mut runtime = runtime(
        config(Formation::Single, EncounterKind::Wild),
        vec![member("quick", 200)],
        vec![member("slow", 50)],
        player,
        ScriptedProvider::new(),
    );
    let mut battle = runtime.subscribe(Topic::Battle);

    let outcome = runtime.run().await.expect("battle should finish");

    assert_eq!(outcome, BattleOutcome::Fled);
    assert_eq!(runtime.state().turn.turn_number, 1);
    assert_eq!(
        runtime.state().turn.action_state(CombatantId::ENEMY),
        ActionState::Interrupted
    );
    let enemy_moved = drain(&mut battle).into_iter().any(|event| {
        matches!(
            event,
            Event::Battle(BattleEvent::Effect(BattleEffect::MoveUsed {
                user: CombatantId::ENEMY,
                ..
            }))
        )
    });
    assert!(!enemy_moved);
}

#[tokio::test]
async fn exhausted_moves_fall_back() {
    let mut tired = member("tired", 50);
    for slot in tired.moves.iter_mut() {
        slot.pp = 0;
    }
    let mut runtime = runtime(
        config(Formation::Single, EncounterKind::Wild),
        vec![tired],
        vec![member("fresh", 10)],
        ScriptedProvider::new(),
        ScriptedProvider::new(),
    );

    step_until(&mut runtime, "TurnStart").await;

    let command = runtime
        .state()
        .turn
        .command(CombatantId::PLAYER)
        .cloned()
        .expect("fallback command recorded");
    assert_eq!(command.move_id(), Some(STRUGGLE));
    assert!(runtime.context().queue().upcoming().any(|phase| {
        matches!(
            phase,
            Phase::MoveExecute {
                combatant: CombatantId::PLAYER,
                move_id: STRUGGLE,
                use_mode: MoveUseMode::IgnorePp,
                ..
            }
        )
    }));
}

#[tokio::test]
async fn sweep_runs_in_fixed_order_for_any_formation() {
    for (formation, player, enemy) in [
        (Formation::Single, vec![member("a", 10)], vec![member("b", 20)]),
        (
            Formation::Double,
            vec![member("a", 10), member("b", 30)],
            vec![member("c", 20), member("d", 40)],
        ),
    ] {
        let mut runtime = runtime(
            config(formation, EncounterKind::Wild),
            player,
            enemy,
            ScriptedProvider::new(),
            ScriptedProvider::new(),
        );

        step_until(&mut runtime, "TurnEnd").await;

        let upcoming: Vec<Phase> = runtime.context().queue().upcoming().cloned().collect();
        let mut expected: Vec<Phase> = SweepStep::ORDER.into_iter().map(Phase::Sweep).collect();
        expected.push(Phase::CheckBattleEnd);
        assert_eq!(upcoming, expected, "{formation:?}");
    }
}
