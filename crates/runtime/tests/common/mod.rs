//! Fixtures shared by the runtime integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use battle_content::{CatalogLoader, ContentCatalog};
use battle_core::{
    BattleConfig, BattleStats, CombatantState, EncounterKind, Formation, MoveId, Party, Phase,
    Roster,
};
use runtime::scheduler::{resume_phase, run_phase};
use runtime::{
    BattleContext, BattleRuntime, CommandProvider, Event, InputResponse, PendingInput,
    PhaseOutcome, RuntimeConfig,
};
use tokio::sync::broadcast;

pub const STRUGGLE: MoveId = MoveId(0);
pub const TACKLE: MoveId = MoveId(1);
pub const QUICK_ATTACK: MoveId = MoveId(2);
pub const SURF: MoveId = MoveId(7);
pub const FOCUS_PUNCH: MoveId = MoveId(8);
pub const EXTREME_SPEED: MoveId = MoveId(12);

/// Move-slot cursors of [`member`].
pub const TACKLE_SLOT: usize = 0;
pub const SURF_SLOT: usize = 1;
pub const QUICK_ATTACK_SLOT: usize = 2;
pub const EXTREME_SPEED_SLOT: usize = 3;

pub fn catalog() -> Arc<ContentCatalog> {
    Arc::new(CatalogLoader::builtin().expect("bundled catalog should load"))
}

/// Sturdy, weak-hitting combatant so battles last as long as a test needs.
pub fn member(name: &str, speed: u32) -> CombatantState {
    CombatantState::new(
        name,
        50,
        400,
        BattleStats {
            attack: 40,
            defense: 120,
            speed,
        },
    )
    .with_move(TACKLE, 35)
    .with_move(SURF, 15)
    .with_move(QUICK_ATTACK, 30)
    .with_move(EXTREME_SPEED, 5)
}

pub fn config(formation: Formation, encounter: EncounterKind) -> RuntimeConfig {
    let mut config = RuntimeConfig::new(BattleConfig::new(formation, encounter, 42));
    config.event_buffer_size = 4096;
    config
}

pub fn runtime(
    config: RuntimeConfig,
    player: Vec<CombatantState>,
    enemy: Vec<CombatantState>,
    player_provider: impl CommandProvider + 'static,
    enemy_provider: impl CommandProvider + 'static,
) -> BattleRuntime {
    BattleRuntime::builder()
        .config(config)
        .content(catalog())
        .roster(Roster::new(Party::new(player), Party::new(enemy)))
        .player_provider(player_provider)
        .enemy_provider(enemy_provider)
        .build()
        .expect("runtime should build")
}

/// Steps until a phase named `name` has run.
pub async fn step_until(runtime: &mut BattleRuntime, name: &str) {
    loop {
        match runtime.step().await.expect("phase should run") {
            Some(ran) if ran == name => return,
            Some(_) => {}
            None => panic!("queue drained before {name}"),
        }
    }
}

/// Runs phases by hand until one suspends. The suspended phase stays running.
pub fn drive_until_input(ctx: &mut BattleContext) -> (Phase, PendingInput) {
    loop {
        let phase = ctx
            .queue_mut()
            .pop_for_run()
            .expect("no phase should be running")
            .expect("queue drained before any input was requested");
        match run_phase(ctx, &phase).expect("phase should run") {
            PhaseOutcome::Ended => {
                ctx.queue_mut().end_current().expect("phase was running");
            }
            PhaseOutcome::Suspended(input) => return (phase, input),
        }
    }
}

/// Answers a suspended phase, ending it if the answer completes it.
pub fn answer(ctx: &mut BattleContext, phase: &Phase, response: InputResponse) -> PhaseOutcome {
    let outcome = resume_phase(ctx, phase, response).expect("input should be accepted");
    if outcome == PhaseOutcome::Ended {
        ctx.queue_mut().end_current().expect("phase was running");
    }
    outcome
}

pub fn drain(receiver: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}
