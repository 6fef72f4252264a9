//! Deterministic battle rules and data types shared across the runtime.
//!
//! `battle-core` defines the canonical turn model (commands, phases, turn
//! order) and exposes pure APIs that can be reused by both the runtime and
//! offline tools. All roster mutation flows through [`engine::BattleEngine`],
//! and the phase worklist lives in [`phase::PhaseQueue`].
pub mod command;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod order;
pub mod phase;
pub mod state;

#[cfg(test)]
mod testing;

pub use command::{
    ActionState, CaptureDevice, CommandKind, MoveIntent, MoveUseMode, PreTurnCommand, SwitchKind,
    TargetList, TurnCommand,
};
pub use config::{BattleConfig, EncounterKind, Formation};
pub use engine::{
    ActionReport, BattleEffect, BattleEngine, EngineError, MoveFailure, SelectionError,
};
pub use env::{
    AbilityData, AbilityEffect, AbilityId, AbilityTrigger, ContentOracle, HeldItemData, ItemId,
    ItemTurnEffect, MoveData, MoveEffect, MoveFlags, MoveId, MoveTarget, OracleError, PcgRandom,
    RandomSource, TriggerStage, compute_seed,
};
pub use error::{BattleError, ErrorSeverity};
pub use order::{SideFilter, SpeedOrder, TurnOrder, TurnOrderResolver};
pub use phase::{Phase, PhaseQueue, SchedulerError, SweepStep};
pub use state::{
    BattleOutcome, BattleState, BattleStats, CombatantId, CombatantState, EnemyBoosts, FieldState,
    MoveSlot, Party, Roster, Side, StatStages, StatusCondition, StatusKind, SummonData, Terrain,
    TimedField, TurnData, TurnState, VolatileEffect, VolatileKind, Weather,
};
