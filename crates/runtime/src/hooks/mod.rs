//! Lifecycle hook system for battle orchestration.
//!
//! Hooks run at fixed lifecycle stages (battle start, turn start) and may
//! mutate the battle through the engine, for example to apply ability
//! triggers declared in the content catalog.
//!
//! # Architecture
//!
//! - Hooks are registered in the RuntimeBuilder and sorted by priority
//! - At each stage, hooks registered for that stage run in priority order
//! - Every hook returns an [`ActionReport`] so the lifecycle can publish its
//!   effects and schedule faints like any other action
//! - Failures are handled by [`HookCriticality`]

mod ability;
mod context;
mod registry;

pub use ability::AbilityTriggerHook;
pub use context::HookContext;
pub use registry::HookRegistry;

use battle_core::{ActionReport, BattleEngine, EngineError, TriggerStage};

/// Defines the criticality level of a hook for error handling.
///
/// This enum determines how hook failures are handled during execution:
/// - Critical hooks must succeed or the battle stops with an error
/// - Important hooks log errors but allow continuation
/// - Optional hooks can fail silently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookCriticality {
    /// Hook failure stops the battle.
    Critical,

    /// Hook failure is logged as an error; the stage continues.
    ///
    /// This is the default level.
    Important,

    /// Hook failure is logged at debug level.
    Optional,
}

/// Work run once per lifecycle stage.
///
/// Hooks are sorted by priority (lower values execute first):
/// - Negative priorities: hooks other hooks depend on
/// - Zero: Default priority for most hooks
/// - Positive priorities: Optional or cosmetic hooks
pub trait LifecycleHook: Send + Sync {
    /// Returns a human-readable name for this hook (used in logging and debugging).
    fn name(&self) -> &'static str;

    /// Stage this hook runs at.
    fn stage(&self) -> TriggerStage;

    fn priority(&self) -> i32 {
        0
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Important
    }

    /// Determines whether this hook should run for the current state.
    fn should_trigger(&self, _ctx: &HookContext<'_>) -> bool {
        true
    }

    fn run(&self, engine: &mut BattleEngine<'_>) -> Result<ActionReport, EngineError>;
}
