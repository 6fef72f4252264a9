//! Context provided to hooks during evaluation.

use battle_core::{BattleState, TriggerStage};

/// Read-only view handed to
/// [`LifecycleHook::should_trigger`](super::LifecycleHook::should_trigger).
pub struct HookContext<'a> {
    pub stage: TriggerStage,

    /// Current battle state, before the hook runs
    pub state: &'a BattleState,
}

impl HookContext<'_> {
    pub fn turn(&self) -> u32 {
        self.state.turn.turn_number
    }
}
