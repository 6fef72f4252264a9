//! Hook registry for managing and executing lifecycle hooks.

use std::sync::Arc;

use battle_core::{ActionReport, BattleEngine, EngineError, TriggerStage};
use tracing::{debug, error};

use super::{AbilityTriggerHook, HookContext, HookCriticality, LifecycleHook};
use crate::api::RuntimeError;

/// Registry that manages and executes lifecycle hooks.
///
/// Hooks are kept sorted by priority (lower values first); the sort is
/// stable, so hooks with equal priority keep their registration order.
pub struct HookRegistry {
    hooks: Arc<[Arc<dyn LifecycleHook>]>,
}

impl HookRegistry {
    pub fn new(mut hooks: Vec<Arc<dyn LifecycleHook>>) -> Self {
        hooks.sort_by_key(|h| h.priority());
        Self {
            hooks: hooks.into(),
        }
    }

    /// Creates a registry with the default set of hooks.
    ///
    /// Default hooks apply ability triggers at battle start and at turn start.
    pub fn default_hooks() -> Self {
        Self::new(Self::defaults())
    }

    /// Default hooks plus `additional`.
    pub fn with_additional(additional: Vec<Arc<dyn LifecycleHook>>) -> Self {
        let mut hooks = Self::defaults();
        hooks.extend(additional);
        Self::new(hooks)
    }

    fn defaults() -> Vec<Arc<dyn LifecycleHook>> {
        vec![
            Arc::new(AbilityTriggerHook::new(TriggerStage::BattleStart)) as Arc<dyn LifecycleHook>,
            Arc::new(AbilityTriggerHook::new(TriggerStage::TurnStart)) as Arc<dyn LifecycleHook>,
        ]
    }

    /// Runs every hook registered for `stage`.
    ///
    /// # Error Handling
    ///
    /// Hook execution errors are handled based on criticality level:
    /// - `Critical`: Returns error immediately
    /// - `Important`: Logs error and continues to next hook (default)
    /// - `Optional`: Logs at debug level and continues silently
    pub fn run_stage(
        &self,
        stage: TriggerStage,
        engine: &mut BattleEngine<'_>,
    ) -> Result<Vec<ActionReport>, RuntimeError> {
        let mut reports = Vec::new();

        for hook in self.hooks.iter().filter(|hook| hook.stage() == stage) {
            let ctx = HookContext {
                stage,
                state: engine.state(),
            };
            if !hook.should_trigger(&ctx) {
                continue;
            }

            debug!(target: "runtime::hooks", hook = hook.name(), ?stage, "Running hook");
            match hook.run(engine) {
                Ok(report) => reports.push(report),
                Err(e) => self.handle_hook_error(hook.as_ref(), e)?,
            }
        }

        Ok(reports)
    }

    /// Returns the number of registered hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Returns an iterator over hook names and priorities (for debugging).
    pub fn hooks(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        self.hooks.iter().map(|h| (h.name(), h.priority()))
    }

    /// Returns Ok(()) for Important/Optional hooks, Err for Critical hooks.
    fn handle_hook_error(
        &self,
        hook: &dyn LifecycleHook,
        error: EngineError,
    ) -> Result<(), RuntimeError> {
        match hook.criticality() {
            HookCriticality::Critical => {
                error!(
                    target: "runtime::hooks",
                    hook = hook.name(),
                    criticality = "critical",
                    error = ?error,
                    "Critical hook failed, stopping battle"
                );
                return Err(RuntimeError::Hook {
                    hook: hook.name(),
                    source: error,
                });
            }
            HookCriticality::Important => error!(
                target: "runtime::hooks",
                hook = hook.name(),
                criticality = "important",
                error = ?error,
                "Hook failed, continuing"
            ),
            HookCriticality::Optional => debug!(
                target: "runtime::hooks",
                hook = hook.name(),
                criticality = "optional",
                error = ?error,
                "Optional hook failed"
            ),
        }

        Ok(())
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::default_hooks()
    }
}
