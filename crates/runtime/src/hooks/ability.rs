//! Hook that applies content-declared ability triggers.

use battle_core::{ActionReport, BattleEngine, EngineError, SideFilter, TriggerStage};

use super::{HookContext, HookCriticality, LifecycleHook};

/// Fires the ability trigger of every active combatant for one stage.
///
/// Combatants are visited fastest first, so when two abilities set the
/// weather the slower one wins.
#[derive(Debug, Clone, Copy)]
pub struct AbilityTriggerHook {
    stage: TriggerStage,
}

impl AbilityTriggerHook {
    pub fn new(stage: TriggerStage) -> Self {
        Self { stage }
    }
}

impl LifecycleHook for AbilityTriggerHook {
    fn name(&self) -> &'static str {
        match self.stage {
            TriggerStage::BattleStart => "ability_trigger_battle_start",
            TriggerStage::TurnStart => "ability_trigger_turn_start",
        }
    }

    fn stage(&self) -> TriggerStage {
        self.stage
    }

    fn priority(&self) -> i32 {
        -10
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Important
    }

    fn should_trigger(&self, ctx: &HookContext<'_>) -> bool {
        ctx.state
            .active_combatants()
            .filter_map(|id| ctx.state.combatant(id))
            .any(|combatant| combatant.ability.is_some())
    }

    fn run(&self, engine: &mut BattleEngine<'_>) -> Result<ActionReport, EngineError> {
        let mut merged = ActionReport::default();
        engine.for_each_active(SideFilter::Both, |engine, id| {
            let report = engine.trigger_ability(id, self.stage)?;
            merged.effects.extend(report.effects);
            merged.fainted.extend(report.fainted);
            Ok(())
        })?;
        Ok(merged)
    }
}
