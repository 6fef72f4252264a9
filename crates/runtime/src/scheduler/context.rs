//! Per-battle context threaded through every phase.

use std::sync::Arc;

use battle_core::{
    BattleConfig, BattleEngine, BattleState, CombatantId, ContentOracle, PcgRandom, PhaseQueue,
    Roster, compute_seed, env::offsets,
};

use crate::events::{Event, EventBus};
use crate::hooks::HookRegistry;

/// Everything a running phase may read or mutate.
///
/// Constructed once per battle. Only one phase runs at a time, so phases take
/// the context by `&mut` and no locking is involved.
pub struct BattleContext {
    pub(crate) state: BattleState,
    pub(crate) queue: PhaseQueue,
    pub(crate) config: BattleConfig,
    pub(crate) content: Arc<dyn ContentOracle>,
    pub(crate) rng: PcgRandom,
    pub(crate) hooks: Arc<HookRegistry>,
    pub(crate) events: EventBus,
}

impl BattleContext {
    pub fn new(
        config: BattleConfig,
        roster: Roster,
        content: Arc<dyn ContentOracle>,
        hooks: Arc<HookRegistry>,
        events: EventBus,
    ) -> Self {
        let state = BattleState::new(&config, roster);
        Self {
            state,
            queue: PhaseQueue::new(),
            rng: PcgRandom::new(config.seed),
            config,
            content,
            hooks,
            events,
        }
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    /// Direct state access for fixtures and tools. Phases mutate state
    /// through [`engine`](Self::engine).
    pub fn state_mut(&mut self) -> &mut BattleState {
        &mut self.state
    }

    pub fn queue(&self) -> &PhaseQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut PhaseQueue {
        &mut self.queue
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn content(&self) -> &dyn ContentOracle {
        self.content.as_ref()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn engine(&mut self) -> BattleEngine<'_> {
        BattleEngine::new(&mut self.state, self.content.as_ref(), &mut self.rng)
    }

    pub(crate) fn publish(&self, event: Event) {
        self.events.publish(event);
    }

    /// Seed for a provider's random choices for `combatant` this turn.
    pub(crate) fn decision_seed(&self, combatant: CombatantId) -> u64 {
        let offset = offsets::for_turn(
            offsets::DECISION,
            self.state.turn.turn_number,
            combatant.0,
        );
        compute_seed(self.config.seed, offset, 0, 0)
    }
}
