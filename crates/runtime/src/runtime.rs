//! High-level battle driver.
//!
//! [`BattleRuntime`] owns the battle context and the command providers. Each
//! [`step`](BattleRuntime::step) pops one phase, runs it, and, while the phase
//! is suspended on input, asks the provider for the combatant's side and
//! resumes the phase with the answer. Only one phase is ever running.

use std::env;
use std::sync::Arc;

use battle_core::{
    BattleConfig, BattleOutcome, BattleState, ContentOracle, EncounterKind, Formation, Phase,
    Roster, Side,
};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::api::{BattleView, CommandProvider, ProviderKind, Result, RuntimeError};
use crate::events::{Event, EventBus, PhaseEvent, Topic};
use crate::hooks::{HookRegistry, LifecycleHook};
use crate::providers::{AiCommandProvider, AiConfig, ChannelCommandProvider, PromptHandle};
use crate::scheduler::{
    BattleContext, InputResponse, PendingInput, PhaseOutcome, resume_phase, run_phase,
};

/// Runtime configuration shared by the driver and its providers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub battle: BattleConfig,
    pub ai: AiConfig,
    pub event_buffer_size: usize,
    pub prompt_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            battle: BattleConfig::default(),
            ai: AiConfig::default(),
            event_buffer_size: 100,
            prompt_buffer_size: 16,
        }
    }
}

impl RuntimeConfig {
    pub fn new(battle: BattleConfig) -> Self {
        Self {
            battle,
            ..Self::default()
        }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_SEED` - Base seed for every random draw
    /// - `BATTLE_DOUBLE` - Two combatants per side (default: false)
    /// - `BATTLE_WILD` - Wild encounter; false means a trainer battle
    /// - `BATTLE_BOSS` - Trainer battle against a boss
    /// - `BATTLE_TURN_LIMIT` - Turn at which the battle is a draw (default: 1000)
    /// - `BATTLE_EVENT_BUFFER` - Event channel capacity per topic (default: 100)
    /// - `BATTLE_PROMPT_BUFFER` - Pending UI prompts (default: 16)
    /// - `BATTLE_AI_BOSS_THRESHOLD`, `BATTLE_AI_SWITCH_THRESHOLD`,
    ///   `BATTLE_AI_SWITCH_DECAY` - Opponent switch tuning
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies the variables read by [`from_env`](Self::from_env) on top of
    /// `self`, e.g. a configuration loaded from file.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(seed) = read_env::<u64>("BATTLE_SEED") {
            self.battle.seed = seed;
        }
        if let Some(double) = read_env_bool("BATTLE_DOUBLE") {
            self.battle.formation = if double {
                Formation::Double
            } else {
                Formation::Single
            };
        }
        match (read_env_bool("BATTLE_WILD"), read_env_bool("BATTLE_BOSS")) {
            (Some(true), _) => self.battle.encounter = EncounterKind::Wild,
            (Some(false), boss) => {
                self.battle.encounter = EncounterKind::Trainer {
                    boss: boss.unwrap_or(false),
                };
            }
            (None, Some(boss)) if boss || !self.battle.encounter.is_wild() => {
                self.battle.encounter = EncounterKind::Trainer { boss };
            }
            _ => {}
        }
        if let Some(limit) = read_env::<u32>("BATTLE_TURN_LIMIT") {
            self.battle.turn_limit = limit.max(1);
        }
        if let Some(capacity) = read_env::<usize>("BATTLE_EVENT_BUFFER") {
            self.event_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("BATTLE_PROMPT_BUFFER") {
            self.prompt_buffer_size = capacity.max(1);
        }
        if let Some(threshold) = read_env::<f64>("BATTLE_AI_BOSS_THRESHOLD") {
            self.ai.boss_switch_threshold = threshold;
        }
        if let Some(threshold) = read_env::<f64>("BATTLE_AI_SWITCH_THRESHOLD") {
            self.ai.default_switch_threshold = threshold;
        }
        if let Some(decay) = read_env::<f64>("BATTLE_AI_SWITCH_DECAY") {
            self.ai.switch_decay = decay;
        }
        self
    }

    /// Channel provider sized by `prompt_buffer_size`.
    pub fn prompt_channel(&self) -> (ChannelCommandProvider, PromptHandle) {
        crate::providers::channel(self.prompt_buffer_size)
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Drives one battle from start to outcome.
pub struct BattleRuntime {
    ctx: BattleContext,
    player_provider: Option<Box<dyn CommandProvider>>,
    enemy_provider: Option<Box<dyn CommandProvider>>,
}

impl BattleRuntime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn state(&self) -> &BattleState {
        self.ctx.state()
    }

    pub fn context(&self) -> &BattleContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut BattleContext {
        &mut self.ctx
    }

    pub fn events(&self) -> &EventBus {
        self.ctx.events()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.ctx.events().subscribe(topic)
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.ctx.state().outcome
    }

    pub fn set_player_provider(&mut self, provider: impl CommandProvider + 'static) {
        self.player_provider = Some(Box::new(provider));
    }

    pub fn set_enemy_provider(&mut self, provider: impl CommandProvider + 'static) {
        self.enemy_provider = Some(Box::new(provider));
    }

    /// Runs the next phase to completion.
    ///
    /// Returns the phase name, or `None` once the queue is drained.
    pub async fn step(&mut self) -> Result<Option<&'static str>> {
        let Some(phase) = self.ctx.queue_mut().pop_for_run()? else {
            return Ok(None);
        };
        let name = phase.name();
        debug!(
            target: "runtime::scheduler",
            phase = name,
            combatant = ?phase.combatant(),
            "Phase started"
        );
        self.ctx.publish(Event::Phase(PhaseEvent::Started {
            phase: name.to_owned(),
            combatant: phase.combatant(),
        }));

        let mut outcome = run_phase(&mut self.ctx, &phase)?;
        while let PhaseOutcome::Suspended(input) = outcome {
            let combatant = input.combatant();
            debug!(
                target: "runtime::scheduler",
                phase = name,
                combatant = %combatant,
                "Phase suspended"
            );
            self.ctx.publish(Event::Phase(PhaseEvent::Suspended {
                phase: name.to_owned(),
                combatant,
            }));

            let response = self.ask(&input).await?;
            outcome = resume_phase(&mut self.ctx, &phase, response)?;
        }

        self.ctx.queue_mut().end_current()?;
        debug!(target: "runtime::scheduler", phase = name, "Phase ended");
        self.ctx.publish(Event::Phase(PhaseEvent::Ended {
            phase: name.to_owned(),
        }));
        Ok(Some(name))
    }

    /// Steps until the queue drains and returns the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Stalled`] if the queue empties without a
    /// recorded outcome.
    pub async fn run(&mut self) -> Result<BattleOutcome> {
        while self.step().await?.is_some() {}

        let outcome = self.outcome().ok_or(RuntimeError::Stalled)?;
        info!(
            target: "runtime::scheduler",
            ?outcome,
            turns = self.state().turn.turn_number,
            phases = self.ctx.queue().completed(),
            "Battle finished"
        );
        Ok(outcome)
    }

    async fn ask(&self, input: &PendingInput) -> Result<InputResponse> {
        let side = input.combatant().side();
        let provider = match side {
            Side::Player => self.player_provider.as_deref(),
            Side::Enemy => self.enemy_provider.as_deref(),
        }
        .ok_or(RuntimeError::ProviderNotSet {
            kind: ProviderKind::from(side),
        })?;

        let view = BattleView::new(self.ctx.state(), self.ctx.content());
        match input {
            PendingInput::Command(request) => provider
                .select_command(request, view)
                .await
                .map(InputResponse::Command),
            PendingInput::Targets(request) => provider
                .select_targets(request, view)
                .await
                .map(InputResponse::Targets),
        }
    }
}

/// Builder for [`BattleRuntime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    content: Option<Arc<dyn ContentOracle>>,
    roster: Option<Roster>,
    player_provider: Option<Box<dyn CommandProvider>>,
    enemy_provider: Option<Box<dyn CommandProvider>>,
    hooks: Option<HookRegistry>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            content: None,
            roster: None,
            player_provider: None,
            enemy_provider: None,
            hooks: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required content catalog.
    pub fn content(mut self, content: Arc<dyn ContentOracle>) -> Self {
        self.content = Some(content);
        self
    }

    /// Set the required roster. Lead members are deployed at build time.
    pub fn roster(mut self, roster: Roster) -> Self {
        self.roster = Some(roster);
        self
    }

    pub fn player_provider(mut self, provider: impl CommandProvider + 'static) -> Self {
        self.player_provider = Some(Box::new(provider));
        self
    }

    /// Set the opponent provider. Defaults to [`AiCommandProvider`] built
    /// from the configured [`AiConfig`].
    pub fn enemy_provider(mut self, provider: impl CommandProvider + 'static) -> Self {
        self.enemy_provider = Some(Box::new(provider));
        self
    }

    /// Replace the hook set. Defaults to [`HookRegistry::default_hooks`].
    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Adds hooks to the default hook set.
    ///
    /// Discards any registry set with [`with_hooks`](Self::with_hooks).
    pub fn add_hooks(mut self, additional: Vec<Arc<dyn LifecycleHook>>) -> Self {
        self.hooks = Some(HookRegistry::with_additional(additional));
        self
    }

    pub fn build(self) -> Result<BattleRuntime> {
        let content = self.content.ok_or(RuntimeError::MissingContent)?;
        let roster = self
            .roster
            .ok_or_else(|| RuntimeError::InvalidRoster("no roster provided".into()))?;
        validate_roster(&roster, self.config.battle.max_party_size)?;

        let events = EventBus::with_capacity(self.config.event_buffer_size);
        let hooks = Arc::new(self.hooks.unwrap_or_default());
        let mut ctx =
            BattleContext::new(self.config.battle.clone(), roster, content, hooks, events);
        ctx.queue_mut().append(Phase::BattleStart);

        let enemy_provider = self.enemy_provider.unwrap_or_else(|| {
            Box::new(AiCommandProvider::new(self.config.ai)) as Box<dyn CommandProvider>
        });

        Ok(BattleRuntime {
            ctx,
            player_provider: self.player_provider,
            enemy_provider: Some(enemy_provider),
        })
    }
}

fn validate_roster(roster: &Roster, max_party_size: usize) -> Result<()> {
    for side in [Side::Player, Side::Enemy] {
        let party = roster.party(side);
        let kind = ProviderKind::from(side);
        if party.members.is_empty() {
            return Err(RuntimeError::InvalidRoster(format!("{kind} party is empty")));
        }
        if party.members.len() > max_party_size {
            return Err(RuntimeError::InvalidRoster(format!(
                "{kind} party has {} members, at most {max_party_size} allowed",
                party.members.len()
            )));
        }
        if !party.has_able_members() {
            return Err(RuntimeError::InvalidRoster(format!(
                "{kind} party has no able members"
            )));
        }
    }
    Ok(())
}
