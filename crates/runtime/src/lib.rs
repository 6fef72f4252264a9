//! Async orchestration for turn-based battles.
//!
//! This crate drives the deterministic rules in `battle-core`: it runs the
//! phase queue one phase at a time, collects commands from pluggable
//! providers, and publishes what happens on a topic-based event bus.
//! Consumers embed [`BattleRuntime`] and plug in a [`CommandProvider`] per
//! side.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the driver, its builder, and configuration
//! - [`scheduler`] runs phases: command collection, dispatch, the turn
//!   lifecycle, and action execution
//! - [`api`] exposes the types downstream clients interact with
//! - [`providers`] holds the automated, channel, and scripted providers
//! - [`events`] provides the topic-based event bus
//! - [`hooks`] provides lifecycle hooks run at battle start and turn start
pub mod api;
pub mod events;
pub mod hooks;
pub mod providers;
pub mod runtime;
pub mod scheduler;

pub use api::{
    BattleView, CommandChoice, CommandProvider, CommandRequest, CommandResponse, ProviderKind,
    Result, RuntimeError, TargetRequest,
};
pub use events::{BattleEvent, Event, EventBus, PhaseEvent, Topic, TurnEvent};
pub use hooks::{AbilityTriggerHook, HookContext, HookCriticality, HookRegistry, LifecycleHook};
pub use providers::{
    AiCommandProvider, AiConfig, ChannelCommandProvider, Prompt, PromptHandle, ScriptedProvider,
};
pub use runtime::{BattleRuntime, RuntimeBuilder, RuntimeConfig};
pub use scheduler::{BattleContext, InputResponse, PendingInput, PhaseOutcome};
