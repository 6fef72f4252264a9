//! Unified error types surfaced by the runtime API.
//!
//! Wraps scheduler misuse, engine failures, and command provider failures so
//! clients can bubble them up with consistent context.
use std::fmt;

use battle_core::{BattleError, CombatantId, EngineError, ErrorSeverity, SchedulerError, Side};
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{kind} command provider not set")]
    ProviderNotSet { kind: ProviderKind },

    #[error("command prompt channel closed")]
    PromptChannelClosed,

    #[error("command reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("critical hook '{hook}' failed")]
    Hook {
        hook: &'static str,
        #[source]
        source: EngineError,
    },

    #[error("runtime requires a content catalog before building")]
    MissingContent,

    #[error("invalid roster: {0}")]
    InvalidRoster(String),

    #[error("phase {phase} cannot accept this input")]
    UnexpectedInput { phase: &'static str },

    #[error("command for {0} is missing its target or device")]
    MalformedCommand(CombatantId),

    #[error("phase queue drained before the battle was decided")]
    Stalled,
}

impl BattleError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Scheduler(err) => err.severity(),
            Self::Engine(err) | Self::Hook { source: err, .. } => err.severity(),
            Self::MissingContent | Self::InvalidRoster(_) | Self::ProviderNotSet { .. } => {
                ErrorSeverity::Validation
            }
            Self::PromptChannelClosed | Self::ReplyChannelClosed(_) => ErrorSeverity::Internal,
            Self::UnexpectedInput { .. } | Self::MalformedCommand(_) | Self::Stalled => {
                ErrorSeverity::Fatal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ProviderNotSet { .. } => "PROVIDER_NOT_SET",
            Self::PromptChannelClosed => "PROMPT_CHANNEL_CLOSED",
            Self::ReplyChannelClosed(_) => "REPLY_CHANNEL_CLOSED",
            Self::Scheduler(err) => err.error_code(),
            Self::Engine(err) => err.error_code(),
            Self::Hook { .. } => "HOOK_FAILED",
            Self::MissingContent => "MISSING_CONTENT",
            Self::InvalidRoster(_) => "INVALID_ROSTER",
            Self::UnexpectedInput { .. } => "UNEXPECTED_INPUT",
            Self::MalformedCommand(_) => "MALFORMED_COMMAND",
            Self::Stalled => "STALLED",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProviderKind {
    Player,
    Enemy,
}

impl From<Side> for ProviderKind {
    fn from(side: Side) -> Self {
        match side {
            Side::Player => ProviderKind::Player,
            Side::Enemy => ProviderKind::Enemy,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderKind::Player => "player",
            ProviderKind::Enemy => "enemy",
        };
        write!(f, "{}", label)
    }
}
