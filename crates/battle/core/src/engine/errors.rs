//! Error types raised while validating selections and mutating battle state.

use crate::command::CommandKind;
use crate::env::{MoveId, OracleError};
use crate::error::{BattleError, ErrorSeverity};
use crate::state::CombatantId;

/// Rejected command selection.
///
/// The `Display` text is the inline rejection message shown before the same
/// selection step is offered again. Never propagated past command collection.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionError {
    #[error("there is no move in slot {cursor}")]
    MoveSlotOutOfRange { cursor: usize },

    #[error("{move_id} has no power points left")]
    NoPowerPointsLeft { move_id: MoveId },

    #[error("{move_id} cannot be used right now")]
    MoveRestricted { move_id: MoveId },

    #[error("party member {party_index} cannot be switched in")]
    InvalidSwitchTarget { party_index: usize },

    #[error("capture devices cannot be used here")]
    CaptureNotAllowed,

    #[error("there is no running from this battle")]
    FleeNotAllowed,

    #[error("{target} is not a legal target")]
    InvalidTarget { target: CombatantId },

    #[error("there is no capture device in slot {cursor}")]
    UnknownCaptureDevice { cursor: usize },

    #[error("{kind:?} is not available to {combatant}")]
    CommandUnavailable {
        combatant: CombatantId,
        kind: CommandKind,
    },
}

impl BattleError for SelectionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MoveSlotOutOfRange { .. } => "MOVE_SLOT_OUT_OF_RANGE",
            Self::NoPowerPointsLeft { .. } => "NO_POWER_POINTS_LEFT",
            Self::MoveRestricted { .. } => "MOVE_RESTRICTED",
            Self::InvalidSwitchTarget { .. } => "INVALID_SWITCH_TARGET",
            Self::CaptureNotAllowed => "CAPTURE_NOT_ALLOWED",
            Self::FleeNotAllowed => "FLEE_NOT_ALLOWED",
            Self::InvalidTarget { .. } => "INVALID_TARGET",
            Self::UnknownCaptureDevice { .. } => "UNKNOWN_CAPTURE_DEVICE",
            Self::CommandUnavailable { .. } => "COMMAND_UNAVAILABLE",
        }
    }
}

/// State mutation failure inside [`BattleEngine`](super::BattleEngine).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("no combatant occupies slot {0}")]
    CombatantNotFound(CombatantId),

    #[error("{0} is not in the content catalog")]
    UnknownMove(MoveId),

    #[error("party member {party_index} cannot enter slot {slot}")]
    InvalidSwitch {
        slot: CombatantId,
        party_index: usize,
    },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl BattleError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CombatantNotFound(_) | Self::InvalidSwitch { .. } => ErrorSeverity::Internal,
            Self::UnknownMove(_) | Self::Oracle(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CombatantNotFound(_) => "COMBATANT_NOT_FOUND",
            Self::UnknownMove(_) => "UNKNOWN_MOVE",
            Self::InvalidSwitch { .. } => "INVALID_SWITCH",
            Self::Oracle(_) => "ORACLE_ERROR",
        }
    }
}
