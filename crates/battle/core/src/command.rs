//! Turn commands: each combatant's declared intent for one turn.
//!
//! Exactly one [`TurnCommand`] is recorded per active combatant before the
//! turn order is resolved. A command flagged `skip` still occupies its slot
//! but is never dispatched; it marks a slot whose action was claimed by its
//! partner (for example a capture attempt that uses both player slots).

use arrayvec::ArrayVec;

use crate::env::MoveId;
use crate::state::CombatantId;

/// Ordered target set for one command. At most every slot on the field.
pub type TargetList = ArrayVec<CombatantId, 4>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandKind {
    Fight,
    Switch,
    /// Use a capture device on an opponent.
    Item,
    Flee,
    /// Transform before the turn, then fight.
    Transform,
}

impl CommandKind {
    /// Commands ordered by priority and speed rather than ahead of them.
    pub const fn is_fight_group(self) -> bool {
        matches!(self, CommandKind::Fight | CommandKind::Transform)
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// How a move is being used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveUseMode {
    #[default]
    Normal,
    /// Skips power-point deduction and restriction checks.
    IgnorePp,
    /// Triggered by another effect; does not count as the user's action.
    FollowUp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveIntent {
    pub move_id: MoveId,
    pub use_mode: MoveUseMode,
}

impl MoveIntent {
    pub fn new(move_id: MoveId) -> Self {
        Self {
            move_id,
            use_mode: MoveUseMode::Normal,
        }
    }

    pub fn fallback(move_id: MoveId) -> Self {
        Self {
            move_id,
            use_mode: MoveUseMode::IgnorePp,
        }
    }
}

/// Capture device thrown by an `Item` command. Selected by the command cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CaptureDevice {
    Basic,
    Great,
    Ultra,
    Master,
}

impl CaptureDevice {
    pub fn from_cursor(cursor: usize) -> Option<Self> {
        match cursor {
            0 => Some(CaptureDevice::Basic),
            1 => Some(CaptureDevice::Great),
            2 => Some(CaptureDevice::Ultra),
            3 => Some(CaptureDevice::Master),
            _ => None,
        }
    }

    pub const fn cursor(self) -> usize {
        match self {
            CaptureDevice::Basic => 0,
            CaptureDevice::Great => 1,
            CaptureDevice::Ultra => 2,
            CaptureDevice::Master => 3,
        }
    }

    /// Catch-rate multiplier in tenths. `None` always succeeds.
    pub const fn multiplier_tenths(self) -> Option<u32> {
        match self {
            CaptureDevice::Basic => Some(10),
            CaptureDevice::Great => Some(15),
            CaptureDevice::Ultra => Some(20),
            CaptureDevice::Master => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwitchKind {
    /// Voluntary switch chosen as the turn's command.
    Switch,
    /// Replacement for a fainted combatant.
    Replace,
}

/// One combatant's declared intent for the current turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnCommand {
    pub kind: CommandKind,
    /// Selection index: move slot for fights, party index for switches,
    /// capture device for items.
    pub cursor: usize,
    pub targets: TargetList,
    pub move_intent: Option<MoveIntent>,
    pub skip: bool,
}

impl TurnCommand {
    pub fn fight(cursor: usize, intent: MoveIntent, targets: TargetList) -> Self {
        Self {
            kind: CommandKind::Fight,
            cursor,
            targets,
            move_intent: Some(intent),
            skip: false,
        }
    }

    pub fn transform(cursor: usize, intent: MoveIntent, targets: TargetList) -> Self {
        Self {
            kind: CommandKind::Transform,
            ..Self::fight(cursor, intent, targets)
        }
    }

    pub fn switch(party_index: usize) -> Self {
        Self::plain(CommandKind::Switch, party_index)
    }

    pub fn capture(device: CaptureDevice, target: CombatantId) -> Self {
        let mut command = Self::plain(CommandKind::Item, device.cursor());
        command.targets.push(target);
        command
    }

    pub fn flee() -> Self {
        Self::plain(CommandKind::Flee, 0)
    }

    /// Placeholder for a slot whose action was claimed by `kind` from its partner.
    pub fn skipped(kind: CommandKind) -> Self {
        Self {
            skip: true,
            ..Self::plain(kind, 0)
        }
    }

    fn plain(kind: CommandKind, cursor: usize) -> Self {
        Self {
            kind,
            cursor,
            targets: TargetList::new(),
            move_intent: None,
            skip: false,
        }
    }

    pub fn with_targets(mut self, targets: TargetList) -> Self {
        self.targets = targets;
        self
    }

    pub fn move_id(&self) -> Option<MoveId> {
        self.move_intent.map(|intent| intent.move_id)
    }
}

/// Command resolved before the main turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PreTurnCommand {
    Transform,
}

/// Progress of one combatant's action through a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionState {
    #[default]
    Uncommitted,
    Committed,
    Dispatched,
    Resolved,
    /// The turn was cut short before this combatant's action resolved.
    Interrupted,
}
