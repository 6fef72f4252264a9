use std::collections::BTreeMap;

use crate::command::{ActionState, PreTurnCommand, TurnCommand};

use super::CombatantId;

/// Turn-scoped battle record.
///
/// Commands and pre-turn commands are cleared at every turn bootstrap. The
/// switch-attempt and escape counters carry across turns.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    pub turn_number: u32,

    /// One entry per active combatant. `None` means no command collected yet.
    pub turn_commands: BTreeMap<CombatantId, Option<TurnCommand>>,

    pub pre_turn_commands: BTreeMap<CombatantId, PreTurnCommand>,

    pub action_states: BTreeMap<CombatantId, ActionState>,

    /// Execution order resolved at turn start. Immutable for the rest of the turn.
    pub order: Vec<CombatantId>,

    /// Consecutive automated decisions that declined to swap.
    pub switch_attempt_counter: u32,

    /// Escape attempts made so far in this encounter.
    pub escape_attempts: u32,

    pub double_battle: bool,
}

impl TurnState {
    pub fn new(double_battle: bool) -> Self {
        Self {
            double_battle,
            ..Self::default()
        }
    }

    /// Clears the previous turn's intents and opens a slot per active combatant.
    pub fn open(&mut self, active: impl IntoIterator<Item = CombatantId>) {
        self.turn_commands.clear();
        self.pre_turn_commands.clear();
        self.action_states.clear();
        self.order.clear();
        for id in active {
            self.turn_commands.insert(id, None);
            self.action_states.insert(id, ActionState::Uncommitted);
        }
    }

    pub fn command(&self, id: CombatantId) -> Option<&TurnCommand> {
        self.turn_commands.get(&id).and_then(Option::as_ref)
    }

    pub fn has_open_slot(&self, id: CombatantId) -> bool {
        self.turn_commands.contains_key(&id)
    }

    pub fn action_state(&self, id: CombatantId) -> ActionState {
        self.action_states.get(&id).copied().unwrap_or_default()
    }

    pub fn set_action_state(&mut self, id: CombatantId, state: ActionState) {
        self.action_states.insert(id, state);
    }

    /// Returns true once every open slot holds a command.
    pub fn all_committed(&self) -> bool {
        self.turn_commands.values().all(Option::is_some)
    }
}
