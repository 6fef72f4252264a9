//! Command legality checks.
//!
//! These functions only read state. The command collector calls them before
//! recording a selection and turns any [`SelectionError`] into a rejection
//! message followed by a re-prompt.

use crate::command::{CaptureDevice, CommandKind, MoveIntent, TargetList};
use crate::env::{ContentOracle, MoveId, MoveTarget};
use crate::state::{BattleState, CombatantId, CombatantState};

use super::SelectionError;

/// Move-slot cursors the combatant may pick this turn.
///
/// A slot is legal when it has power points left, is not disabled, and (under
/// a forced-repeat effect) is the move being repeated.
pub fn legal_moves(state: &BattleState, id: CombatantId) -> Vec<usize> {
    let Some(member) = state.combatant(id) else {
        return Vec::new();
    };
    (0..member.moves.len())
        .filter(|&cursor| check_slot(member, cursor).is_ok())
        .collect()
}

/// Validates a fight selection by move-slot cursor.
pub fn validate_fight(
    state: &BattleState,
    id: CombatantId,
    cursor: usize,
) -> Result<MoveIntent, SelectionError> {
    let member = state
        .combatant(id)
        .ok_or(SelectionError::MoveSlotOutOfRange { cursor })?;
    check_slot(member, cursor).map(MoveIntent::new)
}

fn check_slot(member: &CombatantState, cursor: usize) -> Result<MoveId, SelectionError> {
    let slot = member
        .moves
        .get(cursor)
        .ok_or(SelectionError::MoveSlotOutOfRange { cursor })?;
    let move_id = slot.move_id;

    if !slot.has_uses() {
        return Err(SelectionError::NoPowerPointsLeft { move_id });
    }
    if member.is_disabled(move_id) {
        return Err(SelectionError::MoveRestricted { move_id });
    }
    if let Some(forced) = member.encored_move()
        && forced != move_id
        && member.move_slot(forced).is_some_and(|s| s.has_uses())
    {
        return Err(SelectionError::MoveRestricted { move_id });
    }
    Ok(move_id)
}

/// Transforming is a once-per-battle action for player combatants.
pub fn validate_transform(state: &BattleState, id: CombatantId) -> Result<(), SelectionError> {
    let available = id.is_player() && state.combatant(id).is_some_and(|c| !c.transformed);
    if available {
        Ok(())
    } else {
        Err(SelectionError::CommandUnavailable {
            combatant: id,
            kind: CommandKind::Transform,
        })
    }
}

/// Validates switching `id` out for party member `party_index`.
///
/// The member must be able, off the field, and not already claimed by the
/// partner's switch this turn.
pub fn validate_switch(
    state: &BattleState,
    id: CombatantId,
    party_index: usize,
) -> Result<(), SelectionError> {
    let party = state.roster.party(id.side());
    let benched = party
        .members
        .get(party_index)
        .is_some_and(|member| !member.is_fainted())
        && !party.is_on_field(party_index);

    let claimed_by_partner = state.turn.command(id.partner()).is_some_and(|command| {
        command.kind == CommandKind::Switch && !command.skip && command.cursor == party_index
    });

    if benched && !claimed_by_partner {
        Ok(())
    } else {
        Err(SelectionError::InvalidSwitchTarget { party_index })
    }
}

/// Validates throwing a capture device at `target`. Wild encounters only.
pub fn validate_capture(
    state: &BattleState,
    id: CombatantId,
    cursor: usize,
    target: CombatantId,
) -> Result<CaptureDevice, SelectionError> {
    if !state.encounter.is_wild() || !id.is_player() {
        return Err(SelectionError::CaptureNotAllowed);
    }
    let device =
        CaptureDevice::from_cursor(cursor).ok_or(SelectionError::UnknownCaptureDevice { cursor })?;
    if target.side() == id.side() || !state.roster.is_active(target) {
        return Err(SelectionError::InvalidTarget { target });
    }
    Ok(device)
}

/// Fleeing is allowed from wild encounters only.
pub fn validate_flee(state: &BattleState, id: CombatantId) -> Result<(), SelectionError> {
    if state.encounter.is_wild() && id.is_player() {
        Ok(())
    } else {
        Err(SelectionError::FleeNotAllowed)
    }
}

/// Slots a move used by `user` may be aimed at.
pub fn legal_targets(
    state: &BattleState,
    content: &dyn ContentOracle,
    user: CombatantId,
    move_id: MoveId,
) -> TargetList {
    let target = content
        .move_data(move_id)
        .map_or(MoveTarget::SelectedOpponent, |data| data.target);
    let opponents = state.active_on_side(user.side().opposite());

    match target {
        MoveTarget::User => std::iter::once(user).collect(),
        MoveTarget::SelectedOpponent | MoveTarget::AllOpponents | MoveTarget::RandomOpponent => {
            opponents.collect()
        }
        MoveTarget::SelectedAny => state.active_combatants().filter(|&id| id != user).collect(),
    }
}

/// Returns true when the user has to choose the target interactively.
pub fn needs_target_selection(
    state: &BattleState,
    content: &dyn ContentOracle,
    user: CombatantId,
    move_id: MoveId,
) -> bool {
    let selectable = content
        .move_data(move_id)
        .is_some_and(|data| data.target.requires_selection());
    selectable && legal_targets(state, content, user, move_id).len() > 1
}

/// Checks every chosen target against the legal set.
pub fn validate_targets(
    legal: &[CombatantId],
    chosen: &[CombatantId],
) -> Result<(), SelectionError> {
    match chosen.iter().copied().find(|target| !legal.contains(target)) {
        Some(target) => Err(SelectionError::InvalidTarget { target }),
        None => Ok(()),
    }
}
