use crate::state::{BattleOutcome, BattleState, Side};

use super::BattleEngine;

impl BattleEngine<'_> {
    /// Decides whether the encounter is over.
    ///
    /// An outcome already recorded (capture, escape) stands. Otherwise a side
    /// with no able members loses; when both sides are out in the same turn
    /// the player loses. An undecided battle that reaches `turn_limit` is a
    /// draw.
    pub fn check_outcome(&self, turn_limit: u32) -> Option<BattleOutcome> {
        decide(self.state, turn_limit)
    }
}

pub(crate) fn decide(state: &BattleState, turn_limit: u32) -> Option<BattleOutcome> {
    if let Some(outcome) = state.outcome {
        return Some(outcome);
    }

    let player_able = state.roster.party(Side::Player).has_able_members();
    let enemy_able = state.roster.party(Side::Enemy).has_able_members();
    match (player_able, enemy_able) {
        (false, _) => Some(BattleOutcome::Defeat),
        (true, false) => Some(BattleOutcome::Victory),
        (true, true) if state.turn.turn_number >= turn_limit => Some(BattleOutcome::Draw),
        (true, true) => None,
    }
}
