//! Heuristic scores for automated decisions.
//!
//! # Matchups
//!
//! ```text
//! matchup = offense × speed_bonus / defense × hp_fraction
//! ```
//!
//! averaged over the active opponents, where `offense` is the combatant's
//! attack over the opponent's defense, `defense` the opponent's attack over
//! the combatant's defense, and `speed_bonus` applies when the combatant
//! outspeeds the opponent.
//!
//! # Moves
//!
//! Damaging moves score the share of the target's remaining health one hit
//! would take (summed over every target for spread moves). Status moves use
//! flat situational values.

use battle_core::engine::damage_roll;
use battle_core::{BattleState, CombatantId, CombatantState, MoveData, MoveEffect, MoveTarget, Side};

/// Multiplier applied when the combatant is faster than its opponent.
pub const SPEED_BONUS: f64 = 1.25;

/// Average matchup of `member` against the active combatants opposing `side`.
pub fn matchup_score(state: &BattleState, member: &CombatantState, side: Side) -> f64 {
    let opponents: Vec<&CombatantState> = state
        .active_on_side(side.opposite())
        .filter_map(|id| state.combatant(id))
        .collect();
    if opponents.is_empty() {
        return 0.0;
    }

    let total: f64 = opponents
        .iter()
        .map(|opponent| single_matchup(member, opponent))
        .sum();
    total / opponents.len() as f64
}

fn single_matchup(member: &CombatantState, opponent: &CombatantState) -> f64 {
    let offense = ratio(member.effective_attack(), opponent.effective_defense());
    let defense = ratio(opponent.effective_attack(), member.effective_defense());
    let speed = if member.effective_speed() > opponent.effective_speed() {
        SPEED_BONUS
    } else {
        1.0
    };
    offense * speed / defense.max(f64::EPSILON) * hp_fraction(member)
}

pub fn hp_fraction(member: &CombatantState) -> f64 {
    ratio(member.hp, member.max_hp)
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    f64::from(numerator) / f64::from(denominator.max(1))
}

/// Score of `user` using `data` against the legal `targets`.
pub fn move_score(
    state: &BattleState,
    user: CombatantId,
    data: &MoveData,
    targets: &[CombatantId],
) -> f64 {
    let Some(attacker) = state.combatant(user) else {
        return 0.0;
    };
    let opponents = || {
        targets
            .iter()
            .filter(move |id| id.side() != user.side())
            .filter_map(|&id| state.combatant(id))
    };

    if data.is_damaging() {
        let per_target = opponents().map(|target| {
            let damage = damage_roll(
                attacker.level,
                data.power,
                attacker.effective_attack(),
                target.effective_defense(),
                100,
            );
            (f64::from(damage) / f64::from(target.hp.max(1))).min(1.0) * 100.0
        });
        return match data.target {
            MoveTarget::AllOpponents => per_target.sum(),
            _ => per_target.fold(0.0, f64::max),
        };
    }

    match data.effect {
        MoveEffect::Inflict { chance, .. } => {
            if opponents().any(|target| target.status.is_none()) {
                40.0 * f64::from(chance) / 100.0
            } else {
                0.0
            }
        }
        MoveEffect::SetWeather { weather, .. } if state.field.weather() != Some(weather) => 30.0,
        MoveEffect::SetTerrain { terrain, .. } if state.field.terrain() != Some(terrain) => 30.0,
        MoveEffect::Encore { .. } => {
            if opponents().any(|target| target.summon.last_move.is_some()) {
                25.0
            } else {
                0.0
            }
        }
        MoveEffect::HealUser { percent } => {
            (1.0 - hp_fraction(attacker)) * f64::from(percent)
        }
        _ => 0.0,
    }
}
