use std::cmp::Reverse;

use crate::env::{RandomSource, offsets};
use crate::state::{BattleState, CombatantId, Side};

/// Which side(s) of the field a speed-ordered pass covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SideFilter {
    Player,
    Enemy,
    #[default]
    Both,
}

impl SideFilter {
    pub const fn accepts(self, side: Side) -> bool {
        match self {
            SideFilter::Player => matches!(side, Side::Player),
            SideFilter::Enemy => matches!(side, Side::Enemy),
            SideFilter::Both => true,
        }
    }
}

impl From<Side> for SideFilter {
    fn from(side: Side) -> Self {
        match side {
            Side::Player => SideFilter::Player,
            Side::Enemy => SideFilter::Enemy,
        }
    }
}

/// Active combatants ordered by effective speed, fastest first.
///
/// The order is computed on the first call to `next` from a snapshot of the
/// state and cached; [`restart`](Self::restart) rewinds the cursor over the
/// same snapshot. Equal speeds are broken by a per-combatant draw taken from
/// a seed offset keyed on the turn and slot, so ties are reproducible and
/// never favour field position.
pub struct SpeedOrder<'a> {
    state: &'a BattleState,
    rng: &'a dyn RandomSource,
    filter: SideFilter,
    sorted: Option<Vec<CombatantId>>,
    cursor: usize,
}

impl<'a> SpeedOrder<'a> {
    pub fn new(state: &'a BattleState, rng: &'a dyn RandomSource, filter: SideFilter) -> Self {
        Self {
            state,
            rng,
            filter,
            sorted: None,
            cursor: 0,
        }
    }

    /// Rewinds to the fastest combatant.
    pub fn restart(&mut self) {
        self.cursor = 0;
    }

    /// Tie-break key for one combatant this turn.
    pub fn tiebreak_key(rng: &dyn RandomSource, turn: u32, id: CombatantId) -> u32 {
        rng.with_seed_offset(offsets::for_turn(offsets::SPEED_TIEBREAK, turn, id.0), |r| {
            r.next_u32()
        })
    }

    fn sorted(&mut self) -> &[CombatantId] {
        let state = self.state;
        let rng = self.rng;
        let filter = self.filter;
        self.sorted.get_or_insert_with(|| {
            let turn = state.turn.turn_number;
            let mut keyed: Vec<_> = state
                .active_combatants()
                .filter(|id| filter.accepts(id.side()))
                .map(|id| {
                    let speed = state.combatant(id).map_or(0, |c| c.effective_speed());
                    (Reverse(speed), Self::tiebreak_key(rng, turn, id), id)
                })
                .collect();
            keyed.sort();
            keyed.into_iter().map(|(_, _, id)| id).collect()
        })
    }
}

impl Iterator for SpeedOrder<'_> {
    type Item = CombatantId;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor;
        let next = self.sorted().get(cursor).copied();
        if next.is_some() {
            self.cursor += 1;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BattleConfig, Formation};
    use crate::env::PcgRandom;
    use crate::state::{BattleStats, CombatantState, Party, Roster};

    fn member(speed: u32) -> CombatantState {
        CombatantState::new(
            format!("spd{speed}"),
            50,
            100,
            BattleStats {
                attack: 50,
                defense: 50,
                speed,
            },
        )
    }

    fn double_battle(speeds: [u32; 4]) -> BattleState {
        let config = BattleConfig {
            formation: Formation::Double,
            ..BattleConfig::default()
        };
        let roster = Roster::new(
            Party::new(vec![member(speeds[0]), member(speeds[1])]),
            Party::new(vec![member(speeds[2]), member(speeds[3])]),
        );
        BattleState::new(&config, roster)
    }

    #[test]
    fn yields_fastest_first() {
        let state = double_battle([40, 90, 70, 10]);
        let rng = PcgRandom::new(1);

        let order: Vec<_> = SpeedOrder::new(&state, &rng, SideFilter::Both).collect();

        assert_eq!(
            order,
            vec![
                CombatantId::PLAYER_2,
                CombatantId::ENEMY,
                CombatantId::PLAYER,
                CombatantId::ENEMY_2
            ]
        );
    }

    #[test]
    fn filters_to_one_side() {
        let state = double_battle([40, 90, 70, 10]);
        let rng = PcgRandom::new(1);

        let enemies: Vec<_> = SpeedOrder::new(&state, &rng, SideFilter::Enemy).collect();

        assert_eq!(enemies, vec![CombatantId::ENEMY, CombatantId::ENEMY_2]);
    }

    #[test]
    fn restart_replays_same_order() {
        let state = double_battle([50, 50, 50, 50]);
        let rng = PcgRandom::new(9);

        let mut order = SpeedOrder::new(&state, &rng, SideFilter::Both);
        let first: Vec<_> = order.by_ref().collect();
        order.restart();
        let second: Vec<_> = order.collect();

        assert_eq!(first.len(), 4);
        assert_eq!(first, second);
    }

    #[test]
    fn ties_are_reproducible_for_a_seed() {
        let state = double_battle([50, 50, 50, 50]);

        let a: Vec<_> = SpeedOrder::new(&state, &PcgRandom::new(77), SideFilter::Both).collect();
        let b: Vec<_> = SpeedOrder::new(&state, &PcgRandom::new(77), SideFilter::Both).collect();

        assert_eq!(a, b);
    }

    #[test]
    fn ties_are_not_always_field_order() {
        let state = double_battle([50, 50, 50, 50]);
        let field_order = CombatantId::ALL.to_vec();

        let differs = (0..32u64).any(|seed| {
            let order: Vec<_> =
                SpeedOrder::new(&state, &PcgRandom::new(seed), SideFilter::Both).collect();
            order != field_order
        });

        assert!(differs);
    }
}
