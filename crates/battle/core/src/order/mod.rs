//! Turn order resolution.
//!
//! [`TurnOrderResolver`] turns the commands collected for a turn into the
//! sequence combatants act in. The result is computed once at turn start and
//! stored on the turn state; later speed changes do not reorder it.

mod speed;

pub use speed::{SideFilter, SpeedOrder};

use std::cmp::Reverse;

use crate::env::{ContentOracle, RandomSource, offsets};
use crate::state::{BattleState, CombatantId};

/// Resolved action order for one turn.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnOrder {
    pub order: Vec<CombatantId>,
    /// Combatants whose bypass effect fired this turn.
    pub bypassed: Vec<CombatantId>,
}

/// Orders combatants by command kind, move priority, bypass effects, and speed.
///
/// 1. Non-fight commands (switch, item, flee) act first, in field order.
/// 2. Fight commands follow, sorted by move priority tier (highest first).
/// 3. Within a tier, combatants whose bypass-speed effect fired act first.
/// 4. Remaining ties follow [`SpeedOrder`], including its tie-break draws.
///
/// Slots without a command, and slots whose command is a skip marker, are left
/// out.
pub struct TurnOrderResolver<'a> {
    state: &'a BattleState,
    content: &'a dyn ContentOracle,
    rng: &'a dyn RandomSource,
}

impl<'a> TurnOrderResolver<'a> {
    pub fn new(
        state: &'a BattleState,
        content: &'a dyn ContentOracle,
        rng: &'a dyn RandomSource,
    ) -> Self {
        Self {
            state,
            content,
            rng,
        }
    }

    pub fn resolve(&self) -> TurnOrder {
        let commands = &self.state.turn;

        let mut leading = Vec::new();
        let mut fighters = Vec::new();
        for id in self.state.active_combatants() {
            let Some(command) = commands.command(id) else {
                continue;
            };
            if command.skip {
                continue;
            }
            if command.kind.is_fight_group() {
                fighters.push(id);
            } else {
                leading.push(id);
            }
        }

        let speed_rank: Vec<CombatantId> =
            SpeedOrder::new(self.state, self.rng, SideFilter::Both).collect();
        let rank_of = |id: CombatantId| {
            speed_rank
                .iter()
                .position(|&ranked| ranked == id)
                .unwrap_or(speed_rank.len())
        };

        let bypassed: Vec<CombatantId> = fighters
            .iter()
            .copied()
            .filter(|&id| self.rolls_bypass(id))
            .collect();

        fighters.sort_by_key(|&id| {
            let priority = commands
                .command(id)
                .and_then(|command| command.move_id())
                .map_or(0, |move_id| self.content.move_priority(move_id));
            (Reverse(priority), !bypassed.contains(&id), rank_of(id))
        });

        leading.extend(fighters);
        TurnOrder {
            order: leading,
            bypassed,
        }
    }

    /// Highest bypass-speed chance among the combatant's ability and held item.
    pub fn bypass_chance(&self, id: CombatantId) -> u8 {
        let Some(combatant) = self.state.combatant(id) else {
            return 0;
        };
        let from_ability = combatant
            .ability
            .and_then(|ability| self.content.ability(ability))
            .map_or(0, |ability| ability.bypass_speed_chance);
        let from_item = combatant
            .held_item
            .and_then(|item| self.content.held_item(item))
            .map_or(0, |item| item.bypass_speed_chance);
        from_ability.max(from_item)
    }

    fn rolls_bypass(&self, id: CombatantId) -> bool {
        let chance = self.bypass_chance(id);
        if chance == 0 {
            return false;
        }
        let turn = self.state.turn.turn_number;
        self.rng
            .with_seed_offset(offsets::for_turn(offsets::BYPASS_SPEED, turn, id.0), |r| {
                r.roll_percent(chance)
            })
    }
}
