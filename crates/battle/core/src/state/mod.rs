//! Battle state: roster, field, and turn-scoped records.
//!
//! [`BattleState`] is the single authoritative value a battle mutates. The
//! roster owns combatants; every other component refers to them through
//! [`CombatantId`] slots only.
mod combatant;
mod field;
mod turn;

pub use combatant::{
    BattleStats, CombatantId, CombatantState, EnemyBoosts, MoveSlot, Side, StatStages,
    StatusCondition, StatusKind, SummonData, TurnData, VolatileEffect, VolatileKind,
};
pub use field::{FieldState, Terrain, TimedField, Weather};
pub use turn::TurnState;

use crate::config::{BattleConfig, EncounterKind, Formation};

/// How an encounter was decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleOutcome {
    /// Every opponent fainted.
    Victory,
    /// Every player combatant fainted.
    Defeat,
    /// The opponent in the given slot was captured.
    Captured(CombatantId),
    Fled,
    /// Turn limit reached.
    Draw,
}

/// One side's party and which members occupy its field slots.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Party {
    pub members: Vec<CombatantState>,
    /// Party index occupying each field slot.
    pub active: [Option<usize>; 2],
}

impl Party {
    pub fn new(members: Vec<CombatantState>) -> Self {
        Self {
            members,
            active: [None, None],
        }
    }

    /// Sends out the first able members into the first `slots` field slots.
    pub fn deploy(&mut self, slots: usize) {
        self.active = [None, None];
        let mut able = self
            .members
            .iter()
            .enumerate()
            .filter(|(_, member)| !member.is_fainted())
            .map(|(index, _)| index);
        for slot in self.active.iter_mut().take(slots) {
            *slot = able.next();
        }
    }

    pub fn is_on_field(&self, party_index: usize) -> bool {
        self.active.contains(&Some(party_index))
    }

    /// Able members not currently on the field.
    pub fn bench(&self) -> impl Iterator<Item = usize> + '_ {
        self.members
            .iter()
            .enumerate()
            .filter(|(index, member)| !member.is_fainted() && !self.is_on_field(*index))
            .map(|(index, _)| index)
    }

    pub fn has_able_members(&self) -> bool {
        self.members.iter().any(|member| !member.is_fainted())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    pub player: Party,
    pub enemy: Party,
}

impl Roster {
    pub fn new(player: Party, enemy: Party) -> Self {
        Self { player, enemy }
    }

    pub fn party(&self, side: Side) -> &Party {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    pub fn party_mut(&mut self, side: Side) -> &mut Party {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    /// Party index occupying a slot.
    pub fn party_index(&self, id: CombatantId) -> Option<usize> {
        self.party(id.side()).active[id.field_index()]
    }

    /// Combatant occupying a slot, fainted or not.
    pub fn combatant(&self, id: CombatantId) -> Option<&CombatantState> {
        let index = self.party_index(id)?;
        self.party(id.side()).members.get(index)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut CombatantState> {
        let index = self.party_index(id)?;
        self.party_mut(id.side()).members.get_mut(index)
    }

    /// Returns true when the slot holds a combatant that can still act.
    pub fn is_active(&self, id: CombatantId) -> bool {
        self.combatant(id).is_some_and(|c| !c.is_fainted())
    }
}

/// Authoritative state of one encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub formation: Formation,
    pub encounter: EncounterKind,
    pub roster: Roster,
    pub field: FieldState,
    pub turn: TurnState,
    pub outcome: Option<BattleOutcome>,
}

impl BattleState {
    /// Builds the initial state and deploys the lead combatants of each side.
    pub fn new(config: &BattleConfig, mut roster: Roster) -> Self {
        let slots = config.formation.slots_per_side();
        roster.player.deploy(slots);
        roster.enemy.deploy(slots);

        Self {
            formation: config.formation,
            encounter: config.encounter,
            roster,
            field: FieldState::default(),
            turn: TurnState::new(config.formation.is_double()),
            outcome: None,
        }
    }

    /// Active combatants in field order (player slots first).
    pub fn active_combatants(&self) -> impl Iterator<Item = CombatantId> + '_ {
        CombatantId::ALL
            .into_iter()
            .filter(|&id| self.roster.is_active(id))
    }

    pub fn active_on_side(&self, side: Side) -> impl Iterator<Item = CombatantId> + '_ {
        self.active_combatants().filter(move |id| id.side() == side)
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&CombatantState> {
        self.roster.combatant(id)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut CombatantState> {
        self.roster.combatant_mut(id)
    }

    pub fn is_decided(&self) -> bool {
        self.outcome.is_some()
    }
}
