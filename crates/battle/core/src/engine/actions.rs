use crate::command::{CaptureDevice, MoveUseMode, SwitchKind, TargetList};
use crate::env::{AbilityEffect, MoveData, MoveEffect, MoveId, MoveTarget, TriggerStage, offsets};
use crate::state::{
    BattleOutcome, CombatantId, StatusCondition, StatusKind, SummonData, TimedField, TurnData,
    VolatileKind,
};

use super::outcome::decide;
use super::{ActionReport, BattleEffect, BattleEngine, EngineError, MoveFailure};

/// Chance in percent that a paralysed combatant loses its action.
const PARALYSIS_SKIP_CHANCE: u8 = 25;

/// Base damage before the random roll.
///
/// `((2 * level / 5 + 2) * power * attack / defense) / 50 + 2`, scaled by
/// `roll` percent and never below 1.
pub fn damage_roll(level: u8, power: u16, attack: u32, defense: u32, roll: u32) -> u32 {
    let level = u64::from(level);
    let base = ((2 * level / 5 + 2) * u64::from(power) * u64::from(attack)
        / u64::from(defense.max(1)))
        / 50
        + 2;
    (base * u64::from(roll) / 100).max(1) as u32
}

/// Capture chance in percent for a device with the given multiplier.
///
/// `(3 * max - 2 * hp) * 100 * multiplier / (3 * max * 10)`, halved for bosses.
pub fn capture_rate(max_hp: u32, hp: u32, multiplier_tenths: u32, is_boss: bool) -> u32 {
    let max = u64::from(max_hp.max(1));
    let hp = u64::from(hp.min(max_hp));
    let rate = (3 * max - 2 * hp) * 100 * u64::from(multiplier_tenths) / (3 * max * 10);
    let rate = if is_boss { rate / 2 } else { rate };
    rate.min(100) as u32
}

/// Escape odds out of 256. Above 255 the escape always succeeds.
pub fn escape_odds(speed: u32, enemy_speed: u32, attempts: u32) -> u32 {
    speed.saturating_mul(128) / enemy_speed.max(1) + 30 * attempts
}

impl BattleEngine<'_> {
    /// Announces a move ahead of the turn's actions.
    pub fn announce_move(
        &mut self,
        user: CombatantId,
        move_id: MoveId,
    ) -> Result<ActionReport, EngineError> {
        let mut report = ActionReport::default();
        if self.combatant(user)?.is_fainted() {
            return Ok(report);
        }
        report.push(BattleEffect::MoveAnnounced { user, move_id });
        Ok(report)
    }

    /// Executes a move: action checks, power-point use, damage, then the
    /// secondary effect.
    ///
    /// A user that fainted or was switched in after its command was
    /// dispatched does nothing.
    pub fn use_move(
        &mut self,
        user: CombatantId,
        move_id: MoveId,
        targets: &[CombatantId],
        use_mode: MoveUseMode,
    ) -> Result<ActionReport, EngineError> {
        let mut report = ActionReport::default();
        let content = self.content;
        let turn = self.turn();

        let attacker = self.combatant(user)?;
        let just_switched_in =
            attacker.turn_data.switched_in && use_mode != MoveUseMode::FollowUp;
        if attacker.is_fainted() || just_switched_in {
            return Ok(report);
        }
        let data = content
            .move_data(move_id)
            .ok_or(EngineError::UnknownMove(move_id))?;

        if use_mode != MoveUseMode::FollowUp
            && let Some(reason) = self.action_blocked(user, turn)?
        {
            self.combatant_mut(user)?.turn_data.acted = true;
            report.push(BattleEffect::MoveFailed {
                user,
                move_id,
                reason,
            });
            return Ok(report);
        }

        let attacker = self.combatant_mut(user)?;
        if use_mode == MoveUseMode::Normal
            && !data.is_fallback()
            && let Some(slot) = attacker.move_slot_mut(move_id)
        {
            if !slot.has_uses() {
                report.push(BattleEffect::MoveFailed {
                    user,
                    move_id,
                    reason: MoveFailure::NoPowerPoints,
                });
                return Ok(report);
            }
            slot.pp -= 1;
        }
        if use_mode != MoveUseMode::FollowUp {
            attacker.turn_data.acted = true;
            attacker.summon.last_move = Some(move_id);
        }
        report.push(BattleEffect::MoveUsed {
            user,
            move_id,
            use_mode,
        });

        let resolved = self.resolve_targets(user, data.target, targets);
        if resolved.is_empty() {
            report.push(BattleEffect::MoveFailed {
                user,
                move_id,
                reason: MoveFailure::NoTarget,
            });
            return Ok(report);
        }

        if data.is_damaging() {
            for &target in &resolved {
                self.strike(user, target, data, &mut report)?;
            }
        }
        self.apply_move_effect(user, &resolved, data, &mut report)?;

        Ok(report)
    }

    /// Returns why the user cannot act this turn, if anything stops it.
    fn action_blocked(
        &mut self,
        user: CombatantId,
        turn: u32,
    ) -> Result<Option<MoveFailure>, EngineError> {
        let attacker = self.combatant(user)?;
        if attacker
            .volatiles
            .iter()
            .any(|v| v.kind == VolatileKind::Flinch)
        {
            return Ok(Some(MoveFailure::Flinched));
        }
        match attacker.status.map(|s| s.kind) {
            Some(StatusKind::Sleep) => Ok(Some(MoveFailure::Asleep)),
            Some(StatusKind::Paralysis) => {
                let skipped = self.rng.with_seed_offset(
                    offsets::for_turn(offsets::ACTION_CHECK, turn, user.0),
                    |r| r.roll_percent(PARALYSIS_SKIP_CHANCE),
                );
                Ok(skipped.then_some(MoveFailure::Paralyzed))
            }
            _ => Ok(None),
        }
    }

    /// Turns a move's declared targets into the slots it actually hits.
    ///
    /// A chosen target that is no longer active is redirected to a random
    /// active opponent.
    fn resolve_targets(
        &mut self,
        user: CombatantId,
        target: MoveTarget,
        chosen: &[CombatantId],
    ) -> TargetList {
        let opponents: TargetList = self
            .state
            .active_on_side(user.side().opposite())
            .collect();

        match target {
            MoveTarget::User => std::iter::once(user).collect(),
            MoveTarget::AllOpponents => opponents,
            MoveTarget::RandomOpponent => self.pick_random(&opponents),
            MoveTarget::SelectedOpponent | MoveTarget::SelectedAny => {
                let still_active: TargetList = chosen
                    .iter()
                    .copied()
                    .filter(|&id| id != user && self.state.roster.is_active(id))
                    .collect();
                if still_active.is_empty() {
                    self.pick_random(&opponents)
                } else {
                    still_active
                }
            }
        }
    }

    fn pick_random(&mut self, candidates: &[CombatantId]) -> TargetList {
        let mut picked = TargetList::new();
        if !candidates.is_empty() {
            let index = self.rng.next_in_range(candidates.len() as u32) as usize;
            picked.push(candidates[index]);
        }
        picked
    }

    fn strike(
        &mut self,
        user: CombatantId,
        target: CombatantId,
        data: &MoveData,
        report: &mut ActionReport,
    ) -> Result<(), EngineError> {
        if !self.state.roster.is_active(target) {
            return Ok(());
        }
        let turn = self.turn();
        let attacker = self.combatant(user)?;
        let (level, attack) = (attacker.level, attacker.effective_attack());
        let defense = self.combatant(target)?.effective_defense();

        let roll = self.rng.with_seed_offset(
            offsets::for_turn(offsets::DAMAGE_ROLL, turn, user.0 * 4 + target.0),
            |r| 85 + r.next_in_range(16),
        );
        let amount = damage_roll(level, data.power, attack, defense, roll);

        let defender = self.combatant_mut(target)?;
        let dealt = defender.take_damage(amount);
        let remaining = defender.hp;
        report.record_damage(target, dealt, remaining);
        Ok(())
    }

    fn apply_move_effect(
        &mut self,
        user: CombatantId,
        targets: &[CombatantId],
        data: &MoveData,
        report: &mut ActionReport,
    ) -> Result<(), EngineError> {
        let turn = self.turn();
        match data.effect {
            MoveEffect::None => {}
            MoveEffect::Inflict { status, chance } => {
                for &target in targets {
                    let eligible = self
                        .state
                        .combatant(target)
                        .is_some_and(|c| !c.is_fainted() && c.status.is_none());
                    if !eligible {
                        continue;
                    }
                    let lands = self.rng.with_seed_offset(
                        offsets::for_turn(offsets::SECONDARY_EFFECT, turn, user.0 * 4 + target.0),
                        |r| r.roll_percent(chance),
                    );
                    if lands {
                        self.combatant_mut(target)?.status = Some(StatusCondition::new(status));
                        report.push(BattleEffect::StatusInflicted { target, status });
                    }
                }
            }
            MoveEffect::SetWeather { weather, turns } => {
                self.state.field.weather = Some(TimedField::new(weather, turns));
                report.push(BattleEffect::WeatherSet { weather, turns });
            }
            MoveEffect::SetTerrain { terrain, turns } => {
                self.state.field.terrain = Some(TimedField::new(terrain, turns));
                report.push(BattleEffect::TerrainSet { terrain, turns });
            }
            MoveEffect::Encore { turns } => {
                for &target in targets {
                    let Some(defender) = self.state.combatant_mut(target) else {
                        continue;
                    };
                    let Some(last) = defender.summon.last_move else {
                        continue;
                    };
                    if defender.is_fainted() || last == MoveId::STRUGGLE {
                        continue;
                    }
                    let kind = VolatileKind::Encore(last);
                    defender.add_volatile(kind, turns);
                    report.push(BattleEffect::VolatileApplied { target, kind });
                }
            }
            MoveEffect::HealUser { percent } => {
                let attacker = self.combatant_mut(user)?;
                let amount = attacker.max_hp * u32::from(percent) / 100;
                let restored = attacker.heal(amount);
                if restored > 0 {
                    report.push(BattleEffect::Healed {
                        target: user,
                        amount: restored,
                    });
                }
            }
            MoveEffect::Recoil { divisor } => {
                let attacker = self.combatant_mut(user)?;
                let amount = (attacker.max_hp / u32::from(divisor.max(1))).max(1);
                let dealt = attacker.take_damage(amount);
                let remaining = attacker.hp;
                report.record_damage(user, dealt, remaining);
            }
        }
        Ok(())
    }

    /// Puts party member `party_index` into `slot`, withdrawing the occupant.
    pub fn switch_in(
        &mut self,
        slot: CombatantId,
        party_index: usize,
        kind: SwitchKind,
    ) -> Result<ActionReport, EngineError> {
        let invalid = EngineError::InvalidSwitch { slot, party_index };
        let party = self.state.roster.party_mut(slot.side());

        let eligible = party
            .members
            .get(party_index)
            .is_some_and(|member| !member.is_fainted())
            && !party.is_on_field(party_index);
        if !eligible {
            return Err(invalid);
        }

        let outgoing = party.active[slot.field_index()];
        if let Some(out) = outgoing
            && let Some(member) = party.members.get_mut(out)
        {
            member.reset_on_switch_out();
        }

        party.active[slot.field_index()] = Some(party_index);
        let incoming = party.members.get_mut(party_index).ok_or(invalid)?;
        incoming.turn_data = TurnData {
            switched_in: true,
            ..TurnData::default()
        };
        incoming.summon = SummonData::default();

        let mut report = ActionReport::default();
        report.push(BattleEffect::Switched {
            slot,
            kind,
            from: outgoing,
            to: party_index,
        });
        Ok(report)
    }

    pub fn transform(&mut self, combatant: CombatantId) -> Result<ActionReport, EngineError> {
        let mut report = ActionReport::default();
        let member = self.combatant_mut(combatant)?;
        if member.is_fainted() || member.transformed {
            return Ok(report);
        }
        member.transformed = true;
        report.push(BattleEffect::Transformed { combatant });
        Ok(report)
    }

    /// Throws a capture device. A success vacates the target's slot and
    /// decides the encounter.
    pub fn capture(
        &mut self,
        thrower: CombatantId,
        target: CombatantId,
        device: CaptureDevice,
    ) -> Result<ActionReport, EngineError> {
        let turn = self.turn();
        let quarry = self.combatant(target)?;

        let success = match device.multiplier_tenths() {
            None => true,
            Some(multiplier) => {
                let rate = capture_rate(quarry.max_hp, quarry.hp, multiplier, quarry.is_boss);
                self.rng.with_seed_offset(
                    offsets::for_turn(offsets::CAPTURE, turn, target.0),
                    |r| r.next_in_range(100) < rate,
                )
            }
        };

        let mut report = ActionReport::default();
        report.push(BattleEffect::CaptureAttempted {
            thrower,
            target,
            device,
            success,
        });
        if success {
            self.state.roster.party_mut(target.side()).active[target.field_index()] = None;
            report.decided = Some(BattleOutcome::Captured(target));
        }
        Ok(report)
    }

    /// Attempts to escape. Each attempt raises the odds of the next one.
    pub fn flee(&mut self, combatant: CombatantId) -> Result<ActionReport, EngineError> {
        let turn = self.turn();
        let speed = self.combatant(combatant)?.effective_speed();
        let enemy_speed = self
            .state
            .active_on_side(combatant.side().opposite())
            .filter_map(|id| self.state.combatant(id))
            .map(|c| c.effective_speed())
            .max()
            .unwrap_or(0);

        let attempts = self.state.turn.escape_attempts;
        self.state.turn.escape_attempts += 1;

        let odds = escape_odds(speed, enemy_speed, attempts);
        let success = odds > 255
            || self.rng.with_seed_offset(
                offsets::for_turn(offsets::FLEE, turn, combatant.0),
                |r| r.next_in_range(256) < odds,
            );

        let mut report = ActionReport::default();
        report.push(BattleEffect::FleeAttempted { combatant, success });
        if success {
            report.decided = Some(BattleOutcome::Fled);
        }
        Ok(report)
    }

    /// Finalises a combatant whose health reached zero.
    ///
    /// When this leaves a side without an able member the report carries
    /// the decided outcome.
    pub fn faint(&mut self, combatant: CombatantId) -> Result<ActionReport, EngineError> {
        let mut report = ActionReport::default();
        let member = self.combatant_mut(combatant)?;
        if !member.is_fainted() {
            return Ok(report);
        }
        member.status = None;
        member.reset_on_switch_out();
        report.push(BattleEffect::Fainted { combatant });
        report.decided = decide(&*self.state, u32::MAX);
        Ok(report)
    }

    /// First able benched member that can replace the occupant of `slot`.
    pub fn replacement_for(&self, slot: CombatantId) -> Option<usize> {
        self.state.roster.party(slot.side()).bench().next()
    }

    /// Applies the combatant's ability trigger if it fires at `stage`.
    pub fn trigger_ability(
        &mut self,
        combatant: CombatantId,
        stage: TriggerStage,
    ) -> Result<ActionReport, EngineError> {
        let mut report = ActionReport::default();
        let content = self.content;

        let member = self.combatant(combatant)?;
        if member.is_fainted() {
            return Ok(report);
        }
        let Some(ability_id) = member.ability else {
            return Ok(report);
        };
        let Some(trigger) = content
            .ability(ability_id)
            .and_then(|ability| ability.trigger)
            .filter(|trigger| trigger.stage == stage)
        else {
            return Ok(report);
        };

        report.push(BattleEffect::AbilityActivated {
            combatant,
            ability: ability_id,
        });
        match trigger.effect {
            AbilityEffect::SetWeather { weather, turns } => {
                self.state.field.weather = Some(TimedField::new(weather, turns));
                report.push(BattleEffect::WeatherSet { weather, turns });
            }
            AbilityEffect::SetTerrain { terrain, turns } => {
                self.state.field.terrain = Some(TimedField::new(terrain, turns));
                report.push(BattleEffect::TerrainSet { terrain, turns });
            }
            AbilityEffect::BoostSpeed { stages } => {
                let applied = self.combatant_mut(combatant)?.stages.boost_speed(stages);
                if applied != 0 {
                    report.push(BattleEffect::SpeedChanged {
                        target: combatant,
                        stages: applied,
                    });
                }
            }
        }
        Ok(report)
    }
}
