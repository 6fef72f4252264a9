//! End-of-turn sweep steps.
//!
//! Each step walks the active combatants in speed order and applies one kind
//! of end-of-turn effect. The steps themselves always run in
//! [`SweepStep::ORDER`]; the runtime schedules one phase per step.

use crate::env::{ItemTurnEffect, offsets};
use crate::order::{SideFilter, SpeedOrder};
use crate::phase::SweepStep;
use crate::state::{CombatantId, Side, StatusKind, Terrain, VolatileKind};

use super::{ActionReport, BattleEffect, BattleEngine, EngineError};

impl BattleEngine<'_> {
    pub fn run_sweep_step(&mut self, step: SweepStep) -> Result<ActionReport, EngineError> {
        let mut report = ActionReport::default();
        match step {
            SweepStep::LapseEffects => self.for_each_active(SideFilter::Both, |engine, id| {
                engine.lapse_effects(id, &mut report)
            })?,
            SweepStep::FieldHealing => {
                let grassy = self.state.field.terrain() == Some(Terrain::Grassy);
                let weather = self.state.field.weather();
                let content = self.content;
                self.for_each_active(SideFilter::Both, |engine, id| {
                    if grassy {
                        engine.heal_fraction(id, 16, &mut report)?;
                    }
                    let weather_heal = engine
                        .combatant(id)?
                        .ability
                        .and_then(|ability| content.ability(ability))
                        .and_then(|ability| ability.heals_in);
                    if weather.is_some() && weather_heal == weather {
                        engine.heal_fraction(id, 16, &mut report)?;
                    }
                    Ok(())
                })?;
            }
            SweepStep::EnemyPassives => self.for_each_active(SideFilter::Enemy, |engine, id| {
                engine.enemy_passives(id, &mut report)
            })?,
            SweepStep::StatusDamage => self.for_each_active(SideFilter::Both, |engine, id| {
                engine.status_damage(id, &mut report)
            })?,
            SweepStep::HeldItems => self.for_each_active(SideFilter::Both, |engine, id| {
                engine.held_item_effect(id, &mut report)
            })?,
            SweepStep::TurnCounters => self.for_each_active(SideFilter::Both, |engine, id| {
                engine.combatant_mut(id)?.summon.turns_on_field += 1;
                Ok(())
            })?,
            SweepStep::FieldDuration => {
                let (weather, terrain) = self.state.field.tick();
                if let Some(weather) = weather {
                    report.push(BattleEffect::WeatherEnded { weather });
                }
                if let Some(terrain) = terrain {
                    report.push(BattleEffect::TerrainEnded { terrain });
                }
            }
        }
        Ok(report)
    }

    /// Runs `f` for every active combatant matching `filter`, fastest first.
    ///
    /// The order is fixed before the first call; combatants that faint part
    /// way through are skipped.
    pub fn for_each_active(
        &mut self,
        filter: SideFilter,
        mut f: impl FnMut(&mut Self, CombatantId) -> Result<(), EngineError>,
    ) -> Result<(), EngineError> {
        let order: Vec<CombatantId> = SpeedOrder::new(&*self.state, &*self.rng, filter).collect();
        for id in order {
            if self.state.roster.is_active(id) {
                f(self, id)?;
            }
        }
        Ok(())
    }

    fn lapse_effects(
        &mut self,
        id: CombatantId,
        report: &mut ActionReport,
    ) -> Result<(), EngineError> {
        let member = self.combatant_mut(id)?;

        let mut expired = Vec::new();
        member.volatiles.retain(|volatile| {
            if volatile.kind != VolatileKind::Flinch {
                volatile.turns_left = volatile.turns_left.saturating_sub(1);
            }
            let keep = volatile.kind != VolatileKind::Flinch && volatile.turns_left > 0;
            if !keep {
                expired.push(volatile.kind);
            }
            keep
        });

        if let Some(status) = member.status.as_mut()
            && status.kind == StatusKind::Sleep
        {
            status.turns = status.turns.saturating_sub(1);
            if status.turns == 0 {
                member.status = None;
                report.push(BattleEffect::StatusCured {
                    target: id,
                    status: StatusKind::Sleep,
                });
            }
        }

        for kind in expired {
            report.push(BattleEffect::VolatileExpired { target: id, kind });
        }
        Ok(())
    }

    fn heal_fraction(
        &mut self,
        id: CombatantId,
        divisor: u32,
        report: &mut ActionReport,
    ) -> Result<(), EngineError> {
        let member = self.combatant_mut(id)?;
        let restored = member.heal((member.max_hp / divisor.max(1)).max(1));
        if restored > 0 {
            report.push(BattleEffect::Healed {
                target: id,
                amount: restored,
            });
        }
        Ok(())
    }

    fn enemy_passives(
        &mut self,
        id: CombatantId,
        report: &mut ActionReport,
    ) -> Result<(), EngineError> {
        let turn = self.turn();
        let member = self.combatant(id)?;
        let boosts = member.enemy_boosts;
        let status = member.status.map(|s| s.kind);

        if boosts.turn_heal_percent > 0 {
            let max_hp = member.max_hp;
            let amount = (max_hp * u32::from(boosts.turn_heal_percent) / 100).max(1);
            let restored = self.combatant_mut(id)?.heal(amount);
            if restored > 0 {
                report.push(BattleEffect::Healed {
                    target: id,
                    amount: restored,
                });
            }
        }

        if let Some(status) = status
            && boosts.status_cure_chance > 0
        {
            let cured = self.rng.with_seed_offset(
                offsets::for_turn(offsets::SWEEP, turn, id.0),
                |r| r.roll_percent(boosts.status_cure_chance),
            );
            if cured {
                self.combatant_mut(id)?.status = None;
                report.push(BattleEffect::StatusCured { target: id, status });
            }
        }
        Ok(())
    }

    fn status_damage(
        &mut self,
        id: CombatantId,
        report: &mut ActionReport,
    ) -> Result<(), EngineError> {
        let member = self.combatant_mut(id)?;
        let divisor = match member.status.map(|s| s.kind) {
            Some(StatusKind::Poison) => 8,
            Some(StatusKind::Burn) => 16,
            _ => return Ok(()),
        };
        let dealt = member.take_damage((member.max_hp / divisor).max(1));
        let remaining = member.hp;
        report.record_damage(id, dealt, remaining);
        Ok(())
    }

    fn held_item_effect(
        &mut self,
        id: CombatantId,
        report: &mut ActionReport,
    ) -> Result<(), EngineError> {
        let content = self.content;
        let turn = self.turn();
        let Some(effect) = self
            .combatant(id)?
            .held_item
            .and_then(|item| content.held_item(item))
            .and_then(|item| item.end_of_turn)
        else {
            return Ok(());
        };

        match effect {
            ItemTurnEffect::Heal { divisor } => self.heal_fraction(id, u32::from(divisor), report),
            ItemTurnEffect::Steal { chance } => {
                let victims: Vec<CombatantId> = self
                    .state
                    .active_on_side(opposing(id))
                    .filter(|&victim| {
                        self.state
                            .combatant(victim)
                            .is_some_and(|c| c.held_item.is_some())
                    })
                    .collect();
                if victims.is_empty() {
                    return Ok(());
                }
                let picked = self.rng.with_seed_offset(
                    offsets::for_turn(offsets::SWEEP, turn, id.0 + 8),
                    |r| r.roll_percent(chance).then(|| r.next_in_range(victims.len() as u32)),
                );
                let Some(index) = picked else {
                    return Ok(());
                };
                let victim = victims[index as usize];
                if let Some(item) = self.combatant_mut(victim)?.held_item.take() {
                    report.push(BattleEffect::ItemStolen {
                        thief: id,
                        victim,
                        item,
                    });
                }
                Ok(())
            }
        }
    }
}

fn opposing(id: CombatantId) -> Side {
    id.side().opposite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EncounterKind, Formation};
    use crate::env::PcgRandom;
    use crate::state::{
        BattleState, EnemyBoosts, StatusCondition, TimedField, VolatileEffect, Weather,
    };
    use crate::testing::*;

    fn sweep(state: &mut BattleState, step: SweepStep) -> ActionReport {
        let catalog = TestCatalog::new();
        let mut rng = PcgRandom::new(21);
        BattleEngine::new(state, &catalog, &mut rng)
            .run_sweep_step(step)
            .unwrap()
    }

    #[test]
    fn lapse_expires_volatiles_and_wakes_sleepers() {
        let mut state = wild_single(vec![member("a", 50)], vec![member("b", 40)]);
        {
            let lead = state.combatant_mut(CombatantId::PLAYER).unwrap();
            lead.add_volatile(VolatileKind::Encore(TACKLE), 1);
            lead.add_volatile(VolatileKind::Flinch, 1);
            lead.status = Some(StatusCondition {
                kind: StatusKind::Sleep,
                turns: 1,
            });
        }

        let report = sweep(&mut state, SweepStep::LapseEffects);

        let lead = state.combatant(CombatantId::PLAYER).unwrap();
        assert!(lead.volatiles.is_empty());
        assert_eq!(lead.status, None);
        assert_eq!(report.effects.len(), 3);
    }

    #[test]
    fn lapse_keeps_longer_volatiles() {
        let mut state = wild_single(vec![member("a", 50)], vec![member("b", 40)]);
        state
            .combatant_mut(CombatantId::PLAYER)
            .unwrap()
            .add_volatile(VolatileKind::Disable(TACKLE), 3);

        sweep(&mut state, SweepStep::LapseEffects);

        assert_eq!(
            state.combatant(CombatantId::PLAYER).unwrap().volatiles[0],
            VolatileEffect {
                kind: VolatileKind::Disable(TACKLE),
                turns_left: 2
            }
        );
    }

    #[test]
    fn grassy_terrain_heals_everyone() {
        let mut state = battle(
            Formation::Double,
            EncounterKind::Wild,
            vec![member("a", 50), member("b", 50)],
            vec![member("c", 40), member("d", 40)],
        );
        state.field.terrain = Some(TimedField::new(Terrain::Grassy, 3));
        for id in CombatantId::ALL {
            state.combatant_mut(id).unwrap().hp = 100;
        }

        let report = sweep(&mut state, SweepStep::FieldHealing);

        assert_eq!(report.effects.len(), 4);
        for id in CombatantId::ALL {
            assert_eq!(state.combatant(id).unwrap().hp, 110);
        }
    }

    #[test]
    fn no_terrain_no_field_healing() {
        let mut state = wild_single(vec![member("a", 50)], vec![member("b", 40)]);
        state.combatant_mut(CombatantId::PLAYER).unwrap().hp = 10;

        assert!(sweep(&mut state, SweepStep::FieldHealing).is_empty());
    }

    #[test]
    fn weather_heals_matching_ability_holders() {
        let mut state = wild_single(
            vec![member("a", 50).with_ability(RAIN_DISH)],
            vec![member("b", 40).with_ability(RAIN_DISH)],
        );
        state.field.weather = Some(TimedField::new(Weather::Rain, 3));
        state.combatant_mut(CombatantId::PLAYER).unwrap().hp = 100;
        state.combatant_mut(CombatantId::ENEMY).unwrap().hp = 100;

        let report = sweep(&mut state, SweepStep::FieldHealing);

        assert_eq!(report.effects.len(), 2);
        assert_eq!(state.combatant(CombatantId::PLAYER).unwrap().hp, 110);
        assert_eq!(state.combatant(CombatantId::ENEMY).unwrap().hp, 110);
    }

    #[test]
    fn weather_heal_needs_its_own_weather() {
        let mut state = wild_single(
            vec![member("a", 50).with_ability(RAIN_DISH)],
            vec![member("b", 40)],
        );
        state.field.weather = Some(TimedField::new(Weather::Sun, 3));
        state.combatant_mut(CombatantId::PLAYER).unwrap().hp = 100;

        assert!(sweep(&mut state, SweepStep::FieldHealing).is_empty());
        assert_eq!(state.combatant(CombatantId::PLAYER).unwrap().hp, 100);
    }

    #[test]
    fn enemy_passives_only_touch_opponents() {
        let mut state = wild_single(vec![member("a", 50)], vec![member("b", 40)]);
        let boosts = EnemyBoosts {
            turn_heal_percent: 10,
            status_cure_chance: 100,
        };
        for id in [CombatantId::PLAYER, CombatantId::ENEMY] {
            let member = state.combatant_mut(id).unwrap();
            member.hp = 50;
            member.enemy_boosts = boosts;
            member.status = Some(StatusCondition::new(StatusKind::Poison));
        }

        sweep(&mut state, SweepStep::EnemyPassives);

        let enemy = state.combatant(CombatantId::ENEMY).unwrap();
        assert_eq!(enemy.hp, 66);
        assert_eq!(enemy.status, None);
        let player = state.combatant(CombatantId::PLAYER).unwrap();
        assert_eq!(player.hp, 50);
        assert!(player.status.is_some());
    }

    #[test]
    fn poison_and_burn_deal_fractional_damage() {
        let mut state = wild_single(vec![member("a", 50)], vec![member("b", 40)]);
        state.combatant_mut(CombatantId::PLAYER).unwrap().status =
            Some(StatusCondition::new(StatusKind::Poison));
        state.combatant_mut(CombatantId::ENEMY).unwrap().status =
            Some(StatusCondition::new(StatusKind::Burn));

        let report = sweep(&mut state, SweepStep::StatusDamage);

        assert_eq!(state.combatant(CombatantId::PLAYER).unwrap().hp, 140);
        assert_eq!(state.combatant(CombatantId::ENEMY).unwrap().hp, 150);
        assert!(report.fainted.is_empty());
    }

    #[test]
    fn status_damage_can_knock_out() {
        let mut state = wild_single(vec![member("a", 50)], vec![member("b", 40)]);
        {
            let enemy = state.combatant_mut(CombatantId::ENEMY).unwrap();
            enemy.hp = 5;
            enemy.status = Some(StatusCondition::new(StatusKind::Poison));
        }

        let report = sweep(&mut state, SweepStep::StatusDamage);

        assert_eq!(report.fainted, vec![CombatantId::ENEMY]);
    }

    #[test]
    fn held_items_heal_and_steal() {
        let mut state = wild_single(
            vec![member("a", 50).with_held_item(GRIP_CLAW)],
            vec![member("b", 40).with_held_item(LEFTOVERS)],
        );
        state.combatant_mut(CombatantId::ENEMY).unwrap().hp = 100;

        let report = sweep(&mut state, SweepStep::HeldItems);

        assert!(report.effects.contains(&BattleEffect::ItemStolen {
            thief: CombatantId::PLAYER,
            victim: CombatantId::ENEMY,
            item: LEFTOVERS,
        }));
        // The faster thief acts first, so the victim's item is gone before it heals.
        assert_eq!(state.combatant(CombatantId::ENEMY).unwrap().hp, 100);
        assert_eq!(state.combatant(CombatantId::ENEMY).unwrap().held_item, None);
    }

    #[test]
    fn field_duration_ticks_and_expires() {
        let mut state = wild_single(vec![member("a", 50)], vec![member("b", 40)]);
        state.field.weather = Some(TimedField::new(Weather::Sun, 1));
        state.field.terrain = Some(TimedField::new(Terrain::Misty, 2));

        let report = sweep(&mut state, SweepStep::FieldDuration);

        assert_eq!(
            report.effects,
            vec![BattleEffect::WeatherEnded {
                weather: Weather::Sun
            }]
        );
        assert_eq!(state.field.terrain(), Some(Terrain::Misty));
    }

    #[test]
    fn turn_counters_advance() {
        let mut state = wild_single(vec![member("a", 50)], vec![member("b", 40)]);

        sweep(&mut state, SweepStep::TurnCounters);
        sweep(&mut state, SweepStep::TurnCounters);

        assert_eq!(
            state
                .combatant(CombatantId::ENEMY)
                .unwrap()
                .summon
                .turns_on_field,
            2
        );
    }
}
