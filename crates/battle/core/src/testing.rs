//! Fixtures shared by unit tests.

use std::collections::HashMap;

use crate::config::{BattleConfig, EncounterKind, Formation};
use crate::env::{
    AbilityData, AbilityEffect, AbilityId, AbilityTrigger, ContentOracle, HeldItemData, ItemId,
    ItemTurnEffect, MoveData, MoveEffect, MoveFlags, MoveId, MoveTarget, TriggerStage,
};
use crate::state::{
    BattleState, BattleStats, CombatantState, Party, Roster, StatusKind, Terrain, Weather,
};

pub const STRUGGLE: MoveId = MoveId::STRUGGLE;
pub const TACKLE: MoveId = MoveId(1);
pub const QUICK_ATTACK: MoveId = MoveId(2);
pub const THUNDER_WAVE: MoveId = MoveId(3);
pub const RAIN_DANCE: MoveId = MoveId(4);
pub const ENCORE: MoveId = MoveId(5);
pub const RECOVER: MoveId = MoveId(6);
pub const SURF: MoveId = MoveId(7);
pub const FOCUS_PUNCH: MoveId = MoveId(8);
pub const GRASSY_SURGE: MoveId = MoveId(9);

pub const DRIZZLE: AbilityId = AbilityId(1);
pub const SPEED_BOOST: AbilityId = AbilityId(2);
pub const QUICK_DRAW: AbilityId = AbilityId(3);
pub const RAIN_DISH: AbilityId = AbilityId(4);

pub const LEFTOVERS: ItemId = ItemId(1);
pub const GRIP_CLAW: ItemId = ItemId(2);
pub const QUICK_CLAW: ItemId = ItemId(3);

pub struct TestCatalog {
    moves: HashMap<MoveId, MoveData>,
    abilities: HashMap<AbilityId, AbilityData>,
    items: HashMap<ItemId, HeldItemData>,
}

fn move_data(
    id: MoveId,
    name: &str,
    power: u16,
    priority: i8,
    target: MoveTarget,
    flags: MoveFlags,
    effect: MoveEffect,
) -> MoveData {
    MoveData {
        id,
        name: name.into(),
        power,
        priority,
        pp: 10,
        target,
        flags,
        effect,
    }
}

impl TestCatalog {
    pub fn new() -> Self {
        use MoveTarget::*;

        let moves = [
            move_data(
                STRUGGLE,
                "Struggle",
                50,
                0,
                RandomOpponent,
                MoveFlags::FALLBACK,
                MoveEffect::Recoil { divisor: 4 },
            ),
            move_data(
                TACKLE,
                "Tackle",
                40,
                0,
                SelectedOpponent,
                MoveFlags::empty(),
                MoveEffect::None,
            ),
            move_data(
                QUICK_ATTACK,
                "Quick Attack",
                40,
                1,
                SelectedOpponent,
                MoveFlags::empty(),
                MoveEffect::None,
            ),
            move_data(
                THUNDER_WAVE,
                "Thunder Wave",
                0,
                0,
                SelectedOpponent,
                MoveFlags::empty(),
                MoveEffect::Inflict {
                    status: StatusKind::Paralysis,
                    chance: 100,
                },
            ),
            move_data(
                RAIN_DANCE,
                "Rain Dance",
                0,
                0,
                User,
                MoveFlags::empty(),
                MoveEffect::SetWeather {
                    weather: Weather::Rain,
                    turns: 5,
                },
            ),
            move_data(
                ENCORE,
                "Encore",
                0,
                0,
                SelectedOpponent,
                MoveFlags::empty(),
                MoveEffect::Encore { turns: 3 },
            ),
            move_data(
                RECOVER,
                "Recover",
                0,
                0,
                User,
                MoveFlags::empty(),
                MoveEffect::HealUser { percent: 50 },
            ),
            move_data(SURF, "Surf", 90, 0, AllOpponents, MoveFlags::empty(), MoveEffect::None),
            move_data(
                FOCUS_PUNCH,
                "Focus Punch",
                150,
                -3,
                SelectedOpponent,
                MoveFlags::ANNOUNCE,
                MoveEffect::None,
            ),
            move_data(
                GRASSY_SURGE,
                "Grassy Surge",
                0,
                0,
                User,
                MoveFlags::empty(),
                MoveEffect::SetTerrain {
                    terrain: Terrain::Grassy,
                    turns: 5,
                },
            ),
        ];

        let abilities = [
            AbilityData {
                id: DRIZZLE,
                name: "Drizzle".into(),
                bypass_speed_chance: 0,
                trigger: Some(AbilityTrigger {
                    stage: TriggerStage::BattleStart,
                    effect: AbilityEffect::SetWeather {
                        weather: Weather::Rain,
                        turns: 5,
                    },
                }),
                heals_in: None,
            },
            AbilityData {
                id: SPEED_BOOST,
                name: "Speed Boost".into(),
                bypass_speed_chance: 0,
                trigger: Some(AbilityTrigger {
                    stage: TriggerStage::TurnStart,
                    effect: AbilityEffect::BoostSpeed { stages: 1 },
                }),
                heals_in: None,
            },
            AbilityData {
                id: QUICK_DRAW,
                name: "Quick Draw".into(),
                bypass_speed_chance: 100,
                trigger: None,
                heals_in: None,
            },
            AbilityData {
                id: RAIN_DISH,
                name: "Rain Dish".into(),
                bypass_speed_chance: 0,
                trigger: None,
                heals_in: Some(Weather::Rain),
            },
        ];

        let items = [
            HeldItemData {
                id: LEFTOVERS,
                name: "Leftovers".into(),
                bypass_speed_chance: 0,
                end_of_turn: Some(ItemTurnEffect::Heal { divisor: 16 }),
            },
            HeldItemData {
                id: GRIP_CLAW,
                name: "Grip Claw".into(),
                bypass_speed_chance: 0,
                end_of_turn: Some(ItemTurnEffect::Steal { chance: 100 }),
            },
            HeldItemData {
                id: QUICK_CLAW,
                name: "Quick Claw".into(),
                bypass_speed_chance: 100,
                end_of_turn: None,
            },
        ];

        Self {
            moves: moves.into_iter().map(|m| (m.id, m)).collect(),
            abilities: abilities.into_iter().map(|a| (a.id, a)).collect(),
            items: items.into_iter().map(|i| (i.id, i)).collect(),
        }
    }
}

impl ContentOracle for TestCatalog {
    fn move_data(&self, id: MoveId) -> Option<&MoveData> {
        self.moves.get(&id)
    }

    fn ability(&self, id: AbilityId) -> Option<&AbilityData> {
        self.abilities.get(&id)
    }

    fn held_item(&self, id: ItemId) -> Option<&HeldItemData> {
        self.items.get(&id)
    }
}

pub fn member(name: &str, speed: u32) -> CombatantState {
    CombatantState::new(
        name,
        50,
        160,
        BattleStats {
            attack: 80,
            defense: 80,
            speed,
        },
    )
    .with_move(TACKLE, 35)
    .with_move(QUICK_ATTACK, 30)
}

/// Builds a battle on turn 1 with every active slot opened.
pub fn battle(
    formation: Formation,
    encounter: EncounterKind,
    player: Vec<CombatantState>,
    enemy: Vec<CombatantState>,
) -> BattleState {
    let config = BattleConfig::new(formation, encounter, 7);
    let mut state = BattleState::new(&config, Roster::new(Party::new(player), Party::new(enemy)));
    state.turn.turn_number = 1;
    let active: Vec<_> = state.active_combatants().collect();
    state.turn.open(active);
    state
}

pub fn wild_single(player: Vec<CombatantState>, enemy: Vec<CombatantState>) -> BattleState {
    battle(Formation::Single, EncounterKind::Wild, player, enemy)
}
