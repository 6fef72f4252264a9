//! Automated command provider.

use async_trait::async_trait;
use battle_core::{CombatantId, PcgRandom, RandomSource, Side};
use tracing::debug;

use super::AiConfig;
use super::scoring::{hp_fraction, matchup_score, move_score};
use crate::api::{
    BattleView, CommandChoice, CommandProvider, CommandRequest, CommandResponse, Result,
    TargetRequest,
};

/// Picks commands from matchup and move heuristics.
///
/// 1. A trainer opponent with a usable bench weighs swapping its active
///    combatant out (see [`AiConfig`]).
/// 2. Otherwise the highest-scoring legal move is used. Equal scores are
///    broken with the request's decision seed, so a replay picks the same
///    move.
/// 3. Targets go to the opponent with the lowest health fraction.
#[derive(Debug, Clone, Default)]
pub struct AiCommandProvider {
    config: AiConfig,
}

impl AiCommandProvider {
    pub fn new(config: AiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Party index to swap in, if swapping beats staying.
    pub fn switch_choice(&self, request: &CommandRequest, view: BattleView<'_>) -> Option<usize> {
        let state = view.state;
        let combatant = request.combatant;
        if combatant.side() != Side::Enemy || state.encounter.is_wild() || request.bench.is_empty()
        {
            return None;
        }

        let current = state.combatant(combatant)?;
        let current_score = matchup_score(state, current, combatant.side());
        let party = state.roster.party(combatant.side());
        let (best_index, best_score) = request
            .bench
            .iter()
            .filter_map(|&index| {
                let member = party.members.get(index)?;
                Some((index, matchup_score(state, member, combatant.side())))
            })
            .fold(None, |best: Option<(usize, f64)>, candidate| match best {
                Some(best) if best.1 >= candidate.1 => Some(best),
                _ => Some(candidate),
            })?;

        let counter = state.turn.switch_attempt_counter;
        let multiplier = self.config.switch_multiplier(counter);
        let threshold = self.config.threshold(state.encounter.is_boss());
        let swap = best_score * multiplier >= current_score * threshold;

        debug!(
            target: "runtime::ai",
            combatant = %combatant,
            current_score,
            best_index,
            best_score,
            multiplier,
            threshold,
            swap,
            "Switch evaluated"
        );
        swap.then_some(best_index)
    }

    /// Move-slot cursor with the best score among the legal moves.
    pub fn move_choice(&self, request: &CommandRequest, view: BattleView<'_>) -> usize {
        let Some(member) = view.state.combatant(request.combatant) else {
            return 0;
        };

        let mut best: Vec<usize> = Vec::new();
        let mut best_score = f64::NEG_INFINITY;
        for &cursor in &request.legal_moves {
            let Some(data) = member
                .moves
                .get(cursor)
                .and_then(|slot| view.content.move_data(slot.move_id))
            else {
                continue;
            };
            let targets = battle_core::engine::validation::legal_targets(
                view.state,
                view.content,
                request.combatant,
                data.id,
            );
            let score = move_score(view.state, request.combatant, data, &targets);
            if score > best_score {
                best_score = score;
                best.clear();
                best.push(cursor);
            } else if score == best_score {
                best.push(cursor);
            }
        }

        let mut rng = PcgRandom::new(request.decision_seed);
        let pick = rng.next_in_range(u32::try_from(best.len()).unwrap_or(u32::MAX)) as usize;
        let cursor = best
            .get(pick)
            .or_else(|| request.legal_moves.first())
            .copied()
            .unwrap_or(0);

        debug!(
            target: "runtime::ai",
            combatant = %request.combatant,
            cursor,
            score = best_score,
            "Move chosen"
        );
        cursor
    }
}

#[async_trait]
impl CommandProvider for AiCommandProvider {
    async fn select_command(
        &self,
        request: &CommandRequest,
        view: BattleView<'_>,
    ) -> Result<CommandResponse> {
        if let Some(party_index) = self.switch_choice(request, view) {
            return Ok(CommandResponse::Selected(CommandChoice::Switch { party_index }));
        }
        let cursor = self.move_choice(request, view);
        Ok(CommandResponse::Selected(CommandChoice::Fight { cursor }))
    }

    async fn select_targets(
        &self,
        request: &TargetRequest,
        view: BattleView<'_>,
    ) -> Result<Vec<CombatantId>> {
        let weakest = request
            .legal
            .iter()
            .copied()
            .filter(|id| id.side() != request.combatant.side())
            .filter_map(|id| view.state.combatant(id).map(|member| (id, hp_fraction(member))))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
            .or_else(|| request.legal.first().copied());

        Ok(weakest.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use battle_content::CatalogLoader;
    use battle_core::{
        BattleConfig, BattleState, BattleStats, CombatantState, EncounterKind, Formation, MoveId,
        Party, Roster,
    };

    use super::*;

    const TACKLE: MoveId = MoveId(1);
    const THUNDER_WAVE: MoveId = MoveId(3);
    const DOUBLE_EDGE: MoveId = MoveId(13);

    fn member(name: &str, attack: u32) -> CombatantState {
        CombatantState::new(
            name,
            50,
            100,
            BattleStats {
                attack,
                defense: 80,
                speed: 80,
            },
        )
        .with_move(TACKLE, 35)
        .with_move(THUNDER_WAVE, 20)
        .with_move(DOUBLE_EDGE, 15)
    }

    fn battle(encounter: EncounterKind) -> BattleState {
        let config = BattleConfig::new(Formation::Single, encounter, 11);
        let mut state = BattleState::new(
            &config,
            Roster::new(
                Party::new(vec![member("hero", 80)]),
                Party::new(vec![member("weak", 40), member("strong", 140)]),
            ),
        );
        state.combatant_mut(CombatantId::ENEMY).unwrap().hp = 20;
        state
    }

    fn request(combatant: CombatantId, bench: Vec<usize>) -> CommandRequest {
        CommandRequest {
            combatant,
            turn: 1,
            legal_moves: vec![0, 1, 2],
            bench,
            can_transform: false,
            can_capture: false,
            can_flee: false,
            rejection: None,
            decision_seed: 99,
        }
    }

    #[test]
    fn trainer_swaps_out_losing_matchup() {
        let catalog = CatalogLoader::builtin().unwrap();
        let mut state = battle(EncounterKind::Trainer { boss: false });
        state.turn.switch_attempt_counter = 4;
        let ai = AiCommandProvider::default();

        let view = BattleView::new(&state, &catalog);
        assert_eq!(
            ai.switch_choice(&request(CombatantId::ENEMY, vec![1]), view),
            Some(1)
        );
    }

    #[test]
    fn switch_likelihood_grows_with_counter() {
        let catalog = CatalogLoader::builtin().unwrap();
        let mut state = battle(EncounterKind::Trainer { boss: false });
        let ai = AiCommandProvider::new(AiConfig {
            switch_decay: 0.9,
            ..AiConfig::default()
        });

        let swaps: Vec<bool> = (0..40)
            .map(|counter| {
                state.turn.switch_attempt_counter = counter;
                let view = BattleView::new(&state, &catalog);
                ai.switch_choice(&request(CombatantId::ENEMY, vec![1]), view)
                    .is_some()
            })
            .collect();

        let first = swaps.iter().position(|&swap| swap);
        assert!(first.is_some_and(|index| index > 0), "{swaps:?}");
        assert!(swaps[first.unwrap()..].iter().all(|&swap| swap));
    }

    #[test]
    fn wild_and_player_sides_never_swap() {
        let catalog = CatalogLoader::builtin().unwrap();
        let mut wild = battle(EncounterKind::Wild);
        wild.turn.switch_attempt_counter = 10;
        let trainer = battle(EncounterKind::Trainer { boss: true });
        let ai = AiCommandProvider::default();

        let view = BattleView::new(&wild, &catalog);
        assert_eq!(ai.switch_choice(&request(CombatantId::ENEMY, vec![1]), view), None);
        let view = BattleView::new(&trainer, &catalog);
        assert_eq!(ai.switch_choice(&request(CombatantId::PLAYER, vec![]), view), None);
    }

    #[test]
    fn strongest_move_is_chosen_deterministically() {
        let catalog = CatalogLoader::builtin().unwrap();
        let state = battle(EncounterKind::Wild);
        let ai = AiCommandProvider::default();
        let view = BattleView::new(&state, &catalog);

        let first = ai.move_choice(&request(CombatantId::PLAYER, vec![]), view);
        let second = ai.move_choice(&request(CombatantId::PLAYER, vec![]), view);
        assert_eq!(first, second);
        assert_eq!(first, 2);
    }

    #[tokio::test]
    async fn targets_weakest_opponent() {
        let catalog = CatalogLoader::builtin().unwrap();
        let config = BattleConfig::new(Formation::Double, EncounterKind::Wild, 3);
        let mut state = BattleState::new(
            &config,
            Roster::new(
                Party::new(vec![member("a", 80), member("b", 80)]),
                Party::new(vec![member("c", 80), member("d", 80)]),
            ),
        );
        state.combatant_mut(CombatantId::ENEMY_2).unwrap().hp = 10;

        let request = TargetRequest {
            combatant: CombatantId::PLAYER,
            move_id: TACKLE,
            legal: [CombatantId::ENEMY, CombatantId::ENEMY_2].into_iter().collect(),
            rejection: None,
            decision_seed: 0,
        };
        let targets = AiCommandProvider::default()
            .select_targets(&request, BattleView::new(&state, &catalog))
            .await
            .unwrap();
        assert_eq!(targets, vec![CombatantId::ENEMY_2]);
    }
}
