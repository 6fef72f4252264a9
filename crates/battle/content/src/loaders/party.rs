//! Party roster loader.

use std::path::Path;

use anyhow::{Context, bail};
use battle_core::{
    AbilityId, BattleConfig, BattleStats, CombatantState, EnemyBoosts, ItemId, MoveId, Party,
};
use serde::{Deserialize, Serialize};

use crate::ContentCatalog;
use crate::loaders::{LoadResult, read_file};

/// One party member as written in a party file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberSpec {
    pub name: String,
    pub level: u8,
    pub max_hp: u32,
    pub stats: BattleStats,
    pub moves: Vec<MoveId>,
    #[serde(default)]
    pub ability: Option<AbilityId>,
    #[serde(default)]
    pub held_item: Option<ItemId>,
    #[serde(default)]
    pub boss: bool,
    #[serde(default)]
    pub enemy_boosts: EnemyBoosts,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartySpec {
    pub members: Vec<MemberSpec>,
}

/// Builds parties from RON specs, resolving every reference against a catalog.
pub struct PartyLoader;

impl PartyLoader {
    /// Loads one of the parties bundled with this crate: `player`, `wild`,
    /// or `trainer`.
    pub fn builtin(name: &str, catalog: &ContentCatalog) -> LoadResult<Party> {
        let source = match name {
            "player" => include_str!("../../data/parties/player.ron"),
            "wild" => include_str!("../../data/parties/wild.ron"),
            "trainer" => include_str!("../../data/parties/trainer.ron"),
            other => bail!("No bundled party named '{}'", other),
        };
        Self::parse(source, catalog).with_context(|| format!("Bundled party '{name}' is invalid"))
    }

    pub fn load(path: &Path, catalog: &ContentCatalog) -> LoadResult<Party> {
        let content = read_file(path)?;
        Self::parse(&content, catalog)
            .with_context(|| format!("Invalid party file {}", path.display()))
    }

    pub fn parse(content: &str, catalog: &ContentCatalog) -> LoadResult<Party> {
        let spec: PartySpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse party RON: {}", e))?;
        Self::build(&spec, catalog)
    }

    /// Turns a spec into a party. Move power points come from the catalog.
    pub fn build(spec: &PartySpec, catalog: &ContentCatalog) -> LoadResult<Party> {
        if spec.members.is_empty() {
            bail!("Party has no members");
        }
        if spec.members.len() > BattleConfig::MAX_PARTY_SIZE {
            bail!(
                "Party has {} members, at most {} are allowed",
                spec.members.len(),
                BattleConfig::MAX_PARTY_SIZE
            );
        }

        let members = spec
            .members
            .iter()
            .map(|member| Self::build_member(member, catalog))
            .collect::<LoadResult<Vec<_>>>()?;
        Ok(Party::new(members))
    }

    fn build_member(spec: &MemberSpec, catalog: &ContentCatalog) -> LoadResult<CombatantState> {
        if spec.moves.is_empty() || spec.moves.len() > BattleConfig::MAX_MOVES {
            bail!(
                "{} must know between 1 and {} moves",
                spec.name,
                BattleConfig::MAX_MOVES
            );
        }

        let mut member = CombatantState::new(spec.name.clone(), spec.level, spec.max_hp, spec.stats)
            .with_boss(spec.boss);
        for &move_id in &spec.moves {
            let data = catalog
                .require_move(move_id)
                .with_context(|| format!("{} knows an unknown move", spec.name))?;
            member = member.with_move(move_id, data.pp);
        }
        if let Some(ability) = spec.ability {
            catalog
                .require_ability(ability)
                .with_context(|| format!("{} has an unknown ability", spec.name))?;
            member = member.with_ability(ability);
        }
        if let Some(item) = spec.held_item {
            catalog
                .require_item(item)
                .with_context(|| format!("{} holds an unknown item", spec.name))?;
            member = member.with_held_item(item);
        }
        member.enemy_boosts = spec.enemy_boosts;
        Ok(member)
    }
}
