//! Battle client binary.
//!
//! Loads content, assembles a [`BattleRuntime`] and plays one battle to the
//! end. The enemy side is always driven by the AI; the player side is the AI
//! too unless `BATTLE_INTERACTIVE` is set, in which case prompts are answered
//! on stdin.
//!
//! ```bash
//! BATTLE_INTERACTIVE=1 BATTLE_DOUBLE=1 cargo run -p battle-client
//! ```

mod config;
mod console;
mod logging;

use std::sync::Arc;

use anyhow::{Context, Result};
use battle_content::{CatalogLoader, ConfigLoader, ContentCatalog, ContentFactory, PartyLoader};
use battle_core::{BattleConfig, Party, Roster};
use runtime::{AiCommandProvider, BattleRuntime, RuntimeConfig, Topic};

use crate::config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let client_config = ClientConfig::from_env();
    let _log_guard = logging::init(client_config.log_dir.as_deref())?;

    let (battle, catalog) = load_content(&client_config)?;
    let runtime_config = RuntimeConfig::new(battle).with_env_overrides();
    let encounter = runtime_config.battle.encounter;

    let roster = Roster::new(
        load_party(&client_config, client_config.player_party(), &catalog)?,
        load_party(&client_config, client_config.enemy_party(encounter), &catalog)?,
    );
    tracing::info!(
        seed = runtime_config.battle.seed,
        formation = ?runtime_config.battle.formation,
        ?encounter,
        interactive = client_config.interactive,
        "Starting battle"
    );

    let mut builder = BattleRuntime::builder()
        .config(runtime_config.clone())
        .content(catalog.clone())
        .roster(roster);

    let console = if client_config.interactive {
        let (provider, prompts) = runtime_config.prompt_channel();
        builder = builder.player_provider(provider);
        Some(tokio::spawn(console::serve(prompts, catalog.clone())))
    } else {
        builder = builder.player_provider(AiCommandProvider::new(runtime_config.ai));
        None
    };

    let mut runtime = builder.build().context("Failed to assemble battle runtime")?;
    let narrator = tokio::spawn(console::narrate(runtime.subscribe(Topic::Battle)));

    let result = runtime.run().await;
    let turns = runtime.state().turn.turn_number;
    drop(runtime);

    let _ = narrator.await;
    if let Some(console) = console {
        console.abort();
    }

    let outcome = result?;
    tracing::info!(?outcome, turns, "Battle finished");
    println!("{outcome:?} after {turns} turns");
    Ok(())
}

fn load_content(config: &ClientConfig) -> Result<(BattleConfig, Arc<ContentCatalog>)> {
    let (battle, catalog) = match &config.data_dir {
        Some(dir) => {
            let factory = ContentFactory::new(dir);
            (factory.load_config()?, factory.load_catalog()?)
        }
        None => (ConfigLoader::builtin()?, CatalogLoader::builtin()?),
    };
    tracing::debug!(moves = catalog.move_count(), "Content catalog loaded");
    Ok((battle, Arc::new(catalog)))
}

fn load_party(config: &ClientConfig, name: &str, catalog: &ContentCatalog) -> Result<Party> {
    let party = match &config.data_dir {
        Some(dir) => ContentFactory::new(dir).load_party(name, catalog),
        None => PartyLoader::builtin(name, catalog),
    };
    party.with_context(|| format!("Failed to load party '{name}'"))
}
