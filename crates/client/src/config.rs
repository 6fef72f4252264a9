//! Client settings read from the environment.
use std::env;
use std::path::PathBuf;

use battle_core::EncounterKind;

/// Where content comes from and who answers the player's prompts.
///
/// Battle rules (seed, formation, turn limit) live in `RuntimeConfig`; this
/// only covers what the binary itself decides.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    /// Directory holding `battle.toml`, the catalog RON files and `parties/`.
    /// Bundled content is used when unset.
    pub data_dir: Option<PathBuf>,
    pub player_party: Option<String>,
    pub enemy_party: Option<String>,
    /// Prompt on stdin instead of letting the AI play the player side.
    pub interactive: bool,
    /// Also write logs to `battle.log` in this directory.
    pub log_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Environment variables:
    /// - `BATTLE_DATA_DIR`
    /// - `BATTLE_PLAYER_PARTY`, `BATTLE_ENEMY_PARTY` - party names
    /// - `BATTLE_INTERACTIVE` - `true`/`1` to play the player side by hand
    /// - `BATTLE_LOG_DIR`
    pub fn from_env() -> Self {
        Self {
            data_dir: env::var_os("BATTLE_DATA_DIR").map(PathBuf::from),
            player_party: env::var("BATTLE_PLAYER_PARTY").ok(),
            enemy_party: env::var("BATTLE_ENEMY_PARTY").ok(),
            interactive: read_env_bool("BATTLE_INTERACTIVE").unwrap_or(false),
            log_dir: env::var_os("BATTLE_LOG_DIR").map(PathBuf::from),
        }
    }

    pub fn player_party(&self) -> &str {
        self.player_party.as_deref().unwrap_or("player")
    }

    /// Falls back to the bundled party matching the encounter.
    pub fn enemy_party(&self, encounter: EncounterKind) -> &str {
        match (&self.enemy_party, encounter.is_wild()) {
            (Some(name), _) => name,
            (None, true) => "wild",
            (None, false) => "trainer",
        }
    }
}

fn read_env_bool(key: &str) -> Option<bool> {
    let value = env::var(key).ok()?;
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
