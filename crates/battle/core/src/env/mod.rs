//! Traits describing the collaborators the rules consume.
//!
//! The content catalog exposes static move, ability, and held-item data; the
//! random source supplies every draw. Neither is owned by the battle state,
//! so the engine can run against fixtures, loaded catalogs, or replays.
mod content;
mod error;
mod rng;

pub use content::{
    AbilityData, AbilityEffect, AbilityId, AbilityTrigger, ContentOracle, HeldItemData, ItemId,
    ItemTurnEffect, MoveData, MoveEffect, MoveFlags, MoveId, MoveTarget, TriggerStage,
};
pub use error::OracleError;
pub use rng::{PcgRandom, RandomSource, compute_seed, offsets};
