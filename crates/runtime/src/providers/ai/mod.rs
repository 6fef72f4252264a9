//! Automated decisions for non-interactive combatants.
//!
//! - [`AiConfig`]: switch thresholds and the likelihood decay
//! - [`scoring`]: matchup and move heuristics
//! - [`AiCommandProvider`]: the [`CommandProvider`](crate::api::CommandProvider)
//!   built on both

pub mod config;
pub mod provider;
pub mod scoring;

pub use config::AiConfig;
pub use provider::AiCommandProvider;
