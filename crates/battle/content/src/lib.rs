//! Data-driven battle content and loaders.
//!
//! This crate provides the content catalog the battle rules consult:
//! - Moves, abilities, and held items ([`ContentCatalog`])
//! - Party rosters built from RON party specs
//! - Battle configuration from TOML
//!
//! Content is consumed through the `ContentOracle` trait and never appears in
//! battle state.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::ContentCatalog;

#[cfg(feature = "loaders")]
pub use loaders::{
    CatalogLoader, ConfigLoader, ContentFactory, MemberSpec, PartyLoader, PartySpec,
};
