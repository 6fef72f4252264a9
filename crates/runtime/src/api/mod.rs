//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! the scheduler modules can stay focused on phase execution.

pub mod errors;
pub mod providers;

pub use errors::{ProviderKind, Result, RuntimeError};
pub use providers::{
    BattleView, CommandChoice, CommandProvider, CommandRequest, CommandResponse, TargetRequest,
};
