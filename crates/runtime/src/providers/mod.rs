//! Command provider implementations.
//!
//! - [`ai`]: automated decisions for opponents (and unattended players)
//! - [`channel`]: prompts answered by an external UI over channels
//! - [`scripted`]: fixed replies for tests and replays

pub mod ai;
pub mod channel;
pub mod scripted;

pub use ai::{AiCommandProvider, AiConfig};
pub use channel::{ChannelCommandProvider, Prompt, PromptHandle, channel};
pub use scripted::ScriptedProvider;
