//! Tuning knobs for automated command selection.

use serde::{Deserialize, Serialize};

/// Switch-decision thresholds for automated opponents.
///
/// A trainer opponent swaps its active combatant when the best benched
/// matchup, scaled by the switch-likelihood multiplier, reaches the current
/// matchup times the threshold. Bosses use the lower threshold and swap more
/// readily.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub boss_switch_threshold: f64,
    pub default_switch_threshold: f64,
    /// Base of the likelihood multiplier `1 - decay^(counter + 1)`.
    pub switch_decay: f64,
}

impl AiConfig {
    pub const DEFAULT_BOSS_SWITCH_THRESHOLD: f64 = 2.0;
    pub const DEFAULT_SWITCH_THRESHOLD: f64 = 3.0;
    pub const DEFAULT_SWITCH_DECAY: f64 = 0.5;

    pub fn threshold(&self, boss: bool) -> f64 {
        if boss {
            self.boss_switch_threshold
        } else {
            self.default_switch_threshold
        }
    }

    /// Grows towards 1 with every turn the opponent kept its combatant in.
    pub fn switch_multiplier(&self, counter: u32) -> f64 {
        let exponent = i32::try_from(counter.saturating_add(1)).unwrap_or(i32::MAX);
        1.0 - self.switch_decay.clamp(0.0, 1.0).powi(exponent)
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            boss_switch_threshold: Self::DEFAULT_BOSS_SWITCH_THRESHOLD,
            default_switch_threshold: Self::DEFAULT_SWITCH_THRESHOLD,
            switch_decay: Self::DEFAULT_SWITCH_DECAY,
        }
    }
}
