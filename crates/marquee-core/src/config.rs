//! Engine configuration.
//!
//! [`EngineConfig`] carries the tunable constants the executor falls back to
//! when authoring data leaves a field out. Values are plain data so a battle
//! session can load them from JSON next to its move tables.
//!
//! # Example
//!
//! ```
//! use marquee_core::config::EngineConfig;
//!
//! let config = EngineConfig::default().with_attack_scale(2.2);
//! assert_eq!(config.default_cooldown_turns, 3);
//! assert!((config.attack_scale - 2.2).abs() < f64::EPSILON);
//! ```

use serde::{Deserialize, Serialize};

/// Tunable constants for move execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Cooldown applied when a move does not author its own.
    pub default_cooldown_turns: u32,
    /// Multiplier applied to attacker ATK before any move multiplier.
    pub attack_scale: f64,
    /// Upper bound on the defense debuff fraction used in damage.
    pub def_debuff_cap: f64,
    /// Quality rating assumed for actors without one.
    pub default_rating: f64,
    /// Status duration when neither authoring data nor `prone` provide one.
    pub default_status_turns: u32,
    /// Lower bound of the team strike total multiplier roll.
    pub team_strike_min: f64,
    /// Upper bound of the team strike total multiplier roll.
    pub team_strike_max: f64,
    /// Multiplier for the small hit landed when a move otherwise does nothing.
    pub fallback_hit_multiplier: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_cooldown_turns: 3,
            attack_scale: 1.0,
            def_debuff_cap: 0.9,
            default_rating: 7.0,
            default_status_turns: 1,
            team_strike_min: 1.5,
            team_strike_max: 2.8,
            fallback_hit_multiplier: 1.0,
        }
    }
}

impl EngineConfig {
    /// Sets the attacker ATK scale.
    #[must_use]
    pub fn with_attack_scale(mut self, scale: f64) -> Self {
        self.attack_scale = scale;
        self
    }

    /// Sets the default cooldown in turns.
    #[must_use]
    pub fn with_default_cooldown(mut self, turns: u32) -> Self {
        self.default_cooldown_turns = turns;
        self
    }

    /// Sets the rating assumed for actors without one.
    #[must_use]
    pub fn with_default_rating(mut self, rating: f64) -> Self {
        self.default_rating = rating;
        self
    }

    /// Sets the team strike roll range.
    #[must_use]
    pub fn with_team_strike_range(mut self, min: f64, max: f64) -> Self {
        self.team_strike_min = min;
        self.team_strike_max = max;
        self
    }
}
