//! Per-actor move cooldowns.
//!
//! A [`CooldownTracker`] maps a move's stable [`MoveKey`] to the number of
//! turns left before it can be used again. Because entries are keyed by the
//! move identity rather than a resolved descriptor, rebuilding the move list
//! never resets a live cooldown.
//!
//! The tracker is only counted down by the battle loop through
//! [`CooldownTracker::tick_all`], once per turn boundary of the owning side.
//!
//! # Example
//!
//! ```
//! use marquee_core::cooldown::CooldownTracker;
//! use marquee_core::moves::MoveKey;
//!
//! let key = MoveKey::signature("heat", "bank_job");
//! let mut cooldowns = CooldownTracker::new();
//! cooldowns.start(&key, 2);
//! assert!(!cooldowns.is_ready(&key));
//!
//! cooldowns.tick_all();
//! cooldowns.tick_all();
//! assert!(cooldowns.is_ready(&key));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::moves::MoveKey;

/// Remaining cooldown turns per move key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownTracker {
    remaining: BTreeMap<MoveKey, u32>,
}

impl CooldownTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the remaining turns for `key` (0 when never started).
    #[must_use]
    pub fn remaining(&self, key: &MoveKey) -> u32 {
        self.remaining.get(key).copied().unwrap_or(0)
    }

    /// Returns true when `key` has no turns remaining.
    #[must_use]
    pub fn is_ready(&self, key: &MoveKey) -> bool {
        self.remaining(key) == 0
    }

    /// Starts (or restarts) the cooldown for `key`.
    ///
    /// Negative turn counts clamp to zero, which leaves the move ready.
    pub fn start(&mut self, key: &MoveKey, turns: i64) {
        let turns = u32::try_from(turns.max(0)).unwrap_or(u32::MAX);
        tracing::debug!(%key, turns, "cooldown started");
        self.remaining.insert(key.clone(), turns);
    }

    /// Decrements every entry by one turn, flooring at zero.
    pub fn tick_all(&mut self) {
        for turns in self.remaining.values_mut() {
            *turns = turns.saturating_sub(1);
        }
    }

    /// Iterates over entries that still have turns remaining.
    pub fn active(&self) -> impl Iterator<Item = (&MoveKey, u32)> {
        self.remaining
            .iter()
            .filter(|(_, turns)| **turns > 0)
            .map(|(key, turns)| (key, *turns))
    }
}
