//! Combatant state owned by a battle session.
//!
//! A [`Combatant`] is either a party member (a movie, in game terms) or the
//! enemy. It carries the mutable numbers the executor reads and writes:
//! hit points, base stats, a typed [`StatusBook`], named afflictions, a
//! barrier shield and per-move cooldowns.
//!
//! # Ownership
//!
//! Only the executor mutates combatants during a move. Narration and preview
//! code take shared references.
//!
//! # Example
//!
//! ```
//! use marquee_core::combatant::Combatant;
//!
//! let mut hero = Combatant::new("Rocky", 100, 40, 10).with_hp(30);
//! assert_eq!(hero.heal(100), 70);
//! assert_eq!(hero.hp(), 100);
//! ```

pub mod status;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cooldown::CooldownTracker;
use crate::moves::Genre;

pub use status::{StatId, StatusBook, StatusKey, StatusRecord};

/// Canonical name for an affliction label, folding common spellings.
///
/// `Stunned` becomes `stun`, `daze` becomes `dazed`, `confusion` becomes
/// `confused`. Other names are trimmed and lowercased.
#[must_use]
pub fn canonical_affliction(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    if lower.starts_with("stun") {
        "stun".to_string()
    } else if lower.starts_with("daze") {
        "dazed".to_string()
    } else if lower.starts_with("confus") {
        "confused".to_string()
    } else {
        lower
    }
}

/// One side's fighter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combatant {
    name: String,
    identity: Option<String>,
    genres: Vec<Genre>,
    rating: Option<f64>,
    hp: i32,
    max_hp: i32,
    atk: i32,
    def: i32,
    prone: u32,
    temp_shield: i32,
    statuses: StatusBook,
    afflictions: BTreeMap<String, u32>,
    cooldowns: CooldownTracker,
}

impl Combatant {
    /// Creates a combatant at full health.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name used in narration
    /// * `max_hp` - Maximum hit points (negative values clamp to 0)
    /// * `atk` - Base attack
    /// * `def` - Base defense
    #[must_use]
    pub fn new(name: impl Into<String>, max_hp: i32, atk: i32, def: i32) -> Self {
        let max_hp = max_hp.max(0);
        Self {
            name: name.into(),
            identity: None,
            genres: Vec::new(),
            rating: None,
            hp: max_hp,
            max_hp,
            atk,
            def,
            prone: 0,
            temp_shield: 0,
            statuses: StatusBook::new(),
            afflictions: BTreeMap::new(),
            cooldowns: CooldownTracker::new(),
        }
    }

    /// Sets the identity used to look up signature moves.
    #[must_use]
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    /// Sets the assigned genres (first is primary, second is secondary).
    #[must_use]
    pub fn with_genres(mut self, genres: impl IntoIterator<Item = Genre>) -> Self {
        self.genres = genres.into_iter().collect();
        self
    }

    /// Sets the quality rating used for scaled percentages.
    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Sets current hit points, clamped to `[0, max_hp]`.
    #[must_use]
    pub fn with_hp(mut self, hp: i32) -> Self {
        self.hp = hp.clamp(0, self.max_hp);
        self
    }

    /// Sets the stun/daze duration this combatant suffers.
    #[must_use]
    pub fn with_prone(mut self, turns: u32) -> Self {
        self.prone = turns;
        self
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Signature table identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Assigned genres.
    #[must_use]
    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    /// Quality rating, if set.
    #[must_use]
    pub const fn rating(&self) -> Option<f64> {
        self.rating
    }

    /// Current hit points.
    #[must_use]
    pub const fn hp(&self) -> i32 {
        self.hp
    }

    /// Maximum hit points.
    #[must_use]
    pub const fn max_hp(&self) -> i32 {
        self.max_hp
    }

    /// Base attack.
    #[must_use]
    pub const fn atk(&self) -> i32 {
        self.atk
    }

    /// Base defense.
    #[must_use]
    pub const fn def(&self) -> i32 {
        self.def
    }

    /// Stun/daze duration override (0 means none).
    #[must_use]
    pub const fn prone(&self) -> u32 {
        self.prone
    }

    /// Barrier shield amount.
    #[must_use]
    pub const fn temp_shield(&self) -> i32 {
        self.temp_shield
    }

    /// Percentage modifiers.
    #[must_use]
    pub const fn statuses(&self) -> &StatusBook {
        &self.statuses
    }

    /// Mutable percentage modifiers.
    pub fn statuses_mut(&mut self) -> &mut StatusBook {
        &mut self.statuses
    }

    /// Move cooldowns.
    #[must_use]
    pub const fn cooldowns(&self) -> &CooldownTracker {
        &self.cooldowns
    }

    /// Mutable move cooldowns.
    pub fn cooldowns_mut(&mut self) -> &mut CooldownTracker {
        &mut self.cooldowns
    }

    /// Returns true while hit points are above zero.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Hit points below maximum.
    #[must_use]
    pub fn missing_hp(&self) -> i32 {
        if self.hp >= self.max_hp {
            0
        } else {
            self.max_hp - self.hp.max(0)
        }
    }

    /// Restores hit points, clamped to `[0, max_hp]`. Returns the actual gain.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = before.saturating_add(amount).clamp(0, self.max_hp);
        (self.hp - before).max(0)
    }

    /// Brings a downed combatant back at `hp`, clamped to `[1, max_hp]`.
    ///
    /// Returns the new hit points.
    pub fn revive(&mut self, hp: i32) -> i32 {
        self.hp = hp.clamp(1, self.max_hp.max(1));
        self.hp
    }

    /// Removes hit points, flooring at zero. Returns the amount removed.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let amount = amount.max(0);
        self.hp = (self.hp - amount).max(0);
        amount
    }

    /// Adds to the barrier shield. Returns the amount added.
    pub fn add_shield(&mut self, amount: i32) -> i32 {
        let added = amount.max(0);
        self.temp_shield += added;
        added
    }

    /// Defense after active debuffs, with the debuff fraction capped at `cap`.
    #[must_use]
    pub fn effective_def(&self, cap: f64) -> i32 {
        let down = self
            .statuses
            .pct(StatusKey::Debuff(StatId::Def))
            .clamp(0.0, cap);
        round_to_i32(f64::from(self.def) * (1.0 - down)).max(0)
    }

    /// Turns left on a named affliction (0 when absent).
    #[must_use]
    pub fn affliction_turns(&self, name: &str) -> u32 {
        self.afflictions
            .get(&canonical_affliction(name))
            .copied()
            .unwrap_or(0)
    }

    /// Applies a named affliction, keeping the longer duration.
    ///
    /// Returns the canonical name and the resulting turns.
    pub fn afflict(&mut self, name: &str, turns: u32) -> (String, u32) {
        let key = canonical_affliction(name);
        let entry = self.afflictions.entry(key.clone()).or_insert(0);
        *entry = (*entry).max(turns.max(1));
        (key, *entry)
    }

    /// Iterates over active afflictions.
    pub fn afflictions(&self) -> impl Iterator<Item = (&str, u32)> {
        self.afflictions.iter().map(|(name, turns)| (name.as_str(), *turns))
    }

    /// Counts statuses and afflictions down by one turn.
    ///
    /// Called by the battle loop at the owner's turn boundary.
    pub fn tick_statuses(&mut self) {
        self.statuses.tick();
        for turns in self.afflictions.values_mut() {
            *turns = turns.saturating_sub(1);
        }
        self.afflictions.retain(|_, turns| *turns > 0);
    }
}

/// Rounds half away from zero into an `i32`, saturating at the type bounds.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    mod heal_tests {
        use super::*;

        #[test]
        fn heal_reports_actual_gain() {
            let mut c = Combatant::new("Alien", 100, 10, 10).with_hp(90);
            assert_eq!(c.heal(30), 10);
            assert_eq!(c.hp(), 100);
        }

        #[test]
        fn negative_heal_floors_at_zero() {
            let mut c = Combatant::new("Alien", 100, 10, 10).with_hp(5);
            assert_eq!(c.heal(-50), 0);
            assert_eq!(c.hp(), 0);
        }

        #[test]
        fn revive_clamps_to_at_least_one() {
            let mut c = Combatant::new("Alien", 100, 10, 10).with_hp(0);
            assert_eq!(c.revive(0), 1);
            assert_eq!(c.revive(500), 100);
        }

        #[test]
        fn missing_hp_of_downed_is_max() {
            let c = Combatant::new("Alien", 80, 10, 10).with_hp(0);
            assert_eq!(c.missing_hp(), 80);
        }
    }

    mod damage_tests {
        use super::*;

        #[test]
        fn damage_floors_hp_at_zero() {
            let mut c = Combatant::new("Shark", 50, 10, 10);
            assert_eq!(c.take_damage(80), 80);
            assert_eq!(c.hp(), 0);
            assert!(!c.is_alive());
        }

        #[test]
        fn effective_def_applies_capped_debuff() {
            let mut c = Combatant::new("Shark", 50, 10, 100);
            c.statuses_mut()
                .apply_strongest(StatusKey::Debuff(StatId::Def), 0.95, 2);
            assert_eq!(c.effective_def(0.9), 10);
        }

        #[test]
        fn effective_def_ignores_expired_debuff() {
            let mut c = Combatant::new("Shark", 50, 10, 20);
            c.statuses_mut().set(
                StatusKey::Debuff(StatId::Def),
                StatusRecord::new(0.5, 0),
            );
            assert_eq!(c.effective_def(0.9), 20);
        }
    }

    mod affliction_tests {
        use super::*;

        #[test]
        fn names_are_canonical() {
            assert_eq!(canonical_affliction(" Stunned "), "stun");
            assert_eq!(canonical_affliction("Daze"), "dazed");
            assert_eq!(canonical_affliction("confusion"), "confused");
            assert_eq!(canonical_affliction("Burn"), "burn");
        }

        #[test]
        fn afflict_keeps_longer_duration() {
            let mut c = Combatant::new("Shark", 50, 10, 10);
            c.afflict("stun", 3);
            let (name, turns) = c.afflict("Stunned", 1);
            assert_eq!(name, "stun");
            assert_eq!(turns, 3);
        }

        #[test]
        fn tick_clears_expired() {
            let mut c = Combatant::new("Shark", 50, 10, 10);
            c.afflict("dazed", 1);
            c.statuses_mut()
                .apply_strongest(StatusKey::Buff(StatId::Atk), 0.2, 1);
            c.tick_statuses();
            assert_eq!(c.affliction_turns("dazed"), 0);
            assert!(c.statuses().is_clear());
        }
    }

    #[test]
    fn round_to_i32_matches_half_away_from_zero() {
        assert_eq!(round_to_i32(2.5), 3);
        assert_eq!(round_to_i32(-2.5), -3);
        assert_eq!(round_to_i32(f64::NAN), 0);
        assert_eq!(round_to_i32(1e12), i32::MAX);
    }
}
