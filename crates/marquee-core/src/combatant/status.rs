//! Typed status storage.
//!
//! Percentage modifiers live in a [`StatusBook`] keyed by [`StatusKey`]. Each
//! entry is a [`StatusRecord`] pairing a fraction with a turn counter. A record
//! whose counter has reached zero is inert: reads return `0.0` even before the
//! battle loop clears it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stats that can be buffed or debuffed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatId {
    /// Attack.
    Atk,
    /// Defense.
    Def,
    /// Critical rate.
    Crit,
    /// Evasion.
    Eva,
    /// Speed.
    Spd,
    /// Accuracy.
    Acc,
}

impl StatId {
    /// Every stat, in narration priority order.
    pub const ALL: [Self; 6] = [
        Self::Atk,
        Self::Def,
        Self::Crit,
        Self::Eva,
        Self::Spd,
        Self::Acc,
    ];

    /// Uppercase display label (`ATK`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Atk => "ATK",
            Self::Def => "DEF",
            Self::Crit => "CRIT",
            Self::Eva => "EVA",
            Self::Spd => "SPD",
            Self::Acc => "ACC",
        }
    }

    /// Lowercase key fragment (`atk`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Atk => "atk",
            Self::Def => "def",
            Self::Crit => "crit",
            Self::Eva => "eva",
            Self::Spd => "spd",
            Self::Acc => "acc",
        }
    }

    /// Capitalized key fragment (`Atk`), used inside camelCase keys.
    #[must_use]
    pub const fn capitalized(self) -> &'static str {
        match self {
            Self::Atk => "Atk",
            Self::Def => "Def",
            Self::Crit => "Crit",
            Self::Eva => "Eva",
            Self::Spd => "Spd",
            Self::Acc => "Acc",
        }
    }

    /// Parses a lowercase fragment.
    #[must_use]
    pub fn from_fragment(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|stat| stat.as_str().eq_ignore_ascii_case(s))
    }
}

/// Slot in a [`StatusBook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum StatusKey {
    /// Percentage increase to a stat.
    Buff(StatId),
    /// Percentage decrease to a stat.
    Debuff(StatId),
    /// Fraction of incoming damage ignored.
    DamageReduction,
    /// Extra damage taken from the next hit only.
    NextHitVuln,
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buff(stat) => write!(f, "{}Buff", stat.as_str()),
            Self::Debuff(stat) => write!(f, "{}Debuff", stat.as_str()),
            Self::DamageReduction => f.write_str("damageReduction"),
            Self::NextHitVuln => f.write_str("nextHitVuln"),
        }
    }
}

impl FromStr for StatusKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "damageReduction" => return Ok(Self::DamageReduction),
            "nextHitVuln" => return Ok(Self::NextHitVuln),
            _ => {}
        }
        if let Some(stat) = s.strip_suffix("Buff").and_then(StatId::from_fragment) {
            return Ok(Self::Buff(stat));
        }
        if let Some(stat) = s.strip_suffix("Debuff").and_then(StatId::from_fragment) {
            return Ok(Self::Debuff(stat));
        }
        Err(format!("unknown status key `{s}`"))
    }
}

impl From<StatusKey> for String {
    fn from(key: StatusKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for StatusKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A fraction plus its remaining turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Fraction, e.g. `0.25` for 25%.
    pub pct: f64,
    /// Turns remaining; zero or below means inert.
    pub turns: i32,
}

impl StatusRecord {
    /// Creates a record.
    #[must_use]
    pub const fn new(pct: f64, turns: i32) -> Self {
        Self { pct, turns }
    }

    /// Returns `pct` while active, otherwise `0.0`.
    #[must_use]
    pub fn effective_pct(&self) -> f64 {
        if self.turns <= 0 {
            0.0
        } else {
            self.pct
        }
    }

    /// Returns true when the record still has turns left.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.turns > 0
    }
}

/// Percentage modifiers on one combatant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusBook {
    records: BTreeMap<StatusKey, StatusRecord>,
}

impl StatusBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored record, active or not.
    #[must_use]
    pub fn record(&self, key: StatusKey) -> Option<StatusRecord> {
        self.records.get(&key).copied()
    }

    /// Returns the effective fraction for `key` (0 when absent or expired).
    #[must_use]
    pub fn pct(&self, key: StatusKey) -> f64 {
        self.records
            .get(&key)
            .map_or(0.0, StatusRecord::effective_pct)
    }

    /// Applies a modifier with strongest-wins stacking.
    ///
    /// The stored fraction becomes `max(old, pct)` and the counter becomes
    /// `max(old_turns, turns)`. Returns the resulting record.
    pub fn apply_strongest(&mut self, key: StatusKey, pct: f64, turns: i32) -> StatusRecord {
        let entry = self.records.entry(key).or_default();
        entry.pct = entry.pct.max(pct);
        entry.turns = entry.turns.max(turns);
        *entry
    }

    /// Overwrites a record, bypassing stacking rules.
    pub fn set(&mut self, key: StatusKey, record: StatusRecord) {
        self.records.insert(key, record);
    }

    /// Removes and returns the effective fraction of a one-shot modifier.
    pub fn consume(&mut self, key: StatusKey) -> f64 {
        self.records
            .remove(&key)
            .map_or(0.0, |record| record.effective_pct())
    }

    /// Counts every record down by one turn and drops expired ones.
    pub fn tick(&mut self) {
        for record in self.records.values_mut() {
            record.turns -= 1;
            if record.turns <= 0 {
                record.pct = 0.0;
            }
        }
        self.records.retain(|_, record| record.turns > 0);
    }

    /// Iterates over active records.
    pub fn active(&self) -> impl Iterator<Item = (StatusKey, StatusRecord)> + '_ {
        self.records
            .iter()
            .filter(|(_, record)| record.is_active())
            .map(|(key, record)| (*key, *record))
    }

    /// Returns true when no record is active.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.active().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod key_tests {
        use super::*;

        #[test]
        fn keys_round_trip_through_strings() {
            for key in [
                StatusKey::Buff(StatId::Atk),
                StatusKey::Debuff(StatId::Acc),
                StatusKey::DamageReduction,
                StatusKey::NextHitVuln,
            ] {
                assert_eq!(key.to_string().parse::<StatusKey>().unwrap(), key);
            }
        }

        #[test]
        fn unknown_key_fails() {
            assert!("luckBuff".parse::<StatusKey>().is_err());
        }

        #[test]
        fn book_serializes_with_string_keys() {
            let mut book = StatusBook::new();
            book.apply_strongest(StatusKey::Buff(StatId::Def), 0.2, 2);
            let json = serde_json::to_string(&book).unwrap();
            assert!(json.contains("defBuff"));
            let back: StatusBook = serde_json::from_str(&json).unwrap();
            assert_eq!(back, book);
        }
    }

    mod stacking_tests {
        use super::*;

        #[test]
        fn strongest_wins_on_pct_and_turns() {
            let mut book = StatusBook::new();
            book.apply_strongest(StatusKey::Buff(StatId::Atk), 0.4, 1);
            let record = book.apply_strongest(StatusKey::Buff(StatId::Atk), 0.2, 3);
            assert!((record.pct - 0.4).abs() < f64::EPSILON);
            assert_eq!(record.turns, 3);
        }

        #[test]
        fn expired_record_reads_zero() {
            let mut book = StatusBook::new();
            book.set(StatusKey::Debuff(StatId::Def), StatusRecord::new(0.5, 0));
            assert!(book.pct(StatusKey::Debuff(StatId::Def)).abs() < f64::EPSILON);
            assert!(book.is_clear());
        }

        #[test]
        fn consume_removes_entry() {
            let mut book = StatusBook::new();
            book.apply_strongest(StatusKey::NextHitVuln, 0.35, 1);
            assert!((book.consume(StatusKey::NextHitVuln) - 0.35).abs() < f64::EPSILON);
            assert!(book.record(StatusKey::NextHitVuln).is_none());
        }
    }

    mod tick_tests {
        use super::*;

        #[test]
        fn tick_expires_records() {
            let mut book = StatusBook::new();
            book.apply_strongest(StatusKey::Buff(StatId::Atk), 0.3, 2);
            book.tick();
            assert!((book.pct(StatusKey::Buff(StatId::Atk)) - 0.3).abs() < f64::EPSILON);
            book.tick();
            assert!(book.record(StatusKey::Buff(StatId::Atk)).is_none());
        }
    }
}
