//! Insertion-ordered effect maps.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::key::{EffectKey, KeyClass};
use crate::combatant::round_to_i32;

/// Value stored under an [`EffectKey`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EffectValue {
    /// Whole amount (HP, counts, turns).
    Int(i64),
    /// Fraction (0.25 means 25%).
    Pct(f64),
    /// Yes/no marker.
    Flag(bool),
    /// Free text, such as an affliction name.
    Text(String),
}

impl EffectValue {
    /// Returns true when the value should count as applied.
    ///
    /// Zero, a non-finite or zero fraction, `false` and blank text are not.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Int(n) => *n != 0,
            Self::Pct(p) => p.is_finite() && *p != 0.0,
            Self::Flag(b) => *b,
            Self::Text(s) => !s.trim().is_empty(),
        }
    }

    /// Returns the value as a whole number (fractions round, text is 0).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_i64(&self) -> i64 {
        match self {
            Self::Int(n) => *n,
            Self::Pct(p) if p.is_finite() => p.round() as i64,
            Self::Flag(true) => 1,
            _ => 0,
        }
    }

    /// Returns the value as a float (text is 0).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(n) => *n as f64,
            Self::Pct(p) => *p,
            Self::Flag(true) => 1.0,
            _ => 0.0,
        }
    }

    /// Returns the text, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for EffectValue {
    /// Fractions display as a whole percentage (`0.25` is `25%`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Pct(p) => write!(f, "{}%", round_to_i32(p * 100.0)),
            Self::Flag(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i32> for EffectValue {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u32> for EffectValue {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for EffectValue {
    fn from(p: f64) -> Self {
        Self::Pct(p)
    }
}

impl From<bool> for EffectValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<String> for EffectValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for EffectValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Effect entries in first-insertion order.
///
/// Re-inserting a key replaces its value in place, so order reflects when a
/// key first appeared.
///
/// # Example
///
/// ```
/// use marquee_core::effect::{EffectKey, EffectMap};
///
/// let mut effects = EffectMap::new();
/// effects.add(EffectKey::DamageDealt, 40);
/// effects.add(EffectKey::HealedHp, 0);
/// effects.add(EffectKey::DamageDealt, 2);
/// assert_eq!(effects.int(&EffectKey::DamageDealt), 42);
/// assert_eq!(effects.truthy_rendered_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectMap {
    entries: Vec<(EffectKey, EffectValue)>,
}

impl EffectMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value, replacing any previous one in place.
    pub fn insert(&mut self, key: EffectKey, value: impl Into<EffectValue>) {
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Adds a whole amount to the existing value (0 when absent).
    pub fn add(&mut self, key: EffectKey, amount: i32) {
        let current = self.int(&key);
        self.insert(key, EffectValue::Int(current + i64::from(amount)));
    }

    /// Keeps the larger fraction.
    pub fn max_pct(&mut self, key: EffectKey, pct: f64) {
        let current = self.get(&key).map_or(0.0, EffectValue::as_f64);
        self.insert(key, EffectValue::Pct(current.max(pct)));
    }

    /// Keeps the larger whole amount.
    pub fn max_int(&mut self, key: EffectKey, amount: i64) {
        let current = self.int(&key);
        self.insert(key, EffectValue::Int(current.max(amount)));
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &EffectKey) -> Option<&EffectValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns the value for `key` as a whole number (0 when absent).
    #[must_use]
    pub fn int(&self, key: &EffectKey) -> i64 {
        self.get(key).map_or(0, EffectValue::as_i64)
    }

    /// Returns the value for `key` as a float (0 when absent).
    #[must_use]
    pub fn pct(&self, key: &EffectKey) -> f64 {
        self.get(key).map_or(0.0, EffectValue::as_f64)
    }

    /// Returns true when `key` is present with a truthy value.
    #[must_use]
    pub fn has(&self, key: &EffectKey) -> bool {
        self.get(key).is_some_and(EffectValue::is_truthy)
    }

    /// Returns true when `key` is present, whatever its value.
    #[must_use]
    pub fn contains(&self, key: &EffectKey) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &EffectKey) -> Option<EffectValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&EffectKey, &EffectValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a copy with aliases folded into canonical keys and meta keys
    /// removed.
    ///
    /// An alias only fills its canonical key when the canonical key is absent,
    /// so the same amount is never counted under two names.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut out = Self::new();
        for (key, value) in &self.entries {
            if key.class() == KeyClass::Rendered {
                out.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in &self.entries {
            if let KeyClass::Alias(canonical) = key.class() {
                if !self.contains(&canonical) && !out.contains(&canonical) {
                    out.insert(canonical, value.clone());
                }
            }
        }
        out
    }

    /// Number of distinct rendered keys with truthy values, after aliases.
    #[must_use]
    pub fn truthy_rendered_count(&self) -> usize {
        self.normalized()
            .iter()
            .filter(|(_, value)| value.is_truthy())
            .count()
    }

    /// Folds `other` into `self` for compound moves.
    ///
    /// Additive amounts sum, flags combine with OR, text keeps the latest
    /// non-blank value and everything else keeps the maximum.
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in &other.entries {
            let merged = match (self.get(key), value) {
                (None, v) => v.clone(),
                (Some(EffectValue::Flag(a)), EffectValue::Flag(b)) => EffectValue::Flag(*a || *b),
                (Some(current), EffectValue::Text(s)) => {
                    if s.trim().is_empty() {
                        current.clone()
                    } else {
                        EffectValue::Text(s.clone())
                    }
                }
                (Some(EffectValue::Int(a)), EffectValue::Int(b)) => {
                    if key.is_additive() {
                        EffectValue::Int(a + b)
                    } else {
                        EffectValue::Int(*a.max(b))
                    }
                }
                (Some(current), v) => {
                    if key.is_additive() {
                        EffectValue::Pct(current.as_f64() + v.as_f64())
                    } else {
                        EffectValue::Pct(current.as_f64().max(v.as_f64()))
                    }
                }
            };
            self.insert(key.clone(), merged);
        }
    }
}

impl FromIterator<(EffectKey, EffectValue)> for EffectMap {
    fn from_iter<T: IntoIterator<Item = (EffectKey, EffectValue)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}
