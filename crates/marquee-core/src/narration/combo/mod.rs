//! Combo narration.
//!
//! A combo recognizes a recognizable *shape* of effects (damage plus a heal,
//! damage plus a debuff, ...) and flavors the default lines: it can inject
//! lines right after the headline, replace the default line of an effect key
//! with one or more lines, or drop keys outright.
//!
//! # Architecture
//!
//! Rules implement [`ComboRule`] and live in an ordered [`ComboBook`]. The
//! book is evaluated front to back and the first rule whose predicate returns
//! `Ok(true)` wins. A predicate or builder that fails is logged, recorded in
//! [`ComboDiagnostics`] and skipped, so a broken rule can never block
//! narration.
//!
//! Combos only run when the move produced at least two distinct rendered
//! effects; a single effect reads best with its plain line.
//!
//! # Example
//!
//! ```
//! use marquee_core::effect::{EffectKey, EffectMap};
//! use marquee_core::narration::combo::{ComboBook, ComboContext, ComboDiagnostics};
//! use marquee_core::rng::SeededRng;
//!
//! let mut effects = EffectMap::new();
//! effects.insert(EffectKey::DamageDealt, 30);
//! effects.insert(EffectKey::HealedHp, 12);
//!
//! let ctx = ComboContext::new(&effects, "Nosferatu", "Bite", "Van Helsing");
//! let mut diagnostics = ComboDiagnostics::default();
//! let (id, outcome) = ComboBook::standard()
//!     .evaluate(&ctx, &mut SeededRng::new(3), &mut diagnostics)
//!     .unwrap();
//!
//! assert_eq!(id, "lifesteal");
//! assert!(outcome.replacement(&EffectKey::HealedHp).is_some());
//! ```

mod rules;

pub use rules::{
    ChargeStrike, CripplingBlow, HexStrike, Lifesteal, RallyStrike, Sabotage, Seven,
    SupportAssault, VampiricStrike, Wardrums,
};

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use super::template::EffectEntry;
use crate::effect::{EffectKey, EffectMap, EffectValue, TurnCounter};
use crate::rng::BattleRng;

// =============================================================================
// Errors and diagnostics
// =============================================================================

/// Why a combo rule could not decide or build.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComboError {
    /// An effect value had a type the rule cannot read.
    #[error("effect `{key}` holds {found}, expected {expected}")]
    UnexpectedValue {
        /// Offending key.
        key: EffectKey,
        /// What the rule needed.
        expected: &'static str,
        /// What was there.
        found: EffectValue,
    },
    /// Rule-specific failure.
    #[error("{0}")]
    Rule(String),
}

/// Records what happened during one combo evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComboDiagnostics {
    applied: Option<String>,
    errors: Vec<(String, ComboError)>,
}

impl ComboDiagnostics {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier of the combo that applied, if any.
    #[must_use]
    pub fn applied(&self) -> Option<&str> {
        self.applied.as_deref()
    }

    /// Errors raised by rules, in evaluation order.
    #[must_use]
    pub fn errors(&self) -> &[(String, ComboError)] {
        &self.errors
    }

    /// Returns true when no rule failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    fn record(&mut self, id: &str, error: ComboError) {
        warn!(combo = id, %error, "combo rule failed; skipping");
        self.errors.push((id.to_string(), error));
    }
}

// =============================================================================
// Context
// =============================================================================

/// What a rule gets to look at.
#[derive(Debug, Clone)]
pub struct ComboContext<'a> {
    raw: &'a EffectMap,
    effects: EffectMap,
    /// Target tags of the move (already lowercase).
    pub tags: &'a [String],
    /// Whether the move is aimed at the whole team.
    pub hits_team: bool,
    /// Display name of the move.
    pub move_name: &'a str,
    /// Acting combatant.
    pub actor: &'a str,
    /// Combatant that recovered HP, for drain-style lines.
    pub healed: &'a str,
    /// Opposing combatant.
    pub enemy: &'a str,
}

impl<'a> ComboContext<'a> {
    /// Creates a context for `effects` (aliases are resolved here).
    ///
    /// The healed name defaults to the actor.
    #[must_use]
    pub fn new(effects: &'a EffectMap, actor: &'a str, move_name: &'a str, enemy: &'a str) -> Self {
        Self {
            raw: effects,
            effects: effects.normalized(),
            tags: &[],
            hits_team: false,
            move_name,
            actor,
            healed: actor,
            enemy,
        }
    }

    /// Sets the target tags.
    #[must_use]
    pub fn with_tags(mut self, tags: &'a [String], hits_team: bool) -> Self {
        self.tags = tags;
        self.hits_team = hits_team;
        self
    }

    /// Sets the name of whoever recovered HP.
    #[must_use]
    pub fn with_healed(mut self, healed: &'a str) -> Self {
        self.healed = healed;
        self
    }

    /// Normalized effects.
    #[must_use]
    pub const fn effects(&self) -> &EffectMap {
        &self.effects
    }

    /// Returns true when `key` (after aliases) holds a positive amount.
    #[must_use]
    pub fn positive(&self, key: &EffectKey) -> bool {
        self.effects
            .get(&key.canonical())
            .is_some_and(|v| v.as_f64() > 0.0)
    }

    /// Returns true when `key` (after aliases) is present and truthy.
    #[must_use]
    pub fn present(&self, key: &EffectKey) -> bool {
        self.effects
            .get(&key.canonical())
            .is_some_and(EffectValue::is_truthy)
    }

    /// Whole-number amount for `key`, after aliases.
    #[must_use]
    pub fn amount(&self, key: &EffectKey) -> i64 {
        self.effects.get(&key.canonical()).map_or(0, EffectValue::as_i64)
    }

    /// Fraction stored under `key`, after aliases.
    #[must_use]
    pub fn fraction(&self, key: &EffectKey) -> f64 {
        self.effects.get(&key.canonical()).map_or(0.0, EffectValue::as_f64)
    }

    /// Turn count recorded next to an effect.
    #[must_use]
    pub fn turns(&self, counter: TurnCounter) -> i64 {
        self.raw.int(&EffectKey::Turns(counter))
    }

    /// Returns true when any of `tags` is on the move.
    #[must_use]
    pub fn has_tag(&self, tags: &[&str]) -> bool {
        tags.iter().any(|t| self.tags.iter().any(|own| own.as_str() == *t))
    }

    /// Returns true when the lowercase move name contains `needle`.
    #[must_use]
    pub fn name_has(&self, needle: &str) -> bool {
        self.move_name.to_lowercase().contains(needle)
    }

    /// Reads `key` as text.
    ///
    /// # Errors
    ///
    /// Returns [`ComboError::UnexpectedValue`] when the value is not text.
    pub fn text(&self, key: &EffectKey) -> Result<Option<&str>, ComboError> {
        match self.effects.get(&key.canonical()) {
            None => Ok(None),
            Some(EffectValue::Text(s)) => Ok(Some(s.trim())),
            Some(other) => Err(ComboError::UnexpectedValue {
                key: key.canonical(),
                expected: "text",
                found: other.clone(),
            }),
        }
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// What a matched combo does to the default lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComboOutcome {
    /// Lines placed right after the headline.
    pub inject_after_headline: Vec<String>,
    /// Replacement lines per key, in the order the rule produced them.
    pub replace: Vec<(EffectKey, Vec<String>)>,
    /// Keys whose lines are removed.
    pub drop: Vec<EffectKey>,
}

impl ComboOutcome {
    /// Outcome that only injects `line`.
    #[must_use]
    pub fn inject(line: impl Into<String>) -> Self {
        Self {
            inject_after_headline: vec![line.into()],
            ..Self::default()
        }
    }

    /// Adds a replacement for `key`.
    #[must_use]
    pub fn with_replacement(mut self, key: EffectKey, line: impl Into<String>) -> Self {
        self.replace.push((key.canonical(), vec![line.into()]));
        self
    }

    /// Replacement lines for `key`, when non-blank ones exist.
    #[must_use]
    pub fn replacement(&self, key: &EffectKey) -> Option<&[String]> {
        let key = key.canonical();
        self.replace
            .iter()
            .find(|(k, lines)| *k == key && lines.iter().any(|l| !l.trim().is_empty()))
            .map(|(_, lines)| lines.as_slice())
    }

    /// Injected lines with blanks removed.
    #[must_use]
    pub fn injected(&self) -> Vec<String> {
        self.inject_after_headline
            .iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect()
    }

    /// Applies replacements and drops to one list of entries.
    ///
    /// The first entry of a replaced key fans out into the replacement lines
    /// (same key, same position). Later entries of that key are removed so a
    /// replacement is shown once. `replaced` carries that state across the
    /// steps of a compound move.
    pub fn apply(&self, entries: Vec<EffectEntry>, replaced: &mut Vec<EffectKey>) -> Vec<EffectEntry> {
        let mut out = Vec::with_capacity(entries.len());
        for entry in entries {
            if self.drop.contains(&entry.key) {
                continue;
            }
            match self.replacement(&entry.key) {
                Some(_) if replaced.contains(&entry.key) => {}
                Some(lines) => {
                    replaced.push(entry.key.clone());
                    out.extend(
                        lines
                            .iter()
                            .map(|l| l.trim())
                            .filter(|l| !l.is_empty())
                            .map(|l| EffectEntry {
                                key: entry.key.clone(),
                                text: l.to_string(),
                            }),
                    );
                }
                None => out.push(entry),
            }
        }
        out
    }
}

// =============================================================================
// Rule trait and book
// =============================================================================

/// A combo narration rule.
///
/// Rules must be `Send + Sync` so one book can be shared across engines.
pub trait ComboRule: Send + Sync {
    /// Stable identifier, reported in diagnostics.
    fn id(&self) -> &'static str;

    /// Decides whether the rule applies.
    ///
    /// # Errors
    ///
    /// Returns a [`ComboError`] when the effects cannot be interpreted. The
    /// book treats that as no match.
    fn matches(&self, ctx: &ComboContext<'_>) -> Result<bool, ComboError>;

    /// Builds the narration changes. Alternate phrasings draw from `rng`.
    ///
    /// # Errors
    ///
    /// Returns a [`ComboError`] when a line cannot be built.
    fn build(&self, ctx: &ComboContext<'_>, rng: &mut dyn BattleRng) -> Result<ComboOutcome, ComboError>;
}

/// Ordered collection of combo rules.
#[derive(Clone, Default)]
pub struct ComboBook {
    rules: Vec<Arc<dyn ComboRule>>,
}

impl fmt::Debug for ComboBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

impl ComboBook {
    /// Creates a book with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The shipped rules, in evaluation order.
    ///
    /// Vampiric strike precedes lifesteal so flavored drains are not swallowed
    /// by the shape-only rule, and the shape-only charge and crippling rules
    /// come last.
    #[must_use]
    pub fn standard() -> Self {
        let rules: Vec<Arc<dyn ComboRule>> = vec![
            Arc::new(VampiricStrike),
            Arc::new(Lifesteal),
            Arc::new(RallyStrike),
            Arc::new(Sabotage),
            Arc::new(HexStrike),
            Arc::new(SupportAssault),
            Arc::new(Seven),
            Arc::new(Wardrums),
            Arc::new(ChargeStrike),
            Arc::new(CripplingBlow),
        ];
        Self { rules }
    }

    /// Appends a rule at the lowest priority.
    pub fn push(&mut self, rule: Arc<dyn ComboRule>) {
        self.rules.push(rule);
    }

    /// Rule identifiers in evaluation order.
    #[must_use]
    pub fn ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true when the book has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Finds the first rule that matches and builds its outcome.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Effects and names of the move being narrated
    /// * `rng` - Picks alternate phrasings
    /// * `diagnostics` - Receives the applied id and any rule errors
    ///
    /// # Returns
    ///
    /// The winning rule id and its outcome, or `None` when fewer than two
    /// rendered effects exist or no rule matched.
    pub fn evaluate(
        &self,
        ctx: &ComboContext<'_>,
        rng: &mut dyn BattleRng,
        diagnostics: &mut ComboDiagnostics,
    ) -> Option<(&'static str, ComboOutcome)> {
        if ctx.effects().truthy_rendered_count() < 2 {
            return None;
        }
        for rule in &self.rules {
            let id = rule.id();
            match rule.matches(ctx) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(error) => {
                    diagnostics.record(id, error);
                    continue;
                }
            }
            match rule.build(ctx, rng) {
                Ok(outcome) => {
                    debug!(combo = id, "combo applied");
                    diagnostics.applied = Some(id.to_string());
                    return Some((id, outcome));
                }
                Err(error) => diagnostics.record(id, error),
            }
        }
        None
    }
}
