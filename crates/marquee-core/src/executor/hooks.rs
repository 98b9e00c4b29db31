//! Instrumentation hooks passed into the executor.

use std::collections::BTreeSet;

use crate::combatant::Combatant;
use crate::effect::{EffectKey, EffectMap};

/// Observer for move execution.
///
/// All methods default to no-ops. Hooks are passed explicitly to
/// [`Executor::execute`](super::Executor::execute), so concurrent battles never
/// share instrumentation state.
pub trait ExecutionHooks {
    /// Called before HP is restored on `target`.
    fn before_heal(&mut self, _target: &Combatant) {}

    /// Called before a barrier is added to `target`.
    fn before_shield(&mut self, _target: &Combatant) {}

    /// Called with each step's effects as soon as the step resolves.
    ///
    /// # Arguments
    ///
    /// * `source` - Kind label of the step (`damageEnemy`, `genre`, ...)
    /// * `effects` - Effects the step produced
    fn on_effects(&mut self, _source: &str, _effects: &EffectMap) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl ExecutionHooks for NoHooks {}

/// Collects every effect key the executor emits.
///
/// Useful in tests to check that each emitted key has a narration template.
#[derive(Debug, Clone, Default)]
pub struct KeyAudit {
    keys: BTreeSet<EffectKey>,
    sources: BTreeSet<String>,
    heals: usize,
    shields: usize,
}

impl KeyAudit {
    /// Creates an empty audit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every key seen so far.
    #[must_use]
    pub const fn keys(&self) -> &BTreeSet<EffectKey> {
        &self.keys
    }

    /// Every step label seen so far.
    #[must_use]
    pub const fn sources(&self) -> &BTreeSet<String> {
        &self.sources
    }

    /// Number of heal applications observed.
    #[must_use]
    pub const fn heals(&self) -> usize {
        self.heals
    }

    /// Number of barrier applications observed.
    #[must_use]
    pub const fn shields(&self) -> usize {
        self.shields
    }
}

impl ExecutionHooks for KeyAudit {
    fn before_heal(&mut self, _target: &Combatant) {
        self.heals += 1;
    }

    fn before_shield(&mut self, _target: &Combatant) {
        self.shields += 1;
    }

    fn on_effects(&mut self, source: &str, effects: &EffectMap) {
        self.sources.insert(source.to_string());
        self.keys.extend(effects.iter().map(|(key, _)| key.clone()));
    }
}
