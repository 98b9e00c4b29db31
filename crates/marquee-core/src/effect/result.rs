//! Execution outcomes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::map::EffectMap;
use crate::target::TargetSpec;

/// Why a move could not be used.
///
/// Failures are detected before any combatant is touched and travel inside
/// [`ExecutionResult`]; they are never propagated as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "camelCase")]
pub enum FailureReason {
    /// The acting combatant does not exist.
    #[error("no valid actor")]
    NoActor,
    /// No move was selected.
    #[error("no move selected")]
    NoSpecial,
    /// The move is still cooling down.
    #[error("move on cooldown for {remaining} more turn(s)")]
    Cooldown {
        /// Turns left before the move is ready.
        remaining: u32,
    },
    /// The move needs an ally index and none (or an out-of-range one) was given.
    #[error("no valid ally target")]
    NoAllyTarget,
    /// The chosen target cannot receive the move.
    #[error("invalid target")]
    InvalidTarget,
    /// The move would change nothing.
    #[error("move had no effect")]
    NoEffect,
}

/// Outcome of one step of a compound move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    /// Kind label of the step (`damageEnemy`, `healSelf`, ...).
    pub label: String,
    /// Where the step was aimed.
    pub target: TargetSpec,
    /// Effects this step produced on its own.
    pub effects: EffectMap,
    /// Display name of the combatant the step affected, if single-target.
    pub target_name: Option<String>,
}

/// Result of executing a move.
///
/// # Example
///
/// ```
/// use marquee_core::effect::{ExecutionResult, FailureReason};
///
/// let result = ExecutionResult::failed(FailureReason::NoSpecial);
/// assert!(!result.used);
/// assert!(result.effects.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Whether the move went off (and its cooldown started).
    pub used: bool,
    /// Why the move failed, when `used` is false.
    pub failure: Option<FailureReason>,
    /// Merged effects.
    pub effects: EffectMap,
    /// Per-step results. Single-effect moves record one step.
    pub steps: Vec<StepResult>,
    /// Display name of the primary affected combatant.
    pub target_name: Option<String>,
    /// Seed narration uses to pick alternate phrasings.
    pub narration_seed: u64,
}

impl ExecutionResult {
    /// Builds a failed result.
    #[must_use]
    pub fn failed(reason: FailureReason) -> Self {
        Self {
            used: false,
            failure: Some(reason),
            effects: EffectMap::new(),
            steps: Vec::new(),
            target_name: None,
            narration_seed: 0,
        }
    }

    /// Builds a successful result from its steps, merging their effects.
    #[must_use]
    pub fn succeeded(steps: Vec<StepResult>, narration_seed: u64) -> Self {
        let mut effects = EffectMap::new();
        for step in &steps {
            effects.merge(&step.effects);
        }
        let target_name = steps.iter().find_map(|step| step.target_name.clone());
        Self {
            used: true,
            failure: None,
            effects,
            steps,
            target_name,
            narration_seed,
        }
    }

    /// Returns true for a compound result with more than one step.
    #[must_use]
    pub fn is_multi_step(&self) -> bool {
        self.steps.len() > 1
    }
}
