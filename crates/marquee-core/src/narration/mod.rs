//! Narration: turning an [`ExecutionResult`](crate::effect::ExecutionResult)
//! into ordered message-box lines.
//!
//! # Architecture
//!
//! ```text
//! ExecutionResult ──► failure line            (used == false)
//!        │
//!        ├──► OverrideTable::render          (authored text, bypasses the rest)
//!        │
//!        └──► rank_effects ─► default templates ─► ComboBook ─► phase buckets
//! ```
//!
//! Narration never touches combatants and keeps no state between calls.
//! Alternate phrasings are picked from a generator seeded with the result's
//! `narration_seed`, so narrating the same result twice gives the same lines.
//!
//! # Example
//!
//! ```
//! use marquee_core::effect::{EffectKey, EffectMap, ExecutionResult, StepResult};
//! use marquee_core::narration::{Composer, NarrationScene};
//! use marquee_core::target::{BaseTarget, TargetSpec};
//!
//! let mut effects = EffectMap::new();
//! effects.insert(EffectKey::DamageDealt, 42);
//! let result = ExecutionResult::succeeded(
//!     vec![StepResult {
//!         label: "damageEnemy".into(),
//!         target: TargetSpec::new(BaseTarget::Enemy),
//!         effects,
//!         target_name: Some("Drago".into()),
//!     }],
//!     7,
//! );
//!
//! let scene = NarrationScene::new("Rocky", "Haymaker", "Drago");
//! let lines = Composer::default().compose(&scene, &result);
//! let text: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
//! assert_eq!(text, ["Rocky uses Haymaker!", "Drago takes 42 damage."]);
//! ```

pub mod combo;
mod composer;
mod failure;
mod overrides;
mod phase;
mod ranking;
mod template;

pub use composer::{Composer, NarrationScene};
pub use failure::failure_line;
pub use overrides::{OverrideTable, TextOverride};
pub use phase::{default_phase, Phase};
pub use ranking::rank_effects;
pub use template::{capitalize, default_line, render_template, EffectEntry, Names};

use serde::{Deserialize, Serialize};

/// Hook value a renderer may act on when it displays a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayCue {
    /// The enemy took damage.
    EnemyHit,
    /// Someone on the party recovered HP.
    PartyHealed,
    /// A downed party member came back.
    Revived,
    /// A barrier went up.
    Shielded,
}

/// One line of narration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrationLine {
    /// Bucket the line was sorted into.
    pub phase: Phase,
    /// Display text.
    pub text: String,
    /// Optional on-display hook.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cue: Option<DisplayCue>,
}

impl NarrationLine {
    /// Creates a line without a cue.
    #[must_use]
    pub fn new(phase: Phase, text: impl Into<String>) -> Self {
        Self {
            phase,
            text: text.into(),
            cue: None,
        }
    }

    /// Attaches a display cue.
    #[must_use]
    pub fn with_cue(mut self, cue: Option<DisplayCue>) -> Self {
        self.cue = cue;
        self
    }
}
