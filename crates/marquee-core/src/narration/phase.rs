//! Narration phases.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::effect::EffectKey;

/// Ordered narration bucket.
///
/// Lines are grouped by phase and the groups are concatenated in declaration
/// order. Revival reads as a setup beat, so it sits in [`Phase::PreEffect`]
/// even though it belongs to the heal family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Headline, revivals, barriers, damage reduction.
    #[serde(rename = "preFx")]
    PreEffect,
    /// Damage dealt.
    #[serde(rename = "dmg")]
    Damage,
    /// HP recovered.
    #[serde(rename = "heal")]
    Heal,
    /// Stat increases.
    #[serde(rename = "buffs")]
    Buffs,
    /// Stat decreases.
    #[serde(rename = "debuffs")]
    Debuffs,
    /// Vulnerability, afflictions and anything unrecognized.
    #[serde(rename = "postFx")]
    PostEffect,
}

impl Phase {
    /// Every phase, in output order.
    pub const ALL: [Self; 6] = [
        Self::PreEffect,
        Self::Damage,
        Self::Heal,
        Self::Buffs,
        Self::Debuffs,
        Self::PostEffect,
    ];

    /// Authoring name (`preFx`, `dmg`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreEffect => "preFx",
            Self::Damage => "dmg",
            Self::Heal => "heal",
            Self::Buffs => "buffs",
            Self::Debuffs => "debuffs",
            Self::PostEffect => "postFx",
        }
    }

    /// Position in [`Phase::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase a key's line lands in when the move does not override it.
#[must_use]
pub fn default_phase(key: &EffectKey) -> Phase {
    match key.canonical() {
        EffectKey::Revived
        | EffectKey::RevivedCount
        | EffectKey::ShieldAdded
        | EffectKey::DamageReductionPct => Phase::PreEffect,
        EffectKey::DamageDealt => Phase::Damage,
        EffectKey::HealedHp | EffectKey::TeamHeal => Phase::Heal,
        EffectKey::Buff(_) => Phase::Buffs,
        EffectKey::EnemyDebuff(_) | EffectKey::SelfDebuff(_) => Phase::Debuffs,
        _ => Phase::PostEffect,
    }
}
