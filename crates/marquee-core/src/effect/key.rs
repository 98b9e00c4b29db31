//! Effect keys.
//!
//! An [`EffectKey`] names one entry in an effect map. Keys fall into three
//! classes (see [`KeyClass`]):
//!
//! - **Rendered** keys produce a narration line when their value is truthy.
//! - **Alias** keys are shorthand spellings (`dmg`, `heal`, `shield`,
//!   `teamDmg`) folded into a rendered key before ranking.
//! - **Meta** keys (turn counters, `revivedHp`, `teamRevive`, `...Applied`
//!   flags) are bookkeeping and never render.
//!
//! Keys serialize as their camelCase string form so authored override tables
//! and logged results read naturally.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combatant::StatId;

/// Which turn counter a meta key tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TurnCounter {
    /// Turns on a stat buff.
    Buff(StatId),
    /// Turns on an enemy stat debuff.
    EnemyDebuff(StatId),
    /// Turns on the actor's own stat debuff.
    SelfDebuff(StatId),
    /// Turns on damage reduction.
    DamageReduction,
    /// Turns on next-hit vulnerability.
    NextHitVuln,
    /// Turns on an applied affliction.
    Status,
}

/// Rendering class of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyClass {
    /// Produces a line when truthy.
    Rendered,
    /// Shorthand for the contained canonical key.
    Alias(EffectKey),
    /// Never rendered.
    Meta,
}

/// Name of one effect entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum EffectKey {
    /// Damage dealt to the enemy.
    DamageDealt,
    /// HP restored to a single target.
    HealedHp,
    /// HP restored across the team.
    TeamHeal,
    /// A downed target came back.
    Revived,
    /// Number of team members revived.
    RevivedCount,
    /// Barrier added.
    ShieldAdded,
    /// Damage reduction fraction granted.
    DamageReductionPct,
    /// Stat buff fraction.
    Buff(StatId),
    /// Enemy stat debuff fraction.
    EnemyDebuff(StatId),
    /// Actor's own stat debuff fraction.
    SelfDebuff(StatId),
    /// Next-hit vulnerability fraction on the enemy.
    NextHitVulnPct,
    /// Name of an applied affliction.
    StatusApplied,
    /// Alias of [`EffectKey::DamageDealt`].
    Dmg,
    /// Alias of [`EffectKey::HealedHp`].
    Heal,
    /// Alias of [`EffectKey::ShieldAdded`].
    Shield,
    /// Alias of [`EffectKey::DamageDealt`] used by team strikes.
    TeamDmg,
    /// HP a revived target came back with.
    RevivedHp,
    /// At least one team member was revived.
    TeamRevive,
    /// A turn counter.
    Turns(TurnCounter),
    /// Any other bookkeeping key (`...Turns`, `...Applied`).
    Meta(String),
    /// Unrecognized key; rendered with a generic template.
    Custom(String),
}

impl EffectKey {
    /// Parses a camelCase key. Never fails: unknown keys become
    /// [`EffectKey::Meta`] or [`EffectKey::Custom`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        match s {
            "damageDealt" => return Self::DamageDealt,
            "healedHp" => return Self::HealedHp,
            "teamHeal" => return Self::TeamHeal,
            "revived" => return Self::Revived,
            "revivedCount" => return Self::RevivedCount,
            "shieldAdded" => return Self::ShieldAdded,
            "damageReductionPct" => return Self::DamageReductionPct,
            "nextHitVulnPct" => return Self::NextHitVulnPct,
            "statusApplied" => return Self::StatusApplied,
            "dmg" => return Self::Dmg,
            "heal" => return Self::Heal,
            "shield" => return Self::Shield,
            "teamDmg" => return Self::TeamDmg,
            "revivedHp" => return Self::RevivedHp,
            "teamRevive" => return Self::TeamRevive,
            "damageReductionTurns" => return Self::Turns(TurnCounter::DamageReduction),
            "nextHitVulnTurns" => return Self::Turns(TurnCounter::NextHitVuln),
            "statusTurns" => return Self::Turns(TurnCounter::Status),
            _ => {}
        }
        if let Some(key) = Self::parse_stat_key(s) {
            return key;
        }
        if s.ends_with("Turns") || s.ends_with("Applied") {
            Self::Meta(s.to_string())
        } else {
            Self::Custom(s.to_string())
        }
    }

    fn parse_stat_key(s: &str) -> Option<Self> {
        let capital = |frag: &str| {
            StatId::ALL
                .into_iter()
                .find(|stat| stat.capitalized() == frag)
        };
        if let Some(rest) = s.strip_prefix("enemy") {
            if let Some(stat) = rest.strip_suffix("DebuffPct").and_then(capital) {
                return Some(Self::EnemyDebuff(stat));
            }
            if let Some(stat) = rest.strip_suffix("DebuffTurns").and_then(capital) {
                return Some(Self::Turns(TurnCounter::EnemyDebuff(stat)));
            }
        }
        if let Some(rest) = s.strip_prefix("self") {
            if let Some(stat) = rest.strip_suffix("DebuffPct").and_then(capital) {
                return Some(Self::SelfDebuff(stat));
            }
            if let Some(stat) = rest.strip_suffix("DebuffTurns").and_then(capital) {
                return Some(Self::Turns(TurnCounter::SelfDebuff(stat)));
            }
        }
        if let Some(stat) = s.strip_suffix("BuffPct").and_then(StatId::from_fragment) {
            return Some(Self::Buff(stat));
        }
        if let Some(stat) = s.strip_suffix("BuffTurns").and_then(StatId::from_fragment) {
            return Some(Self::Turns(TurnCounter::Buff(stat)));
        }
        None
    }

    /// Returns the key's rendering class.
    #[must_use]
    pub fn class(&self) -> KeyClass {
        match self {
            Self::Dmg | Self::TeamDmg => KeyClass::Alias(Self::DamageDealt),
            Self::Heal => KeyClass::Alias(Self::HealedHp),
            Self::Shield => KeyClass::Alias(Self::ShieldAdded),
            Self::RevivedHp | Self::TeamRevive | Self::Turns(_) | Self::Meta(_) => KeyClass::Meta,
            _ => KeyClass::Rendered,
        }
    }

    /// Returns the canonical key (aliases resolved, others unchanged).
    #[must_use]
    pub fn canonical(&self) -> Self {
        match self.class() {
            KeyClass::Alias(target) => target,
            _ => self.clone(),
        }
    }

    /// Returns true for keys that never render.
    #[must_use]
    pub fn is_meta(&self) -> bool {
        self.class() == KeyClass::Meta
    }

    /// Returns true for keys whose values sum when results merge.
    #[must_use]
    pub const fn is_additive(&self) -> bool {
        matches!(
            self,
            Self::DamageDealt
                | Self::HealedHp
                | Self::TeamHeal
                | Self::ShieldAdded
                | Self::RevivedCount
                | Self::Dmg
                | Self::Heal
                | Self::Shield
                | Self::TeamDmg
        )
    }
}

impl fmt::Display for EffectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DamageDealt => f.write_str("damageDealt"),
            Self::HealedHp => f.write_str("healedHp"),
            Self::TeamHeal => f.write_str("teamHeal"),
            Self::Revived => f.write_str("revived"),
            Self::RevivedCount => f.write_str("revivedCount"),
            Self::ShieldAdded => f.write_str("shieldAdded"),
            Self::DamageReductionPct => f.write_str("damageReductionPct"),
            Self::Buff(stat) => write!(f, "{}BuffPct", stat.as_str()),
            Self::EnemyDebuff(stat) => write!(f, "enemy{}DebuffPct", stat.capitalized()),
            Self::SelfDebuff(stat) => write!(f, "self{}DebuffPct", stat.capitalized()),
            Self::NextHitVulnPct => f.write_str("nextHitVulnPct"),
            Self::StatusApplied => f.write_str("statusApplied"),
            Self::Dmg => f.write_str("dmg"),
            Self::Heal => f.write_str("heal"),
            Self::Shield => f.write_str("shield"),
            Self::TeamDmg => f.write_str("teamDmg"),
            Self::RevivedHp => f.write_str("revivedHp"),
            Self::TeamRevive => f.write_str("teamRevive"),
            Self::Turns(counter) => match counter {
                TurnCounter::Buff(stat) => write!(f, "{}BuffTurns", stat.as_str()),
                TurnCounter::EnemyDebuff(stat) => {
                    write!(f, "enemy{}DebuffTurns", stat.capitalized())
                }
                TurnCounter::SelfDebuff(stat) => {
                    write!(f, "self{}DebuffTurns", stat.capitalized())
                }
                TurnCounter::DamageReduction => f.write_str("damageReductionTurns"),
                TurnCounter::NextHitVuln => f.write_str("nextHitVulnTurns"),
                TurnCounter::Status => f.write_str("statusTurns"),
            },
            Self::Meta(name) | Self::Custom(name) => f.write_str(name),
        }
    }
}

impl From<EffectKey> for String {
    fn from(key: EffectKey) -> Self {
        key.to_string()
    }
}

impl From<String> for EffectKey {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for EffectKey {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}
