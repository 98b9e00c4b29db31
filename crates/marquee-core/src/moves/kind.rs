//! Move identity and the closed move taxonomy.
//!
//! Every move, signature or genre, resolves to one [`MoveKind`] variant that
//! carries its own numeric parameters. The executor dispatches on the variant
//! with a single `match`, so adding a family means adding a variant and the
//! compiler points at every place that must handle it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::combatant::StatId;
use crate::target::{BaseTarget, TargetSpec};

// =============================================================================
// Genre / Tier
// =============================================================================

/// Film genre assigned to a party member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Genre {
    /// Self ATK buff plus an immediate hit.
    Action,
    /// Team buffs plus a team strike.
    Adventure,
    /// Self heal plus DEF buff.
    Drama,
    /// Enemy ATK debuff, team DEF buff and team heal.
    Comedy,
    /// Boosted hit plus enemy DEF debuff.
    Horror,
    /// Next-hit vulnerability.
    Thriller,
    /// Enemy DEF/ATK debuffs.
    Mystery,
    /// Self ATK buff, self DEF debuff and an immediate hit.
    Scifi,
    /// Ally shield.
    Fantasy,
    /// Team damage reduction, sometimes with a hit.
    Animation,
    /// Enemy debuffs, sometimes with a hit.
    Crime,
    /// Ally heal.
    Romance,
    /// Team ATK buff, team heal and a team strike.
    Musical,
    /// Enemy debuffs, sometimes with a heavy hit.
    Documentary,
}

impl Genre {
    /// Every genre in table order.
    pub const ALL: [Self; 14] = [
        Self::Action,
        Self::Adventure,
        Self::Drama,
        Self::Comedy,
        Self::Horror,
        Self::Thriller,
        Self::Mystery,
        Self::Scifi,
        Self::Fantasy,
        Self::Animation,
        Self::Crime,
        Self::Romance,
        Self::Musical,
        Self::Documentary,
    ];

    /// Uppercase table key (`ACTION`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Action => "ACTION",
            Self::Adventure => "ADVENTURE",
            Self::Drama => "DRAMA",
            Self::Comedy => "COMEDY",
            Self::Horror => "HORROR",
            Self::Thriller => "THRILLER",
            Self::Mystery => "MYSTERY",
            Self::Scifi => "SCIFI",
            Self::Fantasy => "FANTASY",
            Self::Animation => "ANIMATION",
            Self::Crime => "CRIME",
            Self::Romance => "ROMANCE",
            Self::Musical => "MUSICAL",
            Self::Documentary => "DOCUMENTARY",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = String;

    /// Case-insensitive; punctuation and spaces are ignored (`Sci-Fi`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_uppercase())
            .collect();
        let folded = match folded.as_str() {
            "SCIENCEFICTION" => "SCIFI",
            "ANIMATED" => "ANIMATION",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|genre| genre.as_str() == folded)
            .ok_or_else(|| format!("unknown genre `{s}`"))
    }
}

/// Which of a genre's two moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Move granted by the first genre.
    Primary,
    /// Weaker move granted by the second genre.
    Secondary,
}

impl Tier {
    /// Lowercase key fragment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

// =============================================================================
// MoveKey / MoveSource
// =============================================================================

/// Stable move identity used for cooldowns and override lookup.
///
/// # Example
///
/// ```
/// use marquee_core::moves::{Genre, MoveKey, Tier};
///
/// assert_eq!(MoveKey::signature("jaws", "bigger_boat").as_str(), "sig:jaws:bigger_boat");
/// assert_eq!(MoveKey::genre(Genre::Action, Tier::Primary).as_str(), "genre:ACTION:primary");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveKey(String);

impl MoveKey {
    /// Key for a signature move.
    #[must_use]
    pub fn signature(identity: &str, id: &str) -> Self {
        Self(format!("sig:{identity}:{id}"))
    }

    /// Key for a genre move.
    #[must_use]
    pub fn genre(genre: Genre, tier: Tier) -> Self {
        Self(format!("genre:{}:{}", genre.as_str(), tier.as_str()))
    }

    /// Wraps an already-formatted key.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MoveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a move came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum MoveSource {
    /// Authored per identity.
    Signature,
    /// Granted by an assigned genre.
    Genre {
        /// The granting genre.
        genre: Genre,
        /// Primary or secondary.
        tier: Tier,
    },
}

// =============================================================================
// Parameters
// =============================================================================

/// A stat and a fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatChange {
    /// Affected stat.
    pub stat: StatId,
    /// Fraction, always non-negative.
    pub pct: f64,
}

impl StatChange {
    /// Creates a change; the fraction's sign is dropped.
    #[must_use]
    pub fn new(stat: StatId, pct: f64) -> Self {
        Self {
            stat,
            pct: pct.abs(),
        }
    }
}

/// A fraction with a duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedPct {
    /// Fraction.
    pub pct: f64,
    /// Turns.
    pub turns: u32,
}

/// Barrier granted by a self buff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShieldSpec {
    /// Fixed amount.
    Flat(i32),
    /// Fraction of the actor's max HP, clamped to `[0, 1]`.
    MaxHpPct(f64),
}

/// One step of a compound move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubEffect {
    /// What the step does.
    pub kind: MoveKind,
    /// Where the step is aimed.
    pub target: TargetSpec,
}

// =============================================================================
// Genre effect data
// =============================================================================

/// A genre percentage, optionally scaled by the actor's rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaledPct {
    /// Base fraction.
    pub value: f64,
    /// Multiply by the rating multiplier when true.
    #[serde(default)]
    pub imdb_scale: bool,
    /// Duration, where the component has one.
    #[serde(default)]
    pub turns: Option<u32>,
}

impl ScaledPct {
    /// Returns the fraction after rating scaling.
    #[must_use]
    pub fn scaled(&self, rating_multiplier: f64) -> f64 {
        if self.imdb_scale {
            self.value * rating_multiplier
        } else {
            self.value
        }
    }

    /// Returns the authored duration or `fallback`, never below 1.
    #[must_use]
    pub fn turns_or(&self, fallback: u32) -> u32 {
        self.turns.unwrap_or(fallback).max(1)
    }
}

const fn enabled() -> bool {
    true
}

/// Immediate hit rolled within a multiplier range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitRoll {
    /// Whether the hit lands at all.
    #[serde(default = "enabled")]
    pub enabled: bool,
    /// Lowest multiplier (default 1.5).
    #[serde(default)]
    pub min_mult: Option<f64>,
    /// Highest multiplier (default 2.0).
    #[serde(default)]
    pub max_mult: Option<f64>,
}

/// Combined party strike rolled within a total multiplier range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStrikeRoll {
    /// Whether the strike happens at all.
    #[serde(default = "enabled")]
    pub enabled: bool,
    /// Lowest total multiplier.
    #[serde(default)]
    pub total_min_mult: Option<f64>,
    /// Highest total multiplier.
    #[serde(default)]
    pub total_max_mult: Option<f64>,
    /// Share split rule; only `sqrt` exists.
    #[serde(default)]
    pub split: Option<String>,
}

/// Data-driven genre move.
///
/// Each present component is applied in a fixed order by the executor. Absent
/// components are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct GenreEffect {
    pub atk_buff_pct: Option<ScaledPct>,
    pub def_buff_pct: Option<ScaledPct>,
    /// Actor's own DEF debuff.
    pub def_debuff_pct: Option<ScaledPct>,
    pub heal_self_max_hp_pct: Option<ScaledPct>,
    pub team_atk_buff_pct: Option<ScaledPct>,
    pub team_def_buff_pct: Option<ScaledPct>,
    pub team_heal_max_hp_pct: Option<ScaledPct>,
    pub team_damage_reduction_pct: Option<ScaledPct>,
    pub enemy_atk_debuff_pct: Option<ScaledPct>,
    pub enemy_def_debuff_pct: Option<ScaledPct>,
    pub next_hit_vuln_pct: Option<ScaledPct>,
    pub heal_ally_max_hp_pct: Option<ScaledPct>,
    pub shield_ally_max_hp_pct: Option<ScaledPct>,
    /// One-hit ATK boost; implies a plain hit when no roll is authored.
    pub pre_hit_atk_buff_pct: Option<ScaledPct>,
    pub immediate_hit: Option<HitRoll>,
    pub team_strike: Option<TeamStrikeRoll>,
}

impl GenreEffect {
    /// Returns true when a component needs a chosen ally.
    #[must_use]
    pub const fn needs_ally(&self) -> bool {
        self.heal_ally_max_hp_pct.is_some() || self.shield_ally_max_hp_pct.is_some()
    }

    /// Returns true when the move lands a direct hit on the enemy.
    #[must_use]
    pub fn lands_hit(&self) -> bool {
        self.immediate_hit.is_some_and(|hit| hit.enabled) || self.pre_hit_atk_buff_pct.is_some()
    }

    /// Returns true when the move includes a team strike.
    #[must_use]
    pub fn has_team_strike(&self) -> bool {
        self.team_strike.as_ref().is_some_and(|strike| strike.enabled)
    }
}

// =============================================================================
// MoveKind
// =============================================================================

/// What a move does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MoveKind {
    /// Single hit on the enemy, optionally lowering the actor's DEF.
    DamageEnemy {
        /// ATK multiplier.
        multiplier: f64,
        /// DEF debuff the actor takes with the hit.
        self_debuff: Option<TimedPct>,
    },
    /// Every living party member strikes for a share of a rolled total.
    TeamStrike {
        /// Lowest total multiplier.
        min_mult: f64,
        /// Highest total multiplier.
        max_mult: f64,
    },
    /// Fixed heal on the actor.
    HealSelf {
        /// HP restored.
        amount: i32,
    },
    /// Fixed heal on one ally.
    HealAlly {
        /// HP restored.
        amount: i32,
    },
    /// Fixed heal on every living party member.
    HealTeam {
        /// HP restored per member.
        amount: i32,
    },
    /// Heals a fraction of missing HP on the actor, reviving if down.
    HealSelfMissing {
        /// Fraction of missing HP.
        heal_pct: f64,
        /// Fraction of max HP on revive (defaults to `heal_pct`).
        revive_pct: Option<f64>,
    },
    /// Heals a fraction of missing HP on one ally, reviving if down.
    HealAllyMissing {
        /// Fraction of missing HP.
        heal_pct: f64,
        /// Fraction of max HP on revive (defaults to `heal_pct`).
        revive_pct: Option<f64>,
    },
    /// Heals a fraction of missing HP on the whole party, reviving the downed.
    HealTeamMissing {
        /// Fraction of missing HP.
        heal_pct: f64,
        /// Fraction of max HP on revive (defaults to `heal_pct`).
        revive_pct: Option<f64>,
    },
    /// Heals living members by missing fraction and buffs them.
    HealTeamBuff {
        /// Fraction of missing HP.
        heal_pct: f64,
        /// Buffs applied to each living member.
        changes: Vec<StatChange>,
        /// Buff duration.
        turns: u32,
    },
    /// Buffs the actor, optionally adding a barrier.
    SelfBuff {
        /// Buffs.
        changes: Vec<StatChange>,
        /// Buff duration.
        turns: u32,
        /// Optional barrier.
        shield: Option<ShieldSpec>,
    },
    /// Buffs every living party member.
    BuffParty {
        /// Buffs.
        changes: Vec<StatChange>,
        /// Buff duration.
        turns: u32,
    },
    /// Debuffs the enemy.
    DebuffEnemy {
        /// Debuffs.
        changes: Vec<StatChange>,
        /// Debuff duration.
        turns: u32,
    },
    /// Debuffs the actor.
    DebuffSelf {
        /// Debuffs.
        changes: Vec<StatChange>,
        /// Debuff duration.
        turns: u32,
    },
    /// Named affliction, rolled against a chance.
    Status {
        /// Affliction name as authored.
        status: String,
        /// Authored duration; `None` falls back to `prone` or the default.
        turns: Option<u32>,
        /// Probability in `[0, 1]`.
        chance: f64,
        /// Next-hit vulnerability applied with the affliction.
        vulnerability: Option<TimedPct>,
    },
    /// Data-driven genre move.
    Genre(GenreEffect),
    /// Ordered list of sub-effects.
    Compound {
        /// Steps in execution order.
        steps: Vec<SubEffect>,
    },
}

impl MoveKind {
    /// Short label naming the family.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::DamageEnemy { .. } => "damageEnemy",
            Self::TeamStrike { .. } => "teamStrike",
            Self::HealSelf { .. } => "healSelf",
            Self::HealAlly { .. } => "healAlly",
            Self::HealTeam { .. } => "healTeam",
            Self::HealSelfMissing { .. } => "healSelfMissingPct",
            Self::HealAllyMissing { .. } => "healAllyMissingPct",
            Self::HealTeamMissing { .. } => "healTeamMissingPct",
            Self::HealTeamBuff { .. } => "healTeamBuff",
            Self::SelfBuff { .. } => "selfBuff",
            Self::BuffParty { .. } => "buffParty",
            Self::DebuffEnemy { .. } => "debuffEnemy",
            Self::DebuffSelf { .. } => "debuffSelf",
            Self::Status { .. } => "status",
            Self::Genre(_) => "genre",
            Self::Compound { .. } => "compound",
        }
    }

    /// Target used when authoring data names none.
    ///
    /// Compound moves collect their steps' bases in the order self, ally,
    /// team, enemy.
    #[must_use]
    pub fn default_target(&self) -> TargetSpec {
        match self {
            Self::DamageEnemy { .. }
            | Self::DebuffEnemy { .. }
            | Self::Status { .. }
            | Self::Genre(_) => TargetSpec::new(BaseTarget::Enemy),
            Self::TeamStrike { .. } => TargetSpec::from_tags(["team", "teamstrike"]),
            Self::HealSelf { .. }
            | Self::HealSelfMissing { .. }
            | Self::SelfBuff { .. }
            | Self::DebuffSelf { .. } => TargetSpec::new(BaseTarget::SelfTarget),
            Self::HealAlly { .. } | Self::HealAllyMissing { .. } => {
                TargetSpec::new(BaseTarget::Ally)
            }
            Self::HealTeam { .. }
            | Self::HealTeamMissing { .. }
            | Self::HealTeamBuff { .. }
            | Self::BuffParty { .. } => TargetSpec::new(BaseTarget::Team),
            Self::Compound { steps } => {
                let order = [
                    BaseTarget::SelfTarget,
                    BaseTarget::Ally,
                    BaseTarget::Team,
                    BaseTarget::Enemy,
                ];
                let tags = order
                    .into_iter()
                    .filter(|base| steps.iter().any(|step| step.target.bases().contains(base)))
                    .map(BaseTarget::as_str);
                TargetSpec::from_tags(tags)
            }
        }
    }

    /// Returns true when the kind needs a chosen ally index.
    #[must_use]
    pub fn needs_ally(&self, target: &TargetSpec) -> bool {
        match self {
            Self::HealAlly { .. } | Self::HealAllyMissing { .. } => true,
            Self::Status { .. } => target.base() == BaseTarget::Ally,
            Self::Genre(effect) => effect.needs_ally(),
            _ => false,
        }
    }
}
