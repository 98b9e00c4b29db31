//! Authoring-table shapes and their conversion into [`MoveKind`].
//!
//! Signature moves are authored loosely: a `kind` string plus whichever
//! numeric fields that kind reads, all optional. Conversion applies the game's
//! defaults once so the executor only ever sees fully specified parameters.
//!
//! # Defaults
//!
//! | field | default |
//! |---|---|
//! | damage multiplier | 1.5 |
//! | self-debuff turns | 2 |
//! | fixed heal amount | 30 |
//! | missing-heal pct | self 0.5, ally 0.75, team 0.5 |
//! | buff/debuff turns | 2 (floored, at least 1) |
//! | status chance | 1.0 |
//! | vulnerability turns | 1 |
//! | team strike range | from [`EngineConfig`] |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::kind::{GenreEffect, MoveKind, ShieldSpec, StatChange, SubEffect, TimedPct};
use crate::combatant::StatId;
use crate::config::EngineConfig;
use crate::effect::EffectKey;
use crate::narration::Phase;
use crate::target::{TargetInput, TargetSpec};

/// Failure while loading authoring tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// The JSON did not parse or did not match the table shape.
    #[error("malformed move table: {0}")]
    Json(#[from] serde_json::Error),
    /// A signature move named a kind the engine does not know.
    #[error("unknown move kind `{kind}`")]
    UnknownKind {
        /// The authored kind string.
        kind: String,
    },
    /// A genre table key did not name a genre.
    #[error("unknown genre `{name}`")]
    UnknownGenre {
        /// The authored key.
        name: String,
    },
    /// A compound move authored no steps.
    #[error("compound move `{id}` has no steps")]
    EmptyCompound {
        /// Move id.
        id: String,
    },
}

/// One authored effect: a kind string plus optional parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct EffectSpec {
    /// Kind name (`damageEnemy`, `SELF_BUFF`, `dualEffect`, ...).
    pub kind: String,
    pub target: Option<TargetInput>,
    pub power_multiplier: Option<f64>,
    pub amount: Option<f64>,
    #[serde(alias = "healPct")]
    pub missing_heal_pct: Option<f64>,
    pub revive_pct: Option<f64>,
    #[serde(alias = "atkBuffPct", alias = "atkDebuffPct")]
    pub atk_pct: Option<f64>,
    #[serde(alias = "defBuffPct", alias = "defDebuffPct")]
    pub def_pct: Option<f64>,
    pub crit_pct: Option<f64>,
    pub eva_pct: Option<f64>,
    pub spd_pct: Option<f64>,
    pub acc_pct: Option<f64>,
    pub turns: Option<f64>,
    pub shield: Option<f64>,
    pub shield_pct: Option<f64>,
    pub self_def_debuff_pct: Option<f64>,
    pub self_def_debuff_turns: Option<f64>,
    pub status: Option<String>,
    pub chance: Option<f64>,
    pub next_hit_vuln_pct: Option<f64>,
    pub next_hit_vuln_turns: Option<f64>,
    pub total_min_mult: Option<f64>,
    pub total_max_mult: Option<f64>,
    /// Steps of a compound move.
    pub effects: Vec<EffectSpec>,
}

/// Family named by an authored kind string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KindName {
    Damage,
    TeamStrike,
    HealSelf,
    HealAlly,
    HealTeam,
    HealSelfMissing,
    HealAllyMissing,
    HealTeamMissing,
    HealTeamBuff,
    SelfBuff,
    BuffParty,
    DebuffEnemy,
    DebuffSelf,
    Status,
    Compound,
}

impl KindName {
    fn parse(raw: &str) -> Option<Self> {
        let name = match raw.trim() {
            "damageEnemy" | "HIT" | "hit" => Self::Damage,
            "teamStrike" => Self::TeamStrike,
            "healSelf" => Self::HealSelf,
            "healAlly" => Self::HealAlly,
            "healTeam" => Self::HealTeam,
            "healSelfMissingPct" => Self::HealSelfMissing,
            "healAllyMissingPct" => Self::HealAllyMissing,
            "healTeamMissingPct" => Self::HealTeamMissing,
            "healTeamBuff" => Self::HealTeamBuff,
            "SELF_BUFF" | "selfBuff" => Self::SelfBuff,
            "buffParty" => Self::BuffParty,
            "ENEMY_DEBUFF" | "debuffEnemy" => Self::DebuffEnemy,
            "debuffSelf" => Self::DebuffSelf,
            "STATUS" | "status" | "statusEnemy" => Self::Status,
            "dualEffect" | "compound" => Self::Compound,
            _ => return None,
        };
        Some(name)
    }
}

/// Floors an authored turn count, never below 1.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn turns_or(raw: Option<f64>, fallback: u32) -> u32 {
    match raw {
        Some(t) if t.is_finite() => t.floor().max(1.0).min(f64::from(u32::MAX)) as u32,
        _ => fallback.max(1),
    }
}

fn pct(raw: Option<f64>) -> f64 {
    raw.filter(|p| p.is_finite()).map_or(0.0, f64::abs)
}

impl EffectSpec {
    fn stat_changes(&self) -> Vec<StatChange> {
        [
            (StatId::Atk, self.atk_pct),
            (StatId::Def, self.def_pct),
            (StatId::Crit, self.crit_pct),
            (StatId::Eva, self.eva_pct),
            (StatId::Spd, self.spd_pct),
            (StatId::Acc, self.acc_pct),
        ]
        .into_iter()
        .map(|(stat, raw)| StatChange::new(stat, pct(raw)))
        .filter(|change| change.pct > 0.0)
        .collect()
    }

    /// Converts this authored effect into a [`MoveKind`].
    ///
    /// # Arguments
    ///
    /// * `id` - Owning move id, used in error messages
    /// * `config` - Supplies the team strike range
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownKind`] for an unrecognized kind string and
    /// [`TableError::EmptyCompound`] for a compound move without steps.
    pub fn to_kind(&self, id: &str, config: &EngineConfig) -> Result<MoveKind, TableError> {
        let name = KindName::parse(&self.kind).ok_or_else(|| TableError::UnknownKind {
            kind: self.kind.clone(),
        })?;
        let amount = || {
            crate::combatant::round_to_i32(self.amount.filter(|a| a.is_finite()).unwrap_or(30.0))
        };
        let turns = turns_or(self.turns, 2);
        let kind = match name {
            KindName::Damage => MoveKind::DamageEnemy {
                multiplier: self.power_multiplier.unwrap_or(1.5),
                self_debuff: self
                    .self_def_debuff_pct
                    .filter(|p| *p > 0.0)
                    .map(|p| TimedPct {
                        pct: p,
                        turns: turns_or(self.self_def_debuff_turns, 2),
                    }),
            },
            KindName::TeamStrike => MoveKind::TeamStrike {
                min_mult: self.total_min_mult.unwrap_or(config.team_strike_min),
                max_mult: self.total_max_mult.unwrap_or(config.team_strike_max),
            },
            KindName::HealSelf => MoveKind::HealSelf { amount: amount() },
            KindName::HealAlly => MoveKind::HealAlly { amount: amount() },
            KindName::HealTeam => MoveKind::HealTeam { amount: amount() },
            KindName::HealSelfMissing => MoveKind::HealSelfMissing {
                heal_pct: self.missing_heal_pct.unwrap_or(0.5),
                revive_pct: self.revive_pct,
            },
            KindName::HealAllyMissing => MoveKind::HealAllyMissing {
                heal_pct: self.missing_heal_pct.unwrap_or(0.75),
                revive_pct: self.revive_pct,
            },
            KindName::HealTeamMissing => MoveKind::HealTeamMissing {
                heal_pct: self.missing_heal_pct.unwrap_or(0.5),
                revive_pct: self.revive_pct,
            },
            KindName::HealTeamBuff => MoveKind::HealTeamBuff {
                heal_pct: self.missing_heal_pct.unwrap_or(0.5),
                changes: self.stat_changes(),
                turns,
            },
            KindName::SelfBuff => MoveKind::SelfBuff {
                changes: self.stat_changes(),
                turns,
                shield: match (self.shield, self.shield_pct) {
                    (Some(flat), _) => Some(ShieldSpec::Flat(crate::combatant::round_to_i32(flat))),
                    (None, Some(p)) => Some(ShieldSpec::MaxHpPct(p.clamp(0.0, 1.0))),
                    (None, None) => None,
                },
            },
            KindName::BuffParty => MoveKind::BuffParty {
                changes: self.stat_changes(),
                turns,
            },
            KindName::DebuffEnemy => MoveKind::DebuffEnemy {
                changes: self.stat_changes(),
                turns,
            },
            KindName::DebuffSelf => MoveKind::DebuffSelf {
                changes: self.stat_changes(),
                turns,
            },
            KindName::Status => MoveKind::Status {
                status: self.status.clone().unwrap_or_default().trim().to_string(),
                turns: self.turns.map(|t| turns_or(Some(t), 1)),
                chance: self.chance.unwrap_or(1.0).clamp(0.0, 1.0),
                vulnerability: Some(pct(self.next_hit_vuln_pct))
                    .filter(|p| *p > 0.0)
                    .map(|p| TimedPct {
                        pct: p,
                        turns: turns_or(self.next_hit_vuln_turns, 1),
                    }),
            },
            KindName::Compound => {
                if self.effects.is_empty() {
                    return Err(TableError::EmptyCompound { id: id.to_string() });
                }
                let steps = self
                    .effects
                    .iter()
                    .map(|step| step.to_sub_effect(id, config))
                    .collect::<Result<Vec<_>, _>>()?;
                MoveKind::Compound { steps }
            }
        };
        Ok(kind)
    }

    /// Converts this authored effect into a compound step.
    ///
    /// # Errors
    ///
    /// Same as [`EffectSpec::to_kind`].
    pub fn to_sub_effect(&self, id: &str, config: &EngineConfig) -> Result<SubEffect, TableError> {
        let kind = self.to_kind(id, config)?;
        let target = self.resolve_target(&kind);
        Ok(SubEffect { kind, target })
    }

    /// Authored target normalized, or the kind's default.
    #[must_use]
    pub fn resolve_target(&self, kind: &MoveKind) -> TargetSpec {
        match &self.target {
            Some(input) => {
                let spec = TargetSpec::from_input(input);
                if spec.tags().is_empty() {
                    kind.default_target()
                } else {
                    spec
                }
            }
            None => kind.default_target(),
        }
    }
}

/// A signature move as authored for one identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureMove {
    /// Identifier, unique per identity.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Menu description.
    #[serde(default)]
    pub description: String,
    /// Cooldown; the engine default applies when absent.
    #[serde(default)]
    pub cooldown_turns: Option<u32>,
    /// Forces effect keys into narration phases.
    #[serde(default)]
    pub phase: BTreeMap<EffectKey, Phase>,
    /// The effect itself.
    #[serde(flatten)]
    pub effect: EffectSpec,
}

/// One genre's two moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreDefinition {
    /// Target shared by both moves.
    pub target: TargetInput,
    /// Name of the primary move.
    pub primary_name: String,
    /// Name of the secondary move.
    pub secondary_name: String,
    /// Menu description shared by both moves.
    #[serde(default)]
    pub description: String,
    /// Primary move components.
    pub primary: GenreEffect,
    /// Secondary move components.
    pub secondary: GenreEffect,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::BaseTarget;

    fn spec(json: &str) -> EffectSpec {
        serde_json::from_str(json).unwrap()
    }

    mod default_tests {
        use super::*;

        #[test]
        fn damage_defaults_to_one_and_a_half() {
            let kind = spec(r#"{"kind":"damageEnemy"}"#)
                .to_kind("x", &EngineConfig::default())
                .unwrap();
            assert_eq!(
                kind,
                MoveKind::DamageEnemy {
                    multiplier: 1.5,
                    self_debuff: None
                }
            );
        }

        #[test]
        fn self_debuff_turns_default_to_two() {
            let kind = spec(r#"{"kind":"HIT","powerMultiplier":2.0,"selfDefDebuffPct":0.2}"#)
                .to_kind("x", &EngineConfig::default())
                .unwrap();
            let MoveKind::DamageEnemy { self_debuff, .. } = kind else {
                panic!("expected damage");
            };
            assert_eq!(self_debuff.unwrap().turns, 2);
        }

        #[test]
        fn missing_heal_pcts_differ_by_target() {
            let config = EngineConfig::default();
            let ally = spec(r#"{"kind":"healAllyMissingPct"}"#).to_kind("x", &config).unwrap();
            let team = spec(r#"{"kind":"healTeamMissingPct"}"#).to_kind("x", &config).unwrap();
            assert!(matches!(ally, MoveKind::HealAllyMissing { heal_pct, .. } if (heal_pct - 0.75).abs() < 1e-9));
            assert!(matches!(team, MoveKind::HealTeamMissing { heal_pct, .. } if (heal_pct - 0.5).abs() < 1e-9));
        }

        #[test]
        fn pcts_are_absolute_and_turns_floored() {
            let kind = spec(r#"{"kind":"ENEMY_DEBUFF","atkPct":-0.2,"defDebuffPct":0.1,"turns":2.9}"#)
                .to_kind("x", &EngineConfig::default())
                .unwrap();
            let MoveKind::DebuffEnemy { changes, turns } = kind else {
                panic!("expected debuff");
            };
            assert_eq!(turns, 2);
            assert_eq!(changes.len(), 2);
            assert!((changes[0].pct - 0.2).abs() < 1e-9);
            assert_eq!(changes[1].stat, StatId::Def);
        }

        #[test]
        fn status_chance_defaults_to_certain() {
            let kind = spec(r#"{"kind":"statusEnemy","status":"Stunned","nextHitVulnPct":0.2}"#)
                .to_kind("x", &EngineConfig::default())
                .unwrap();
            let MoveKind::Status {
                chance,
                turns,
                vulnerability,
                ..
            } = kind
            else {
                panic!("expected status");
            };
            assert!((chance - 1.0).abs() < f64::EPSILON);
            assert_eq!(turns, None);
            assert_eq!(vulnerability.unwrap().turns, 1);
        }
    }

    mod shape_tests {
        use super::*;

        #[test]
        fn unknown_kind_is_an_error() {
            let err = spec(r#"{"kind":"summonKaiju"}"#)
                .to_kind("kaiju", &EngineConfig::default())
                .unwrap_err();
            assert!(matches!(err, TableError::UnknownKind { kind } if kind == "summonKaiju"));
        }

        #[test]
        fn empty_compound_is_an_error() {
            let err = spec(r#"{"kind":"dualEffect"}"#)
                .to_kind("combo", &EngineConfig::default())
                .unwrap_err();
            assert!(matches!(err, TableError::EmptyCompound { .. }));
        }

        #[test]
        fn compound_steps_keep_their_targets() {
            let kind = spec(
                r#"{"kind":"dualEffect","effects":[
                    {"kind":"damageEnemy","powerMultiplier":1.2},
                    {"kind":"healSelf","amount":15,"target":"self"}
                ]}"#,
            )
            .to_kind("x", &EngineConfig::default())
            .unwrap();
            let MoveKind::Compound { steps } = kind else {
                panic!("expected compound");
            };
            assert_eq!(steps[0].target.base(), BaseTarget::Enemy);
            assert_eq!(steps[1].target.base(), BaseTarget::SelfTarget);
        }

        #[test]
        fn signature_move_flattens_effect() {
            let mv: SignatureMove = serde_json::from_str(
                r#"{"id":"bigger_boat","name":"Bigger Boat","kind":"SELF_BUFF",
                    "defPct":0.3,"shieldPct":0.1,"phase":{"shieldAdded":"postFx"}}"#,
            )
            .unwrap();
            assert_eq!(mv.effect.kind, "SELF_BUFF");
            assert_eq!(mv.phase.get(&EffectKey::ShieldAdded), Some(&Phase::PostEffect));
            let kind = mv.effect.to_kind(&mv.id, &EngineConfig::default()).unwrap();
            assert!(matches!(
                kind,
                MoveKind::SelfBuff {
                    shield: Some(ShieldSpec::MaxHpPct(_)),
                    ..
                }
            ));
        }
    }
}
