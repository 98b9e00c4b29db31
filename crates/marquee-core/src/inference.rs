//! Target labels and effect markers for move previews.
//!
//! A menu shows each move with a compact summary of who it touches and what
//! it does there:
//!
//! ```text
//! AFFECTS TEAM (+ATK) + TARGET ENEMY (DMG)
//! FOR SELF (HEAL) + TARGET ENEMY (DMG, -DEF)
//! ```
//!
//! Markers come from the move kind and from its target tags, so loosely
//! authored moves still get a sensible label.
//!
//! # Example
//!
//! ```
//! use marquee_core::inference::target_label;
//! use marquee_core::moves::{MoveDescriptor, MoveKey, MoveKind};
//!
//! let mv = MoveDescriptor::new(
//!     MoveKey::signature("rocky", "haymaker"),
//!     "Haymaker",
//!     MoveKind::DamageEnemy { multiplier: 1.5, self_debuff: None },
//! );
//! assert_eq!(target_label(&mv), "TARGET ENEMY (DMG)");
//! ```

use bitflags::bitflags;

use crate::combatant::StatId;
use crate::effect::{EffectKey, EffectMap};
use crate::moves::{GenreEffect, MoveDescriptor, MoveKind, StatChange};
use crate::target::{BaseTarget, TargetSpec};

bitflags! {
    /// Effect markers shown next to a target label.
    ///
    /// Declaration order is display order.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Markers: u16 {
        const DMG      = 1 << 0;
        const HEAL     = 1 << 1;
        const SHIELD   = 1 << 2;
        const ATK_UP   = 1 << 3;
        const DEF_UP   = 1 << 4;
        const CRIT_UP  = 1 << 5;
        const BUFF     = 1 << 6;
        const ATK_DOWN = 1 << 7;
        const DEF_DOWN = 1 << 8;
        const DEBUFF   = 1 << 9;
        const FX       = 1 << 10;
    }
}

const TOKENS: [(Markers, &str); 11] = [
    (Markers::DMG, "DMG"),
    (Markers::HEAL, "HEAL"),
    (Markers::SHIELD, "SHIELD"),
    (Markers::ATK_UP, "+ATK"),
    (Markers::DEF_UP, "+DEF"),
    (Markers::CRIT_UP, "+CRIT"),
    (Markers::BUFF, "BUFF"),
    (Markers::ATK_DOWN, "-ATK"),
    (Markers::DEF_DOWN, "-DEF"),
    (Markers::DEBUFF, "DEBUFF"),
    (Markers::FX, "FX"),
];

const DAMAGE_TAGS: &[&str] = &["dmg", "damage", "hit", "strike", "teamstrike"];
const HEAL_TAGS: &[&str] = &["heal", "healing", "revive", "lifesteal", "drain"];
const FX_TAGS: &[&str] = &["fx", "status", "stun", "sleep", "poison", "burn", "freeze", "vuln"];

impl Markers {
    /// Display tokens in marker order.
    #[must_use]
    pub fn tokens(self) -> Vec<&'static str> {
        TOKENS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, token)| *token)
            .collect()
    }

    /// Drops the generic BUFF/DEBUFF markers when a concrete one is present.
    #[must_use]
    pub fn tidy(self) -> Self {
        let mut out = self;
        if self.intersects(Self::ATK_UP | Self::DEF_UP | Self::CRIT_UP) {
            out.remove(Self::BUFF);
        }
        if self.intersects(Self::ATK_DOWN | Self::DEF_DOWN) {
            out.remove(Self::DEBUFF);
        }
        out
    }

    fn raised(changes: &[StatChange]) -> Self {
        let mut out = Self::empty();
        for change in changes.iter().filter(|c| c.pct > 0.0) {
            out |= match change.stat {
                StatId::Atk => Self::ATK_UP,
                StatId::Def => Self::DEF_UP,
                StatId::Crit => Self::CRIT_UP,
                _ => Self::BUFF,
            };
        }
        if out.is_empty() {
            Self::BUFF
        } else {
            out
        }
    }

    fn lowered(changes: &[StatChange]) -> Self {
        let mut out = Self::empty();
        for change in changes.iter().filter(|c| c.pct > 0.0) {
            out |= match change.stat {
                StatId::Atk => Self::ATK_DOWN,
                StatId::Def => Self::DEF_DOWN,
                _ => Self::DEBUFF,
            };
        }
        if out.is_empty() {
            Self::DEBUFF
        } else {
            out
        }
    }
}

/// One base of a target label and the markers it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetMarkers {
    /// Who is affected.
    pub base: BaseTarget,
    /// What happens to them.
    pub markers: Markers,
}

impl TargetMarkers {
    /// Label segment, such as `TARGET ENEMY (DMG, -DEF)`.
    #[must_use]
    pub fn segment(&self) -> String {
        let label = base_label(self.base);
        let tokens = self.markers.tokens();
        if tokens.is_empty() {
            label.to_string()
        } else {
            format!("{label} ({})", tokens.join(", "))
        }
    }
}

const fn base_label(base: BaseTarget) -> &'static str {
    match base {
        BaseTarget::SelfTarget => "FOR SELF",
        BaseTarget::Ally => "TARGET ALLY",
        BaseTarget::Enemy => "TARGET ENEMY",
        BaseTarget::Team => "AFFECTS TEAM",
    }
}

// =============================================================================
// Inference
// =============================================================================

/// Orders bases for display.
///
/// A team or self effect paired with an enemy reads setup first; an ally
/// effect paired with an enemy reads the attack first.
fn order_bases(bases: &[BaseTarget]) -> Vec<BaseTarget> {
    use BaseTarget::{Ally, Enemy, SelfTarget, Team};
    let has = |b: BaseTarget| bases.contains(&b);
    let order: [BaseTarget; 4] = if has(Team) && has(Enemy) {
        [Team, Enemy, Ally, SelfTarget]
    } else if has(SelfTarget) && has(Enemy) {
        [SelfTarget, Enemy, Ally, Team]
    } else if has(Ally) && has(Enemy) {
        [Enemy, Ally, Team, SelfTarget]
    } else {
        [Enemy, Team, Ally, SelfTarget]
    };
    order.into_iter().filter(|b| has(*b)).collect()
}

fn tag_markers(target: &TargetSpec, base: BaseTarget) -> Markers {
    let mut out = Markers::empty();
    if base == BaseTarget::Enemy {
        out.set(Markers::DMG, target.has_any(DAMAGE_TAGS));
        out.set(Markers::DEBUFF, target.has_tag("debuff"));
    } else {
        out.set(Markers::HEAL, target.has_any(HEAL_TAGS));
        out.set(Markers::BUFF, target.has_tag("buff"));
        out.set(Markers::SHIELD, target.has_tag("shield"));
    }
    out.set(Markers::FX, target.has_any(FX_TAGS));
    out
}

fn genre_markers(effect: &GenreEffect, base: BaseTarget) -> Markers {
    let mut out = Markers::empty();
    match base {
        BaseTarget::Enemy => {
            out.set(Markers::DMG, effect.lands_hit() || effect.has_team_strike());
            out.set(Markers::ATK_DOWN, effect.enemy_atk_debuff_pct.is_some());
            out.set(Markers::DEF_DOWN, effect.enemy_def_debuff_pct.is_some());
            out.set(Markers::FX, effect.next_hit_vuln_pct.is_some());
        }
        BaseTarget::SelfTarget => {
            out.set(Markers::HEAL, effect.heal_self_max_hp_pct.is_some());
            out.set(Markers::ATK_UP, effect.atk_buff_pct.is_some());
            out.set(Markers::DEF_UP, effect.def_buff_pct.is_some());
            out.set(Markers::DEF_DOWN, effect.def_debuff_pct.is_some());
        }
        BaseTarget::Ally => {
            out.set(Markers::HEAL, effect.heal_ally_max_hp_pct.is_some());
            out.set(Markers::SHIELD, effect.shield_ally_max_hp_pct.is_some());
        }
        BaseTarget::Team => {
            out.set(Markers::HEAL, effect.team_heal_max_hp_pct.is_some());
            out.set(Markers::ATK_UP, effect.team_atk_buff_pct.is_some());
            out.set(Markers::DEF_UP, effect.team_def_buff_pct.is_some());
            out.set(Markers::FX, effect.team_damage_reduction_pct.is_some());
        }
    }
    out
}

/// Markers a kind contributes to one base.
fn kind_markers(kind: &MoveKind, base: BaseTarget) -> Markers {
    use BaseTarget::{Ally, Enemy, SelfTarget, Team};
    match (kind, base) {
        (MoveKind::DamageEnemy { .. } | MoveKind::TeamStrike { .. }, Enemy) => Markers::DMG,
        (MoveKind::DamageEnemy { self_debuff: Some(debuff), .. }, SelfTarget) if debuff.pct > 0.0 => {
            Markers::DEF_DOWN
        }
        (MoveKind::HealSelf { .. } | MoveKind::HealSelfMissing { .. }, SelfTarget)
        | (MoveKind::HealAlly { .. } | MoveKind::HealAllyMissing { .. }, Ally)
        | (MoveKind::HealTeam { .. } | MoveKind::HealTeamMissing { .. }, Team) => Markers::HEAL,
        (MoveKind::HealTeamBuff { changes, .. }, Team) => Markers::HEAL | Markers::raised(changes),
        (MoveKind::SelfBuff { changes, shield, .. }, SelfTarget) => {
            let mut out = Markers::raised(changes);
            out.set(Markers::SHIELD, shield.is_some());
            out
        }
        (MoveKind::BuffParty { changes, .. }, Team | SelfTarget | Ally) => Markers::raised(changes),
        (MoveKind::DebuffEnemy { changes, .. }, Enemy)
        | (MoveKind::DebuffSelf { changes, .. }, SelfTarget) => Markers::lowered(changes),
        (MoveKind::Status { .. }, _) => Markers::FX,
        (MoveKind::Genre(effect), _) => genre_markers(effect, base),
        (MoveKind::Compound { steps }, _) => steps
            .iter()
            .filter(|step| step.target.bases().contains(&base))
            .fold(Markers::empty(), |acc, step| {
                acc | kind_markers(&step.kind, base) | tag_markers(&step.target, base)
            }),
        _ => Markers::empty(),
    }
}

/// Bases a move touches, in display order, with their markers.
///
/// # Arguments
///
/// * `descriptor` - The move to summarize
///
/// # Returns
///
/// One entry per base. Compound moves contribute the bases of every step and
/// a `teamstrike` tag adds both team and enemy.
#[must_use]
pub fn infer_targets(descriptor: &MoveDescriptor) -> Vec<TargetMarkers> {
    let target = &descriptor.target;
    let mut bases = target.bases();
    if let MoveKind::Compound { steps } = &descriptor.kind {
        for base in steps.iter().flat_map(|step| step.target.bases()) {
            if !bases.contains(&base) {
                bases.push(base);
            }
        }
    }
    if target.has_tag("teamstrike") {
        for base in [BaseTarget::Enemy, BaseTarget::Team] {
            if !bases.contains(&base) {
                bases.push(base);
            }
        }
    }

    order_bases(&bases)
        .into_iter()
        .map(|base| {
            let markers = kind_markers(&descriptor.kind, base) | tag_markers(target, base);
            TargetMarkers {
                base,
                markers: markers.tidy(),
            }
        })
        .collect()
}

/// Preview label, such as `FOR SELF (HEAL) + TARGET ENEMY (DMG)`.
#[must_use]
pub fn target_label(descriptor: &MoveDescriptor) -> String {
    infer_targets(descriptor)
        .iter()
        .map(TargetMarkers::segment)
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Markers describing what a result actually did.
#[must_use]
pub fn markers_from_effects(effects: &EffectMap) -> Markers {
    let normalized = effects.normalized();
    let positive = |key: &EffectKey| normalized.get(key).is_some_and(|v| v.as_f64() > 0.0);
    let mut out = Markers::empty();

    out.set(Markers::DMG, positive(&EffectKey::DamageDealt));
    out.set(
        Markers::HEAL,
        positive(&EffectKey::HealedHp)
            || positive(&EffectKey::TeamHeal)
            || positive(&EffectKey::Revived)
            || positive(&EffectKey::RevivedCount)
            || effects.has(&EffectKey::TeamRevive),
    );
    out.set(Markers::SHIELD, positive(&EffectKey::ShieldAdded));
    for stat in StatId::ALL {
        if positive(&EffectKey::Buff(stat)) {
            out |= Markers::raised(&[StatChange::new(stat, 1.0)]);
        }
        if positive(&EffectKey::EnemyDebuff(stat)) {
            out |= Markers::lowered(&[StatChange::new(stat, 1.0)]);
        }
        if positive(&EffectKey::SelfDebuff(stat)) {
            out |= Markers::FX;
        }
    }
    out.set(
        Markers::FX,
        out.contains(Markers::FX)
            || normalized.has(&EffectKey::StatusApplied)
            || positive(&EffectKey::NextHitVulnPct)
            || positive(&EffectKey::DamageReductionPct),
    );
    out.tidy()
}
