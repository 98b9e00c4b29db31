//! Default line templates.
//!
//! Templates use `{name}` placeholders. Unknown placeholders are left as
//! written so an authoring typo shows up in the output instead of vanishing.

use super::ranking::rank_effects;
use crate::effect::{EffectKey, EffectMap, EffectValue};

/// Fallback enemy name.
pub const DEFAULT_ENEMY: &str = "the enemy";
/// Fallback name for team-wide effects.
pub const DEFAULT_TEAM: &str = "the team";
/// Fallback ally name.
pub const DEFAULT_ALLY: &str = "your ally";
/// Headline used when nothing more specific exists.
pub const HEADLINE: &str = "{actor} uses {move}!";
/// Headline naming a chosen ally.
pub const HEADLINE_ON_TARGET: &str = "{actor} uses {move} on {target}!";

const DAMAGE: &str = "{enemy} takes {dmg} damage.";
const HEAL: &str = "{target} recovers {heal} HP.";
const TEAM_HEAL: &str = "The team recovers {heal} HP.";
const REVIVE: &str = "{target} returns to the fight!";
const REVIVE_ONE: &str = "An ally returns to the fight!";
const REVIVE_MANY: &str = "{count} allies return to the fight!";
const SHIELD: &str = "{target} gains a protective shield.";
const DAMAGE_REDUCTION: &str = "{target} takes reduced damage for a short time.";
const STAT_RISE: &str = "{target}'s {stat} rises.";
const ENEMY_STAT_FALL: &str = "{enemy}'s {stat} falls.";
const SELF_STAT_FALL: &str = "{actor}'s {stat} falls.";
const EXPOSE: &str = "{enemy} is left exposed to the next attack.";
const CONFUSED: &str = "{enemy} becomes confused!";
const DAZED: &str = "{enemy} looks dazed!";
const STUNNED: &str = "{enemy} is stunned!";
const AFFLICTED: &str = "{enemy} is afflicted with {status}.";
const UNKNOWN: &str = "{key}: {value}";

/// Display names a line can refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Names {
    /// Acting combatant.
    pub actor: String,
    /// Combatant (or group) the effect landed on.
    pub target: String,
    /// Opposing combatant.
    pub enemy: String,
}

impl Names {
    /// Creates a name set.
    #[must_use]
    pub fn new(
        actor: impl Into<String>,
        target: impl Into<String>,
        enemy: impl Into<String>,
    ) -> Self {
        Self {
            actor: actor.into(),
            target: target.into(),
            enemy: enemy.into(),
        }
    }
}

/// A rendered default line and the key it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectEntry {
    /// Canonical key the line narrates.
    pub key: EffectKey,
    /// Line text.
    pub text: String,
}

/// Substitutes `{name}` placeholders from `vars`.
///
/// # Example
///
/// ```
/// use marquee_core::narration::render_template;
///
/// let line = render_template("{actor} uses {move}{bang}", &[("actor", "Rocky"), ("move", "Jab")]);
/// assert_eq!(line, "Rocky uses Jab{bang}");
/// ```
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let Some(close) = tail.find('}') else {
            rest = tail;
            break;
        };
        let name = &tail[1..close];
        let is_word = !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_');
        match vars.iter().find(|(k, _)| is_word && *k == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&tail[..=close]),
        }
        rest = &tail[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Uppercases the first character.
#[must_use]
pub fn capitalize(line: &str) -> String {
    let mut chars = line.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn fill<'v>(template: &str, base: &[(&'v str, &'v str)], extra: &[(&'v str, &'v str)]) -> String {
    let vars: Vec<(&str, &str)> = base.iter().chain(extra).copied().collect();
    render_template(template, &vars)
}

fn status_template(status: &str) -> &'static str {
    let lower = status.to_lowercase();
    if lower.contains("confus") {
        CONFUSED
    } else if lower.contains("daze") {
        DAZED
    } else if lower.contains("stun") {
        STUNNED
    } else {
        AFFLICTED
    }
}

/// Renders the default line for one ranked effect.
///
/// Returns `None` for falsy values and meta keys.
#[must_use]
pub fn default_line(key: &EffectKey, value: &EffectValue, names: &Names) -> Option<String> {
    if !value.is_truthy() || key.is_meta() {
        return None;
    }
    let amount = value.as_i64().to_string();
    let text = value.to_string();
    let key_name = key.to_string();
    let base = [
        ("actor", names.actor.as_str()),
        ("target", names.target.as_str()),
        ("enemy", names.enemy.as_str()),
    ];
    let line = match key.canonical() {
        EffectKey::DamageDealt => fill(DAMAGE, &base, &[("dmg", amount.as_str())]),
        EffectKey::HealedHp => fill(HEAL, &base, &[("heal", amount.as_str())]),
        EffectKey::TeamHeal => fill(TEAM_HEAL, &base, &[("heal", amount.as_str())]),
        EffectKey::Revived => fill(REVIVE, &base, &[]),
        EffectKey::RevivedCount if value.as_i64() == 1 => REVIVE_ONE.to_string(),
        EffectKey::RevivedCount => fill(REVIVE_MANY, &base, &[("count", amount.as_str())]),
        EffectKey::ShieldAdded => fill(SHIELD, &base, &[]),
        EffectKey::DamageReductionPct => fill(DAMAGE_REDUCTION, &base, &[]),
        EffectKey::Buff(stat) => fill(STAT_RISE, &base, &[("stat", stat.label())]),
        EffectKey::EnemyDebuff(stat) => fill(ENEMY_STAT_FALL, &base, &[("stat", stat.label())]),
        EffectKey::SelfDebuff(stat) => fill(SELF_STAT_FALL, &base, &[("stat", stat.label())]),
        EffectKey::NextHitVulnPct => fill(EXPOSE, &base, &[]),
        EffectKey::StatusApplied => fill(status_template(&text), &base, &[("status", text.as_str())]),
        _ => fill(UNKNOWN, &base, &[("key", key_name.as_str()), ("value", text.as_str())]),
    };
    Some(capitalize(&line))
}

/// Ranks `effects` and renders one entry per surviving key.
#[must_use]
pub fn default_entries(effects: &EffectMap, names: &Names) -> Vec<EffectEntry> {
    rank_effects(effects)
        .into_iter()
        .filter_map(|(key, value)| {
            default_line(&key, &value, names).map(|text| EffectEntry { key, text })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::StatId;

    fn names() -> Names {
        Names::new("Rocky", "Adrian", "the enemy")
    }

    fn line(key: EffectKey, value: impl Into<EffectValue>) -> Option<String> {
        default_line(&key, &value.into(), &names())
    }

    mod render_tests {
        use super::*;

        #[test]
        fn leaves_unknown_placeholders() {
            assert_eq!(render_template("{a} {b}", &[("a", "x")]), "x {b}");
        }

        #[test]
        fn tolerates_unbalanced_braces() {
            assert_eq!(render_template("oops {a", &[("a", "x")]), "oops {a");
            assert_eq!(render_template("} {a}", &[("a", "x")]), "} x");
            assert_eq!(render_template("{a} hits {b", &[("a", "x")]), "x hits {b");
            assert_eq!(render_template("{", &[]), "{");
        }

        #[test]
        fn capitalizes_first_letter_only() {
            assert_eq!(capitalize("the enemy takes 5 damage."), "The enemy takes 5 damage.");
            assert_eq!(capitalize(""), "");
        }
    }

    mod line_tests {
        use super::*;

        #[test]
        fn damage_line_capitalizes_default_enemy() {
            assert_eq!(
                line(EffectKey::DamageDealt, 12).as_deref(),
                Some("The enemy takes 12 damage.")
            );
        }

        #[test]
        fn stat_lines_use_labels() {
            assert_eq!(
                line(EffectKey::Buff(StatId::Def), 0.2).as_deref(),
                Some("Adrian's DEF rises.")
            );
            assert_eq!(
                line(EffectKey::SelfDebuff(StatId::Def), 0.2).as_deref(),
                Some("Rocky's DEF falls.")
            );
        }

        #[test]
        fn revive_count_agrees_in_number() {
            assert_eq!(
                line(EffectKey::RevivedCount, 1).as_deref(),
                Some("An ally returns to the fight!")
            );
            assert_eq!(
                line(EffectKey::RevivedCount, 3).as_deref(),
                Some("3 allies return to the fight!")
            );
        }

        #[test]
        fn status_lines_by_name() {
            assert_eq!(
                line(EffectKey::StatusApplied, "Stunned").as_deref(),
                Some("The enemy is stunned!")
            );
            assert_eq!(
                line(EffectKey::StatusApplied, "confusion").as_deref(),
                Some("The enemy becomes confused!")
            );
            assert_eq!(
                line(EffectKey::StatusApplied, "burning").as_deref(),
                Some("The enemy is afflicted with burning.")
            );
        }

        #[test]
        fn unknown_key_shows_key_and_value() {
            assert_eq!(
                line(EffectKey::Custom("confetti".into()), 3).as_deref(),
                Some("Confetti: 3")
            );
        }

        #[test]
        fn falsy_and_meta_render_nothing() {
            assert!(line(EffectKey::DamageDealt, 0).is_none());
            assert!(line(EffectKey::RevivedHp, 50).is_none());
        }
    }
}
