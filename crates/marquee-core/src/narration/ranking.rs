//! Canonical effect ordering.

use crate::combatant::StatId;
use crate::effect::{EffectKey, EffectMap, EffectValue};

const STATS: usize = StatId::ALL.len();

/// Position of `key` in the canonical priority list, or `None` for keys
/// ranked after all known ones.
fn priority(key: &EffectKey) -> Option<usize> {
    let stat_slot = |stat: StatId| StatId::ALL.iter().position(|s| *s == stat).unwrap_or(0);
    let rank = match key {
        EffectKey::DamageDealt => 0,
        EffectKey::HealedHp => 1,
        EffectKey::TeamHeal => 2,
        EffectKey::Revived => 3,
        EffectKey::RevivedCount => 4,
        EffectKey::ShieldAdded => 5,
        EffectKey::DamageReductionPct => 6,
        EffectKey::Buff(stat) => 7 + stat_slot(*stat),
        EffectKey::EnemyDebuff(stat) => 7 + STATS + stat_slot(*stat),
        EffectKey::SelfDebuff(stat) => 7 + 2 * STATS + stat_slot(*stat),
        EffectKey::NextHitVulnPct => 7 + 3 * STATS,
        EffectKey::StatusApplied => 8 + 3 * STATS,
        _ => return None,
    };
    Some(rank)
}

/// Orders the renderable effects of `effects`.
///
/// Aliases are folded into canonical keys, meta keys and falsy values are
/// dropped, and the survivors are sorted by canonical priority. Keys with no
/// priority follow in first-seen order.
///
/// # Example
///
/// ```
/// use marquee_core::effect::{EffectKey, EffectMap};
/// use marquee_core::narration::rank_effects;
///
/// let mut effects = EffectMap::new();
/// effects.insert(EffectKey::StatusApplied, "stun");
/// effects.insert(EffectKey::Dmg, 12);
/// effects.insert(EffectKey::HealedHp, 0);
///
/// let keys: Vec<EffectKey> = rank_effects(&effects).into_iter().map(|(k, _)| k).collect();
/// assert_eq!(keys, [EffectKey::DamageDealt, EffectKey::StatusApplied]);
/// ```
#[must_use]
pub fn rank_effects(effects: &EffectMap) -> Vec<(EffectKey, EffectValue)> {
    let mut ranked: Vec<(Option<usize>, usize, EffectKey, EffectValue)> = effects
        .normalized()
        .iter()
        .filter(|(_, value)| value.is_truthy())
        .enumerate()
        .map(|(seen, (key, value))| (priority(key), seen, key.clone(), value.clone()))
        .collect();
    // `None` sorts before `Some`, so unknown keys are keyed past the end.
    ranked.sort_by_key(|(rank, seen, _, _)| (rank.unwrap_or(usize::MAX), *seen));
    ranked
        .into_iter()
        .map(|(_, _, key, value)| (key, value))
        .collect()
}
