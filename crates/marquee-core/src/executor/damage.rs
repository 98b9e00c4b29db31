//! Direct damage and team strikes.

use super::formula::{direct_damage, sqrt_shares};
use super::{record_turns, Run, StepOutput};
use crate::combatant::{StatId, StatusKey};
use crate::effect::{EffectKey, TurnCounter};
use crate::moves::TimedPct;

impl Run<'_> {
    /// Lands a hit on the enemy from an unscaled attack value.
    ///
    /// Returns the damage dealt.
    pub(super) fn hit(&mut self, attack: f64) -> i32 {
        let damage = direct_damage(
            attack * self.config.attack_scale,
            self.enemy,
            self.config.def_debuff_cap,
        );
        self.enemy.take_damage(damage)
    }

    pub(super) fn damage_enemy(&mut self, multiplier: f64, self_debuff: Option<TimedPct>) -> StepOutput {
        let mut out = StepOutput::aimed_at(self.enemy.name());
        let dealt = self.hit(f64::from(self.actor().atk()) * multiplier);
        out.effects.insert(EffectKey::DamageDealt, dealt);

        if let Some(debuff) = self_debuff.filter(|d| d.pct > 0.0) {
            let record = self.actor_mut().statuses_mut().apply_strongest(
                StatusKey::Debuff(StatId::Def),
                debuff.pct,
                record_turns(debuff.turns),
            );
            out.effects
                .insert(EffectKey::SelfDebuff(StatId::Def), record.pct);
            out.effects.insert(
                EffectKey::Turns(TurnCounter::SelfDebuff(StatId::Def)),
                record.turns,
            );
        }
        out
    }

    /// Every living party member strikes for a share of a rolled total.
    ///
    /// Each member's ATK is raised by `atk_bonus` before shares are computed.
    /// Returns the summed damage.
    pub(super) fn team_strike(&mut self, min_mult: f64, max_mult: f64, atk_bonus: f64) -> i32 {
        let living = self.living();
        if living.is_empty() {
            return 0;
        }
        let total = self.rng.range(min_mult, max_mult);
        let attacks: Vec<f64> = living
            .iter()
            .map(|&i| f64::from(self.party[i].atk()) * (1.0 + atk_bonus))
            .collect();
        let shares = sqrt_shares(&attacks);

        let mut dealt = 0;
        for (attack, share) in attacks.iter().zip(shares) {
            dealt = self.hit(attack * total * share).saturating_add(dealt);
        }
        dealt
    }
}
