//! Data-driven genre moves.
//!
//! A [`GenreEffect`] is a bag of optional components. Present components run in
//! a fixed order so the RNG is consumed identically for identical data:
//!
//! 1. actor buffs and debuffs, then the actor's own heal
//! 2. team buffs, team heal, team damage reduction
//! 3. enemy debuffs and next-hit vulnerability
//! 4. ally heal and ally barrier
//! 5. the immediate hit, then the team strike

use super::{record_turns, Run, Slot, StepOutput};
use crate::combatant::{round_to_i32, StatId, StatusKey};
use crate::effect::{EffectKey, EffectMap, FailureReason, TurnCounter};
use crate::moves::{GenreEffect, HitRoll, ScaledPct, StatChange};

const BUFF_TURNS: u32 = 2;
const VULN_TURNS: u32 = 1;
const HIT_MIN_MULT: f64 = 1.5;
const HIT_MAX_MULT: f64 = 2.0;

/// Where a genre move ended up pointing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Aim {
    Nobody,
    Actor,
    Enemy,
    Ally(usize),
}

impl Run<'_> {
    /// Applies every present component of `effect`.
    pub(super) fn genre(&mut self, effect: &GenreEffect) -> Result<StepOutput, FailureReason> {
        let m = self.rating_mult;
        let pct = |component: &Option<ScaledPct>| component.map_or(0.0, |p| p.scaled(m));
        let turns = |component: &Option<ScaledPct>, fallback: u32| {
            component.map_or(fallback, |p| p.turns_or(fallback))
        };

        let mut effects = EffectMap::new();
        let mut aim = Aim::Nobody;

        // Actor.
        let self_atk = pct(&effect.atk_buff_pct);
        let actor_changes = [
            (StatId::Atk, self_atk, turns(&effect.atk_buff_pct, BUFF_TURNS)),
            (
                StatId::Def,
                pct(&effect.def_buff_pct),
                turns(&effect.def_buff_pct, BUFF_TURNS),
            ),
        ];
        for (stat, value, t) in actor_changes {
            if value > 0.0 {
                effects.merge(&self.self_buff(&[StatChange::new(stat, value)], t, None).effects);
                aim = aim.max(Aim::Actor);
            }
        }
        let self_def_down = pct(&effect.def_debuff_pct);
        if self_def_down > 0.0 {
            let t = turns(&effect.def_debuff_pct, BUFF_TURNS);
            effects.merge(
                &self
                    .debuff_self(&[StatChange::new(StatId::Def, self_def_down)], t)
                    .effects,
            );
            aim = aim.max(Aim::Actor);
        }
        let self_heal = pct(&effect.heal_self_max_hp_pct);
        if self_heal > 0.0 {
            let amount = round_to_i32(f64::from(self.actor().max_hp()) * self_heal);
            let gained = self.heal_slot(Slot::Party(self.actor), amount);
            effects.add(EffectKey::HealedHp, gained);
            aim = aim.max(Aim::Actor);
        }

        // Team.
        let team_atk = pct(&effect.team_atk_buff_pct);
        let team_changes = [
            (StatId::Atk, team_atk, turns(&effect.team_atk_buff_pct, BUFF_TURNS)),
            (
                StatId::Def,
                pct(&effect.team_def_buff_pct),
                turns(&effect.team_def_buff_pct, BUFF_TURNS),
            ),
        ];
        for (stat, value, t) in team_changes {
            if value > 0.0 {
                effects.merge(&self.buff_party(&[StatChange::new(stat, value)], t).effects);
            }
        }
        let team_heal = pct(&effect.team_heal_max_hp_pct);
        if team_heal > 0.0 {
            let mut total = 0;
            for i in self.living() {
                let amount = round_to_i32(f64::from(self.party[i].max_hp()) * team_heal);
                total += self.heal_slot(Slot::Party(i), amount);
            }
            effects.add(EffectKey::TeamHeal, total);
        }
        let reduction = pct(&effect.team_damage_reduction_pct);
        if reduction > 0.0 {
            let t = turns(&effect.team_damage_reduction_pct, BUFF_TURNS);
            for i in self.living() {
                self.party[i].statuses_mut().apply_strongest(
                    StatusKey::DamageReduction,
                    reduction,
                    record_turns(t),
                );
            }
            effects.max_pct(EffectKey::DamageReductionPct, reduction);
            effects.max_int(
                EffectKey::Turns(TurnCounter::DamageReduction),
                i64::from(t),
            );
        }

        // Enemy.
        let enemy_changes = [
            (
                StatId::Atk,
                pct(&effect.enemy_atk_debuff_pct),
                turns(&effect.enemy_atk_debuff_pct, BUFF_TURNS),
            ),
            (
                StatId::Def,
                pct(&effect.enemy_def_debuff_pct),
                turns(&effect.enemy_def_debuff_pct, BUFF_TURNS),
            ),
        ];
        for (stat, value, t) in enemy_changes {
            if value > 0.0 {
                effects.merge(&self.debuff_enemy(&[StatChange::new(stat, value)], t).effects);
                aim = aim.max(Aim::Enemy);
            }
        }
        let vuln = pct(&effect.next_hit_vuln_pct);
        if vuln > 0.0 {
            let t = turns(&effect.next_hit_vuln_pct, VULN_TURNS);
            let record = self.enemy.statuses_mut().apply_strongest(
                StatusKey::NextHitVuln,
                vuln,
                record_turns(t),
            );
            effects.max_pct(EffectKey::NextHitVulnPct, record.pct);
            effects.max_int(
                EffectKey::Turns(TurnCounter::NextHitVuln),
                i64::from(record.turns),
            );
            aim = aim.max(Aim::Enemy);
        }

        // Ally.
        if effect.needs_ally() {
            let ally = self.ally_index()?;
            let max_hp = f64::from(self.party[ally].max_hp());
            let heal = pct(&effect.heal_ally_max_hp_pct);
            if heal > 0.0 {
                let gained = self.heal_slot(Slot::Party(ally), round_to_i32(max_hp * heal));
                effects.add(EffectKey::HealedHp, gained);
            }
            let shield = round_to_i32(max_hp * pct(&effect.shield_ally_max_hp_pct));
            if shield > 0 {
                let added = self.shield_slot(Slot::Party(ally), shield);
                effects.add(EffectKey::ShieldAdded, added);
            }
            aim = Aim::Ally(ally);
        }

        // Strikes.
        if effect.lands_hit() {
            let roll = match effect.immediate_hit {
                Some(HitRoll {
                    enabled: true,
                    min_mult,
                    max_mult,
                }) => self.rng.range(
                    min_mult.unwrap_or(HIT_MIN_MULT),
                    max_mult.unwrap_or(HIT_MAX_MULT),
                ),
                _ => 1.0,
            };
            let boost = 1.0 + self_atk + pct(&effect.pre_hit_atk_buff_pct);
            let dealt = self.hit(f64::from(self.actor().atk()) * boost * roll);
            effects.add(EffectKey::DamageDealt, dealt);
            aim = aim.max(Aim::Enemy);
        }
        if let Some(strike) = effect.team_strike.as_ref().filter(|s| s.enabled) {
            let dealt = self.team_strike(
                strike
                    .total_min_mult
                    .unwrap_or(self.config.team_strike_min),
                strike
                    .total_max_mult
                    .unwrap_or(self.config.team_strike_max),
                team_atk,
            );
            effects.add(EffectKey::DamageDealt, dealt);
            aim = aim.max(Aim::Enemy);
        }

        let target_name = match aim {
            Aim::Nobody => None,
            Aim::Actor => Some(self.actor().name().to_string()),
            Aim::Enemy => Some(self.enemy.name().to_string()),
            Aim::Ally(i) => Some(self.party[i].name().to_string()),
        };
        Ok(StepOutput {
            effects,
            target_name,
        })
    }
}
