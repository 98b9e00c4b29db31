//! Healing and revival.
//!
//! Missing-HP heals plan their outcome before touching anyone. A team heal
//! that would change nothing fails with [`FailureReason::NoEffect`] and leaves
//! the party as it was. A single-target heal on a healthy combatant reports a
//! zero heal instead, so the fallback hit still lands.

use super::{Run, Slot, StepOutput};
use crate::combatant::{round_to_i32, Combatant};
use crate::effect::{EffectKey, FailureReason};
use crate::moves::StatChange;

/// What a missing-HP heal would do to one combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MissingHeal {
    /// Downed; comes back with this much HP.
    Revive(i32),
    /// Alive; recovers this much.
    Heal(i32),
    /// Nothing to do.
    Nothing,
}

fn plan_missing_heal(target: &Combatant, heal_pct: f64, revive_pct: Option<f64>) -> MissingHeal {
    if target.is_alive() {
        let amount = round_to_i32(f64::from(target.missing_hp()) * heal_pct);
        if amount > 0 {
            MissingHeal::Heal(amount)
        } else {
            MissingHeal::Nothing
        }
    } else {
        let max_hp = target.max_hp();
        let hp = round_to_i32(f64::from(max_hp) * revive_pct.unwrap_or(heal_pct));
        MissingHeal::Revive(hp.clamp(1, max_hp.max(1)))
    }
}

impl Run<'_> {
    fn notify_heal(&mut self, slot: Slot) {
        let target = match slot {
            Slot::Party(i) => &self.party[i],
            Slot::Enemy => &*self.enemy,
        };
        self.hooks.before_heal(target);
    }

    pub(super) fn heal_slot(&mut self, slot: Slot, amount: i32) -> i32 {
        self.notify_heal(slot);
        self.slot_mut(slot).heal(amount)
    }

    pub(super) fn heal_self(&mut self, amount: i32) -> StepOutput {
        let mut out = StepOutput::aimed_at(self.actor().name());
        let gained = self.heal_slot(Slot::Party(self.actor), amount);
        out.effects.insert(EffectKey::HealedHp, gained);
        out
    }

    pub(super) fn heal_ally(&mut self, amount: i32) -> Result<StepOutput, FailureReason> {
        let ally = self.ally_index()?;
        let mut out = StepOutput::aimed_at(self.party[ally].name());
        let gained = self.heal_slot(Slot::Party(ally), amount);
        out.effects.insert(EffectKey::HealedHp, gained);
        Ok(out)
    }

    pub(super) fn heal_team(&mut self, amount: i32) -> StepOutput {
        let mut out = StepOutput::default();
        let mut total = 0;
        for i in self.living() {
            total += self.heal_slot(Slot::Party(i), amount);
        }
        out.effects.insert(EffectKey::TeamHeal, total);
        out
    }

    /// Heals one combatant by missing fraction, reviving if downed.
    ///
    /// A combatant at full HP gets `healedHp: 0`.
    pub(super) fn heal_missing(
        &mut self,
        slot: Slot,
        heal_pct: f64,
        revive_pct: Option<f64>,
    ) -> StepOutput {
        let plan = plan_missing_heal(self.slot(slot), heal_pct, revive_pct);
        let mut out = StepOutput::aimed_at(self.slot(slot).name());
        match plan {
            MissingHeal::Nothing => {
                out.effects.insert(EffectKey::HealedHp, 0);
            }
            MissingHeal::Revive(hp) => {
                self.notify_heal(slot);
                let hp = self.slot_mut(slot).revive(hp);
                out.effects.insert(EffectKey::HealedHp, hp);
                out.effects.insert(EffectKey::Revived, true);
                out.effects.insert(EffectKey::RevivedHp, hp);
            }
            MissingHeal::Heal(amount) => {
                let gained = self.heal_slot(slot, amount);
                out.effects.insert(EffectKey::HealedHp, gained);
            }
        }
        out
    }

    /// Heals the whole party by missing fraction, reviving the downed.
    pub(super) fn heal_team_missing(
        &mut self,
        heal_pct: f64,
        revive_pct: Option<f64>,
    ) -> Result<StepOutput, FailureReason> {
        let plans: Vec<MissingHeal> = self
            .party
            .iter()
            .map(|member| plan_missing_heal(member, heal_pct, revive_pct))
            .collect();
        if plans.iter().all(|plan| *plan == MissingHeal::Nothing) {
            return Err(FailureReason::NoEffect);
        }

        let mut total = 0;
        let mut revived = 0;
        for (i, plan) in plans.into_iter().enumerate() {
            match plan {
                MissingHeal::Revive(hp) => {
                    self.notify_heal(Slot::Party(i));
                    total += self.party[i].revive(hp);
                    revived += 1;
                }
                MissingHeal::Heal(amount) => total += self.heal_slot(Slot::Party(i), amount),
                MissingHeal::Nothing => {}
            }
        }

        let mut out = StepOutput::default();
        out.effects.insert(EffectKey::TeamHeal, total);
        if revived > 0 {
            out.effects.insert(EffectKey::TeamRevive, true);
            out.effects.insert(EffectKey::RevivedCount, revived);
        }
        Ok(out)
    }

    /// Heals living members by missing fraction and buffs them.
    pub(super) fn heal_team_buff(
        &mut self,
        heal_pct: f64,
        changes: &[StatChange],
        turns: u32,
    ) -> StepOutput {
        let mut total = 0;
        for i in self.living() {
            if let MissingHeal::Heal(amount) = plan_missing_heal(&self.party[i], heal_pct, None) {
                total += self.heal_slot(Slot::Party(i), amount);
            }
        }
        let mut out = self.buff_party(changes, turns);
        out.effects.insert(EffectKey::TeamHeal, total);
        out
    }
}
