//! Buffs, debuffs, barriers and afflictions.
//!
//! All percentage modifiers stack strongest-wins: the stored fraction becomes
//! `max(old, new)` and the counter `max(old, new)`.

use super::{record_turns, Run, Slot, StepOutput};
use crate::combatant::{canonical_affliction, round_to_i32, StatusKey};
use crate::effect::{EffectKey, EffectMap, FailureReason, TurnCounter};
use crate::moves::{ShieldSpec, StatChange, TimedPct};
use crate::target::{BaseTarget, TargetSpec};

/// Which book a change lands in and how it is reported.
#[derive(Debug, Clone, Copy)]
enum Direction {
    Buff,
    EnemyDebuff,
    SelfDebuff,
}

impl Direction {
    const fn status_key(self, change: &StatChange) -> StatusKey {
        match self {
            Self::Buff => StatusKey::Buff(change.stat),
            Self::EnemyDebuff | Self::SelfDebuff => StatusKey::Debuff(change.stat),
        }
    }

    fn record(self, effects: &mut EffectMap, change: &StatChange, turns: u32) {
        let (pct_key, turns_key) = match self {
            Self::Buff => (
                EffectKey::Buff(change.stat),
                TurnCounter::Buff(change.stat),
            ),
            Self::EnemyDebuff => (
                EffectKey::EnemyDebuff(change.stat),
                TurnCounter::EnemyDebuff(change.stat),
            ),
            Self::SelfDebuff => (
                EffectKey::SelfDebuff(change.stat),
                TurnCounter::SelfDebuff(change.stat),
            ),
        };
        effects.max_pct(pct_key, change.pct);
        effects.max_int(EffectKey::Turns(turns_key), i64::from(turns));
    }
}

impl Run<'_> {
    /// Applies `changes` to each slot and reports them once.
    fn apply_changes(
        &mut self,
        slots: &[Slot],
        changes: &[StatChange],
        turns: u32,
        direction: Direction,
    ) -> EffectMap {
        let mut effects = EffectMap::new();
        for change in changes.iter().filter(|c| c.pct > 0.0) {
            for slot in slots {
                self.slot_mut(*slot).statuses_mut().apply_strongest(
                    direction.status_key(change),
                    change.pct,
                    record_turns(turns),
                );
            }
            direction.record(&mut effects, change, turns);
        }
        effects
    }

    fn living_slots(&self) -> Vec<Slot> {
        self.living().into_iter().map(Slot::Party).collect()
    }

    pub(super) fn self_buff(
        &mut self,
        changes: &[StatChange],
        turns: u32,
        shield: Option<ShieldSpec>,
    ) -> StepOutput {
        let actor = Slot::Party(self.actor);
        let mut out = StepOutput::aimed_at(self.actor().name());
        out.effects = self.apply_changes(&[actor], changes, turns, Direction::Buff);

        let amount = match shield {
            Some(ShieldSpec::Flat(flat)) => flat.max(0),
            Some(ShieldSpec::MaxHpPct(pct)) => {
                round_to_i32(f64::from(self.actor().max_hp()) * pct.clamp(0.0, 1.0))
            }
            None => 0,
        };
        if amount > 0 {
            let added = self.shield_slot(actor, amount);
            out.effects.insert(EffectKey::ShieldAdded, added);
        }
        out
    }

    /// Adds a barrier to `slot`, notifying hooks first.
    pub(super) fn shield_slot(&mut self, slot: Slot, amount: i32) -> i32 {
        let target = match slot {
            Slot::Party(i) => &self.party[i],
            Slot::Enemy => &*self.enemy,
        };
        self.hooks.before_shield(target);
        self.slot_mut(slot).add_shield(amount)
    }

    pub(super) fn buff_party(&mut self, changes: &[StatChange], turns: u32) -> StepOutput {
        let slots = self.living_slots();
        StepOutput {
            effects: self.apply_changes(&slots, changes, turns, Direction::Buff),
            target_name: None,
        }
    }

    pub(super) fn debuff_enemy(&mut self, changes: &[StatChange], turns: u32) -> StepOutput {
        let mut out = StepOutput::aimed_at(self.enemy.name());
        out.effects = self.apply_changes(&[Slot::Enemy], changes, turns, Direction::EnemyDebuff);
        out
    }

    pub(super) fn debuff_self(&mut self, changes: &[StatChange], turns: u32) -> StepOutput {
        let actor = Slot::Party(self.actor);
        let mut out = StepOutput::aimed_at(self.actor().name());
        out.effects = self.apply_changes(&[actor], changes, turns, Direction::SelfDebuff);
        out
    }

    /// Rolls a named affliction onto the combatant picked by `target`.
    ///
    /// Stun and daze last as long as the target's `prone` value when it is
    /// positive. A failed roll still applies any vulnerability payload.
    pub(super) fn status(
        &mut self,
        name: &str,
        turns: Option<u32>,
        chance: f64,
        vulnerability: Option<TimedPct>,
        target: &TargetSpec,
    ) -> Result<StepOutput, FailureReason> {
        let slot = match target.base() {
            BaseTarget::SelfTarget => Slot::Party(self.actor),
            BaseTarget::Ally => Slot::Party(self.ally_index()?),
            BaseTarget::Enemy | BaseTarget::Team => Slot::Enemy,
        };
        let mut out = StepOutput::aimed_at(self.slot(slot).name());
        let name = name.trim();
        if name.is_empty() {
            return Ok(out);
        }

        let canonical = canonical_affliction(name);
        let prone = self.slot(slot).prone();
        let turns = if matches!(canonical.as_str(), "stun" | "dazed") && prone > 0 {
            prone
        } else {
            turns.unwrap_or(self.config.default_status_turns).max(1)
        };

        if self.rng.chance(chance) {
            let (_, applied) = self.slot_mut(slot).afflict(name, turns);
            out.effects.insert(EffectKey::StatusApplied, name);
            out.effects
                .insert(EffectKey::Turns(TurnCounter::Status), applied);
        }

        if let Some(vuln) = vulnerability.filter(|v| v.pct > 0.0) {
            let record = self.slot_mut(slot).statuses_mut().apply_strongest(
                StatusKey::NextHitVuln,
                vuln.pct,
                record_turns(vuln.turns),
            );
            out.effects.insert(EffectKey::NextHitVulnPct, record.pct);
            out.effects
                .insert(EffectKey::Turns(TurnCounter::NextHitVuln), record.turns);
        }
        Ok(out)
    }
}
