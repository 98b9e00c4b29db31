//! Effect executor.
//!
//! Applies a [`MoveDescriptor`] to the combatants of one battle and returns an
//! [`ExecutionResult`]. This is the only code that mutates combatants during a
//! move.
//!
//! # Architecture
//!
//! Execution runs in three stages:
//! 1. **Checks**: actor, move, cooldown and ally targeting are validated. Any
//!    failure returns before a single combatant is touched.
//! 2. **Dispatch**: one `match` on [`MoveKind`] routes to the family handler.
//!    Compound moves run their steps in order; only a failing first step
//!    fails the move, so a failed move never leaves damage behind.
//! 3. **Wrap-up**: a move that did nothing visible lands a small fallback hit,
//!    the cooldown starts and a narration seed is drawn.
//!
//! # Determinism
//!
//! Every random roll goes through the injected [`BattleRng`] in a fixed order,
//! so the same seed and inputs give the same result.
//!
//! # Example
//!
//! ```
//! use marquee_core::combatant::Combatant;
//! use marquee_core::config::EngineConfig;
//! use marquee_core::executor::{Executor, NoHooks, Participants};
//! use marquee_core::moves::{MoveDescriptor, MoveKey, MoveKind};
//! use marquee_core::rng::SeededRng;
//!
//! let mut party = vec![Combatant::new("Rocky", 100, 100, 10)];
//! let mut enemy = Combatant::new("Drago", 500, 50, 20);
//! let mv = MoveDescriptor::new(
//!     MoveKey::signature("rocky", "haymaker"),
//!     "Haymaker",
//!     MoveKind::DamageEnemy { multiplier: 1.5, self_debuff: None },
//! );
//!
//! let executor = Executor::new(EngineConfig::default());
//! let result = executor.execute(
//!     Participants::new(&mut party, 0, &mut enemy),
//!     Some(&mv),
//!     &mut SeededRng::new(1),
//!     &mut NoHooks,
//! );
//! assert!(result.used);
//! assert_eq!(enemy.hp(), 370);
//! ```

mod damage;
mod formula;
mod genre;
mod heal;
mod hooks;
mod modifier;

pub use formula::{direct_damage, rating_multiplier, sqrt_shares};
pub use hooks::{ExecutionHooks, KeyAudit, NoHooks};

use tracing::{debug, trace};

use crate::combatant::Combatant;
use crate::config::EngineConfig;
use crate::effect::{EffectKey, EffectMap, ExecutionResult, FailureReason, StepResult};
use crate::moves::{MoveDescriptor, MoveKind, SubEffect};
use crate::rng::BattleRng;
use crate::target::TargetSpec;

/// The combatants a move can touch.
#[derive(Debug)]
pub struct Participants<'a> {
    /// Player party, actor included.
    pub party: &'a mut [Combatant],
    /// Index of the actor within `party`.
    pub actor: usize,
    /// The opposing combatant.
    pub enemy: &'a mut Combatant,
    /// Chosen ally index, for ally-targeted moves.
    pub target: Option<usize>,
}

impl<'a> Participants<'a> {
    /// Creates participants without an ally target.
    #[must_use]
    pub fn new(party: &'a mut [Combatant], actor: usize, enemy: &'a mut Combatant) -> Self {
        Self {
            party,
            actor,
            enemy,
            target: None,
        }
    }

    /// Sets the chosen ally index.
    #[must_use]
    pub const fn with_target(mut self, target: Option<usize>) -> Self {
        self.target = target;
        self
    }
}

/// Runs moves against combatants.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    config: EngineConfig,
}

impl Executor {
    /// Creates an executor with the given constants.
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Executes `mv` for the actor in `scene`.
    ///
    /// # Arguments
    ///
    /// * `scene` - Party, actor index, enemy and optional ally target
    /// * `mv` - The chosen move (`None` fails with [`FailureReason::NoSpecial`])
    /// * `rng` - Source of every roll and of the narration seed
    /// * `hooks` - Instrumentation observer
    ///
    /// # Returns
    ///
    /// A result with `used == true` and merged effects, or `used == false` and
    /// the failure reason. Failures leave combatants untouched.
    pub fn execute(
        &self,
        scene: Participants<'_>,
        mv: Option<&MoveDescriptor>,
        rng: &mut dyn BattleRng,
        hooks: &mut dyn ExecutionHooks,
    ) -> ExecutionResult {
        let Participants {
            party,
            actor,
            enemy,
            target,
        } = scene;

        let Some(actor_ref) = party.get(actor) else {
            return ExecutionResult::failed(FailureReason::NoActor);
        };
        let Some(mv) = mv else {
            return ExecutionResult::failed(FailureReason::NoSpecial);
        };
        let remaining = actor_ref.cooldowns().remaining(&mv.key);
        if remaining > 0 {
            debug!(key = %mv.key, remaining, "move on cooldown");
            return ExecutionResult::failed(FailureReason::Cooldown { remaining });
        }
        if let Err(reason) = check_targets(&mv.kind, &mv.target, party, target) {
            debug!(key = %mv.key, %reason, "targeting rejected");
            return ExecutionResult::failed(reason);
        }

        let rating = actor_ref.rating().unwrap_or(self.config.default_rating);
        debug!(key = %mv.key, kind = mv.kind.label(), rating, "executing move");

        let mut run = Run {
            config: &self.config,
            rating_mult: rating_multiplier(rating),
            rng,
            hooks,
            party,
            actor,
            enemy,
            target,
        };

        let mut steps = match run.run_kind(&mv.kind, &mv.target) {
            Ok(steps) => steps,
            Err(reason) => {
                debug!(key = %mv.key, %reason, "move failed");
                return ExecutionResult::failed(reason);
            }
        };

        if !matches!(mv.kind, MoveKind::Status { .. }) && !any_visible(&steps) {
            run.fallback_hit(&mut steps);
        }

        run.party[actor]
            .cooldowns_mut()
            .start(&mv.key, i64::from(mv.cooldown_turns));
        let seed = run.rng.next_seed();
        ExecutionResult::succeeded(steps, seed)
    }
}

/// Rejects moves whose ally targeting cannot be satisfied.
fn check_targets(
    kind: &MoveKind,
    target: &TargetSpec,
    party: &[Combatant],
    index: Option<usize>,
) -> Result<(), FailureReason> {
    if let MoveKind::Compound { steps } = kind {
        return steps
            .iter()
            .try_for_each(|step| check_targets(&step.kind, &step.target, party, index));
    }
    if !kind.needs_ally(target) {
        return Ok(());
    }
    let ally = index
        .and_then(|i| party.get(i))
        .ok_or(FailureReason::NoAllyTarget)?;
    if matches!(kind, MoveKind::HealAlly { .. }) && !ally.is_alive() {
        return Err(FailureReason::InvalidTarget);
    }
    Ok(())
}

fn any_visible(steps: &[StepResult]) -> bool {
    let mut merged = EffectMap::new();
    for step in steps {
        merged.merge(&step.effects);
    }
    merged.truthy_rendered_count() > 0
}

/// Effects of one step plus the name of the combatant it was aimed at.
#[derive(Debug, Default)]
struct StepOutput {
    effects: EffectMap,
    target_name: Option<String>,
}

impl StepOutput {
    fn aimed_at(name: &str) -> Self {
        Self {
            effects: EffectMap::new(),
            target_name: Some(name.to_string()),
        }
    }
}

/// A combatant addressed by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Party(usize),
    Enemy,
}

/// Mutable state for one execution.
struct Run<'a> {
    config: &'a EngineConfig,
    rating_mult: f64,
    rng: &'a mut dyn BattleRng,
    hooks: &'a mut dyn ExecutionHooks,
    party: &'a mut [Combatant],
    actor: usize,
    enemy: &'a mut Combatant,
    target: Option<usize>,
}

impl Run<'_> {
    fn run_kind(
        &mut self,
        kind: &MoveKind,
        target: &TargetSpec,
    ) -> Result<Vec<StepResult>, FailureReason> {
        let output = match kind {
            MoveKind::Compound { steps } => return self.run_compound(steps),
            MoveKind::DamageEnemy {
                multiplier,
                self_debuff,
            } => self.damage_enemy(*multiplier, *self_debuff),
            MoveKind::TeamStrike { min_mult, max_mult } => {
                let mut out = StepOutput::aimed_at(self.enemy.name());
                let dealt = self.team_strike(*min_mult, *max_mult, 0.0);
                out.effects.insert(EffectKey::DamageDealt, dealt);
                out
            }
            MoveKind::HealSelf { amount } => self.heal_self(*amount),
            MoveKind::HealAlly { amount } => self.heal_ally(*amount)?,
            MoveKind::HealTeam { amount } => self.heal_team(*amount),
            MoveKind::HealSelfMissing {
                heal_pct,
                revive_pct,
            } => self.heal_missing(Slot::Party(self.actor), *heal_pct, *revive_pct),
            MoveKind::HealAllyMissing {
                heal_pct,
                revive_pct,
            } => {
                let ally = self.ally_index()?;
                self.heal_missing(Slot::Party(ally), *heal_pct, *revive_pct)
            }
            MoveKind::HealTeamMissing {
                heal_pct,
                revive_pct,
            } => self.heal_team_missing(*heal_pct, *revive_pct)?,
            MoveKind::HealTeamBuff {
                heal_pct,
                changes,
                turns,
            } => self.heal_team_buff(*heal_pct, changes, *turns),
            MoveKind::SelfBuff {
                changes,
                turns,
                shield,
            } => self.self_buff(changes, *turns, *shield),
            MoveKind::BuffParty { changes, turns } => self.buff_party(changes, *turns),
            MoveKind::DebuffEnemy { changes, turns } => self.debuff_enemy(changes, *turns),
            MoveKind::DebuffSelf { changes, turns } => self.debuff_self(changes, *turns),
            MoveKind::Status {
                status,
                turns,
                chance,
                vulnerability,
            } => self.status(status, *turns, *chance, *vulnerability, target)?,
            MoveKind::Genre(effect) => self.genre(effect)?,
        };

        self.hooks.on_effects(kind.label(), &output.effects);
        trace!(kind = kind.label(), effects = output.effects.len(), "step resolved");
        Ok(vec![StepResult {
            label: kind.label().to_string(),
            target: target.clone(),
            effects: output.effects,
            target_name: output.target_name,
        }])
    }

    /// Runs compound steps in order.
    ///
    /// Only the first step can fail the move, since every step checks its
    /// own failure before mutating. Once a step has landed, a later step that
    /// changes nothing is kept as an empty step and the move stays used.
    fn run_compound(&mut self, steps: &[SubEffect]) -> Result<Vec<StepResult>, FailureReason> {
        let mut results = Vec::with_capacity(steps.len());
        for step in steps {
            match self.run_kind(&step.kind, &step.target) {
                Ok(done) => results.extend(done),
                Err(reason) if results.is_empty() => return Err(reason),
                Err(reason) => {
                    debug!(kind = step.kind.label(), %reason, "compound step had no effect");
                    results.push(StepResult {
                        label: step.kind.label().to_string(),
                        target: step.target.clone(),
                        effects: EffectMap::new(),
                        target_name: None,
                    });
                }
            }
        }
        Ok(results)
    }

    /// Lands a small hit when nothing else happened.
    fn fallback_hit(&mut self, steps: &mut [StepResult]) {
        let attack = f64::from(self.party[self.actor].atk()) * self.config.fallback_hit_multiplier;
        let dealt = self.hit(attack);
        debug!(dealt, "fallback hit");
        if let Some(last) = steps.last_mut() {
            last.effects.add(EffectKey::DamageDealt, dealt);
            if last.target_name.is_none() {
                last.target_name = Some(self.enemy.name().to_string());
            }
        }
    }

    fn ally_index(&self) -> Result<usize, FailureReason> {
        self.target
            .filter(|i| *i < self.party.len())
            .ok_or(FailureReason::NoAllyTarget)
    }

    fn actor(&self) -> &Combatant {
        &self.party[self.actor]
    }

    fn actor_mut(&mut self) -> &mut Combatant {
        &mut self.party[self.actor]
    }

    fn slot(&self, slot: Slot) -> &Combatant {
        match slot {
            Slot::Party(i) => &self.party[i],
            Slot::Enemy => self.enemy,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Combatant {
        match slot {
            Slot::Party(i) => &mut self.party[i],
            Slot::Enemy => self.enemy,
        }
    }

    /// Indices of living party members.
    fn living(&self) -> Vec<usize> {
        self.party
            .iter()
            .enumerate()
            .filter(|(_, member)| member.is_alive())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Converts a turn count into a status record counter.
fn record_turns(turns: u32) -> i32 {
    i32::try_from(turns).unwrap_or(i32::MAX)
}
