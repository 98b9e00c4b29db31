//! Turns an execution result into ordered lines.

use std::collections::BTreeMap;

use tracing::trace;

use super::combo::{ComboBook, ComboContext, ComboDiagnostics, ComboOutcome};
use super::failure::failure_line;
use super::overrides::OverrideTable;
use super::phase::{default_phase, Phase};
use super::template::{
    default_entries, render_template, Names, DEFAULT_ALLY, DEFAULT_ENEMY, DEFAULT_TEAM, HEADLINE,
    HEADLINE_ON_TARGET,
};
use super::{DisplayCue, NarrationLine};
use crate::effect::{EffectKey, EffectMap, ExecutionResult, FailureReason, StepResult};
use crate::moves::MoveKey;
use crate::rng::SeededRng;
use crate::target::{BaseTarget, TargetSpec};

/// Display cue for a line narrating `key`.
pub(super) fn cue_for(key: &EffectKey) -> Option<DisplayCue> {
    match key.canonical() {
        EffectKey::DamageDealt => Some(DisplayCue::EnemyHit),
        EffectKey::HealedHp | EffectKey::TeamHeal => Some(DisplayCue::PartyHealed),
        EffectKey::Revived | EffectKey::RevivedCount => Some(DisplayCue::Revived),
        EffectKey::ShieldAdded => Some(DisplayCue::Shielded),
        _ => None,
    }
}

// =============================================================================
// Scene
// =============================================================================

/// Names and move details narration needs besides the result itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationScene {
    /// Acting combatant.
    pub actor: String,
    /// Display name of the move.
    pub move_name: String,
    /// Move identity, used to look up authored overrides.
    pub move_key: Option<MoveKey>,
    /// Opposing combatant.
    pub enemy: String,
    /// Chosen ally, for ally-targeted moves.
    pub ally: Option<String>,
    /// Where the move was aimed.
    pub target: TargetSpec,
    /// Per-key phase placement that beats the default mapping.
    pub phase_overrides: BTreeMap<EffectKey, Phase>,
}

impl NarrationScene {
    /// Creates a scene for an enemy-targeted move with no overrides.
    #[must_use]
    pub fn new(actor: impl Into<String>, move_name: impl Into<String>, enemy: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            move_name: move_name.into(),
            move_key: None,
            enemy: enemy.into(),
            ally: None,
            target: TargetSpec::default(),
            phase_overrides: BTreeMap::new(),
        }
    }

    /// Sets the move identity.
    #[must_use]
    pub fn with_key(mut self, key: MoveKey) -> Self {
        self.move_key = Some(key);
        self
    }

    /// Sets the move target.
    #[must_use]
    pub fn with_target(mut self, target: TargetSpec) -> Self {
        self.target = target;
        self
    }

    /// Sets the chosen ally's name.
    #[must_use]
    pub fn with_ally(mut self, ally: impl Into<String>) -> Self {
        self.ally = Some(ally.into());
        self
    }

    /// Sets the phase overrides.
    #[must_use]
    pub fn with_phase_overrides(mut self, overrides: BTreeMap<EffectKey, Phase>) -> Self {
        self.phase_overrides = overrides;
        self
    }

    fn enemy_name(&self) -> &str {
        if self.enemy.trim().is_empty() {
            DEFAULT_ENEMY
        } else {
            &self.enemy
        }
    }

    /// Name for whoever a step landed on, falling back by base.
    fn step_name(&self, step: Option<&StepResult>) -> String {
        if let Some(name) = step
            .and_then(|s| s.target_name.as_deref())
            .filter(|n| !n.trim().is_empty())
        {
            return name.to_string();
        }
        let base = step.map_or(self.target.base(), |s| s.target.base());
        match base {
            BaseTarget::SelfTarget => self.actor.clone(),
            BaseTarget::Team => DEFAULT_TEAM.to_string(),
            BaseTarget::Ally => self.ally.clone().unwrap_or_else(|| DEFAULT_ALLY.to_string()),
            BaseTarget::Enemy => self.enemy_name().to_string(),
        }
    }

    /// Opening line. Only a chosen ally other than the actor is named.
    fn headline(&self, target: &str) -> String {
        let template = if self.target.base() == BaseTarget::Ally && target != self.actor {
            HEADLINE_ON_TARGET
        } else {
            HEADLINE
        };
        render_template(
            template,
            &[
                ("actor", self.actor.as_str()),
                ("move", self.move_name.as_str()),
                ("target", target),
            ],
        )
    }

    fn phase_of(&self, key: &EffectKey) -> Phase {
        self.phase_overrides
            .get(key)
            .copied()
            .unwrap_or_else(|| default_phase(key))
    }
}

// =============================================================================
// Composer
// =============================================================================

/// Builds narration from results.
///
/// Holds the combo rules and authored overrides. Composition reads nothing
/// else and keeps no state, so one composer can narrate any number of
/// battles.
#[derive(Debug, Clone)]
pub struct Composer {
    combos: ComboBook,
    overrides: OverrideTable,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(ComboBook::standard(), OverrideTable::new())
    }
}

impl Composer {
    /// Creates a composer.
    #[must_use]
    pub const fn new(combos: ComboBook, overrides: OverrideTable) -> Self {
        Self { combos, overrides }
    }

    /// Combo rules in use.
    #[must_use]
    pub const fn combos(&self) -> &ComboBook {
        &self.combos
    }

    /// Authored overrides in use.
    #[must_use]
    pub const fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    /// Replaces the combo rules.
    pub fn set_combos(&mut self, combos: ComboBook) {
        self.combos = combos;
    }

    /// Replaces the authored overrides.
    pub fn set_overrides(&mut self, overrides: OverrideTable) {
        self.overrides = overrides;
    }

    /// Narrates `result`, discarding combo diagnostics.
    #[must_use]
    pub fn compose(&self, scene: &NarrationScene, result: &ExecutionResult) -> Vec<NarrationLine> {
        self.compose_with_diagnostics(scene, result, &mut ComboDiagnostics::new())
    }

    /// Narrates `result`.
    ///
    /// # Arguments
    ///
    /// * `scene` - Names, target and phase overrides of the move
    /// * `result` - What the executor returned
    /// * `diagnostics` - Receives the applied combo and any rule errors
    ///
    /// # Returns
    ///
    /// At least one line. A failed move yields exactly its failure line.
    pub fn compose_with_diagnostics(
        &self,
        scene: &NarrationScene,
        result: &ExecutionResult,
        diagnostics: &mut ComboDiagnostics,
    ) -> Vec<NarrationLine> {
        if !result.used {
            let reason = result.failure.unwrap_or(FailureReason::NoEffect);
            return vec![NarrationLine::new(
                Phase::PreEffect,
                failure_line(reason, &scene.move_name),
            )];
        }

        let headline_target = scene.step_name(result.steps.first());
        let names = Names::new(
            scene.actor.clone(),
            headline_target.clone(),
            scene.enemy_name(),
        );

        if let Some(text) = scene.move_key.as_ref().and_then(|k| self.overrides.get(k)) {
            trace!(move_name = %scene.move_name, "narrating authored override");
            return text.render(&names, &scene.move_name, &result.effects);
        }

        let headline = scene.headline(&headline_target);
        let combo = self.evaluate_combo(scene, result, diagnostics);
        let lines = default_lines(scene, result, headline, combo.as_ref());
        trace!(
            move_name = %scene.move_name,
            lines = lines.len(),
            combo = diagnostics.applied().unwrap_or("none"),
            "narration composed"
        );
        lines
    }

    fn evaluate_combo(
        &self,
        scene: &NarrationScene,
        result: &ExecutionResult,
        diagnostics: &mut ComboDiagnostics,
    ) -> Option<ComboOutcome> {
        let healed = healed_name(scene, &result.steps);
        let ctx = ComboContext::new(
            &result.effects,
            &scene.actor,
            &scene.move_name,
            scene.enemy_name(),
        )
        .with_tags(scene.target.tags(), scene.target.hits_team())
        .with_healed(&healed);
        let mut rng = SeededRng::new(result.narration_seed);
        self.combos
            .evaluate(&ctx, &mut rng, diagnostics)
            .map(|(_, outcome)| outcome)
    }
}

/// Default lines, one phase-ordered block per step.
///
/// Only the first block carries the headline and the combo injections.
fn default_lines(
    scene: &NarrationScene,
    result: &ExecutionResult,
    headline: String,
    combo: Option<&ComboOutcome>,
) -> Vec<NarrationLine> {
    let steps: Vec<(Option<&StepResult>, &EffectMap)> = if result.steps.is_empty() {
        vec![(None, &result.effects)]
    } else {
        result.steps.iter().map(|s| (Some(s), &s.effects)).collect()
    };

    let mut lines = Vec::new();
    let mut replaced = Vec::new();
    for (index, (step, effects)) in steps.into_iter().enumerate() {
        let names = Names::new(scene.actor.clone(), scene.step_name(step), scene.enemy_name());
        let mut entries = default_entries(effects, &names);
        if let Some(outcome) = combo {
            entries = outcome.apply(entries, &mut replaced);
        }

        let mut buckets: [Vec<NarrationLine>; 6] = Default::default();
        if index == 0 {
            let opening = &mut buckets[Phase::PreEffect.index()];
            opening.push(NarrationLine::new(Phase::PreEffect, headline.clone()));
            if let Some(outcome) = combo {
                opening.extend(
                    outcome
                        .injected()
                        .into_iter()
                        .map(|l| NarrationLine::new(Phase::PreEffect, l)),
                );
            }
        }
        for entry in entries {
            let phase = scene.phase_of(&entry.key);
            buckets[phase.index()]
                .push(NarrationLine::new(phase, entry.text).with_cue(cue_for(&entry.key)));
        }
        lines.extend(buckets.into_iter().flatten());
    }

    if lines.is_empty() {
        lines.push(NarrationLine::new(Phase::PreEffect, headline));
    }
    lines
}

/// Name of whoever recovered HP, for drain-style combo lines.
fn healed_name(scene: &NarrationScene, steps: &[StepResult]) -> String {
    steps
        .iter()
        .find(|s| s.effects.has(&EffectKey::HealedHp) || s.effects.has(&EffectKey::Heal))
        .filter(|s| s.target.base() != BaseTarget::Enemy)
        .map_or_else(|| scene.actor.clone(), |s| scene.step_name(Some(s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::StatId;
    use crate::effect::EffectValue;
    use crate::narration::TextOverride;

    fn step(base: BaseTarget, name: Option<&str>, pairs: &[(EffectKey, EffectValue)]) -> StepResult {
        StepResult {
            label: "test".into(),
            target: TargetSpec::new(base),
            effects: pairs.iter().cloned().collect(),
            target_name: name.map(str::to_string),
        }
    }

    fn texts(lines: &[NarrationLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    fn scene() -> NarrationScene {
        NarrationScene::new("Rocky", "Haymaker", "Drago")
    }

    mod failure_tests {
        use super::*;

        #[test]
        fn failure_is_a_single_line() {
            let result = ExecutionResult::failed(FailureReason::Cooldown { remaining: 2 });
            let lines = Composer::default().compose(&scene(), &result);
            assert_eq!(texts(&lines), ["Haymaker is on cooldown (2 turns)."]);
        }
    }

    mod default_tests {
        use super::*;

        #[test]
        fn lifesteal_replaces_heal_line_only() {
            let result = ExecutionResult::succeeded(
                vec![step(
                    BaseTarget::Enemy,
                    Some("Drago"),
                    &[(EffectKey::DamageDealt, 40.into()), (EffectKey::HealedHp, 12.into())],
                )],
                9,
            );
            let mut diagnostics = ComboDiagnostics::new();
            let lines = Composer::default().compose_with_diagnostics(&scene(), &result, &mut diagnostics);
            assert_eq!(diagnostics.applied(), Some("lifesteal"));
            assert_eq!(lines[0].text, "Rocky uses Haymaker!");
            assert_eq!(lines[1].text, "Drago takes 40 damage.");
            assert_eq!(lines[1].cue, Some(DisplayCue::EnemyHit));
            assert!(lines[2].text.contains("Rocky"));
            assert!(lines[2].text.ends_with("(+12HP)."));
            assert_eq!(lines.len(), 3);
        }

        #[test]
        fn headline_only_on_first_step() {
            let result = ExecutionResult::succeeded(
                vec![
                    step(BaseTarget::Enemy, Some("Drago"), &[(EffectKey::DamageDealt, 10.into())]),
                    step(BaseTarget::SelfTarget, None, &[(EffectKey::Buff(StatId::Atk), 0.1.into())]),
                ],
                1,
            );
            let lines = Composer::new(ComboBook::new(), OverrideTable::new()).compose(&scene(), &result);
            assert_eq!(
                texts(&lines),
                ["Rocky uses Haymaker!", "Drago takes 10 damage.", "Rocky's ATK rises."]
            );
        }

        #[test]
        fn phases_order_within_a_step() {
            let result = ExecutionResult::succeeded(
                vec![step(
                    BaseTarget::SelfTarget,
                    None,
                    &[
                        (EffectKey::StatusApplied, "dazed".into()),
                        (EffectKey::ShieldAdded, 20.into()),
                        (EffectKey::HealedHp, 5.into()),
                    ],
                )],
                1,
            );
            let scene = scene().with_target(TargetSpec::new(BaseTarget::SelfTarget));
            let lines = Composer::new(ComboBook::new(), OverrideTable::new()).compose(&scene, &result);
            assert_eq!(
                texts(&lines),
                [
                    "Rocky uses Haymaker!",
                    "Rocky gains a protective shield.",
                    "Rocky recovers 5 HP.",
                    "Drago looks dazed!",
                ]
            );
        }

        #[test]
        fn phase_override_moves_a_key() {
            let result = ExecutionResult::succeeded(
                vec![step(
                    BaseTarget::Enemy,
                    None,
                    &[(EffectKey::DamageDealt, 10.into()), (EffectKey::NextHitVulnPct, 0.2.into())],
                )],
                1,
            );
            let mut overrides = BTreeMap::new();
            overrides.insert(EffectKey::NextHitVulnPct, Phase::PreEffect);
            let scene = scene().with_phase_overrides(overrides);
            let lines = Composer::new(ComboBook::new(), OverrideTable::new()).compose(&scene, &result);
            assert_eq!(lines[1].text, "Drago is left exposed to the next attack.");
            assert_eq!(lines[1].phase, Phase::PreEffect);
        }

        #[test]
        fn ally_headline_names_the_ally() {
            let result = ExecutionResult::succeeded(
                vec![step(BaseTarget::Ally, Some("Adrian"), &[(EffectKey::HealedHp, 30.into())])],
                1,
            );
            let scene = scene().with_target(TargetSpec::new(BaseTarget::Ally));
            let lines = Composer::default().compose(&scene, &result);
            assert_eq!(texts(&lines), ["Rocky uses Haymaker on Adrian!", "Adrian recovers 30 HP."]);
            assert_eq!(lines[1].cue, Some(DisplayCue::PartyHealed));
        }

        #[test]
        fn used_without_effects_still_has_a_headline() {
            let result = ExecutionResult::succeeded(Vec::new(), 1);
            let lines = Composer::default().compose(&scene(), &result);
            assert_eq!(texts(&lines), ["Rocky uses Haymaker!"]);
        }

        #[test]
        fn blank_enemy_falls_back() {
            let result = ExecutionResult::succeeded(
                vec![step(BaseTarget::Enemy, None, &[(EffectKey::DamageDealt, 3.into())])],
                1,
            );
            let lines = Composer::default().compose(&NarrationScene::new("Rocky", "Jab", " "), &result);
            assert_eq!(lines[1].text, "The enemy takes 3 damage.");
        }

        #[test]
        fn same_result_narrates_identically() {
            let result = ExecutionResult::succeeded(
                vec![step(
                    BaseTarget::Enemy,
                    Some("Drago"),
                    &[(EffectKey::DamageDealt, 40.into()), (EffectKey::Buff(StatId::Atk), 0.2.into())],
                )],
                77,
            );
            let composer = Composer::default();
            assert_eq!(composer.compose(&scene(), &result), composer.compose(&scene(), &result));
        }
    }

    mod override_tests {
        use super::*;

        #[test]
        fn authored_text_bypasses_defaults_and_combos() {
            let key = MoveKey::signature("rocky", "haymaker");
            let mut table = OverrideTable::new();
            table.insert(
                key.clone(),
                TextOverride::default()
                    .with_intro("{actor} loads up...")
                    .with_effect(EffectKey::HealedHp, "{actor} catches a breath (+{value}).")
                    .with_effect(EffectKey::DamageDealt, "{enemy} eats {value}!"),
            );
            let result = ExecutionResult::succeeded(
                vec![step(
                    BaseTarget::Enemy,
                    Some("Drago"),
                    &[(EffectKey::DamageDealt, 40.into()), (EffectKey::HealedHp, 12.into())],
                )],
                1,
            );
            let mut diagnostics = ComboDiagnostics::new();
            let lines = Composer::new(ComboBook::standard(), table).compose_with_diagnostics(
                &scene().with_key(key),
                &result,
                &mut diagnostics,
            );
            assert_eq!(
                texts(&lines),
                ["Rocky loads up...", "Rocky catches a breath (+12).", "Drago eats 40!"]
            );
            assert!(diagnostics.applied().is_none());
        }
    }
}
