//! Battle-facing entry points.
//!
//! [`Engine`] bundles the move registry, the executor, the narration
//! composer and the injected random source behind the calls a battle screen
//! makes each turn: list the actor's moves, execute the chosen one, narrate
//! the result.
//!
//! # Example
//!
//! ```
//! use marquee_core::combatant::Combatant;
//! use marquee_core::config::EngineConfig;
//! use marquee_core::engine::Engine;
//! use marquee_core::moves::{MoveDescriptor, MoveKey, MoveKind, MoveTables};
//! use marquee_core::rng::SeededRng;
//!
//! let mut engine = Engine::new(
//!     EngineConfig::default(),
//!     MoveTables::new(),
//!     Box::new(SeededRng::new(11)),
//! );
//! let mut party = vec![Combatant::new("Rocky", 100, 100, 10)];
//! let mut enemy = Combatant::new("Drago", 500, 50, 20);
//! let mv = MoveDescriptor::new(
//!     MoveKey::signature("rocky", "haymaker"),
//!     "Haymaker",
//!     MoveKind::DamageEnemy { multiplier: 1.5, self_debuff: None },
//! );
//!
//! let result = engine.execute_move(&mut party, 0, &mut enemy, Some(&mv), None);
//! let lines = engine.build_narration(&party, 0, &enemy, Some(&mv), None, &result);
//! assert_eq!(lines[0].text, "Rocky uses Haymaker!");
//! assert_eq!(lines[1].text, "Drago takes 130 damage.");
//! ```

use std::fmt;

use tracing::debug;

use crate::combatant::Combatant;
use crate::config::EngineConfig;
use crate::effect::ExecutionResult;
use crate::executor::{ExecutionHooks, Executor, NoHooks, Participants};
use crate::inference;
use crate::moves::{MoveDescriptor, MoveRegistry, MoveTables};
use crate::narration::combo::{ComboBook, ComboDiagnostics};
use crate::narration::{Composer, NarrationLine, NarrationScene, OverrideTable};
use crate::rng::BattleRng;

/// Move listing, execution and narration for one battle session.
pub struct Engine {
    registry: MoveRegistry,
    executor: Executor,
    composer: Composer,
    rng: Box<dyn BattleRng>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", self.executor.config())
            .field("composer", &self.composer)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Creates an engine with the standard combo rules and no overrides.
    ///
    /// # Arguments
    ///
    /// * `config` - Constants shared by the registry and the executor
    /// * `tables` - Signature and genre authoring tables
    /// * `rng` - Source of every execution roll
    #[must_use]
    pub fn new(config: EngineConfig, tables: MoveTables, rng: Box<dyn BattleRng>) -> Self {
        Self {
            registry: MoveRegistry::new(tables, config.clone()),
            executor: Executor::new(config),
            composer: Composer::default(),
            rng,
        }
    }

    /// Replaces the combo rules.
    pub fn set_combos(&mut self, combos: ComboBook) {
        self.composer.set_combos(combos);
    }

    /// Replaces the authored narration overrides.
    pub fn set_overrides(&mut self, overrides: OverrideTable) {
        self.composer.set_overrides(overrides);
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        self.executor.config()
    }

    /// The move registry.
    #[must_use]
    pub const fn registry(&self) -> &MoveRegistry {
        &self.registry
    }

    /// The narration composer.
    #[must_use]
    pub const fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Lists the moves `actor` can choose from, with live cooldowns.
    #[must_use]
    pub fn moves_for(&self, actor: &Combatant) -> Vec<MoveDescriptor> {
        self.registry.resolve_for(actor)
    }

    /// Preview label for `mv`, such as `TARGET ENEMY (DMG)`.
    #[must_use]
    pub fn target_label(&self, mv: &MoveDescriptor) -> String {
        inference::target_label(mv)
    }

    /// Executes a move.
    ///
    /// # Arguments
    ///
    /// * `party` - Player party, actor included
    /// * `actor` - Index of the actor in `party`
    /// * `enemy` - The opposing combatant
    /// * `mv` - The chosen move
    /// * `target` - Party index of the chosen ally, for ally moves
    ///
    /// # Returns
    ///
    /// The execution result. Failures are reported in the result and never
    /// panic.
    pub fn execute_move(
        &mut self,
        party: &mut [Combatant],
        actor: usize,
        enemy: &mut Combatant,
        mv: Option<&MoveDescriptor>,
        target: Option<usize>,
    ) -> ExecutionResult {
        self.execute_move_with_hooks(party, actor, enemy, mv, target, &mut NoHooks)
    }

    /// Executes a move while `hooks` observes heals, shields and effects.
    pub fn execute_move_with_hooks(
        &mut self,
        party: &mut [Combatant],
        actor: usize,
        enemy: &mut Combatant,
        mv: Option<&MoveDescriptor>,
        target: Option<usize>,
        hooks: &mut dyn ExecutionHooks,
    ) -> ExecutionResult {
        let result = self.executor.execute(
            Participants::new(party, actor, enemy).with_target(target),
            mv,
            self.rng.as_mut(),
            hooks,
        );
        debug!(
            used = result.used,
            failure = ?result.failure,
            effects = result.effects.len(),
            "move executed"
        );
        result
    }

    /// Narrates a result returned by [`Engine::execute_move`].
    ///
    /// Pass the same party, actor, enemy, move and target that produced
    /// `result`. Combatants are only read for their names.
    #[must_use]
    pub fn build_narration(
        &self,
        party: &[Combatant],
        actor: usize,
        enemy: &Combatant,
        mv: Option<&MoveDescriptor>,
        target: Option<usize>,
        result: &ExecutionResult,
    ) -> Vec<NarrationLine> {
        self.build_narration_with_diagnostics(
            party,
            actor,
            enemy,
            mv,
            target,
            result,
            &mut ComboDiagnostics::new(),
        )
    }

    /// Like [`Engine::build_narration`], also reporting combo diagnostics.
    #[allow(clippy::too_many_arguments)]
    pub fn build_narration_with_diagnostics(
        &self,
        party: &[Combatant],
        actor: usize,
        enemy: &Combatant,
        mv: Option<&MoveDescriptor>,
        target: Option<usize>,
        result: &ExecutionResult,
        diagnostics: &mut ComboDiagnostics,
    ) -> Vec<NarrationLine> {
        let actor_name = party.get(actor).map_or("", Combatant::name);
        let move_name = mv.map_or("", |m| m.name.as_str());

        let mut scene = NarrationScene::new(actor_name, move_name, enemy.name());
        if let Some(mv) = mv {
            scene = scene
                .with_key(mv.key.clone())
                .with_target(mv.target.clone())
                .with_phase_overrides(mv.phase_overrides.clone());
        }
        if let Some(ally) = target.and_then(|i| party.get(i)) {
            scene = scene.with_ally(ally.name());
        }

        self.composer
            .compose_with_diagnostics(&scene, result, diagnostics)
    }
}
