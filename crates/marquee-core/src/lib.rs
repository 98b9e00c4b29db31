//! # Marquee Core
//!
//! Combat resolution and narration for Marquee, a turn-based battle game
//! where a party of movie characters fights a single enemy.
//!
//! This crate resolves which special moves a combatant has, executes a chosen
//! move against the battle state, and turns the result into ordered
//! message-box lines.
//!
//! ## Architecture
//!
//! - **Moves**: authoring tables (signature and genre moves) resolved into
//!   typed [`moves::MoveDescriptor`]s with live cooldowns
//! - **Executor**: applies a descriptor to the combatants and reports an
//!   [`effect::ExecutionResult`]
//! - **Narration**: ranks effects, applies combo rules and authored
//!   overrides, and sorts lines into phases
//! - **Inference**: preview labels such as `TARGET ENEMY (DMG)`
//!
//! [`engine::Engine`] ties them together behind the calls a battle screen
//! makes each turn.
//!
//! ## Usage
//!
//! ```
//! use marquee_core::combatant::Combatant;
//! use marquee_core::config::EngineConfig;
//! use marquee_core::engine::Engine;
//! use marquee_core::moves::{Genre, MoveTables};
//! use marquee_core::rng::SeededRng;
//!
//! let tables = MoveTables::new().with_standard_genres()?;
//! let mut engine = Engine::new(EngineConfig::default(), tables, Box::new(SeededRng::new(5)));
//!
//! let mut party = vec![Combatant::new("Rocky", 100, 100, 10).with_genres([Genre::Action])];
//! let mut enemy = Combatant::new("Drago", 500, 50, 20);
//!
//! let moves = engine.moves_for(&party[0]);
//! let result = engine.execute_move(&mut party, 0, &mut enemy, moves.first(), None);
//! let lines = engine.build_narration(&party, 0, &enemy, moves.first(), None, &result);
//! assert!(!lines.is_empty());
//! # Ok::<(), marquee_core::moves::TableError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod combatant;
pub mod config;
pub mod cooldown;
pub mod effect;
pub mod engine;
pub mod executor;
pub mod inference;
pub mod moves;
pub mod narration;
pub mod rng;
pub mod target;

pub use config::EngineConfig;
pub use engine::Engine;

#[cfg(test)]
mod tests;
