//! Crate-level scenario, determinism and property tests.
//!
//! Unit tests live next to the code they cover. The suites here drive the
//! whole pipeline through [`crate::engine::Engine`]:
//! - **Scenario tests**: authored tables through listing, execution and
//!   narration
//! - **Determinism tests**: same seed and inputs give the same results and
//!   lines
//! - **Property tests**: `proptest` checks of the stacking, cooldown, healing
//!   and narration invariants
//!
//! # Test Structure
//!
//! - `helpers.rs`: fixtures and tracing setup
//! - `scenarios.rs`: end-to-end battles
//! - `determinism.rs`: replay checks
//! - `properties.rs`: property tests

mod helpers;
mod scenarios;

pub use helpers::*;
