//! Effect vocabulary shared by the executor and narration.
//!
//! The executor writes [`EffectKey`] → [`EffectValue`] entries into an
//! [`EffectMap`]; narration reads them back. An [`ExecutionResult`] bundles the
//! merged map with per-step results and the failure reason, if any.

pub mod key;
pub mod map;
pub mod result;

pub use key::{EffectKey, KeyClass, TurnCounter};
pub use map::{EffectMap, EffectValue};
pub use result::{ExecutionResult, FailureReason, StepResult};
