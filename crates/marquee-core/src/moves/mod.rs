//! Move taxonomy, authoring tables and the per-actor resolver.
//!
//! # Architecture
//!
//! ```text
//! SignatureMove / GenreDefinition   (authoring JSON, loose)
//!            │  EffectSpec::to_kind, TargetSpec::from_input
//!            ▼
//!      MoveDescriptor { kind: MoveKind, target: TargetSpec, key, ... }
//!            │  MoveRegistry::resolve_for attaches live cooldowns
//!            ▼
//!        executor / narration / inference
//! ```

mod authoring;
mod kind;
mod registry;

pub use authoring::{EffectSpec, GenreDefinition, SignatureMove, TableError};
pub use kind::{
    Genre, GenreEffect, HitRoll, MoveKey, MoveKind, MoveSource, ScaledPct, ShieldSpec, StatChange,
    SubEffect, TeamStrikeRoll, Tier, TimedPct,
};
pub use registry::{MoveDescriptor, MoveRegistry, MoveTables};
