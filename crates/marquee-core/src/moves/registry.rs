//! Move tables and per-actor resolution.
//!
//! [`MoveTables`] holds the static authoring data. [`MoveRegistry`] turns it
//! into [`MoveDescriptor`]s for one actor, attaching the actor's live cooldown
//! state. Descriptors are cheap to rebuild and are never cached: cooldowns are
//! keyed by [`MoveKey`], so rebuilding never resets them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::authoring::{GenreDefinition, SignatureMove, TableError};
use super::kind::{Genre, MoveKey, MoveKind, MoveSource, Tier};
use crate::combatant::Combatant;
use crate::config::EngineConfig;
use crate::effect::EffectKey;
use crate::narration::Phase;
use crate::target::TargetSpec;

/// Standard genre table shipped with the crate.
const STANDARD_GENRES: &str = include_str!("../../data/genre_moves.json");

/// A move ready to show in a menu or hand to the executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveDescriptor {
    /// Identifier (`genre_action_primary` for genre moves).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Menu description.
    pub description: String,
    /// Behavior and parameters.
    pub kind: MoveKind,
    /// Signature or genre.
    pub source: MoveSource,
    /// Normalized target.
    pub target: TargetSpec,
    /// Cooldown started on a successful use.
    pub cooldown_turns: u32,
    /// Stable identity.
    pub key: MoveKey,
    /// Narration phase overrides.
    pub phase_overrides: BTreeMap<EffectKey, Phase>,
    /// Turns left on the actor's cooldown at resolution time.
    pub cooldown_remaining: u32,
    /// True when `cooldown_remaining == 0`.
    pub ready: bool,
}

impl MoveDescriptor {
    /// Builds a ready descriptor aimed at the kind's default target.
    ///
    /// Intended for moves assembled in code rather than loaded from tables.
    #[must_use]
    pub fn new(key: MoveKey, name: impl Into<String>, kind: MoveKind) -> Self {
        let target = kind.default_target();
        let id = key.as_str().rsplit(':').next().unwrap_or_default().to_string();
        Self {
            id,
            name: name.into(),
            description: String::new(),
            kind,
            source: MoveSource::Signature,
            target,
            cooldown_turns: 3,
            key,
            phase_overrides: BTreeMap::new(),
            cooldown_remaining: 0,
            ready: true,
        }
    }

    /// Replaces the target.
    #[must_use]
    pub fn with_target(mut self, target: TargetSpec) -> Self {
        self.target = target;
        self
    }

    /// Replaces the cooldown.
    #[must_use]
    pub const fn with_cooldown(mut self, turns: u32) -> Self {
        self.cooldown_turns = turns;
        self
    }

    /// Forces `key` into `phase` during narration.
    #[must_use]
    pub fn with_phase_override(mut self, key: EffectKey, phase: Phase) -> Self {
        self.phase_overrides.insert(key, phase);
        self
    }

    /// Refreshes live cooldown fields from `actor`.
    pub fn refresh_cooldown(&mut self, actor: &Combatant) {
        self.cooldown_remaining = actor.cooldowns().remaining(&self.key);
        self.ready = self.cooldown_remaining == 0;
    }
}

/// Authored signature entries for one identity: one move or several.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SignatureEntry {
    One(Box<SignatureMove>),
    Many(Vec<SignatureMove>),
}

impl SignatureEntry {
    fn into_vec(self) -> Vec<SignatureMove> {
        match self {
            Self::One(mv) => vec![*mv],
            Self::Many(list) => list,
        }
    }
}

// =============================================================================
// MoveTables
// =============================================================================

/// Static authoring data.
///
/// # Example
///
/// ```
/// use marquee_core::moves::{Genre, MoveTables};
///
/// let tables = MoveTables::new().with_standard_genres().unwrap();
/// assert_eq!(tables.genre(Genre::Action).unwrap().primary_name, "Full Throttle");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveTables {
    signatures: BTreeMap<String, Vec<SignatureMove>>,
    genres: BTreeMap<Genre, GenreDefinition>,
}

impl MoveTables {
    /// Creates empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the embedded standard genre table.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] if the embedded data fails to parse.
    pub fn with_standard_genres(mut self) -> Result<Self, TableError> {
        self.load_genres_json(STANDARD_GENRES)?;
        Ok(self)
    }

    /// Loads signature moves from a JSON object of identity → move or list.
    ///
    /// Every kind string is checked; an unknown one rejects the whole table.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Json`] for malformed input, or the first
    /// conversion error.
    pub fn load_signatures_json(&mut self, json: &str, config: &EngineConfig) -> Result<(), TableError> {
        let raw: BTreeMap<String, SignatureEntry> = serde_json::from_str(json)?;
        let mut parsed = BTreeMap::new();
        for (identity, entry) in raw {
            let moves = entry.into_vec();
            for mv in &moves {
                mv.effect.to_kind(&mv.id, config)?;
            }
            parsed.insert(identity, moves);
        }
        self.signatures.extend(parsed);
        Ok(())
    }

    /// Loads genre definitions from a JSON object keyed by genre name.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Json`] for malformed input and
    /// [`TableError::UnknownGenre`] for a key that names no genre.
    pub fn load_genres_json(&mut self, json: &str) -> Result<(), TableError> {
        let raw: BTreeMap<String, GenreDefinition> = serde_json::from_str(json)?;
        for (name, definition) in raw {
            let genre: Genre = name
                .parse()
                .map_err(|_| TableError::UnknownGenre { name: name.clone() })?;
            self.genres.insert(genre, definition);
        }
        Ok(())
    }

    /// Appends a signature move for `identity`.
    pub fn insert_signature(&mut self, identity: impl Into<String>, mv: SignatureMove) {
        self.signatures.entry(identity.into()).or_default().push(mv);
    }

    /// Sets the definition for `genre`.
    pub fn insert_genre(&mut self, genre: Genre, definition: GenreDefinition) {
        self.genres.insert(genre, definition);
    }

    /// Signature moves for `identity` in authored order.
    #[must_use]
    pub fn signatures(&self, identity: &str) -> &[SignatureMove] {
        self.signatures.get(identity).map_or(&[], Vec::as_slice)
    }

    /// Definition for `genre`.
    #[must_use]
    pub fn genre(&self, genre: Genre) -> Option<&GenreDefinition> {
        self.genres.get(&genre)
    }
}

// =============================================================================
// MoveRegistry
// =============================================================================

/// Resolves the moves available to an actor.
#[derive(Debug, Clone)]
pub struct MoveRegistry {
    tables: MoveTables,
    config: EngineConfig,
}

impl MoveRegistry {
    /// Creates a registry over `tables`.
    #[must_use]
    pub const fn new(tables: MoveTables, config: EngineConfig) -> Self {
        Self { tables, config }
    }

    /// Underlying tables.
    #[must_use]
    pub const fn tables(&self) -> &MoveTables {
        &self.tables
    }

    /// Lists `actor`'s moves: signature moves in authored order, then the
    /// primary move of the first genre and the secondary move of the second.
    ///
    /// Entries whose kind cannot be converted are skipped with a warning.
    #[must_use]
    pub fn resolve_for(&self, actor: &Combatant) -> Vec<MoveDescriptor> {
        let mut moves = Vec::new();

        if let Some(identity) = actor.identity() {
            for mv in self.tables.signatures(identity) {
                match self.signature_descriptor(identity, mv) {
                    Ok(descriptor) => moves.push(descriptor),
                    Err(err) => warn!(identity, id = %mv.id, %err, "skipping signature move"),
                }
            }
        }

        let tiers = [Tier::Primary, Tier::Secondary];
        for (genre, tier) in actor.genres().iter().zip(tiers) {
            if let Some(descriptor) = self.genre_descriptor(*genre, tier) {
                moves.push(descriptor);
            }
        }

        for descriptor in &mut moves {
            descriptor.refresh_cooldown(actor);
        }
        moves
    }

    fn signature_descriptor(
        &self,
        identity: &str,
        mv: &SignatureMove,
    ) -> Result<MoveDescriptor, TableError> {
        let kind = mv.effect.to_kind(&mv.id, &self.config)?;
        let target = mv.effect.resolve_target(&kind);
        Ok(MoveDescriptor {
            id: mv.id.clone(),
            name: mv.name.clone(),
            description: mv.description.clone(),
            kind,
            source: MoveSource::Signature,
            target,
            cooldown_turns: mv
                .cooldown_turns
                .unwrap_or(self.config.default_cooldown_turns),
            key: MoveKey::signature(identity, &mv.id),
            phase_overrides: mv.phase.clone(),
            cooldown_remaining: 0,
            ready: true,
        })
    }

    /// Builds the descriptor for one genre move, if the genre is defined.
    #[must_use]
    pub fn genre_descriptor(&self, genre: Genre, tier: Tier) -> Option<MoveDescriptor> {
        let definition = self.tables.genre(genre)?;
        let (name, effect) = match tier {
            Tier::Primary => (&definition.primary_name, &definition.primary),
            Tier::Secondary => (&definition.secondary_name, &definition.secondary),
        };
        Some(MoveDescriptor {
            id: format!("genre_{}_{}", genre.as_str().to_lowercase(), tier.as_str()),
            name: name.clone(),
            description: definition.description.clone(),
            kind: MoveKind::Genre(effect.clone()),
            source: MoveSource::Genre { genre, tier },
            target: TargetSpec::from_input(&definition.target),
            cooldown_turns: self.config.default_cooldown_turns,
            key: MoveKey::genre(genre, tier),
            phase_overrides: BTreeMap::new(),
            cooldown_remaining: 0,
            ready: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::BaseTarget;

    const SIGNATURES: &str = r#"{
        "jaws": [
            {"id": "bigger_boat", "name": "Bigger Boat", "kind": "damageEnemy", "powerMultiplier": 1.8},
            {"id": "chum", "name": "Chum the Water", "kind": "healSelf", "amount": 25, "cooldownTurns": 2}
        ],
        "rocky": {"id": "montage", "name": "Training Montage", "kind": "buffParty", "atkPct": 0.2}
    }"#;

    fn registry() -> MoveRegistry {
        let config = EngineConfig::default();
        let mut tables = MoveTables::new().with_standard_genres().unwrap();
        tables.load_signatures_json(SIGNATURES, &config).unwrap();
        MoveRegistry::new(tables, config)
    }

    mod table_tests {
        use super::*;

        #[test]
        fn standard_table_covers_every_genre() {
            let tables = MoveTables::new().with_standard_genres().unwrap();
            for genre in Genre::ALL {
                assert!(tables.genre(genre).is_some(), "missing {genre}");
            }
        }

        #[test]
        fn unknown_kind_rejects_table() {
            let mut tables = MoveTables::new();
            let err = tables
                .load_signatures_json(
                    r#"{"x": {"id": "a", "name": "A", "kind": "teleport"}}"#,
                    &EngineConfig::default(),
                )
                .unwrap_err();
            assert!(matches!(err, TableError::UnknownKind { .. }));
        }

        #[test]
        fn unknown_genre_rejects_table() {
            let mut tables = MoveTables::new();
            let err = tables
                .load_genres_json(
                    r#"{"WESTERN": {"target": "enemy", "primaryName": "a", "secondaryName": "b",
                        "primary": {}, "secondary": {}}}"#,
                )
                .unwrap_err();
            assert!(matches!(err, TableError::UnknownGenre { name } if name == "WESTERN"));
        }

        #[test]
        fn malformed_json_is_reported() {
            let mut tables = MoveTables::new();
            assert!(matches!(
                tables.load_genres_json("{"),
                Err(TableError::Json(_))
            ));
        }
    }

    mod resolve_tests {
        use super::*;

        #[test]
        fn signature_then_genre_moves() {
            let actor = Combatant::new("Jaws", 100, 30, 10)
                .with_identity("jaws")
                .with_genres([Genre::Thriller, Genre::Adventure]);
            let moves = registry().resolve_for(&actor);
            let keys: Vec<_> = moves.iter().map(|m| m.key.to_string()).collect();
            assert_eq!(
                keys,
                vec![
                    "sig:jaws:bigger_boat",
                    "sig:jaws:chum",
                    "genre:THRILLER:primary",
                    "genre:ADVENTURE:secondary",
                ]
            );
            assert_eq!(moves[1].cooldown_turns, 2);
            assert_eq!(moves[0].cooldown_turns, 3);
            assert_eq!(moves[1].target.base(), BaseTarget::SelfTarget);
            assert_eq!(moves[3].name, "United Front");
            assert!(moves[3].target.has_tag("teamstrike"));
        }

        #[test]
        fn single_object_entry_is_accepted() {
            let actor = Combatant::new("Rocky", 100, 30, 10).with_identity("rocky");
            let moves = registry().resolve_for(&actor);
            assert_eq!(moves.len(), 1);
            assert_eq!(moves[0].target.base(), BaseTarget::Team);
        }

        #[test]
        fn nothing_to_resolve_is_empty() {
            let actor = Combatant::new("Nobody", 100, 30, 10);
            assert!(registry().resolve_for(&actor).is_empty());
        }

        #[test]
        fn live_cooldowns_are_attached() {
            let mut actor = Combatant::new("Jaws", 100, 30, 10).with_identity("jaws");
            actor
                .cooldowns_mut()
                .start(&MoveKey::signature("jaws", "chum"), 2);
            let moves = registry().resolve_for(&actor);
            assert!(moves[0].ready);
            assert_eq!(moves[1].cooldown_remaining, 2);
            assert!(!moves[1].ready);
        }

        #[test]
        fn bad_kind_built_in_code_is_skipped() {
            let mut tables = MoveTables::new();
            let mut mv: SignatureMove = serde_json::from_str(
                r#"{"id": "ok", "name": "Ok", "kind": "healSelf"}"#,
            )
            .unwrap();
            tables.insert_signature("x", mv.clone());
            mv.id = "bad".into();
            mv.effect.kind = "moonwalk".into();
            tables.insert_signature("x", mv);
            let registry = MoveRegistry::new(tables, EngineConfig::default());
            let actor = Combatant::new("X", 10, 1, 1).with_identity("x");
            let moves = registry.resolve_for(&actor);
            assert_eq!(moves.len(), 1);
            assert_eq!(moves[0].id, "ok");
        }
    }
}
