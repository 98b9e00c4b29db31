//! Fixtures shared by the crate-level suites.
//!
//! Builds a small authored table, a standard party and engines seeded for
//! replay, so each test reads as a battle rather than as setup.

use std::sync::Once;

use crate::combatant::Combatant;
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::moves::{Genre, MoveDescriptor, MoveTables};
use crate::narration::NarrationLine;
use crate::rng::{SeededRng, SequenceRng};

// =============================================================================
// Tracing
// =============================================================================

static TRACING: Once = Once::new();

/// Routes `tracing` output to the test harness.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

// =============================================================================
// Authored data
// =============================================================================

/// Signature moves for the fixture cast.
pub const SIGNATURES: &str = r#"{
    "rocky": [
        {
            "id": "haymaker",
            "name": "Haymaker",
            "kind": "damageEnemy",
            "powerMultiplier": 1.5
        },
        {
            "id": "eye_of_the_tiger",
            "name": "Eye of the Tiger",
            "kind": "dualEffect",
            "cooldownTurns": 4,
            "effects": [
                { "kind": "damageEnemy", "powerMultiplier": 1.0 },
                { "kind": "healSelf", "amount": 20 }
            ]
        }
    ],
    "adrian": {
        "id": "corner_care",
        "name": "Corner Care",
        "kind": "healAllyMissingPct",
        "healPct": 0.5,
        "revivePct": 0.75
    },
    "apollo": {
        "id": "showboat",
        "name": "Showboat",
        "kind": "SELF_BUFF",
        "atkPct": 0.2,
        "defPct": 0.1,
        "shield": 15
    }
}"#;

/// Tables with the fixture signatures and the standard genres.
pub fn fixture_tables() -> MoveTables {
    let config = EngineConfig::default();
    let mut tables = MoveTables::new()
        .with_standard_genres()
        .expect("embedded genre table parses");
    tables
        .load_signatures_json(SIGNATURES, &config)
        .expect("fixture signatures parse");
    tables
}

// =============================================================================
// Combatants
// =============================================================================

/// Rocky, Adrian and Apollo, at full health.
pub fn fixture_party() -> Vec<Combatant> {
    vec![
        Combatant::new("Rocky", 100, 100, 10)
            .with_identity("rocky")
            .with_genres([Genre::Action, Genre::Drama])
            .with_rating(7.0),
        Combatant::new("Adrian", 80, 20, 10)
            .with_identity("adrian")
            .with_genres([Genre::Romance])
            .with_rating(7.0),
        Combatant::new("Apollo", 100, 90, 15)
            .with_identity("apollo")
            .with_rating(7.0),
    ]
}

/// The opponent.
pub fn fixture_enemy() -> Combatant {
    Combatant::new("Drago", 1_000, 60, 20)
}

// =============================================================================
// Engines
// =============================================================================

/// Engine over the fixture tables with a seeded generator.
pub fn seeded_engine(seed: u64) -> Engine {
    Engine::new(
        EngineConfig::default(),
        fixture_tables(),
        Box::new(SeededRng::new(seed)),
    )
}

/// Engine whose every roll returns `value`.
pub fn scripted_engine(value: f64) -> Engine {
    Engine::new(
        EngineConfig::default(),
        fixture_tables(),
        Box::new(SequenceRng::constant(value)),
    )
}

/// Finds a listed move by display name.
pub fn find_move(moves: &[MoveDescriptor], name: &str) -> MoveDescriptor {
    moves
        .iter()
        .find(|m| m.name == name)
        .cloned()
        .unwrap_or_else(|| panic!("no move named {name}"))
}

/// Line texts, for compact assertions.
pub fn texts(lines: &[NarrationLine]) -> Vec<&str> {
    lines.iter().map(|l| l.text.as_str()).collect()
}
