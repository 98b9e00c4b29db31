//! End-to-end battles through [`Engine`](crate::engine::Engine).
//!
//! Each test lists moves from authored tables, executes one and checks both
//! the combatants and the narration a player would read.

use crate::effect::{EffectKey, FailureReason};
use crate::inference::{markers_from_effects, Markers};
use crate::narration::combo::ComboDiagnostics;
use crate::narration::{OverrideTable, Phase};

use super::{
    find_move, fixture_enemy, fixture_party, init_tracing, scripted_engine, seeded_engine, texts,
};

// =============================================================================
// Listing
// =============================================================================

#[test]
fn test_listing_puts_signatures_before_genres() {
    init_tracing();
    let engine = scripted_engine(0.5);
    let party = fixture_party();

    let names = |i: usize| -> Vec<String> {
        engine
            .moves_for(&party[i])
            .into_iter()
            .map(|m| m.name)
            .collect()
    };
    assert_eq!(
        names(0),
        ["Haymaker", "Eye of the Tiger", "Full Throttle", "Slow-Build Payoff"]
    );
    assert_eq!(names(1), ["Corner Care", "Emotional Support"]);
    assert_eq!(names(2), ["Showboat"]);
}

#[test]
fn test_labels_preview_each_move() {
    let engine = scripted_engine(0.5);
    let party = fixture_party();
    let moves = engine.moves_for(&party[0]);

    assert_eq!(
        engine.target_label(&find_move(&moves, "Haymaker")),
        "TARGET ENEMY (DMG)"
    );
    assert_eq!(
        engine.target_label(&find_move(&moves, "Eye of the Tiger")),
        "FOR SELF (HEAL) + TARGET ENEMY (DMG)"
    );
    assert_eq!(
        engine.target_label(&find_move(&moves, "Full Throttle")),
        "FOR SELF (+ATK) + TARGET ENEMY (DMG)"
    );
}

// =============================================================================
// Execution and narration
// =============================================================================

#[test]
fn test_compound_hit_and_heal_reads_as_lifesteal() {
    init_tracing();
    let mut engine = scripted_engine(0.5);
    let mut party = fixture_party();
    let mut enemy = fixture_enemy();
    party[0].take_damage(50);
    let mv = find_move(&engine.moves_for(&party[0]), "Eye of the Tiger");

    let result = engine.execute_move(&mut party, 0, &mut enemy, Some(&mv), None);
    assert!(result.used);
    assert!(result.is_multi_step());
    assert_eq!(enemy.hp(), 920);
    assert_eq!(party[0].hp(), 70);

    let mut diagnostics = ComboDiagnostics::new();
    let lines = engine.build_narration_with_diagnostics(
        &party,
        0,
        &enemy,
        Some(&mv),
        None,
        &result,
        &mut diagnostics,
    );
    assert_eq!(diagnostics.applied(), Some("lifesteal"));
    assert!(diagnostics.is_clean());
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].text, "Rocky uses Eye of the Tiger!");
    assert_eq!(lines[1].text, "Drago takes 80 damage.");
    assert!(lines[2].text.contains("Rocky"));
    assert!(lines[2].text.ends_with("(+20HP)."));
}

#[test]
fn test_ally_missing_heal_revives_downed_ally() {
    init_tracing();
    let mut engine = scripted_engine(0.5);
    let mut party = fixture_party();
    let mut enemy = fixture_enemy();
    party[0].take_damage(100);
    assert!(!party[0].is_alive());
    let mv = find_move(&engine.moves_for(&party[1]), "Corner Care");

    let result = engine.execute_move(&mut party, 1, &mut enemy, Some(&mv), Some(0));
    assert!(result.used);
    assert_eq!(party[0].hp(), 75);
    assert!(result.effects.has(&EffectKey::Revived));
    assert_eq!(result.effects.int(&EffectKey::RevivedHp), 75);

    let lines = engine.build_narration(&party, 1, &enemy, Some(&mv), Some(0), &result);
    assert_eq!(lines[0].text, "Adrian uses Corner Care on Rocky!");
    assert!(texts(&lines).contains(&"Rocky returns to the fight!"));
}

#[test]
fn test_ally_move_without_target_changes_nothing() {
    let mut engine = scripted_engine(0.5);
    let mut party = fixture_party();
    let mut enemy = fixture_enemy();
    party[0].take_damage(40);
    let mv = find_move(&engine.moves_for(&party[1]), "Corner Care");

    let result = engine.execute_move(&mut party, 1, &mut enemy, Some(&mv), None);
    assert_eq!(result.failure, Some(FailureReason::NoAllyTarget));
    assert_eq!(party[0].hp(), 60);
    assert!(party[1].cooldowns().is_ready(&mv.key));

    let lines = engine.build_narration(&party, 1, &enemy, Some(&mv), None, &result);
    assert_eq!(texts(&lines), ["No valid ally targets."]);
}

#[test]
fn test_self_buff_shields_before_stats() {
    let mut engine = scripted_engine(0.5);
    let mut party = fixture_party();
    let mut enemy = fixture_enemy();
    let mv = find_move(&engine.moves_for(&party[2]), "Showboat");
    assert_eq!(engine.target_label(&mv), "FOR SELF (SHIELD, +ATK, +DEF)");

    let result = engine.execute_move(&mut party, 2, &mut enemy, Some(&mv), None);
    assert_eq!(party[2].temp_shield(), 15);
    assert_eq!(enemy.hp(), 1_000);

    let lines = engine.build_narration(&party, 2, &enemy, Some(&mv), None, &result);
    assert_eq!(lines[0].text, "Apollo uses Showboat!");
    assert_eq!(lines[1].text, "Apollo gains a protective shield.");
    assert_eq!(lines[1].phase, Phase::PreEffect);
    assert!(texts(&lines).contains(&"Apollo's ATK rises."));
    assert!(texts(&lines).contains(&"Apollo's DEF rises."));
}

#[test]
fn test_genre_move_buffs_then_hits() {
    init_tracing();
    let mut engine = seeded_engine(21);
    let mut party = fixture_party();
    let mut enemy = fixture_enemy();
    let mv = find_move(&engine.moves_for(&party[0]), "Full Throttle");

    let result = engine.execute_move(&mut party, 0, &mut enemy, Some(&mv), None);
    assert!(result.used);
    assert!(result.effects.int(&EffectKey::DamageDealt) > 0);
    assert!(enemy.hp() < 1_000);

    let markers = markers_from_effects(&result.effects);
    assert!(markers.contains(Markers::DMG | Markers::ATK_UP));
    assert!(!markers.contains(Markers::BUFF));
}

#[test]
fn test_cooldown_cycle_across_turns() {
    let mut engine = scripted_engine(0.5);
    let mut party = fixture_party();
    let mut enemy = fixture_enemy();
    let mv = find_move(&engine.moves_for(&party[0]), "Eye of the Tiger");
    assert_eq!(mv.cooldown_turns, 4);

    assert!(engine
        .execute_move(&mut party, 0, &mut enemy, Some(&mv), None)
        .used);

    for turn in 0..4 {
        let listed = find_move(&engine.moves_for(&party[0]), "Eye of the Tiger");
        assert!(!listed.ready, "still cooling on turn {turn}");
        assert_eq!(listed.cooldown_remaining, 4 - turn);
        party[0].cooldowns_mut().tick_all();
    }

    let listed = find_move(&engine.moves_for(&party[0]), "Eye of the Tiger");
    assert!(listed.ready);
    assert!(engine
        .execute_move(&mut party, 0, &mut enemy, Some(&listed), None)
        .used);
}

#[test]
fn test_authored_override_replaces_generated_text() {
    let mut engine = scripted_engine(0.5);
    engine.set_overrides(
        OverrideTable::from_json(
            r#"{
                "sig:rocky:haymaker": {
                    "intro": "{actor} plants both feet.",
                    "effectText": { "damageDealt": "{enemy} folds for {value}." },
                    "outro": "The bell rings."
                }
            }"#,
        )
        .expect("override table parses"),
    );
    let mut party = fixture_party();
    let mut enemy = fixture_enemy();
    let mv = find_move(&engine.moves_for(&party[0]), "Haymaker");

    let result = engine.execute_move(&mut party, 0, &mut enemy, Some(&mv), None);
    let lines = engine.build_narration(&party, 0, &enemy, Some(&mv), None, &result);
    assert_eq!(
        texts(&lines),
        [
            "Rocky plants both feet.",
            "Drago folds for 130.",
            "The bell rings.",
        ]
    );
    assert_eq!(lines[2].phase, Phase::PostEffect);
}
