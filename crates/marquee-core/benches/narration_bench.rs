use criterion::{black_box, criterion_group, criterion_main, Criterion};
use marquee_core::combatant::{Combatant, StatId};
use marquee_core::effect::{EffectKey, EffectMap, ExecutionResult, StepResult};
use marquee_core::engine::Engine;
use marquee_core::moves::{Genre, MoveTables};
use marquee_core::narration::{Composer, NarrationScene};
use marquee_core::rng::SeededRng;
use marquee_core::target::{BaseTarget, TargetSpec};
use marquee_core::EngineConfig;

fn step(base: BaseTarget, name: &str, entries: Vec<(EffectKey, i32)>) -> StepResult {
    let mut effects = EffectMap::new();
    for (key, value) in entries {
        effects.insert(key, value);
    }
    StepResult {
        label: "bench".into(),
        target: TargetSpec::new(base),
        effects,
        target_name: Some(name.to_string()),
    }
}

fn bench_compose_single_step(c: &mut Criterion) {
    let composer = Composer::default();
    let scene = NarrationScene::new("Rocky", "Haymaker", "Drago");
    let result = ExecutionResult::succeeded(
        vec![step(
            BaseTarget::Enemy,
            "Drago",
            vec![(EffectKey::DamageDealt, 130), (EffectKey::HealedHp, 20)],
        )],
        17,
    );

    c.bench_function("compose_single_step", |b| {
        b.iter(|| black_box(composer.compose(black_box(&scene), black_box(&result))))
    });
}

fn bench_compose_multi_step(c: &mut Criterion) {
    let composer = Composer::default();
    let scene = NarrationScene::new("Rocky", "Eye of the Tiger", "Drago")
        .with_target(TargetSpec::from_tags(["self", "team", "enemy"]));
    let mut buffs = step(BaseTarget::Team, "the team", vec![(EffectKey::TeamHeal, 45)]);
    buffs.effects.insert(EffectKey::Buff(StatId::Atk), 0.2);
    buffs.effects.insert(EffectKey::Buff(StatId::Def), 0.1);
    let result = ExecutionResult::succeeded(
        vec![
            step(BaseTarget::SelfTarget, "Rocky", vec![(EffectKey::ShieldAdded, 15)]),
            buffs,
            step(BaseTarget::Enemy, "Drago", vec![(EffectKey::DamageDealt, 210)]),
        ],
        99,
    );

    c.bench_function("compose_multi_step", |b| {
        b.iter(|| black_box(composer.compose(black_box(&scene), black_box(&result))))
    });
}

fn bench_execute_and_narrate(c: &mut Criterion) {
    let tables = MoveTables::new()
        .with_standard_genres()
        .expect("embedded genre table parses");
    let mut engine = Engine::new(EngineConfig::default(), tables, Box::new(SeededRng::new(5)));
    let template = Combatant::new("Rocky", 100, 100, 10).with_genres([Genre::Action, Genre::Comedy]);
    let moves = engine.moves_for(&template);

    c.bench_function("execute_and_narrate", |b| {
        b.iter(|| {
            let mut party = vec![template.clone()];
            let mut enemy = Combatant::new("Drago", 10_000, 60, 20);
            let result = engine.execute_move(&mut party, 0, &mut enemy, moves.first(), None);
            black_box(engine.build_narration(&party, 0, &enemy, moves.first(), None, &result))
        })
    });
}

criterion_group!(
    benches,
    bench_compose_single_step,
    bench_compose_multi_step,
    bench_execute_and_narrate
);
criterion_main!(benches);
