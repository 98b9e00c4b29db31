//! The shipped combo rules.

use super::{ComboContext, ComboError, ComboOutcome, ComboRule};
use crate::combatant::StatId;
use crate::effect::{EffectKey, TurnCounter};
use crate::rng::BattleRng;

const DAMAGE: EffectKey = EffectKey::DamageDealt;
const HEAL: EffectKey = EffectKey::HealedHp;
const STATUS: EffectKey = EffectKey::StatusApplied;
const REDUCTION: EffectKey = EffectKey::DamageReductionPct;

/// Picks one of `alternates`, skipping blanks.
fn pick(rng: &mut dyn BattleRng, alternates: Vec<String>) -> String {
    let mut options: Vec<String> = alternates
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .collect();
    match rng.pick_index(options.len()) {
        Some(index) => options.swap_remove(index),
        None => String::new(),
    }
}

/// `(+12HP)` style marker.
fn hp_marker(amount: i64) -> String {
    let sign = if amount < 0 { '-' } else { '+' };
    format!("({sign}{}HP)", amount.unsigned_abs())
}

fn buffed(ctx: &ComboContext<'_>, stats: &[StatId]) -> bool {
    stats.iter().any(|stat| ctx.positive(&EffectKey::Buff(*stat)))
}

fn enemy_debuffed(ctx: &ComboContext<'_>) -> bool {
    ctx.positive(&EffectKey::EnemyDebuff(StatId::Atk))
        || ctx.positive(&EffectKey::EnemyDebuff(StatId::Def))
}

fn damage_and_heal(ctx: &ComboContext<'_>) -> bool {
    ctx.positive(&DAMAGE) && ctx.positive(&HEAL)
}

fn drain_lines(ctx: &ComboContext<'_>, templates: &[&str]) -> Vec<String> {
    let hp = hp_marker(ctx.amount(&HEAL));
    templates
        .iter()
        .map(|t| {
            t.replace("{healed}", ctx.healed)
                .replace("{enemy}", ctx.enemy)
                .replace("{hp}", &hp)
        })
        .collect()
}

// =============================================================================
// Heal on hit
// =============================================================================

/// Damage plus a heal on a move flagged as vampiric.
#[derive(Debug, Clone, Copy, Default)]
pub struct VampiricStrike;

impl ComboRule for VampiricStrike {
    fn id(&self) -> &'static str {
        "vampiric_strike"
    }

    fn matches(&self, ctx: &ComboContext<'_>) -> Result<bool, ComboError> {
        Ok(damage_and_heal(ctx)
            && (ctx.has_tag(&["vampiric", "vamp", "blood", "drain"]) || ctx.name_has("vamp")))
    }

    fn build(&self, ctx: &ComboContext<'_>, rng: &mut dyn BattleRng) -> Result<ComboOutcome, ComboError> {
        let line = pick(
            rng,
            drain_lines(
                ctx,
                &[
                    "{healed} feeds on {enemy} {hp}.",
                    "{enemy}'s essence restores {healed} {hp}.",
                ],
            ),
        );
        Ok(ComboOutcome::default().with_replacement(HEAL, line))
    }
}

/// Damage plus a heal, whatever the move is called.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lifesteal;

impl ComboRule for Lifesteal {
    fn id(&self) -> &'static str {
        "lifesteal"
    }

    fn matches(&self, ctx: &ComboContext<'_>) -> Result<bool, ComboError> {
        Ok(damage_and_heal(ctx))
    }

    fn build(&self, ctx: &ComboContext<'_>, rng: &mut dyn BattleRng) -> Result<ComboOutcome, ComboError> {
        let line = pick(
            rng,
            drain_lines(
                ctx,
                &[
                    "{healed} siphons vitality from {enemy} {hp}.",
                    "{enemy}'s life force flows into {healed} {hp}.",
                    "{healed} drains strength from {enemy} {hp}.",
                ],
            ),
        );
        Ok(ComboOutcome::default().with_replacement(HEAL, line))
    }
}

// =============================================================================
// Hit plus modifiers
// =============================================================================

/// Damage plus an ATK or DEF buff on a rallying move.
#[derive(Debug, Clone, Copy, Default)]
pub struct RallyStrike;

impl ComboRule for RallyStrike {
    fn id(&self) -> &'static str {
        "rally_strike"
    }

    fn matches(&self, ctx: &ComboContext<'_>) -> Result<bool, ComboError> {
        Ok(ctx.positive(&DAMAGE)
            && buffed(ctx, &[StatId::Atk, StatId::Def])
            && (ctx.has_tag(&["rally", "inspire", "motivate"]) || ctx.name_has("rally")))
    }

    fn build(&self, ctx: &ComboContext<'_>, rng: &mut dyn BattleRng) -> Result<ComboOutcome, ComboError> {
        Ok(ComboOutcome::inject(pick(
            rng,
            vec![
                format!("Momentum builds as {} staggers.", ctx.enemy),
                "The crowd roars. Confidence surges.".to_string(),
                "A surge of energy ripples through the team.".to_string(),
            ],
        )))
    }
}

/// Damage plus enemy ATK/DEF debuffs on a sabotaging move.
///
/// Keeps the numbers visible: `Drago is sabotaged (-ATK) 20% (2T).`
#[derive(Debug, Clone, Copy, Default)]
pub struct Sabotage;

impl Sabotage {
    fn line(ctx: &ComboContext<'_>, stat: StatId, rng: &mut dyn BattleRng) -> String {
        let pct = (ctx.fraction(&EffectKey::EnemyDebuff(stat)) * 100.0).round();
        let turns = ctx.turns(TurnCounter::EnemyDebuff(stat));
        let turns = if turns > 0 { format!(" ({turns}T)") } else { String::new() };
        let enemy = ctx.enemy;
        let alternates = if stat == StatId::Atk {
            vec![
                format!("{enemy} is sabotaged (-ATK) {pct}%{turns}."),
                format!("{enemy}'s offense is disrupted (-ATK) {pct}%{turns}."),
            ]
        } else {
            vec![
                format!("{enemy} is compromised (-DEF) {pct}%{turns}."),
                format!("{enemy}'s guard is broken (-DEF) {pct}%{turns}."),
            ]
        };
        pick(rng, alternates)
    }
}

impl ComboRule for Sabotage {
    fn id(&self) -> &'static str {
        "sabotage"
    }

    fn matches(&self, ctx: &ComboContext<'_>) -> Result<bool, ComboError> {
        Ok(ctx.positive(&DAMAGE)
            && enemy_debuffed(ctx)
            && (ctx.has_tag(&["sabotage", "cripple", "weaken"]) || ctx.name_has("sabotage")))
    }

    fn build(&self, ctx: &ComboContext<'_>, rng: &mut dyn BattleRng) -> Result<ComboOutcome, ComboError> {
        let mut outcome = ComboOutcome::default();
        for stat in [StatId::Atk, StatId::Def] {
            let key = EffectKey::EnemyDebuff(stat);
            if ctx.positive(&key) {
                outcome = outcome.with_replacement(key, Self::line(ctx, stat, rng));
            }
        }
        Ok(outcome)
    }
}

/// Damage plus an affliction on a cursing move.
#[derive(Debug, Clone, Copy, Default)]
pub struct HexStrike;

impl ComboRule for HexStrike {
    fn id(&self) -> &'static str {
        "hex_strike"
    }

    fn matches(&self, ctx: &ComboContext<'_>) -> Result<bool, ComboError> {
        if !(ctx.positive(&DAMAGE) && (ctx.has_tag(&["hex", "curse"]) || ctx.name_has("hex"))) {
            return Ok(false);
        }
        Ok(ctx.text(&STATUS)?.is_some_and(|s| !s.is_empty()))
    }

    fn build(&self, ctx: &ComboContext<'_>, _rng: &mut dyn BattleRng) -> Result<ComboOutcome, ComboError> {
        let label = match ctx.text(&STATUS)? {
            Some(status) if !status.is_empty() => status.to_uppercase(),
            _ => "A STATUS".to_string(),
        };
        let turns = ctx.turns(TurnCounter::Status);
        let turns = if turns > 0 { format!(" ({turns}T)") } else { String::new() };
        Ok(ComboOutcome::default().with_replacement(STATUS, format!("{} is {label}!{turns}", ctx.enemy)))
    }
}

/// Party support plus enemy pressure on a support-assault move.
#[derive(Debug, Clone, Copy, Default)]
pub struct SupportAssault;

impl ComboRule for SupportAssault {
    fn id(&self) -> &'static str {
        "support_assault"
    }

    fn matches(&self, ctx: &ComboContext<'_>) -> Result<bool, ComboError> {
        let support = buffed(ctx, &[StatId::Atk, StatId::Def]) || ctx.positive(&REDUCTION);
        let pressure = enemy_debuffed(ctx) || ctx.present(&STATUS);
        let flagged = (ctx.has_tag(&["support"]) && ctx.has_tag(&["assault", "strike"]))
            || ctx.name_has("support assault");
        Ok(support && pressure && flagged)
    }

    fn build(&self, _ctx: &ComboContext<'_>, rng: &mut dyn BattleRng) -> Result<ComboOutcome, ComboError> {
        Ok(ComboOutcome::inject(pick(
            rng,
            vec![
                "Allies are empowered as the enemy falters.".to_string(),
                "Support rises and pressure mounts on the enemy.".to_string(),
            ],
        )))
    }
}

/// A move literally named "7" that weakens the enemy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Seven;

impl ComboRule for Seven {
    fn id(&self) -> &'static str {
        "seven"
    }

    fn matches(&self, ctx: &ComboContext<'_>) -> Result<bool, ComboError> {
        let name = ctx.move_name.trim().to_lowercase();
        Ok((name == "7" || name == "seven") && (enemy_debuffed(ctx) || ctx.present(&STATUS)))
    }

    fn build(&self, ctx: &ComboContext<'_>, rng: &mut dyn BattleRng) -> Result<ComboOutcome, ComboError> {
        let enemy = ctx.enemy;
        Ok(ComboOutcome::inject(pick(
            rng,
            vec![
                format!("{enemy} is thrown off-balance."),
                format!("{enemy} loses their footing."),
                format!("{enemy} can't find their rhythm."),
            ],
        )))
    }
}

/// Any buff or damage reduction on a drumming or team-wide move.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wardrums;

impl ComboRule for Wardrums {
    fn id(&self) -> &'static str {
        "wardrums"
    }

    fn matches(&self, ctx: &ComboContext<'_>) -> Result<bool, ComboError> {
        if !(buffed(ctx, &StatId::ALL) || ctx.positive(&REDUCTION)) {
            return Ok(false);
        }
        Ok(ctx.has_tag(&["wardrums", "war_drums", "war-drums", "drums"]) || ctx.hits_team)
    }

    fn build(&self, ctx: &ComboContext<'_>, rng: &mut dyn BattleRng) -> Result<ComboOutcome, ComboError> {
        Ok(ComboOutcome::inject(pick(
            rng,
            vec![
                format!("{} sets the tempo. The team rallies together.", ctx.actor),
                "A thunderous rhythm surges through the team.".to_string(),
            ],
        )))
    }
}

/// Damage plus an offensive self buff.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChargeStrike;

impl ComboRule for ChargeStrike {
    fn id(&self) -> &'static str {
        "charge_strike"
    }

    fn matches(&self, ctx: &ComboContext<'_>) -> Result<bool, ComboError> {
        Ok(ctx.positive(&DAMAGE)
            && buffed(ctx, &[StatId::Atk, StatId::Crit, StatId::Acc, StatId::Spd]))
    }

    fn build(&self, _ctx: &ComboContext<'_>, rng: &mut dyn BattleRng) -> Result<ComboOutcome, ComboError> {
        Ok(ComboOutcome::inject(pick(
            rng,
            vec![
                "Momentum builds as the strike lands.".to_string(),
                "The hit fuels a charging rhythm.".to_string(),
                "Power surges through the follow-through.".to_string(),
            ],
        )))
    }
}

/// Damage plus enemy ATK/DEF debuffs, folded into one line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CripplingBlow;

impl ComboRule for CripplingBlow {
    fn id(&self) -> &'static str {
        "crippling_blow"
    }

    fn matches(&self, ctx: &ComboContext<'_>) -> Result<bool, ComboError> {
        Ok(ctx.positive(&DAMAGE) && enemy_debuffed(ctx))
    }

    fn build(&self, ctx: &ComboContext<'_>, rng: &mut dyn BattleRng) -> Result<ComboOutcome, ComboError> {
        let atk = EffectKey::EnemyDebuff(StatId::Atk);
        let def = EffectKey::EnemyDebuff(StatId::Def);
        let mark = match (ctx.positive(&atk), ctx.positive(&def)) {
            (true, true) => "(-ATK/-DEF)",
            (true, false) => "(-ATK)",
            (false, true) => "(-DEF)",
            (false, false) => "(FX)",
        };
        let enemy = ctx.enemy;
        let line = pick(
            rng,
            vec![
                format!("{enemy} is left reeling {mark}."),
                format!("{enemy} falters from the impact {mark}."),
                format!("A weak point is struck. {enemy} staggers {mark}."),
            ],
        );
        let mut outcome = ComboOutcome::default();
        for key in [atk, def] {
            if ctx.positive(&key) {
                outcome = outcome.with_replacement(key, line.clone());
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{EffectMap, EffectValue};
    use crate::rng::SequenceRng;

    fn map(pairs: &[(EffectKey, EffectValue)]) -> EffectMap {
        pairs.iter().cloned().collect()
    }

    fn first(rule: &dyn ComboRule, ctx: &ComboContext<'_>) -> ComboOutcome {
        rule.build(ctx, &mut SequenceRng::constant(0.0)).unwrap()
    }

    #[test]
    fn hp_marker_signs() {
        assert_eq!(hp_marker(19), "(+19HP)");
        assert_eq!(hp_marker(0), "(+0HP)");
        assert_eq!(hp_marker(-4), "(-4HP)");
    }

    mod drain_tests {
        use super::*;

        #[test]
        fn lifesteal_needs_only_the_shape() {
            let effects = map(&[(DAMAGE, 30.into()), (HEAL, 19.into())]);
            let ctx = ComboContext::new(&effects, "Dracula", "Bite", "Harker");
            assert!(Lifesteal.matches(&ctx).unwrap());
            assert!(!VampiricStrike.matches(&ctx).unwrap());
            let outcome = first(&Lifesteal, &ctx);
            assert_eq!(
                outcome.replacement(&HEAL).unwrap(),
                ["Dracula siphons vitality from Harker (+19HP)."]
            );
        }

        #[test]
        fn vampiric_by_tag_or_name() {
            let effects = map(&[(DAMAGE, 30.into()), (EffectKey::Heal, 8.into())]);
            let tags = vec!["enemy".to_string(), "blood".to_string()];
            let tagged = ComboContext::new(&effects, "Dracula", "Bite", "Harker")
                .with_tags(&tags, false)
                .with_healed("Renfield");
            assert!(VampiricStrike.matches(&tagged).unwrap());
            assert_eq!(
                first(&VampiricStrike, &tagged).replacement(&HEAL).unwrap(),
                ["Renfield feeds on Harker (+8HP)."]
            );

            let named = ComboContext::new(&effects, "Dracula", "Vampire Kiss", "Harker");
            assert!(VampiricStrike.matches(&named).unwrap());

            let drain = vec!["drain".to_string()];
            let drained =
                ComboContext::new(&effects, "Dracula", "Bite", "Harker").with_tags(&drain, false);
            assert!(VampiricStrike.matches(&drained).unwrap());
        }
    }

    mod modifier_tests {
        use super::*;

        #[test]
        fn sabotage_keeps_numbers() {
            let effects = map(&[
                (DAMAGE, 30.into()),
                (EffectKey::EnemyDebuff(StatId::Atk), 0.2.into()),
                (EffectKey::Turns(TurnCounter::EnemyDebuff(StatId::Atk)), 2.into()),
            ]);
            let ctx = ComboContext::new(&effects, "Bond", "Sabotage Run", "Blofeld");
            assert!(Sabotage.matches(&ctx).unwrap());
            let outcome = first(&Sabotage, &ctx);
            assert_eq!(
                outcome.replacement(&EffectKey::EnemyDebuff(StatId::Atk)).unwrap(),
                ["Blofeld is sabotaged (-ATK) 20% (2T)."]
            );
            assert!(outcome.replacement(&EffectKey::EnemyDebuff(StatId::Def)).is_none());
        }

        #[test]
        fn hex_shouts_the_status() {
            let effects = map(&[
                (DAMAGE, 30.into()),
                (STATUS, "stunned".into()),
                (EffectKey::Turns(TurnCounter::Status), 2.into()),
            ]);
            let tags = vec!["enemy".to_string(), "curse".to_string()];
            let ctx = ComboContext::new(&effects, "Witch", "Jinx", "Dorothy").with_tags(&tags, false);
            assert!(HexStrike.matches(&ctx).unwrap());
            assert_eq!(
                first(&HexStrike, &ctx).replacement(&STATUS).unwrap(),
                ["Dorothy is STUNNED! (2T)"]
            );
        }

        #[test]
        fn hex_reports_non_text_status() {
            let effects = map(&[(DAMAGE, 30.into()), (STATUS, 1.into())]);
            let ctx = ComboContext::new(&effects, "Witch", "Hex", "Dorothy");
            assert!(HexStrike.matches(&ctx).is_err());
        }

        #[test]
        fn crippling_blow_replaces_both_debuffs() {
            let effects = map(&[
                (DAMAGE, 30.into()),
                (EffectKey::EnemyDebuff(StatId::Atk), 0.1.into()),
                (EffectKey::EnemyDebuff(StatId::Def), 0.1.into()),
            ]);
            let ctx = ComboContext::new(&effects, "Rocky", "Body Blow", "Drago");
            let outcome = first(&CripplingBlow, &ctx);
            let expected = ["Drago is left reeling (-ATK/-DEF)."];
            assert_eq!(outcome.replacement(&EffectKey::EnemyDebuff(StatId::Atk)).unwrap(), expected);
            assert_eq!(outcome.replacement(&EffectKey::EnemyDebuff(StatId::Def)).unwrap(), expected);
        }

        #[test]
        fn charge_strike_ignores_def_buffs() {
            let def_only = map(&[(DAMAGE, 30.into()), (EffectKey::Buff(StatId::Def), 0.1.into())]);
            let ctx = ComboContext::new(&def_only, "A", "Jab", "E");
            assert!(!ChargeStrike.matches(&ctx).unwrap());

            let crit = map(&[(DAMAGE, 30.into()), (EffectKey::Buff(StatId::Crit), 0.1.into())]);
            let ctx = ComboContext::new(&crit, "A", "Jab", "E");
            assert!(ChargeStrike.matches(&ctx).unwrap());
        }
    }

    mod inject_tests {
        use super::*;

        #[test]
        fn wardrums_on_team_buffs() {
            let effects = map(&[
                (EffectKey::Buff(StatId::Atk), 0.1.into()),
                (REDUCTION, 0.2.into()),
            ]);
            let solo = ComboContext::new(&effects, "Conductor", "Tempo", "E");
            assert!(!Wardrums.matches(&solo).unwrap());

            let tags = vec!["team".to_string()];
            let team = ComboContext::new(&effects, "Conductor", "Tempo", "E").with_tags(&tags, true);
            assert!(Wardrums.matches(&team).unwrap());
            assert_eq!(
                first(&Wardrums, &team).injected(),
                ["Conductor sets the tempo. The team rallies together."]
            );
        }

        #[test]
        fn seven_matches_the_name_exactly() {
            let effects = map(&[(STATUS, "dazed".into()), (DAMAGE, 5.into())]);
            let ctx = ComboContext::new(&effects, "Mills", " Seven ", "John Doe");
            assert!(Seven.matches(&ctx).unwrap());
            let ctx = ComboContext::new(&effects, "Mills", "Seventh Seal", "John Doe");
            assert!(!Seven.matches(&ctx).unwrap());
        }

        #[test]
        fn support_assault_needs_both_tags() {
            let effects = map(&[
                (EffectKey::Buff(StatId::Def), 0.1.into()),
                (EffectKey::EnemyDebuff(StatId::Atk), 0.1.into()),
            ]);
            let only_support = vec!["support".to_string()];
            let ctx = ComboContext::new(&effects, "A", "Cover", "E").with_tags(&only_support, false);
            assert!(!SupportAssault.matches(&ctx).unwrap());

            let both = vec!["support".to_string(), "strike".to_string()];
            let ctx = ComboContext::new(&effects, "A", "Cover", "E").with_tags(&both, false);
            assert!(SupportAssault.matches(&ctx).unwrap());
        }
    }
}
