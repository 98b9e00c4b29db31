//! Numeric formulas shared by the move families.

use crate::combatant::{round_to_i32, Combatant};

/// Rating multiplier applied to rating-scaled genre percentages.
///
/// The rating is clamped to `[0, 10]` and mapped piecewise-linearly:
///
/// | rating | multiplier |
/// |---|---|
/// | 0 → 3 | 0.92 → 1.00 |
/// | 3 → 5 | 1.00 → 1.0133 |
/// | 5 → 8 | 1.0133 → 1.20 |
/// | 8 → 10 | 1.20 → 1.30 |
///
/// # Example
///
/// ```
/// use marquee_core::executor::rating_multiplier;
///
/// assert!((rating_multiplier(8.0) - 1.2).abs() < 1e-9);
/// assert!((rating_multiplier(42.0) - 1.3).abs() < 1e-9);
/// ```
#[must_use]
pub fn rating_multiplier(rating: f64) -> f64 {
    let r = if rating.is_nan() {
        0.0
    } else {
        rating.clamp(0.0, 10.0)
    };
    if r < 3.0 {
        0.92 + (r / 3.0) * 0.08
    } else if r < 5.0 {
        1.0 + ((r - 3.0) / 2.0) * 0.013_333_333_333_333_334
    } else if r < 8.0 {
        1.013_333_333_333_333_4 + ((r - 5.0) / 3.0) * 0.186_666_666_666_666_65
    } else {
        1.2 + ((r - 8.0) / 2.0) * 0.1
    }
}

/// Damage from an already-scaled attack value against `enemy`.
///
/// `max(1, round(attack) - effective_def)`, where the enemy's DEF debuff is
/// capped at `def_debuff_cap`.
#[must_use]
pub fn direct_damage(attack: f64, enemy: &Combatant, def_debuff_cap: f64) -> i32 {
    (round_to_i32(attack) - enemy.effective_def(def_debuff_cap)).max(1)
}

/// Splits a total by `sqrt(max(1, atk))` weights.
///
/// The shares sum to 1 for a non-empty input.
#[must_use]
pub fn sqrt_shares(attacks: &[f64]) -> Vec<f64> {
    let weights: Vec<f64> = attacks.iter().map(|atk| atk.max(1.0).sqrt()).collect();
    let sum: f64 = weights.iter().sum();
    let sum = if sum > 0.0 { sum } else { 1.0 };
    weights.into_iter().map(|w| w / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod rating_tests {
        use super::*;

        #[test]
        fn band_edges() {
            assert!((rating_multiplier(0.0) - 0.92).abs() < 1e-9);
            assert!((rating_multiplier(3.0) - 1.0).abs() < 1e-9);
            assert!((rating_multiplier(5.0) - 1.013_333_333).abs() < 1e-6);
            assert!((rating_multiplier(10.0) - 1.3).abs() < 1e-9);
        }

        #[test]
        fn default_rating_is_between_bands() {
            let m = rating_multiplier(7.0);
            assert!(m > 1.0133 && m < 1.2);
        }

        #[test]
        fn out_of_range_clamps() {
            assert!((rating_multiplier(-4.0) - 0.92).abs() < 1e-9);
            assert!((rating_multiplier(f64::NAN) - 0.92).abs() < 1e-9);
        }
    }

    mod damage_tests {
        use super::*;

        #[test]
        fn subtracts_defense() {
            let enemy = Combatant::new("Shark", 500, 10, 20);
            assert_eq!(direct_damage(150.0, &enemy, 0.9), 130);
        }

        #[test]
        fn never_below_one() {
            let enemy = Combatant::new("Tank", 500, 10, 999);
            assert_eq!(direct_damage(5.0, &enemy, 0.9), 1);
        }

        #[test]
        fn shares_follow_sqrt_weights() {
            let shares = sqrt_shares(&[100.0, 400.0]);
            assert!((shares[0] - 1.0 / 3.0).abs() < 1e-9);
            assert!((shares[1] - 2.0 / 3.0).abs() < 1e-9);
        }

        #[test]
        fn weak_attackers_weigh_at_least_one() {
            let shares = sqrt_shares(&[0.0, 1.0]);
            assert!((shares[0] - 0.5).abs() < 1e-9);
        }
    }
}
