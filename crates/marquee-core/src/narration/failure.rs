//! The one line shown when a move could not be used.

use crate::effect::FailureReason;

/// Line for a failed move.
///
/// # Example
///
/// ```
/// use marquee_core::effect::FailureReason;
/// use marquee_core::narration::failure_line;
///
/// assert_eq!(
///     failure_line(FailureReason::Cooldown { remaining: 1 }, "Haymaker"),
///     "Haymaker is on cooldown (1 turn)."
/// );
/// ```
#[must_use]
pub fn failure_line(reason: FailureReason, move_name: &str) -> String {
    match reason {
        FailureReason::NoActor => "No valid actor.".to_string(),
        FailureReason::NoSpecial => "No special selected.".to_string(),
        FailureReason::Cooldown { remaining } => {
            let unit = if remaining == 1 { "turn" } else { "turns" };
            format!("{move_name} is on cooldown ({remaining} {unit}).")
        }
        FailureReason::NoAllyTarget => "No valid ally targets.".to_string(),
        FailureReason::InvalidTarget => "Invalid target.".to_string(),
        FailureReason::NoEffect => "Nothing happens.".to_string(),
    }
}
