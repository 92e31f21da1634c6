use crate::battle::state::BattlePhase;
use crate::errors::ActionError;

/// Recruiting is a full player action: only offered while the player is
/// choosing what to do.
pub fn can_attempt_recruit(phase: BattlePhase) -> Result<(), ActionError> {
    match phase {
        BattlePhase::PlayerChoice => Ok(()),
        other => Err(ActionError::WrongPhase {
            action: "recruit",
            phase: other,
        }),
    }
}
