use crate::creature::CreatureInst;
use crate::rng::GameRng;

/// Flat bonus added to every recruit attempt.
pub const CAPTURE_BASE_BONUS: f64 = 0.1;

/// Chance that an enemy accepts the invitation: (1 - hp/max) + 0.1.
/// 0.1 at full health and at least 1.0 once knocked to zero.
pub fn capture_probability(current_hp: u32, max_hp: u32) -> f64 {
    if max_hp == 0 {
        return 1.0 + CAPTURE_BASE_BONUS;
    }
    let missing = 1.0 - f64::from(current_hp) / f64::from(max_hp);
    missing + CAPTURE_BASE_BONUS
}

/// Roll a recruit attempt against `target`'s current health.
pub fn roll_capture_success(target: &CreatureInst, rng: &mut GameRng) -> bool {
    let probability = capture_probability(target.current_hp, target.max_hp);
    rng.chance(probability, "capture roll")
}
