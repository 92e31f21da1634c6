use crate::battle::state::BattleSide;

/// Damage scaling as an exact fraction, so floors never drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Multiplier {
    pub numerator: u32,
    pub denominator: u32,
}

/// Full-power hit by the player's creature (x0.8).
pub const PLAYER_HIT: Multiplier = Multiplier {
    numerator: 4,
    denominator: 5,
};
/// Hit by the enemy creature (x0.5).
pub const ENEMY_HIT: Multiplier = Multiplier {
    numerator: 1,
    denominator: 2,
};
/// A special move whose quiz was answered wrong (x0.2 of raw power).
pub const FAILED_CAST: Multiplier = Multiplier {
    numerator: 1,
    denominator: 5,
};

/// Level at which a hit deals exactly its power times the side multiplier.
const LEVEL_SCALE: u32 = 5;

pub fn hit_multiplier(side: BattleSide) -> Multiplier {
    match side {
        BattleSide::Player => PLAYER_HIT,
        BattleSide::Enemy => ENEMY_HIT,
    }
}

/// floor(power * level/5 * multiplier)
pub fn calculate_hit_damage(power: u32, level: u32, side: BattleSide) -> u32 {
    let m = hit_multiplier(side);
    let numerator = u64::from(power) * u64::from(level) * u64::from(m.numerator);
    let denominator = u64::from(LEVEL_SCALE) * u64::from(m.denominator);
    (numerator / denominator) as u32
}

/// floor(power * 0.2), independent of level.
pub fn calculate_failed_cast_damage(power: u32) -> u32 {
    power * FAILED_CAST.numerator / FAILED_CAST.denominator
}
