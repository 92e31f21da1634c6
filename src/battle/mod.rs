pub mod calculators;
pub mod catch;
pub mod engine;
pub mod state;

pub use engine::{BattleEngine, BattleReport, MoveSelection};
pub use state::{BattleEvent, BattleOutcome, BattlePhase, BattleSide, EventBus, Opponent};

#[cfg(test)]
mod tests;
