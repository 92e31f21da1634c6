use crate::battle::state::Opponent;
use crate::rng::GameRng;
use schema::{ItemId, TrainerData};

// Constants for reward calculations
const VICTORY_EXP: u32 = 50;
const LOOT_DROP_CHANCE: f64 = 0.4;

/// Materials a wild creature may leave behind.
pub const LOOT_TABLE: [ItemId; 4] = [
    ItemId::LogicLeaf,
    ItemId::PixelWater,
    ItemId::CodeScrap,
    ItemId::HistoryDust,
];

/// Calculator for experience and item rewards after a battle.
#[derive(Debug, Clone, Copy, Default)]
pub struct RewardCalculator;

impl RewardCalculator {
    /// Experience for the creature that finished the enemy. Only wild
    /// creatures give experience.
    pub fn victory_experience(&self, opponent: Opponent) -> Option<u32> {
        match opponent {
            Opponent::Wild => Some(VICTORY_EXP),
            Opponent::Trainer(_) => None,
        }
    }

    /// 40% chance of one random material from the loot table.
    pub fn roll_loot(&self, rng: &mut GameRng) -> Option<ItemId> {
        if !rng.chance(LOOT_DROP_CHANCE, "loot drop") {
            return None;
        }
        rng.pick(&LOOT_TABLE, "loot item").copied()
    }

    pub fn trainer_reward(&self, trainer: &TrainerData) -> Option<ItemId> {
        trainer.reward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::TrainerId;

    #[test]
    fn test_experience_only_from_wild_creatures() {
        let calculator = RewardCalculator;
        assert_eq!(calculator.victory_experience(Opponent::Wild), Some(50));
        assert_eq!(
            calculator.victory_experience(Opponent::Trainer(TrainerId::StudentTim)),
            None
        );
    }

    #[test]
    fn test_loot_roll() {
        let calculator = RewardCalculator;
        // 0.39 < 0.4 drops; 0.6 picks the third entry
        let mut rng = GameRng::new_for_test(vec![0.39, 0.6, 0.4]);
        assert_eq!(calculator.roll_loot(&mut rng), Some(ItemId::CodeScrap));
        assert_eq!(calculator.roll_loot(&mut rng), None);
    }
}
