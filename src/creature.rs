use crate::catalog::Catalog;
use schema::{CreatureId, CreatureTemplate, MoveData, Subject, TrainerData};
use serde::{Deserialize, Serialize};

/// Experience needed for the first level-up of a freshly created creature.
pub const STARTING_TO_NEXT_LEVEL: u32 = 100;
/// Max HP gained on every level-up.
pub const LEVEL_UP_HP_BONUS: u32 = 5;
/// Extra max HP a trainer's creature gets per level.
pub const TRAINER_HP_PER_LEVEL: u32 = 2;

/// A creature owned by the player or met in battle. Each instance is
/// independent: cloning one never aliases another's HP or experience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureInst {
    pub species: CreatureId,
    pub name: String,
    pub subject: Subject,
    pub max_hp: u32,
    pub current_hp: u32,
    pub level: u32,
    pub xp: u32,
    pub to_next_level: u32,
    pub moves: Vec<MoveData>,
    pub sprite_color: String,
    pub icon: String,
}

impl CreatureInst {
    /// Expand a catalog template into a full-health instance at the
    /// template's own level.
    pub fn from_template(template: &CreatureTemplate, catalog: &Catalog) -> Self {
        Self {
            species: template.id,
            name: template.name.clone(),
            subject: template.subject,
            max_hp: template.max_hp,
            current_hp: template.max_hp,
            level: template.level,
            xp: 0,
            to_next_level: STARTING_TO_NEXT_LEVEL,
            moves: catalog.moves_for(template),
            sprite_color: template.sprite_color.clone(),
            icon: template.icon.clone(),
        }
    }

    /// Wild creatures keep the template's max HP whatever their level.
    pub fn wild(template: &CreatureTemplate, catalog: &Catalog, level: u32) -> Self {
        Self {
            level,
            ..Self::from_template(template, catalog)
        }
    }

    /// A trainer's creature: trainer level, bonus HP per level, and a name
    /// that shows who owns it.
    pub fn for_trainer(trainer: &TrainerData, catalog: &Catalog) -> Self {
        let template = catalog.creature(trainer.creature);
        let max_hp = template.max_hp + trainer.creature_level * TRAINER_HP_PER_LEVEL;
        Self {
            name: format!("{}'s {}", trainer.name, template.name),
            level: trainer.creature_level,
            max_hp,
            current_hp: max_hp,
            ..Self::from_template(template, catalog)
        }
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn is_injured(&self) -> bool {
        self.current_hp < self.max_hp
    }

    /// Apply damage, clamping at zero. Returns true if this knocked it out.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let was_conscious = !self.is_fainted();
        self.current_hp = self.current_hp.saturating_sub(amount);
        was_conscious && self.is_fainted()
    }

    /// Restore up to `amount` HP without exceeding max. Returns HP restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_add(amount).min(self.max_hp);
        self.current_hp - before
    }

    pub fn heal_full(&mut self) {
        self.current_hp = self.max_hp;
    }

    /// Add experience; at most one level is gained per call. Returns the new
    /// level when a level-up happened.
    pub fn gain_experience(&mut self, amount: u32) -> Option<u32> {
        self.xp += amount;
        if self.xp < self.to_next_level {
            return None;
        }
        self.xp -= self.to_next_level;
        self.level += 1;
        self.max_hp += LEVEL_UP_HP_BONUS;
        self.current_hp = self.max_hp;
        Some(self.level)
    }
}

/// Average level of a party, floored; `default` for an empty party.
pub fn average_level(party: &[CreatureInst], default: u32) -> u32 {
    if party.is_empty() {
        return default;
    }
    let total: u32 = party.iter().map(|c| c.level).sum();
    total / party.len() as u32
}

pub fn heal_party(party: &mut [CreatureInst]) {
    for creature in party.iter_mut() {
        creature.heal_full();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::TrainerId;

    fn additurt() -> CreatureInst {
        let catalog = Catalog::load_embedded().unwrap();
        CreatureInst::from_template(catalog.creature(CreatureId::CalcBoy), &catalog)
    }

    #[test]
    fn test_from_template() {
        let creature = additurt();
        assert_eq!(creature.name, "Additurt");
        assert_eq!(creature.current_hp, 40);
        assert_eq!(creature.level, 5);
        assert_eq!(creature.xp, 0);
        assert_eq!(creature.to_next_level, 100);
        assert_eq!(creature.moves.len(), 2);
        assert_eq!(creature.moves[1].name, "Pi Slam");
    }

    #[test]
    fn test_trainer_creature_scaling() {
        let catalog = Catalog::load_embedded().unwrap();
        let ben = catalog.trainer(TrainerId::HistorianBen);
        let creature = CreatureInst::for_trainer(ben, &catalog);
        assert_eq!(creature.name, "Historian Ben's Pastpup");
        assert_eq!(creature.level, 14);
        assert_eq!(creature.max_hp, 42 + 28);
        assert_eq!(creature.current_hp, creature.max_hp);
    }

    #[rstest]
    #[case(10, 30, false)]
    #[case(40, 0, true)]
    #[case(100, 0, true)]
    fn test_take_damage_clamps(#[case] damage: u32, #[case] expected_hp: u32, #[case] fainted: bool) {
        let mut creature = additurt();
        let knocked_out = creature.take_damage(damage);
        assert_eq!(creature.current_hp, expected_hp);
        assert_eq!(knocked_out, fainted);
    }

    #[test]
    fn test_heal_never_exceeds_max() {
        let mut creature = additurt();
        creature.take_damage(15);
        assert_eq!(creature.heal(50), 15);
        assert_eq!(creature.current_hp, creature.max_hp);
        assert_eq!(creature.heal(10), 0);
    }

    #[rstest]
    #[case(0, 100, None, 50, 5)]
    #[case(60, 100, Some(6), 10, 6)]
    #[case(50, 100, Some(6), 0, 6)]
    fn test_gain_experience(
        #[case] start_xp: u32,
        #[case] to_next: u32,
        #[case] new_level: Option<u32>,
        #[case] expected_xp: u32,
        #[case] expected_level: u32,
    ) {
        let mut creature = additurt();
        creature.xp = start_xp;
        creature.to_next_level = to_next;
        creature.take_damage(10);

        assert_eq!(creature.gain_experience(50), new_level);
        assert_eq!(creature.xp, expected_xp);
        assert_eq!(creature.level, expected_level);
        if new_level.is_some() {
            assert_eq!(creature.max_hp, 45);
            assert_eq!(creature.current_hp, 45);
            // Threshold is not recalculated on level-up
            assert_eq!(creature.to_next_level, to_next);
        }
    }

    #[test]
    fn test_average_level() {
        let mut a = additurt();
        let mut b = additurt();
        a.level = 5;
        b.level = 8;
        assert_eq!(average_level(&[a, b], 5), 6);
        assert_eq!(average_level(&[], 5), 5);
    }
}
