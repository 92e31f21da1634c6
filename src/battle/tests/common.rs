use crate::battle::engine::BattleEngine;
use crate::battle::state::{EventBus, Opponent};
use crate::catalog::Catalog;
use crate::creature::CreatureInst;
use schema::CreatureId;

pub fn test_catalog() -> Catalog {
    match Catalog::load_embedded() {
        Ok(catalog) => catalog,
        Err(err) => panic!("Failed to load embedded catalog: {}", err),
    }
}

/// A builder for test creatures with catalog defaults.
///
/// # Example
/// ```ignore
/// let creature = TestCreatureBuilder::new(CreatureId::CalcBoy)
///     .with_level(10)
///     .with_hp(5)
///     .build();
/// ```
pub struct TestCreatureBuilder {
    species: CreatureId,
    level: Option<u32>,
    current_hp: Option<u32>,
    xp: Option<u32>,
}

impl TestCreatureBuilder {
    pub fn new(species: CreatureId) -> Self {
        Self {
            species,
            level: None,
            current_hp: None,
            xp: None,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn with_xp(mut self, xp: u32) -> Self {
        self.xp = Some(xp);
        self
    }

    pub fn build(self) -> CreatureInst {
        let catalog = test_catalog();
        let template = catalog.creature(self.species);
        let mut creature = CreatureInst::from_template(template, &catalog);
        if let Some(level) = self.level {
            creature.level = level;
        }
        if let Some(hp) = self.current_hp {
            creature.current_hp = hp.min(creature.max_hp);
        }
        if let Some(xp) = self.xp {
            creature.xp = xp;
        }
        creature
    }
}

/// Wild battle with a fresh bus; the opening events are left on the bus.
pub fn create_test_battle(party: Vec<CreatureInst>, enemy: CreatureInst) -> (BattleEngine, EventBus) {
    create_test_battle_against(party, enemy, Opponent::Wild)
}

pub fn create_test_battle_against(
    party: Vec<CreatureInst>,
    enemy: CreatureInst,
    opponent: Opponent,
) -> (BattleEngine, EventBus) {
    let mut bus = EventBus::new();
    let engine = match BattleEngine::new(&party, enemy, opponent, &mut bus) {
        Ok(engine) => engine,
        Err(err) => panic!("Failed to start test battle: {}", err),
    };
    (engine, bus)
}
