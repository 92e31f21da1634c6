pub mod engine;
pub mod frontier;
pub mod map;
pub mod transitions;

pub use engine::{InteractOutcome, StepOutcome};
pub use frontier::{FrontierGenerator, FrontierState};
pub use map::GameMap;
pub use transitions::{DoorOutcome, Transition};

use crate::catalog::Catalog;
use log::{debug, info};
use schema::{Direction, MapId, Position, StaticMap};
use std::collections::HashMap;
use strum::IntoEnumIterator;

/// The fixed chain of maps walked by forward and backward doors. Indoor
/// maps hang off it through door links.
pub const STATIC_SEQUENCE: [StaticMap; 9] = [
    StaticMap::Town,
    StaticMap::Route1,
    StaticMap::Forest1,
    StaticMap::Forest2,
    StaticMap::Town2,
    StaticMap::Mountain,
    StaticMap::Cave,
    StaticMap::Pass,
    StaticMap::Peak,
];

pub const START_MAP: StaticMap = StaticMap::Town;
pub const START_POSITION: Position = Position::new(7, 5);
pub const START_FACING: Direction = Direction::Down;

/// Where the player is and every map they can reach. The last entry of the
/// sequence is the frontier.
#[derive(Debug, Clone)]
pub struct World {
    maps: HashMap<MapId, GameMap>,
    sequence: Vec<MapId>,
    current: MapId,
    position: Position,
    facing: Direction,
}

impl World {
    pub fn new(catalog: &Catalog) -> Self {
        let maps = StaticMap::iter()
            .map(|id| (MapId::Static(id), catalog.map(id).clone()))
            .collect();
        Self {
            maps,
            sequence: STATIC_SEQUENCE.iter().copied().map(MapId::Static).collect(),
            current: MapId::Static(START_MAP),
            position: START_POSITION,
            facing: START_FACING,
        }
    }

    pub fn current_id(&self) -> MapId {
        self.current
    }

    pub fn current_map(&self) -> &GameMap {
        &self.maps[&self.current]
    }

    pub fn map(&self, id: MapId) -> Option<&GameMap> {
        self.maps.get(&id)
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn sequence(&self) -> &[MapId] {
        &self.sequence
    }

    /// Index of the current map in the sequence; None for indoor maps.
    pub fn sequence_index(&self) -> Option<usize> {
        self.sequence.iter().position(|id| *id == self.current)
    }

    pub fn is_on_frontier(&self) -> bool {
        self.sequence.last() == Some(&self.current)
    }

    pub fn generated_count(&self) -> usize {
        self.sequence.len() - STATIC_SEQUENCE.len()
    }

    /// Append a generated zone past the frontier.
    pub fn push_frontier(&mut self, map: GameMap) {
        let id = map.id;
        info!("World extended with {} ({})", map.name, id);
        self.maps.insert(id, map);
        self.sequence.push(id);
    }

    /// Move to `map` at `position` without touching facing.
    pub fn apply_transition(&mut self, transition: Transition) {
        debug!(
            "Transition {} -> {} at {}",
            self.current, transition.map, transition.position
        );
        self.current = transition.map;
        self.position = transition.position;
    }

    /// Send the player back to the start after a lost battle.
    pub fn return_to_start(&mut self) {
        self.apply_transition(Transition {
            map: MapId::Static(START_MAP),
            position: START_POSITION,
        });
    }
}
