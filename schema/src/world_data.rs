use crate::{StaticMap, TrainerId};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// The adjacent cell in `direction`, or None when it would leave the
    /// non-negative quadrant. Upper bounds are the map's concern.
    pub fn step(&self, direction: Direction) -> Option<Position> {
        let (dx, dy) = direction.offset();
        Some(Position {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Walkable,
    Wall,
    Grass,
    Door,
    Healer,
    Npc,
    Trainer,
}

impl TileKind {
    /// Only walls stop movement; people and doors can be stood on.
    pub fn is_blocking(&self) -> bool {
        matches!(self, TileKind::Wall)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interaction {
    Professor,
    Healer,
    Sage,
    GymLeader,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warp {
    pub map: StaticMap,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileData {
    pub id: u16,
    pub kind: TileKind,
    #[serde(default)]
    pub warp: Option<Warp>,
    #[serde(default)]
    pub interaction: Option<Interaction>,
    #[serde(default)]
    pub trainer: Option<TrainerId>,
}

/// A fixed door destination. `at: None` matches every door on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorLink {
    #[serde(default)]
    pub at: Option<Position>,
    pub to: StaticMap,
    pub arrival: Position,
}

impl DoorLink {
    pub fn matches(&self, position: Position) -> bool {
        self.at.map_or(true, |at| at == position)
    }
}

/// A hand-authored map as written in the catalog. Dimensions are implied by
/// the tile grid, rows first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapData {
    pub id: StaticMap,
    pub name: String,
    pub tiles: Vec<Vec<u16>>,
    #[serde(default)]
    pub encounters: Vec<crate::CreatureId>,
    #[serde(default)]
    pub door_links: Vec<DoorLink>,
    /// Arrival point when entered from the previous map in the sequence.
    #[serde(default)]
    pub forward_entry: Option<Position>,
    /// Arrival point when entered from the next map in the sequence.
    #[serde(default)]
    pub backward_entry: Option<Position>,
}
