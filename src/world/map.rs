use crate::errors::{CatalogError, CatalogResult};
use log::warn;
use schema::{CreatureId, DoorLink, MapData, MapId, Position, TileData};
use std::collections::HashMap;

/// Tile ids a generated zone may use: walkable, wall, grass, door.
pub const GENERATED_LEGEND: [u16; 4] = [0, 1, 2, 3];
pub const WALL_TILE: u16 = 1;
pub const DOOR_TILE: u16 = 3;

pub const GENERATED_WIDTH: usize = 12;
pub const GENERATED_HEIGHT: usize = 12;
pub const GENERATED_FORWARD_ENTRY: Position = Position::new(6, 10);
pub const GENERATED_BACKWARD_ENTRY: Position = Position::new(6, 1);
pub const GENERATED_EXITS: [Position; 2] = [Position::new(6, 0), Position::new(6, 11)];

/// A playable map. Immutable once built; entry points are already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct GameMap {
    pub id: MapId,
    pub name: String,
    pub width: usize,
    pub height: usize,
    tiles: Vec<Vec<u16>>,
    pub encounters: Vec<CreatureId>,
    pub door_links: Vec<DoorLink>,
    /// Where the player lands when arriving from the previous map.
    pub forward_entry: Position,
    /// Where the player lands when arriving from the next map.
    pub backward_entry: Position,
}

impl GameMap {
    pub fn from_data(data: MapData, legend: &HashMap<u16, TileData>) -> CatalogResult<Self> {
        let height = data.tiles.len();
        let width = data.tiles.first().map_or(0, Vec::len);
        if width == 0 || data.tiles.iter().any(|row| row.len() != width) {
            return Err(CatalogError::RaggedGrid { map: data.id });
        }
        for row in &data.tiles {
            if let Some(tile) = row.iter().find(|t| !legend.contains_key(t)) {
                return Err(CatalogError::UnknownTile {
                    map: data.id,
                    tile: *tile,
                });
            }
        }

        let forward_entry = data
            .forward_entry
            .unwrap_or(Position::new(width / 2, height.saturating_sub(2)));
        let backward_entry = data.backward_entry.unwrap_or(Position::new(width / 2, 1));
        for position in [forward_entry, backward_entry] {
            if position.x >= width || position.y >= height {
                return Err(CatalogError::EntryOutOfBounds {
                    map: data.id,
                    position,
                });
            }
        }

        Ok(Self {
            id: MapId::Static(data.id),
            name: data.name,
            width,
            height,
            tiles: data.tiles,
            encounters: data.encounters,
            door_links: data.door_links,
            forward_entry,
            backward_entry,
        })
    }

    /// Build the n-th generated zone from a provider grid. The grid must be
    /// 12x12; ids outside the generated legend become walls and both exits
    /// are forced to doors so the zone is always enterable.
    pub fn generated(
        number: u32,
        mut tiles: Vec<Vec<u16>>,
        encounters: Vec<CreatureId>,
    ) -> Option<Self> {
        if tiles.len() != GENERATED_HEIGHT || tiles.iter().any(|row| row.len() != GENERATED_WIDTH) {
            warn!(
                "Discarding generated zone {}: expected {}x{} grid",
                number, GENERATED_WIDTH, GENERATED_HEIGHT
            );
            return None;
        }

        let mut replaced = 0;
        for tile in tiles.iter_mut().flatten() {
            if !GENERATED_LEGEND.contains(tile) {
                *tile = WALL_TILE;
                replaced += 1;
            }
        }
        if replaced > 0 {
            warn!("Generated zone {}: replaced {} unknown tiles with walls", number, replaced);
        }
        for exit in GENERATED_EXITS {
            tiles[exit.y][exit.x] = DOOR_TILE;
        }

        Some(Self {
            id: MapId::Generated(number),
            name: format!("Unknown Zone {}", number),
            width: GENERATED_WIDTH,
            height: GENERATED_HEIGHT,
            tiles,
            encounters,
            door_links: Vec::new(),
            forward_entry: GENERATED_FORWARD_ENTRY,
            backward_entry: GENERATED_BACKWARD_ENTRY,
        })
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    pub fn tile_id(&self, position: Position) -> Option<u16> {
        self.tiles.get(position.y)?.get(position.x).copied()
    }

    pub fn rows(&self) -> &[Vec<u16>] {
        &self.tiles
    }

    /// Top or right edge: doors here lead forward along the sequence.
    pub fn is_forward_edge(&self, position: Position) -> bool {
        position.y == 0 || position.x + 1 == self.width
    }

    /// Bottom or left edge: doors here lead back along the sequence.
    pub fn is_backward_edge(&self, position: Position) -> bool {
        position.y + 1 == self.height || position.x == 0
    }
}
