use crate::errors::{CatalogError, CatalogResult};
use crate::world::map::GameMap;
use log::{debug, info};
use schema::{
    CreatureId, CreatureTemplate, ItemData, ItemId, MapData, MoveData, MoveId, Recipe, RecipeId,
    StaticMap, TileData, TrainerData, TrainerId,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::hash::Hash;
use strum::IntoEnumIterator;

// --- EMBEDDED DATA ---
const TILES_RON: &str = include_str!("../data/tiles.ron");
const MOVES_RON: &str = include_str!("../data/moves.ron");
const CREATURES_RON: &str = include_str!("../data/creatures.ron");
const ITEMS_RON: &str = include_str!("../data/items.ron");
const RECIPES_RON: &str = include_str!("../data/recipes.ron");
const TRAINERS_RON: &str = include_str!("../data/trainers.ron");
const MAPS_RON: &str = include_str!("../data/maps.ron");

/// Immutable game catalog: tiles, moves, creatures, items, recipes, trainers
/// and the hand-authored maps. Loading checks every cross reference, so
/// after a successful load every identifier enum resolves.
#[derive(Debug, Clone)]
pub struct Catalog {
    tiles: HashMap<u16, TileData>,
    moves: HashMap<MoveId, MoveData>,
    creatures: HashMap<CreatureId, CreatureTemplate>,
    items: HashMap<ItemId, ItemData>,
    recipes: Vec<Recipe>,
    trainers: HashMap<TrainerId, TrainerData>,
    maps: HashMap<StaticMap, GameMap>,
}

impl Catalog {
    /// Parse and validate the catalog compiled into the binary.
    pub fn load_embedded() -> CatalogResult<Self> {
        let tiles: Vec<TileData> = parse("tiles.ron", TILES_RON)?;
        let moves: Vec<MoveData> = parse("moves.ron", MOVES_RON)?;
        let creatures: Vec<CreatureTemplate> = parse("creatures.ron", CREATURES_RON)?;
        let items: Vec<ItemData> = parse("items.ron", ITEMS_RON)?;
        let recipes: Vec<Recipe> = parse("recipes.ron", RECIPES_RON)?;
        let trainers: Vec<TrainerData> = parse("trainers.ron", TRAINERS_RON)?;
        let maps: Vec<MapData> = parse("maps.ron", MAPS_RON)?;

        let catalog = Self::from_records(tiles, moves, creatures, items, recipes, trainers, maps)?;
        info!(
            "Catalog loaded: {} tiles, {} moves, {} creatures, {} items, {} recipes, {} trainers, {} maps",
            catalog.tiles.len(),
            catalog.moves.len(),
            catalog.creatures.len(),
            catalog.items.len(),
            catalog.recipes.len(),
            catalog.trainers.len(),
            catalog.maps.len()
        );
        Ok(catalog)
    }

    fn from_records(
        tiles: Vec<TileData>,
        moves: Vec<MoveData>,
        creatures: Vec<CreatureTemplate>,
        items: Vec<ItemData>,
        recipes: Vec<Recipe>,
        trainers: Vec<TrainerData>,
        maps: Vec<MapData>,
    ) -> CatalogResult<Self> {
        let tiles = index_by("tile", tiles, |t| t.id)?;
        let moves = index_by("move", moves, |m| m.id)?;
        let creatures = index_by("creature", creatures, |c| c.id)?;
        let items = index_by("item", items, |i| i.id)?;
        let trainers = index_by("trainer", trainers, |t| t.id)?;

        // Every identifier must be backed by a record.
        if let Some(missing) = CreatureId::iter().find(|id| !creatures.contains_key(id)) {
            return Err(CatalogError::MissingCreature(missing));
        }
        if let Some(missing) = ItemId::iter().find(|id| !items.contains_key(id)) {
            return Err(CatalogError::MissingItem(missing));
        }
        if let Some(missing) = TrainerId::iter().find(|id| !trainers.contains_key(id)) {
            return Err(CatalogError::MissingTrainer(missing));
        }
        for template in creatures.values() {
            if let Some(move_id) = template.moves.iter().find(|m| !moves.contains_key(m)) {
                return Err(CatalogError::MissingMove {
                    creature: template.id,
                    move_id: *move_id,
                });
            }
        }
        for trainer in trainers.values() {
            if !creatures.contains_key(&trainer.creature) {
                return Err(CatalogError::MissingCreature(trainer.creature));
            }
        }

        let mut built = HashMap::new();
        for data in maps {
            let id = data.id;
            if built.contains_key(&id) {
                return Err(CatalogError::Duplicate {
                    kind: "map",
                    id: id.to_string(),
                });
            }
            let map = GameMap::from_data(data, &tiles)?;
            debug!("Loaded map '{}' ({}x{})", map.name, map.width, map.height);
            built.insert(id, map);
        }
        if let Some(missing) = StaticMap::iter().find(|id| !built.contains_key(id)) {
            return Err(CatalogError::MissingMap(missing));
        }
        for map in built.values() {
            for link in &map.door_links {
                let target = &built[&link.to];
                if !target.contains(link.arrival) {
                    return Err(CatalogError::EntryOutOfBounds {
                        map: link.to,
                        position: link.arrival,
                    });
                }
            }
        }

        Ok(Self {
            tiles,
            moves,
            creatures,
            items,
            recipes,
            trainers,
            maps: built,
        })
    }

    pub fn tile(&self, id: u16) -> Option<&TileData> {
        self.tiles.get(&id)
    }

    pub fn move_data(&self, id: MoveId) -> Option<&MoveData> {
        self.moves.get(&id)
    }

    /// Creature templates are complete after load.
    pub fn creature(&self, id: CreatureId) -> &CreatureTemplate {
        &self.creatures[&id]
    }

    pub fn item(&self, id: ItemId) -> &ItemData {
        &self.items[&id]
    }

    pub fn trainer(&self, id: TrainerId) -> &TrainerData {
        &self.trainers[&id]
    }

    pub fn map(&self, id: StaticMap) -> &GameMap {
        &self.maps[&id]
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn recipe(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Moves of a template, resolved in the template's order.
    pub fn moves_for(&self, template: &CreatureTemplate) -> Vec<MoveData> {
        template
            .moves
            .iter()
            .filter_map(|id| self.move_data(*id).cloned())
            .collect()
    }
}

fn parse<T: DeserializeOwned>(file: &'static str, text: &str) -> CatalogResult<Vec<T>> {
    ron::from_str(text).map_err(|source| CatalogError::Parse { file, source })
}

fn index_by<K, V>(
    kind: &'static str,
    records: Vec<V>,
    key: impl Fn(&V) -> K,
) -> CatalogResult<HashMap<K, V>>
where
    K: Eq + Hash + std::fmt::Debug,
{
    let mut map = HashMap::with_capacity(records.len());
    for record in records {
        let k = key(&record);
        if map.contains_key(&k) {
            return Err(CatalogError::Duplicate {
                kind,
                id: format!("{:?}", k),
            });
        }
        map.insert(k, record);
    }
    Ok(map)
}
