use crate::{CreatureId, ItemId, MoveId, RecipeId, Subject, TrainerId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveData {
    pub id: MoveId,
    pub name: String,
    pub power: u32,
    pub accuracy: u32, // carried for display; every hit lands
    pub subject: Subject,
    /// Special moves require a correct quiz answer to land at full power.
    pub is_special: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureTemplate {
    pub id: CreatureId,
    pub name: String,
    pub subject: Subject,
    pub max_hp: u32,
    pub level: u32,
    pub moves: Vec<MoveId>,
    pub sprite_color: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Consumable,
    Material,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    pub description: String,
    /// HP restored by a consumable.
    #[serde(default)]
    pub effect_value: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub item: ItemId,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub result: ItemId,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerData {
    pub id: TrainerId,
    pub name: String,
    pub intro: String,
    pub defeat: String,
    pub post_battle: String,
    pub creature: CreatureId,
    pub creature_level: u32,
    #[serde(default)]
    pub reward: Option<ItemId>,
}
