use crate::catalog::Catalog;
use crate::creature::CreatureInst;
use crate::errors::InventoryError;
use log::debug;
use schema::{ItemId, ItemKind, Recipe};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySlot {
    pub item: ItemId,
    pub count: u32,
}

/// Outcome of using a consumable on the party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUse {
    pub item_name: String,
    pub party_index: usize,
    pub creature_name: String,
    pub restored: u32,
}

impl ItemUse {
    pub fn message(&self) -> String {
        format!(
            "Used {} on {}. Recovered {} HP.",
            self.item_name, self.creature_name, self.restored
        )
    }
}

/// Item stacks in the order they were first picked up. A stack whose count
/// reaches zero is removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<InventorySlot>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[InventorySlot] {
        &self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn count(&self, item: ItemId) -> u32 {
        self.slots
            .iter()
            .find(|slot| slot.item == item)
            .map_or(0, |slot| slot.count)
    }

    pub fn add(&mut self, item: ItemId, count: u32) {
        if count == 0 {
            return;
        }
        match self.slots.iter_mut().find(|slot| slot.item == item) {
            Some(slot) => slot.count += count,
            None => self.slots.push(InventorySlot { item, count }),
        }
    }

    /// Remove up to `count`; never goes below zero. Returns how many were
    /// actually removed.
    pub fn remove(&mut self, item: ItemId, count: u32) -> u32 {
        let Some(index) = self.slots.iter().position(|slot| slot.item == item) else {
            return 0;
        };
        let slot = &mut self.slots[index];
        let removed = slot.count.min(count);
        slot.count -= removed;
        if slot.count == 0 {
            self.slots.remove(index);
        }
        removed
    }

    pub fn can_craft(&self, recipe: &Recipe) -> bool {
        recipe
            .ingredients
            .iter()
            .all(|ingredient| self.count(ingredient.item) >= ingredient.count)
    }

    /// All ingredients are checked before any is consumed, so a failed
    /// craft leaves the inventory untouched.
    pub fn craft(&mut self, recipe: &Recipe) -> Result<ItemId, InventoryError> {
        if !self.can_craft(recipe) {
            return Err(InventoryError::MissingIngredients);
        }
        for ingredient in &recipe.ingredients {
            self.remove(ingredient.item, ingredient.count);
        }
        self.add(recipe.result, 1);
        debug!("Crafted {} via {}", recipe.result, recipe.id);
        Ok(recipe.result)
    }

    /// Heal the first injured party member with a consumable.
    pub fn use_consumable(
        &mut self,
        item: ItemId,
        catalog: &Catalog,
        party: &mut [CreatureInst],
    ) -> Result<ItemUse, InventoryError> {
        let data = catalog.item(item);
        if self.count(item) == 0 {
            return Err(InventoryError::NotOwned(data.name.clone()));
        }
        let heal_amount = match (data.kind, data.effect_value) {
            (ItemKind::Consumable, Some(value)) => value,
            _ => return Err(InventoryError::NotConsumable(data.name.clone())),
        };
        let Some(party_index) = party.iter().position(CreatureInst::is_injured) else {
            return Err(InventoryError::PartyHealthy);
        };

        let target = &mut party[party_index];
        let restored = target.heal(heal_amount);
        self.remove(item, 1);
        Ok(ItemUse {
            item_name: data.name.clone(),
            party_index,
            creature_name: target.name.clone(),
            restored,
        })
    }
}
