use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, Display, EnumIter, EnumString};

// Catalog identifiers. Every reference between catalog records goes through
// one of these enums, so a dangling id is a compile or load error rather than
// a runtime lookup miss.

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    EnumIter, EnumString, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MoveId {
    Tackle,
    PiSlam,
    BeakerSplash,
    QuoteStrike,
    HistoryRush,
    ColorBlast,
    BugBite,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    EnumIter, EnumString, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CreatureId {
    CalcBoy,
    SciGuy,
    BookWorm,
    HistHound,
    PaintPal,
    ByteBit,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    EnumIter, EnumString, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ItemId {
    LogicLeaf,
    PixelWater,
    CodeScrap,
    HistoryDust,
    DataPotion,
    SuperPotion,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    EnumIter, EnumString, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecipeId {
    CraftPotion,
    CraftSuperPotion,
    RecyclePotion,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    EnumIter, EnumString, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TrainerId {
    StudentTim,
    MathleteJen,
    HistorianBen,
}

/// Hand-authored maps shipped with the catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    EnumIter, EnumString, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StaticMap {
    Town,
    Lab,
    Route1,
    Forest1,
    Forest2,
    Town2,
    Library,
    Mountain,
    Cave,
    Pass,
    Peak,
}

/// Identity of any map the world knows about: either a catalog map or the
/// n-th zone generated past the frontier (numbered from 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapId {
    Static(StaticMap),
    Generated(u32),
}

impl MapId {
    /// Towns and indoor maps never roll encounters.
    pub fn is_safe_zone(&self) -> bool {
        matches!(
            self,
            MapId::Static(StaticMap::Town | StaticMap::Town2 | StaticMap::Lab | StaticMap::Library)
        )
    }

    /// Maps where every tile, not just grass, may trigger an encounter.
    pub fn encounters_everywhere(&self) -> bool {
        matches!(
            self,
            MapId::Static(StaticMap::Cave | StaticMap::Mountain | StaticMap::Peak)
        )
    }

    pub fn as_static(&self) -> Option<StaticMap> {
        match self {
            MapId::Static(map) => Some(*map),
            MapId::Generated(_) => None,
        }
    }
}

impl From<StaticMap> for MapId {
    fn from(map: StaticMap) -> Self {
        MapId::Static(map)
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapId::Static(map) => write!(f, "{}", map),
            MapId::Generated(n) => write!(f, "generated_{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_ids_use_snake_case_names() {
        assert_eq!(CreatureId::CalcBoy.to_string(), "calc_boy");
        assert_eq!(ItemId::from_str("data_potion").unwrap(), ItemId::DataPotion);
        assert_eq!(MapId::Static(StaticMap::Route1).to_string(), "route1");
        assert_eq!(MapId::Generated(2).to_string(), "generated_2");
    }

    #[test]
    fn test_safe_zones_and_open_encounter_maps() {
        assert!(MapId::from(StaticMap::Town2).is_safe_zone());
        assert!(MapId::from(StaticMap::Library).is_safe_zone());
        assert!(!MapId::from(StaticMap::Route1).is_safe_zone());
        assert!(!MapId::Generated(1).is_safe_zone());
        assert!(MapId::from(StaticMap::Cave).encounters_everywhere());
        assert!(!MapId::Generated(1).encounters_everywhere());
    }
}
