//! EduMon Engine
//!
//! An educational creature-collecting RPG: tile-based exploration, turn-based
//! battles whose special moves are gated by quiz questions, a gym quiz, and a
//! frontier of zones generated on demand by an asynchronous content provider.

pub mod battle;
pub mod catalog;
pub mod config;
pub mod content;
pub mod creature;
pub mod errors;
pub mod gym;
pub mod inventory;
pub mod progression;
pub mod quest;
pub mod rng;
pub mod session;
pub mod world;

// --- PUBLIC API RE-EXPORTS ---

pub use schema::{
    CreatureId, CreatureTemplate, Direction, ItemId, MapId, MoveData, MoveId, Position, RecipeId,
    StaticMap, Subject, TileKind, TrainerId,
};

pub use battle::{BattleEngine, BattleEvent, BattleOutcome, BattlePhase, EventBus, Opponent};
pub use catalog::Catalog;
pub use config::EngineConfig;
pub use content::{ContentProvider, OfflineContentProvider, QuizQuestion};
pub use creature::CreatureInst;
pub use session::{GameSession, Screen};
pub use world::World;

pub use errors::{
    ActionError, BattleSetupError, CatalogError, ConfigError, ContentError, EngineError,
    EngineResult, GymError, InventoryError,
};
