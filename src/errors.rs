use crate::battle::state::BattlePhase;
use schema::{CreatureId, ItemId, MoveId, Position, RecipeId, StaticMap, TrainerId};
use thiserror::Error;

/// Top-level error type for the EduMon engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("content provider error: {0}")]
    Content(#[from] ContentError),
    #[error("battle setup error: {0}")]
    BattleSetup(#[from] BattleSetupError),
    #[error("action error: {0}")]
    Action(#[from] ActionError),
    #[error("inventory error: {0}")]
    Inventory(#[from] InventoryError),
    #[error("gym error: {0}")]
    Gym(#[from] GymError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Problems found while loading or cross-checking the static catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse {file}: {source}")]
    Parse {
        file: &'static str,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("duplicate {kind} entry '{id}'")]
    Duplicate { kind: &'static str, id: String },
    #[error("map '{map}' uses unknown tile id {tile}")]
    UnknownTile { map: StaticMap, tile: u16 },
    #[error("map '{map}' has an empty or ragged tile grid")]
    RaggedGrid { map: StaticMap },
    #[error("map '{map}' entry point {position} is outside the grid")]
    EntryOutOfBounds { map: StaticMap, position: Position },
    #[error("creature '{creature}' references unknown move '{move_id}'")]
    MissingMove { creature: CreatureId, move_id: MoveId },
    #[error("creature '{0}' is referenced but not defined")]
    MissingCreature(CreatureId),
    #[error("item '{0}' is referenced but not defined")]
    MissingItem(ItemId),
    #[error("trainer '{0}' is referenced but not defined")]
    MissingTrainer(TrainerId),
    #[error("map '{0}' is referenced but not defined")]
    MissingMap(StaticMap),
}

/// Failures of the external content provider. These always degrade to a
/// fallback; they never end the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("content provider is unavailable")]
    Unavailable,
    #[error("request failed: {0}")]
    Request(String),
    #[error("response parse error: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleSetupError {
    #[error("cannot start a battle with an empty party")]
    EmptyParty,
    #[error("cannot start a battle with no conscious creature")]
    NoConsciousCreature,
}

/// Rejected battle commands. Display text of the switch variants is shown to
/// the player as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{action} is not allowed during {phase:?}")]
    WrongPhase {
        action: &'static str,
        phase: BattlePhase,
    },
    #[error("move index {0} is out of range")]
    InvalidMoveIndex(usize),
    #[error("party index {0} is out of range")]
    InvalidPartyIndex(usize),
    #[error("That creature is too tired to battle!")]
    CreatureFainted,
    #[error("That creature is already in battle!")]
    AlreadyActive,
    #[error("no quiz question has been presented yet")]
    QuizNotPresented,
    #[error("a quiz question has already been presented")]
    QuizAlreadyPresented,
    #[error("answer index {0} is out of range")]
    AnswerOutOfRange(usize),
    #[error("no battle is in progress")]
    NoBattle,
}

/// Inventory and crafting failures; Display text is player-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("Missing ingredients!")]
    MissingIngredients,
    #[error("You don't have any {0}.")]
    NotOwned(String),
    #[error("{0} can't be used right now.")]
    NotConsumable(String),
    #[error("Your party is already healthy!")]
    PartyHealthy,
    #[error("Unknown recipe {0}.")]
    UnknownRecipe(RecipeId),
    #[error("Unknown item {0}.")]
    UnknownItem(ItemId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GymError {
    #[error("the challenge has no questions")]
    NoQuestions,
    #[error("the current question was already answered")]
    AlreadyAnswered,
    #[error("the current question has not been answered")]
    NotAnswered,
    #[error("answer index {0} is out of range")]
    AnswerOutOfRange(usize),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to parse question bank: {0}")]
    QuestionBank(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
pub type CatalogResult<T> = Result<T, CatalogError>;
pub type ActionResult<T> = Result<T, ActionError>;
