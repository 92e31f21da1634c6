pub mod dialog;
pub mod input;

#[cfg(test)]
mod tests;

pub use dialog::{Dialog, PendingAction};
pub use input::{InputEvent, InputRepeater};

use crate::battle::{BattleEngine, BattleOutcome, BattlePhase, BattleReport, EventBus, MoveSelection, Opponent};
use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::content::{AdviceRequest, ContentProvider, ADVICE_FALLBACK};
use crate::creature::{average_level, heal_party, CreatureInst};
use crate::errors::{ActionError, EngineResult, GymError, InventoryError};
use crate::gym::{GymChallenge, GymProgress, DEFAULT_CHALLENGE_LEVEL, GYM_SUBJECTS};
use crate::inventory::Inventory;
use crate::progression::RewardCalculator;
use crate::quest::QuestState;
use crate::rng::GameRng;
use crate::world::{FrontierGenerator, InteractOutcome, StepOutcome, World};
use log::{debug, info, warn};
use schema::{ItemId, MapId, RecipeId, TrainerId};
use std::sync::Arc;

const BLACKOUT_MESSAGE: &str = "You blacked out! Study harder next time.";
const COMPANION_IDLE_ACTION: &str = "Standing still";

/// What the player is looking at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Exploring,
    Battle,
    GymChallenge,
    /// A battle could not be set up; `return_to_world` recovers.
    BattleError { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyShift {
    Up,
    Down,
}

/// Everything one playthrough owns. All game state lives here and is
/// reached through `&mut self`; nothing is global.
pub struct GameSession {
    catalog: Arc<Catalog>,
    config: EngineConfig,
    provider: Arc<dyn ContentProvider>,
    world: World,
    party: Vec<CreatureInst>,
    quest: QuestState,
    inventory: Inventory,
    rng: GameRng,
    dialog: Dialog,
    screen: Screen,
    battle: Option<BattleEngine>,
    battle_log: Vec<String>,
    gym: Option<GymChallenge>,
    frontier: FrontierGenerator,
    inventory_open: bool,
    companion_message: Option<String>,
}

impl GameSession {
    pub fn new(catalog: Arc<Catalog>, provider: Arc<dyn ContentProvider>, config: EngineConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => GameRng::from_seed(seed),
            None => GameRng::new_random(),
        };
        let world = World::new(&catalog);
        let frontier = FrontierGenerator::new(Arc::clone(&provider));
        info!("New session started in {}", world.current_map().name);
        Self {
            catalog,
            config,
            provider,
            world,
            party: Vec::new(),
            quest: QuestState::new(),
            inventory: Inventory::new(),
            rng,
            dialog: Dialog::new(),
            screen: Screen::Exploring,
            battle: None,
            battle_log: Vec::new(),
            gym: None,
            frontier,
            inventory_open: false,
            companion_message: None,
        }
    }

    /// Load the embedded catalog and the configured provider.
    pub fn from_config(config: EngineConfig) -> EngineResult<Self> {
        let catalog = Arc::new(Catalog::load_embedded()?);
        let provider = config.build_provider()?;
        Ok(Self::new(catalog, provider, config))
    }

    pub fn with_rng(mut self, rng: GameRng) -> Self {
        self.rng = rng;
        self
    }

    // --- ACCESSORS ---

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Repeater for held movement keys at the configured interval.
    pub fn input_repeater(&self) -> InputRepeater {
        InputRepeater::new(self.config.auto_repeat())
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn party(&self) -> &[CreatureInst] {
        &self.party
    }

    pub fn quest(&self) -> &QuestState {
        &self.quest
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    pub fn current_message(&self) -> Option<&str> {
        self.dialog.current()
    }

    pub fn battle(&self) -> Option<&BattleEngine> {
        self.battle.as_ref()
    }

    /// Log lines of the running (or just finished) battle.
    pub fn battle_log(&self) -> &[String] {
        &self.battle_log
    }

    pub fn gym(&self) -> Option<&GymChallenge> {
        self.gym.as_ref()
    }

    pub fn frontier(&self) -> &FrontierGenerator {
        &self.frontier
    }

    pub fn is_inventory_open(&self) -> bool {
        self.inventory_open
    }

    pub fn companion_message(&self) -> Option<&str> {
        self.companion_message.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub(crate) fn party_mut(&mut self) -> &mut Vec<CreatureInst> {
        &mut self.party
    }

    #[cfg(test)]
    pub(crate) fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    // --- WORLD ---

    /// Movement and interaction only happen while exploring with no
    /// message or overlay in the way.
    pub fn can_act_in_world(&self) -> bool {
        self.screen == Screen::Exploring && !self.dialog.is_open() && !self.inventory_open
    }

    /// Returns false when the input was ignored.
    pub fn handle_input(&mut self, input: InputEvent) -> bool {
        if !self.can_act_in_world() {
            return false;
        }
        match input {
            InputEvent::Move(direction) => {
                let outcome = self
                    .world
                    .step(direction, &self.catalog, &mut self.party, &mut self.rng);
                self.apply_step(outcome);
            }
            InputEvent::Interact => {
                let outcome = self
                    .world
                    .interact(&self.catalog, &mut self.party, &mut self.quest);
                self.apply_interaction(outcome);
            }
        }
        true
    }

    fn apply_step(&mut self, outcome: StepOutcome) {
        if let Some(text) = outcome.message() {
            self.dialog.push(text);
        }
        match outcome {
            StepOutcome::Transitioned(_) | StepOutcome::FrontierPending => {
                self.frontier.observe(&self.world);
            }
            StepOutcome::Encounter(wild) => self.start_battle(wild, Opponent::Wild),
            StepOutcome::Blocked
            | StepOutcome::Moved
            | StepOutcome::Healed
            | StepOutcome::Message(_) => {}
        }
    }

    fn apply_interaction(&mut self, outcome: InteractOutcome) {
        match outcome {
            InteractOutcome::Nothing => {}
            InteractOutcome::Message(text) => self.dialog.push(text),
            InteractOutcome::GymChallengeOffered(text) => {
                self.dialog
                    .push_with(text, vec![PendingAction::StartGymChallenge]);
            }
            InteractOutcome::TrainerChallenge { trainer, message } => {
                self.dialog
                    .push_with(message, vec![PendingAction::StartTrainerBattle(trainer)]);
            }
        }
    }

    /// Dismiss the current message and run what it armed, in order.
    pub async fn acknowledge_message(&mut self) {
        let Some(continuations) = self.dialog.dismiss() else {
            return;
        };
        for action in continuations {
            debug!("Continuation: {:?}", action);
            match action {
                PendingAction::StartGymChallenge => self.start_gym_challenge().await,
                PendingAction::StartTrainerBattle(trainer) => self.start_trainer_battle(trainer),
                PendingAction::AdvanceGymQuestion => self.advance_gym_question(),
            }
        }
    }

    /// Fold finished background work into the world.
    pub fn pump(&mut self) -> Option<MapId> {
        self.frontier.pump(&mut self.world)
    }

    /// Wait for a running frontier generation and fold it in.
    pub async fn settle_frontier(&mut self) -> Option<MapId> {
        self.frontier.settle(&mut self.world).await
    }

    pub fn toggle_inventory(&mut self) {
        self.inventory_open = !self.inventory_open;
    }

    /// Swap a party member with its neighbour. Not allowed mid-battle;
    /// moves past either end are ignored.
    pub fn move_party_member(&mut self, index: usize, shift: PartyShift) -> bool {
        if self.battle.is_some() {
            return false;
        }
        let target = match shift {
            PartyShift::Up => index.checked_sub(1),
            PartyShift::Down => Some(index + 1),
        };
        match target {
            Some(target) if index < self.party.len() && target < self.party.len() => {
                self.party.swap(index, target);
                true
            }
            _ => false,
        }
    }

    /// Ask the companion for a hint; any provider failure gives the
    /// fallback line.
    pub async fn ask_companion(&mut self) -> String {
        let request = AdviceRequest {
            location: self.world.current_map().name.clone(),
            has_starter: self.quest.has_starter(),
            badge_count: self.quest.badges().count(),
            last_action: COMPANION_IDLE_ACTION.to_string(),
        };
        let advice = match self.provider.request_companion_advice(&request).await {
            Ok(advice) => advice,
            Err(err) => {
                warn!("Companion advice unavailable: {}", err);
                ADVICE_FALLBACK.to_string()
            }
        };
        self.companion_message = Some(advice.clone());
        advice
    }

    // --- INVENTORY ---

    pub fn craft(&mut self, recipe_id: RecipeId) -> Result<ItemId, InventoryError> {
        let result = self
            .catalog
            .recipe(recipe_id)
            .ok_or(InventoryError::UnknownRecipe(recipe_id))
            .and_then(|recipe| self.inventory.craft(recipe));
        match &result {
            Ok(item) => {
                let name = &self.catalog.item(*item).name;
                self.dialog.push(format!("Crafted {}!", name));
            }
            Err(err) => self.dialog.push(err.to_string()),
        }
        result
    }

    pub fn use_item(&mut self, item: ItemId) -> Result<(), InventoryError> {
        match self
            .inventory
            .use_consumable(item, &self.catalog, &mut self.party)
        {
            Ok(used) => {
                self.dialog.push(used.message());
                Ok(())
            }
            Err(err) => {
                self.dialog.push(err.to_string());
                Err(err)
            }
        }
    }

    // --- BATTLE ---

    fn start_trainer_battle(&mut self, trainer_id: TrainerId) {
        if self.quest.is_trainer_defeated(trainer_id) {
            return;
        }
        let enemy = CreatureInst::for_trainer(self.catalog.trainer(trainer_id), &self.catalog);
        self.start_battle(enemy, Opponent::Trainer(trainer_id));
    }

    fn start_battle(&mut self, enemy: CreatureInst, opponent: Opponent) {
        let mut bus = EventBus::new();
        match BattleEngine::new(&self.party, enemy, opponent, &mut bus) {
            Ok(engine) => {
                bus.log_debug();
                self.battle_log = bus.messages();
                self.battle = Some(engine);
                self.screen = Screen::Battle;
            }
            Err(err) => {
                warn!("Battle could not start: {}", err);
                self.screen = Screen::BattleError {
                    reason: err.to_string(),
                };
            }
        }
    }

    /// Leave the battle error screen.
    pub fn return_to_world(&mut self) {
        if matches!(self.screen, Screen::BattleError { .. }) {
            self.battle = None;
            self.screen = Screen::Exploring;
        }
    }

    fn battle_mut(&mut self) -> Result<&mut BattleEngine, ActionError> {
        self.battle.as_mut().ok_or(ActionError::NoBattle)
    }

    /// Choose a move. A special move fetches its question here; answer it
    /// with `battle_answer_quiz`.
    pub async fn battle_select_move(&mut self, move_index: usize) -> EngineResult<()> {
        let mut bus = EventBus::new();
        let selection = self.battle_mut()?.select_move(move_index, &mut bus);
        self.record(&bus);
        match selection? {
            MoveSelection::Resolved => self.after_player_action().await,
            MoveSelection::QuizRequired { subject, level } => {
                let question = match self.provider.request_quiz_question(subject, level).await {
                    Ok(question) => Some(question),
                    Err(err) => {
                        warn!("Quiz question unavailable, using fallback: {}", err);
                        None
                    }
                };
                self.battle_mut()?.present_quiz(question)?;
            }
        }
        Ok(())
    }

    pub async fn battle_answer_quiz(&mut self, answer: usize) -> EngineResult<bool> {
        let mut bus = EventBus::new();
        let correct = self.battle_mut()?.answer_quiz(answer, &mut bus);
        self.record(&bus);
        let correct = correct?;
        self.after_player_action().await;
        Ok(correct)
    }

    /// Switch creatures. Rejections are also shown in the battle log.
    pub async fn battle_switch(&mut self, index: usize) -> EngineResult<()> {
        let mut bus = EventBus::new();
        let result = self.battle_mut()?.switch_to(index, &mut bus);
        self.record(&bus);
        if let Err(err @ (ActionError::AlreadyActive | ActionError::CreatureFainted)) = &result {
            self.battle_log.push(err.to_string());
        }
        result?;
        self.after_player_action().await;
        Ok(())
    }

    pub async fn battle_recruit(&mut self) -> EngineResult<bool> {
        let mut bus = EventBus::new();
        let engine = self.battle.as_mut().ok_or(ActionError::NoBattle)?;
        let recruited = engine.recruit(&mut self.rng, &mut bus);
        self.record(&bus);
        let recruited = recruited?;
        self.after_player_action().await;
        Ok(recruited)
    }

    pub async fn battle_run(&mut self) -> EngineResult<()> {
        let mut bus = EventBus::new();
        let result = self.battle_mut()?.run(&mut bus);
        self.record(&bus);
        result?;
        self.after_player_action().await;
        Ok(())
    }

    fn record(&mut self, bus: &EventBus) {
        bus.log_debug();
        self.battle_log.extend(bus.messages());
    }

    /// Give the enemy its turn after the thinking delay, then settle the
    /// battle if it is over.
    async fn after_player_action(&mut self) {
        let phase = self.battle.as_ref().map(BattleEngine::phase);
        if phase == Some(BattlePhase::EnemyChoice) {
            let delay = self.config.enemy_think_delay();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if let Some(engine) = self.battle.as_mut() {
                let mut bus = EventBus::new();
                if let Err(err) = engine.enemy_turn(&mut self.rng, &mut bus) {
                    warn!("Enemy turn skipped: {}", err);
                }
                self.record(&bus);
            }
        }
        let report = self.battle.as_ref().and_then(BattleEngine::report);
        if let Some(report) = report {
            self.finish_battle(report);
        }
    }

    fn finish_battle(&mut self, report: BattleReport) {
        info!("Battle finished: {:?} vs {:?}", report.outcome, report.opponent);
        self.battle = None;
        self.screen = Screen::Exploring;
        self.party = report.party;

        match report.outcome {
            BattleOutcome::Catch => {
                if let Some(caught) = report.caught {
                    self.dialog.push(format!("You caught a {}!", caught.name));
                    self.party.push(caught);
                }
            }
            BattleOutcome::Lose => {
                heal_party(&mut self.party);
                self.world.return_to_start();
                self.dialog.push(BLACKOUT_MESSAGE);
            }
            BattleOutcome::Run => self.dialog.push("Got away safely!"),
            BattleOutcome::Win => {}
        }

        let rewards = RewardCalculator;
        match (report.outcome, report.opponent) {
            (BattleOutcome::Win, Opponent::Trainer(trainer_id)) => {
                let trainer = self.catalog.trainer(trainer_id);
                self.quest.mark_trainer_defeated(trainer_id);
                self.dialog.push(format!("{}: {}", trainer.name, trainer.defeat));
                if let Some(item) = rewards.trainer_reward(trainer) {
                    self.inventory.add(item, 1);
                    self.dialog
                        .push(format!("Received 1 {}.", self.catalog.item(item).name));
                }
            }
            (BattleOutcome::Win | BattleOutcome::Catch, Opponent::Wild) => {
                if let Some(item) = rewards.roll_loot(&mut self.rng) {
                    self.inventory.add(item, 1);
                    // A catch already has its own message
                    if report.outcome == BattleOutcome::Win {
                        self.dialog
                            .push(format!("Victory! Found 1 {}!", self.catalog.item(item).name));
                    }
                }
            }
            _ => {}
        }
    }

    // --- GYM ---

    async fn start_gym_challenge(&mut self) {
        let level = average_level(&self.party, DEFAULT_CHALLENGE_LEVEL);
        let batch = self.provider.request_quiz_batch(&GYM_SUBJECTS, level).await;
        match GymChallenge::from_batch(batch) {
            Ok(challenge) => {
                info!("Gym challenge started with {} questions", challenge.total());
                self.gym = Some(challenge);
                self.screen = Screen::GymChallenge;
            }
            Err(apology) => self.dialog.push(apology),
        }
    }

    /// Answer the current gym question. Feedback is queued and the next
    /// question follows once it is dismissed.
    pub fn answer_gym_question(&mut self, answer: usize) -> Result<bool, GymError> {
        if self.dialog.is_open() {
            return Err(GymError::AlreadyAnswered);
        }
        let gym = self.gym.as_mut().ok_or(GymError::NoQuestions)?;
        let correct = gym.answer(answer)?;
        self.dialog.push_with(
            GymChallenge::feedback(correct),
            vec![PendingAction::AdvanceGymQuestion],
        );
        Ok(correct)
    }

    fn advance_gym_question(&mut self) {
        let Some(gym) = self.gym.as_mut() else {
            return;
        };
        match gym.advance() {
            Ok(GymProgress::NextQuestion) => {}
            Ok(GymProgress::Finished(result)) => {
                self.gym = None;
                self.screen = Screen::Exploring;
                let verdict = result.finalize(&mut self.quest);
                self.dialog.push(verdict);
            }
            Err(err) => warn!("Gym advance ignored: {}", err),
        }
    }
}
