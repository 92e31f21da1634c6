use super::*;
use crate::battle::BattlePhase;
use crate::config::ProviderKind;
use crate::content::testing::{corridor_zone, question, ScriptedContentProvider};
use crate::content::QuizQuestion;
use crate::errors::{ContentError, EngineError};
use crate::gym::{CHALLENGE_PROMPT, INTERFERENCE};
use crate::quest::MIND_BADGE;
use crate::world::Transition;
use pretty_assertions::assert_eq;
use schema::{CreatureId, Direction, Position, StaticMap, Subject};
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use tokio::sync::Notify;

fn session_with(provider: Arc<ScriptedContentProvider>, rolls: Vec<f64>) -> GameSession {
    let config = EngineConfig {
        enemy_think_delay_ms: 0,
        ..EngineConfig::default()
    };
    let catalog = Arc::new(Catalog::load_embedded().unwrap());
    GameSession::new(catalog, provider, config).with_rng(GameRng::new_for_test(rolls))
}

fn session(rolls: Vec<f64>) -> GameSession {
    session_with(Arc::new(ScriptedContentProvider::new()), rolls)
}

fn place(session: &mut GameSession, map: StaticMap, x: usize, y: usize) {
    session.world_mut().apply_transition(Transition {
        map: MapId::Static(map),
        position: Position::new(x, y),
    });
}

fn starter(session: &GameSession, level: u32) -> CreatureInst {
    let catalog = session.catalog();
    let mut creature = CreatureInst::from_template(catalog.creature(CreatureId::CalcBoy), catalog);
    creature.level = level;
    creature
}

/// Walk onto Route1 grass at (3, 2) and meet a level 4 Additurt.
/// Consumes three rolls: encounter hit, species, level spread.
fn meet_wild_calc_boy(session: &mut GameSession) {
    place(session, StaticMap::Route1, 3, 3);
    assert!(session.handle_input(InputEvent::Move(Direction::Up)));
    assert_eq!(session.screen(), &Screen::Battle);
    let enemy = session.battle().unwrap().enemy();
    assert_eq!(enemy.species, CreatureId::CalcBoy);
    assert_eq!(enemy.level, 4);
}

#[tokio::test]
async fn test_seeded_session_from_config() {
    let config = EngineConfig {
        rng_seed: Some(7),
        provider: ProviderKind::Unavailable,
        ..EngineConfig::default()
    };
    let session = GameSession::from_config(config).unwrap();

    assert_eq!(session.screen(), &Screen::Exploring);
    assert_eq!(session.world().current_id(), MapId::Static(StaticMap::Town));
    assert_eq!(session.world().position(), Position::new(7, 5));
    assert!(session.party().is_empty());
}

#[tokio::test]
async fn test_held_key_repeats_at_configured_interval() {
    let config = EngineConfig {
        auto_repeat_ms: 40,
        rng_seed: Some(1),
        provider: ProviderKind::Unavailable,
        ..EngineConfig::default()
    };
    let mut session = GameSession::from_config(config).unwrap();
    let mut repeater = session.input_repeater();
    let start = Instant::now();

    assert!(session.handle_input(repeater.press(Direction::Left, start)));
    assert_eq!(repeater.poll(start + Duration::from_millis(39)), None);
    let repeat = repeater.poll(start + Duration::from_millis(40)).unwrap();
    assert!(session.handle_input(repeat));

    assert_eq!(session.world().position(), Position::new(5, 5));
}

#[tokio::test]
async fn test_professor_message_blocks_movement_until_dismissed() {
    let mut session = session(vec![]);
    place(&mut session, StaticMap::Lab, 4, 3);
    session.handle_input(InputEvent::Move(Direction::Up));

    assert!(session.handle_input(InputEvent::Interact));
    assert_eq!(session.party().len(), 1);
    assert!(session.quest().has_starter());
    assert!(session
        .current_message()
        .unwrap()
        .starts_with("Professor: Hello there!"));

    assert!(!session.handle_input(InputEvent::Move(Direction::Down)));
    assert_eq!(session.world().position(), Position::new(4, 2));

    session.acknowledge_message().await;
    assert!(session.handle_input(InputEvent::Move(Direction::Down)));
    assert_eq!(session.world().position(), Position::new(4, 3));
}

#[tokio::test]
async fn test_inventory_overlay_blocks_movement() {
    let mut session = session(vec![]);
    session.toggle_inventory();

    assert!(!session.handle_input(InputEvent::Move(Direction::Left)));
    assert_eq!(session.world().position(), Position::new(7, 5));

    session.toggle_inventory();
    assert!(session.handle_input(InputEvent::Move(Direction::Left)));
    assert_eq!(session.world().position(), Position::new(6, 5));
}

#[tokio::test]
async fn test_empty_party_on_grass_never_battles() {
    let mut session = session(vec![0.5, 0.05]);
    place(&mut session, StaticMap::Route1, 3, 3);

    session.handle_input(InputEvent::Move(Direction::Up));
    assert_eq!(session.screen(), &Screen::Exploring);
    assert!(session.current_message().is_none());

    session.handle_input(InputEvent::Move(Direction::Left));
    assert_eq!(session.screen(), &Screen::Exploring);
    assert!(session.battle().is_none());
    assert_eq!(
        session.current_message(),
        Some(crate::world::engine::NO_CREATURE_WARNING)
    );
}

#[tokio::test]
async fn test_trainer_battle_end_to_end() {
    let mut session = session(vec![]);
    let champion = starter(&session, 50);
    session.party_mut().push(champion);
    place(&mut session, StaticMap::Route1, 4, 6);
    session.handle_input(InputEvent::Move(Direction::Up));

    session.handle_input(InputEvent::Interact);
    assert_eq!(
        session.current_message(),
        Some("Crammer Tim: I stayed up all night memorizing the dictionary!")
    );
    assert_eq!(session.screen(), &Screen::Exploring);

    session.acknowledge_message().await;
    assert_eq!(session.screen(), &Screen::Battle);
    assert_eq!(session.battle().unwrap().enemy().name, "Crammer Tim's Wordy");

    session.battle_select_move(0).await.unwrap();

    assert_eq!(session.screen(), &Screen::Exploring);
    assert!(session.battle().is_none());
    assert!(session.quest().is_trainer_defeated(TrainerId::StudentTim));
    assert_eq!(session.party()[0].xp, 0);
    assert_eq!(session.current_message(), Some("Crammer Tim: I... I need to sleep..."));
    session.acknowledge_message().await;
    assert_eq!(session.current_message(), Some("Received 1 Logic Leaf."));
    assert_eq!(session.inventory().count(ItemId::LogicLeaf), 1);
    session.acknowledge_message().await;

    // A beaten trainer only chats
    session.handle_input(InputEvent::Interact);
    assert_eq!(
        session.current_message(),
        Some("Crammer Tim: Don't underestimate the power of a good nap.")
    );
    session.acknowledge_message().await;
    assert_eq!(session.screen(), &Screen::Exploring);
}

#[tokio::test]
async fn test_trainer_challenge_with_empty_party_shows_battle_error() {
    let mut session = session(vec![]);
    place(&mut session, StaticMap::Route1, 4, 6);
    session.handle_input(InputEvent::Move(Direction::Up));
    session.handle_input(InputEvent::Interact);

    session.acknowledge_message().await;

    assert!(matches!(session.screen(), Screen::BattleError { .. }));
    assert!(session.battle().is_none());
    assert!(!session.handle_input(InputEvent::Move(Direction::Down)));

    session.return_to_world();
    assert_eq!(session.screen(), &Screen::Exploring);
    assert!(session.handle_input(InputEvent::Move(Direction::Down)));
}

#[tokio::test]
async fn test_losing_heals_party_and_returns_to_start() {
    // encounter, enemy picks its first move
    let mut session = session(vec![0.1, 0.0, 0.0, 0.0]);
    let mut weak = starter(&session, 5);
    weak.current_hp = 1;
    session.party_mut().push(weak);
    meet_wild_calc_boy(&mut session);

    session.battle_select_move(0).await.unwrap();

    assert_eq!(session.screen(), &Screen::Exploring);
    assert!(session.battle().is_none());
    assert_eq!(session.world().current_id(), MapId::Static(StaticMap::Town));
    assert_eq!(session.world().position(), Position::new(7, 5));
    assert_eq!(session.party()[0].current_hp, 40);
    assert_eq!(session.current_message(), Some(BLACKOUT_MESSAGE));
    assert!(session
        .battle_log()
        .contains(&"Additurt fainted!".to_string()));
}

#[tokio::test]
async fn test_catch_joins_party_and_loot_is_silent() {
    // encounter, capture roll, loot hit, first loot item
    let mut session = session(vec![0.1, 0.0, 0.0, 0.05, 0.0, 0.0]);
    let lead = starter(&session, 5);
    session.party_mut().push(lead);
    meet_wild_calc_boy(&mut session);

    assert!(session.battle_recruit().await.unwrap());

    assert_eq!(session.screen(), &Screen::Exploring);
    assert_eq!(session.party().len(), 2);
    assert_eq!(session.party()[1].level, 4);
    assert_eq!(session.current_message(), Some("You caught a Additurt!"));
    assert_eq!(session.dialog().len(), 1);
    assert_eq!(session.inventory().count(ItemId::LogicLeaf), 1);
}

#[tokio::test]
async fn test_running_away() {
    let mut session = session(vec![0.1, 0.0, 0.0]);
    let lead = starter(&session, 5);
    session.party_mut().push(lead);
    meet_wild_calc_boy(&mut session);

    session.battle_run().await.unwrap();

    assert_eq!(session.screen(), &Screen::Exploring);
    assert_eq!(session.current_message(), Some("Got away safely!"));
}

#[tokio::test]
async fn test_special_move_falls_back_when_provider_fails() {
    // encounter, then no loot after the win
    let provider = Arc::new(ScriptedContentProvider::new());
    let mut session = session_with(Arc::clone(&provider), vec![0.1, 0.0, 0.0, 0.9]);
    let lead = starter(&session, 5);
    session.party_mut().push(lead);
    meet_wild_calc_boy(&mut session);

    session.battle_select_move(1).await.unwrap();

    let fallback = QuizQuestion::fallback(Subject::Math);
    let battle = session.battle().unwrap();
    assert_eq!(battle.pending_quiz(), Some(&fallback));
    assert_eq!(provider.question_calls.load(Ordering::SeqCst), 1);

    assert!(session
        .battle_answer_quiz(fallback.correct_index)
        .await
        .unwrap());
    assert_eq!(session.screen(), &Screen::Exploring);
    assert_eq!(session.party()[0].xp, 50);
    assert!(session.current_message().is_none());
}

#[tokio::test]
async fn test_wrong_answer_gives_enemy_its_turn() {
    let provider = Arc::new(
        ScriptedContentProvider::new().with_questions(vec![Ok(question("What is 2 + 2?", 1))]),
    );
    let mut session = session_with(provider, vec![0.1, 0.0, 0.0, 0.0]);
    let lead = starter(&session, 5);
    session.party_mut().push(lead);
    meet_wild_calc_boy(&mut session);

    session.battle_select_move(1).await.unwrap();
    assert_eq!(
        session.battle().unwrap().pending_quiz().unwrap().question,
        "What is 2 + 2?"
    );

    assert!(!session.battle_answer_quiz(3).await.unwrap());

    let battle = session.battle().unwrap();
    assert_eq!(battle.phase(), BattlePhase::PlayerChoice);
    assert_eq!(battle.enemy().current_hp, 28);
    assert_eq!(battle.active().current_hp, 32);
}

#[tokio::test]
async fn test_switch_rejection_is_logged() {
    let mut session = session(vec![0.1, 0.0, 0.0]);
    let lead = starter(&session, 5);
    session.party_mut().push(lead);
    meet_wild_calc_boy(&mut session);

    let result = session.battle_switch(0).await;

    assert!(matches!(
        result,
        Err(EngineError::Action(ActionError::AlreadyActive))
    ));
    assert_eq!(
        session.battle_log().last(),
        Some(&ActionError::AlreadyActive.to_string())
    );
    assert_eq!(session.screen(), &Screen::Battle);
}

#[tokio::test]
async fn test_battle_actions_without_battle() {
    let mut session = session(vec![]);
    assert!(matches!(
        session.battle_run().await,
        Err(EngineError::Action(ActionError::NoBattle))
    ));
}

fn gym_batch() -> Vec<QuizQuestion> {
    (1..=5)
        .map(|n| question(&format!("Gym question {}", n), 0))
        .collect()
}

fn enter_librarian_view(session: &mut GameSession) {
    place(session, StaticMap::Library, 2, 1);
    session.handle_input(InputEvent::Move(Direction::Right));
    session.handle_input(InputEvent::Interact);
}

#[tokio::test]
async fn test_gym_challenge_awards_badge() {
    let provider = Arc::new(ScriptedContentProvider::new().with_batch(Ok(gym_batch())));
    let mut session = session_with(provider, vec![]);
    enter_librarian_view(&mut session);
    assert_eq!(session.current_message(), Some(CHALLENGE_PROMPT));

    session.acknowledge_message().await;
    assert_eq!(session.screen(), &Screen::GymChallenge);
    assert_eq!(session.gym().unwrap().total(), 5);

    for answer in [0, 0, 1, 0, 1] {
        assert_eq!(session.answer_gym_question(answer), Ok(answer == 0));
        // Feedback must be dismissed before the next answer
        assert_eq!(
            session.answer_gym_question(answer),
            Err(GymError::AlreadyAnswered)
        );
        session.acknowledge_message().await;
    }

    assert_eq!(session.screen(), &Screen::Exploring);
    assert!(session.gym().is_none());
    assert!(session.quest().has_badge(MIND_BADGE));
    assert_eq!(
        session.current_message(),
        Some("Librarian: Magnificent! You answered 3/5 correctly. You are worthy of this Badge.")
    );
    session.acknowledge_message().await;

    session.handle_input(InputEvent::Interact);
    assert_eq!(session.current_message(), Some(crate::gym::ALREADY_EARNED));
}

#[tokio::test]
async fn test_gym_batch_failure_apologizes() {
    let provider =
        Arc::new(ScriptedContentProvider::new().with_batch(Err(ContentError::Unavailable)));
    let mut session = session_with(provider, vec![]);
    enter_librarian_view(&mut session);

    session.acknowledge_message().await;

    assert_eq!(session.screen(), &Screen::Exploring);
    assert!(session.gym().is_none());
    assert_eq!(session.current_message(), Some(INTERFERENCE));
}

#[tokio::test]
async fn test_crafting_through_session() {
    let mut session = session(vec![]);
    session.inventory_mut().add(ItemId::LogicLeaf, 1);
    session.inventory_mut().add(ItemId::PixelWater, 1);

    assert_eq!(session.craft(RecipeId::CraftPotion), Ok(ItemId::DataPotion));
    assert_eq!(session.current_message(), Some("Crafted Data Potion!"));
    session.acknowledge_message().await;

    let err = session.craft(RecipeId::CraftPotion).unwrap_err();
    assert_eq!(session.current_message(), Some(err.to_string().as_str()));
    assert_eq!(session.inventory().count(ItemId::DataPotion), 1);
}

#[tokio::test]
async fn test_reordering_party() {
    let mut session = session(vec![]);
    let first = starter(&session, 5);
    let second = starter(&session, 9);
    session.party_mut().extend([first, second]);

    assert!(!session.move_party_member(0, PartyShift::Up));
    assert!(!session.move_party_member(1, PartyShift::Down));
    assert!(session.move_party_member(0, PartyShift::Down));
    assert_eq!(session.party()[0].level, 9);
    assert_eq!(session.party()[1].level, 5);
}

#[tokio::test]
async fn test_companion_falls_back_when_provider_fails() {
    let mut session = session(vec![]);

    let advice = session.ask_companion().await;

    assert_eq!(advice, ADVICE_FALLBACK);
    assert_eq!(session.companion_message(), Some(ADVICE_FALLBACK));
}

#[tokio::test]
async fn test_frontier_generation_is_not_duplicated() {
    let gate = Arc::new(Notify::new());
    let provider = Arc::new(
        ScriptedContentProvider::new()
            .with_maps(vec![Ok(corridor_zone())])
            .gated_on(Arc::clone(&gate)),
    );
    // Peak rolls for encounters everywhere; empty party, no warning
    let mut session = session_with(Arc::clone(&provider), vec![0.5, 0.5]);
    place(&mut session, StaticMap::Peak, 6, 1);

    session.handle_input(InputEvent::Move(Direction::Up));
    assert_eq!(
        session.current_message(),
        Some(crate::world::transitions::MIST_MESSAGE)
    );
    session.acknowledge_message().await;

    // Back off the door and try again while the first request is pending
    session.handle_input(InputEvent::Move(Direction::Down));
    session.handle_input(InputEvent::Move(Direction::Up));
    session.acknowledge_message().await;
    assert_eq!(session.pump(), None);

    gate.notify_one();
    assert_eq!(
        session.settle_frontier().await,
        Some(MapId::Generated(1))
    );
    assert_eq!(provider.map_calls.load(Ordering::SeqCst), 1);
    assert_eq!(session.world().sequence().len(), 10);

    session.handle_input(InputEvent::Move(Direction::Down));
    session.handle_input(InputEvent::Move(Direction::Up));
    assert_eq!(session.world().current_id(), MapId::Generated(1));
    assert_eq!(session.world().position(), Position::new(6, 10));
}
