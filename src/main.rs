//! Terminal front end for EduMon: a line-driven loop over `GameSession`.

use anyhow::{Context, Result};
use clap::Parser;
use edumon::config::{EngineConfig, ProviderKind};
use edumon::session::{GameSession, InputEvent, PartyShift, Screen};
use log::info;
use schema::{Direction, ItemId, Position, RecipeId, TileKind};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(name = "edumon")]
#[command(about = "EduMon: an educational creature-collecting RPG")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for every random roll
    #[arg(short, long)]
    seed: Option<u64>,

    /// Disable the content provider and play on fallbacks only
    #[arg(long)]
    offline_fallbacks: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("while loading config '{}'", path.display()))?,
        None => EngineConfig::default(),
    };
    if args.seed.is_some() {
        config.rng_seed = args.seed;
    }
    if args.offline_fallbacks {
        config.provider = ProviderKind::Unavailable;
    }

    let mut session = GameSession::from_config(config).context("while starting a new game")?;
    info!("Starting the game!");
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if let Some(map) = session.pump() {
            info!("Frontier extended with {:?}", map);
        }
        render(&session);

        let Some(line) = lines.next_line().await.context("while reading input")? else {
            break;
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        if matches!(words.as_slice(), ["quit"] | ["q"]) {
            break;
        }
        handle_command(&mut session, &words).await;
    }
    info!("Goodbye.");
    Ok(())
}

fn print_help() {
    println!("EduMon");
    println!("  w/a/s/d          move        e        interact");
    println!("  w <n>            hold a direction for n steps");
    println!("  <enter>          dismiss the current message");
    println!("  i                toggle inventory");
    println!("  craft <recipe>   craft       use <item>   use a consumable");
    println!("  up <n> / down <n>   reorder the party");
    println!("  hint             ask your companion");
    println!("  battle: m <n> move, a <n> answer, sw <n> switch, recruit, run");
    println!("  gym: a <n> answer      back: leave an error screen");
    println!("  q                quit");
}

async fn handle_command(session: &mut GameSession, words: &[&str]) {
    if session.current_message().is_some() {
        session.acknowledge_message().await;
        return;
    }
    let result = match (session.screen().clone(), words) {
        (Screen::Battle, ["m", n]) => match menu_index(n) {
            Some(n) => session.battle_select_move(n).await,
            None => Ok(()),
        },
        (Screen::Battle, ["a", n]) => match menu_index(n) {
            Some(n) => session.battle_answer_quiz(n).await.map(|_| ()),
            None => Ok(()),
        },
        (Screen::Battle, ["sw", n]) => match menu_index(n) {
            Some(n) => session.battle_switch(n).await,
            None => Ok(()),
        },
        (Screen::Battle, ["recruit"]) => session.battle_recruit().await.map(|_| ()),
        (Screen::Battle, ["run"]) => session.battle_run().await,
        (Screen::GymChallenge, ["a", n]) => {
            if let Some(n) = menu_index(n) {
                if let Err(err) = session.answer_gym_question(n) {
                    println!("{}", err);
                }
            }
            Ok(())
        }
        (Screen::BattleError { .. }, ["back"]) => {
            session.return_to_world();
            Ok(())
        }
        (Screen::Exploring, [word]) => {
            exploring_command(session, word).await;
            Ok(())
        }
        (Screen::Exploring, ["craft", recipe]) => {
            match recipe.parse::<RecipeId>() {
                Ok(recipe) => {
                    let _ = session.craft(recipe);
                }
                Err(_) => println!("Unknown recipe '{}'.", recipe),
            }
            Ok(())
        }
        (Screen::Exploring, ["use", item]) => {
            match item.parse::<ItemId>() {
                Ok(item) => {
                    let _ = session.use_item(item);
                }
                Err(_) => println!("Unknown item '{}'.", item),
            }
            Ok(())
        }
        (Screen::Exploring, [shift @ ("up" | "down"), n]) => {
            let shift = if *shift == "up" {
                PartyShift::Up
            } else {
                PartyShift::Down
            };
            if let Some(n) = menu_index(n) {
                session.move_party_member(n, shift);
            }
            Ok(())
        }
        (Screen::Exploring, [key, n]) => {
            match (direction_key(key), n.parse::<usize>()) {
                (Some(direction), Ok(steps)) => hold_move(session, direction, steps).await,
                _ => print_help(),
            }
            Ok(())
        }
        _ => {
            print_help();
            Ok(())
        }
    };
    if let Err(err) = result {
        println!("{}", err);
    }
}

/// Menus are numbered from 1 on screen.
fn menu_index(word: &str) -> Option<usize> {
    word.parse::<usize>().ok().and_then(|n| n.checked_sub(1))
}

fn direction_key(word: &str) -> Option<Direction> {
    match word {
        "w" => Some(Direction::Up),
        "a" => Some(Direction::Left),
        "s" => Some(Direction::Down),
        "d" => Some(Direction::Right),
        _ => None,
    }
}

/// Hold a movement key for up to `steps` steps at the auto-repeat rate.
/// Anything that stops the world view (a message, a battle) ends the hold.
async fn hold_move(session: &mut GameSession, direction: Direction, steps: usize) {
    let mut repeater = session.input_repeater();
    let tick = session.config().auto_repeat() / 4;
    let mut next = Some(repeater.press(direction, Instant::now()));
    let mut taken = 0;
    while taken < steps {
        match next.take() {
            Some(event) => {
                if !session.handle_input(event) || session.current_message().is_some() {
                    break;
                }
                taken += 1;
            }
            None => tokio::time::sleep(tick.max(Duration::from_millis(1))).await,
        }
        next = repeater.poll(Instant::now());
    }
    repeater.release(direction);
}

async fn exploring_command(session: &mut GameSession, word: &str) {
    let direction = direction_key(word).or_else(|| word.parse::<Direction>().ok());
    if let Some(direction) = direction {
        session.handle_input(InputEvent::Move(direction));
        return;
    }
    match word {
        "e" => {
            session.handle_input(InputEvent::Interact);
        }
        "i" => session.toggle_inventory(),
        "hint" => {
            let advice = session.ask_companion().await;
            println!("Companion: {}", advice);
        }
        _ => print_help(),
    }
}

fn render(session: &GameSession) {
    println!();
    match session.screen() {
        Screen::Exploring if session.is_inventory_open() => render_inventory(session),
        Screen::Exploring => render_world(session),
        Screen::Battle => render_battle(session),
        Screen::GymChallenge => render_gym(session),
        Screen::BattleError { reason } => {
            println!("The battle could not start: {}", reason);
            println!("Type 'back' to return.");
        }
    }
    if let Some(message) = session.current_message() {
        println!("> {}", message);
    }
}

fn render_world(session: &GameSession) {
    let world = session.world();
    let map = world.current_map();
    println!("== {} ==", map.name);
    for (y, row) in map.rows().iter().enumerate() {
        let line: String = row
            .iter()
            .enumerate()
            .map(|(x, id)| {
                if Position::new(x, y) == world.position() {
                    return '@';
                }
                match session.catalog().tile(*id).map(|tile| tile.kind) {
                    Some(TileKind::Walkable) => '.',
                    Some(TileKind::Grass) => '"',
                    Some(TileKind::Door) => '+',
                    Some(TileKind::Healer) => 'H',
                    Some(TileKind::Npc) => '?',
                    Some(TileKind::Trainer) => 'T',
                    Some(TileKind::Wall) | None => '#',
                }
            })
            .collect();
        println!("{}", line);
    }
    for (i, creature) in session.party().iter().enumerate() {
        println!(
            "{}. {} Lv{} {}/{} HP",
            i + 1,
            creature.name,
            creature.level,
            creature.current_hp,
            creature.max_hp
        );
    }
}

fn render_inventory(session: &GameSession) {
    println!("== Inventory ==");
    if session.inventory().is_empty() {
        println!("(empty)");
    }
    for slot in session.inventory().slots() {
        println!("{} x{} ({})", session.catalog().item(slot.item).name, slot.count, slot.item);
    }
    println!("Recipes:");
    for recipe in session.catalog().recipes() {
        let ingredients: Vec<String> = recipe
            .ingredients
            .iter()
            .map(|ingredient| format!("{} {}", ingredient.count, ingredient.item))
            .collect();
        println!("  {}: {}", recipe.id, ingredients.join(" + "));
    }
}

fn render_battle(session: &GameSession) {
    let Some(battle) = session.battle() else {
        return;
    };
    for line in session.battle_log().iter().rev().take(4).rev() {
        println!("  {}", line);
    }
    let enemy = battle.enemy();
    let active = battle.active();
    println!("Enemy: {} Lv{} {}/{} HP", enemy.name, enemy.level, enemy.current_hp, enemy.max_hp);
    println!("You:   {} Lv{} {}/{} HP", active.name, active.level, active.current_hp, active.max_hp);
    if let Some(quiz) = battle.pending_quiz() {
        println!("Quiz: {}", quiz.question);
        for (i, option) in quiz.options.iter().enumerate() {
            println!("  {}. {}", i + 1, option);
        }
        return;
    }
    for (i, known) in active.moves.iter().enumerate() {
        let marker = if known.is_special { " *" } else { "" };
        println!("  {}. {} ({}){}", i + 1, known.name, known.power, marker);
    }
}

fn render_gym(session: &GameSession) {
    let Some(gym) = session.gym() else {
        return;
    };
    let Some(question) = gym.current_question() else {
        return;
    };
    println!(
        "Question {}/{} (score {})",
        gym.question_number(),
        gym.total(),
        gym.score()
    );
    println!("{}", question.question);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }
}
