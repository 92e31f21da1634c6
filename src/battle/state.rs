use log::debug;
use schema::{Subject, TrainerId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleSide {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleOutcome {
    Win,
    Lose,
    Run,
    Catch,
}

/// Who the player is fighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Opponent {
    Wild,
    Trainer(TrainerId),
}

/// Where a battle currently stands. Each player command is only accepted in
/// the phase that expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    PlayerChoice,
    /// A special move was chosen and awaits its quiz.
    WaitingOnQuiz {
        move_index: usize,
    },
    ResolvingPlayerMove,
    /// The enemy acts next, after the caller's thinking delay.
    EnemyChoice,
    ResolvingEnemyMove,
    /// The active creature fainted and a living one must be sent in.
    ForcedSwitch,
    BattleOver(BattleOutcome),
}

impl BattlePhase {
    pub fn is_over(&self) -> bool {
        matches!(self, BattlePhase::BattleOver(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    // Start
    WildAppeared {
        enemy: String,
    },
    /// A trainer's creature steps up; its name already carries the owner.
    ChallengerAppeared {
        enemy: String,
    },
    PlayerTurn {
        creature: String,
    },

    // Moves
    QuizRequested {
        subject: Subject,
    },
    QuizAnswered {
        correct: bool,
    },
    MoveUsed {
        user: String,
        move_name: String,
    },
    DamageDealt {
        side: BattleSide,
        target: String,
        damage: u32,
        remaining_hp: u32,
    },
    CreatureFainted {
        side: BattleSide,
        name: String,
    },

    // Switching
    SwitchRequired,
    CreatureSwitched {
        name: String,
    },

    // Recruiting
    RecruitAttempted {
        enemy: String,
    },
    RecruitSucceeded {
        enemy: String,
    },
    RecruitRefused {
        enemy: String,
    },

    // Results
    ExperienceGained {
        creature: String,
        amount: u32,
    },
    LeveledUp {
        creature: String,
        level: u32,
    },
    /// Enemy defeated without a level-up to announce.
    Victory {
        enemy: String,
        xp_gained: Option<u32>,
    },
    RanAway,
    BattleEnded {
        outcome: BattleOutcome,
    },
}

impl BattleEvent {
    /// Player-facing log line; None for events the log stays silent about.
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::WildAppeared { enemy } => Some(format!("A wild {} appeared!", enemy)),
            BattleEvent::ChallengerAppeared { enemy } => {
                Some(format!("{} is ready to battle!", enemy))
            }
            BattleEvent::PlayerTurn { creature } => Some(format!("What will {} do?", creature)),

            BattleEvent::QuizRequested { .. } => Some("Analyzing subject matter...".to_string()),
            BattleEvent::QuizAnswered { correct: true } => {
                Some("Correct! The move is super effective!".to_string())
            }
            BattleEvent::QuizAnswered { correct: false } => {
                Some("Incorrect calculation... The move fizzled.".to_string())
            }
            BattleEvent::MoveUsed { user, move_name } => {
                Some(format!("{} used {}!", user, move_name))
            }
            BattleEvent::DamageDealt { .. } => None, // HP bars show it
            BattleEvent::CreatureFainted {
                side: BattleSide::Player,
                name,
            } => Some(format!("{} fainted!", name)),
            BattleEvent::CreatureFainted {
                side: BattleSide::Enemy,
                ..
            } => None, // announced by Victory or LeveledUp

            BattleEvent::SwitchRequired => Some("Choose your next creature!".to_string()),
            BattleEvent::CreatureSwitched { name } => Some(format!("Go, {}!", name)),

            BattleEvent::RecruitAttempted { enemy } => {
                Some(format!("You invited {} to study with you...", enemy))
            }
            BattleEvent::RecruitSucceeded { enemy } => {
                Some(format!("Gotcha! {} joined the party!", enemy))
            }
            BattleEvent::RecruitRefused { enemy } => {
                Some(format!("{} refused the offer!", enemy))
            }

            BattleEvent::ExperienceGained { .. } => None,
            BattleEvent::LeveledUp { creature, level } => {
                Some(format!("{} grew to level {}!", creature, level))
            }
            BattleEvent::Victory {
                enemy,
                xp_gained: Some(xp),
            } => Some(format!("Wild {} fainted! Gained {} XP.", enemy, xp)),
            BattleEvent::Victory {
                enemy,
                xp_gained: None,
            } => Some(format!("{} fainted!", enemy)),
            BattleEvent::RanAway => Some("Got away safely!".to_string()),
            BattleEvent::BattleEnded { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Formatted log lines, skipping silent events.
    pub fn messages(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }

    /// Log every event at debug level.
    pub fn log_debug(&self) {
        for event in &self.events {
            debug!("  {:?}", event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            match event.format() {
                Some(text) => writeln!(f, "  {}", text)?,
                None => writeln!(f, "  {:?} (silent)", event)?,
            }
        }
        Ok(())
    }
}
