use crate::battle::calculators::{calculate_failed_cast_damage, calculate_hit_damage};
use crate::battle::catch::{can_attempt_recruit, roll_capture_success};
use crate::battle::state::{BattleEvent, BattleOutcome, BattlePhase, BattleSide, EventBus, Opponent};
use crate::content::QuizQuestion;
use crate::creature::{CreatureInst, STARTING_TO_NEXT_LEVEL};
use crate::errors::{ActionError, ActionResult, BattleSetupError};
use crate::progression::RewardCalculator;
use crate::rng::GameRng;
use log::{debug, info, warn};
use schema::{MoveData, Subject};

/// Result of choosing a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveSelection {
    /// The move landed immediately.
    Resolved,
    /// A special move: fetch a question for this subject and level, then
    /// hand it to `present_quiz`.
    QuizRequired { subject: Subject, level: u32 },
}

/// Everything the caller needs once the battle is over.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    pub opponent: Opponent,
    pub party: Vec<CreatureInst>,
    pub caught: Option<CreatureInst>,
}

/// One battle between the player's party and a single enemy creature.
///
/// The engine owns copies of the party; the world's party is only replaced
/// from the final report, so an aborted battle leaves it untouched.
#[derive(Debug, Clone)]
pub struct BattleEngine {
    party: Vec<CreatureInst>,
    active: usize,
    enemy: CreatureInst,
    opponent: Opponent,
    phase: BattlePhase,
    pending_quiz: Option<QuizQuestion>,
    caught: Option<CreatureInst>,
}

impl BattleEngine {
    pub fn new(
        party: &[CreatureInst],
        mut enemy: CreatureInst,
        opponent: Opponent,
        bus: &mut EventBus,
    ) -> Result<Self, BattleSetupError> {
        if party.is_empty() {
            return Err(BattleSetupError::EmptyParty);
        }
        if party.iter().all(CreatureInst::is_fainted) {
            return Err(BattleSetupError::NoConsciousCreature);
        }
        enemy.heal_full();

        bus.push(match opponent {
            Opponent::Wild => BattleEvent::WildAppeared {
                enemy: enemy.name.clone(),
            },
            Opponent::Trainer(_) => BattleEvent::ChallengerAppeared {
                enemy: enemy.name.clone(),
            },
        });

        let mut engine = Self {
            party: party.to_vec(),
            active: 0,
            enemy,
            opponent,
            phase: BattlePhase::PlayerChoice,
            pending_quiz: None,
            caught: None,
        };
        if engine.party[0].is_fainted() {
            engine.phase = BattlePhase::ForcedSwitch;
            bus.push(BattleEvent::SwitchRequired);
        } else {
            engine.announce_player_turn(bus);
        }
        info!(
            "Battle started: {:?} vs {} (Lv {})",
            engine.opponent, engine.enemy.name, engine.enemy.level
        );
        Ok(engine)
    }

    // --- ACCESSORS ---

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn party(&self) -> &[CreatureInst] {
        &self.party
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &CreatureInst {
        &self.party[self.active]
    }

    pub fn enemy(&self) -> &CreatureInst {
        &self.enemy
    }

    pub fn opponent(&self) -> Opponent {
        self.opponent
    }

    pub fn pending_quiz(&self) -> Option<&QuizQuestion> {
        self.pending_quiz.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    /// Party slots that can be switched in right now.
    pub fn switch_options(&self) -> Vec<usize> {
        self.party
            .iter()
            .enumerate()
            .filter(|(i, c)| *i != self.active && !c.is_fainted())
            .map(|(i, _)| i)
            .collect()
    }

    /// The final report, once the battle has ended.
    pub fn report(&self) -> Option<BattleReport> {
        let BattlePhase::BattleOver(outcome) = self.phase else {
            return None;
        };
        Some(BattleReport {
            outcome,
            opponent: self.opponent,
            party: self.party.clone(),
            caught: self.caught.clone(),
        })
    }

    // --- PLAYER ACTIONS ---

    pub fn select_move(
        &mut self,
        move_index: usize,
        bus: &mut EventBus,
    ) -> ActionResult<MoveSelection> {
        self.ensure_phase(BattlePhase::PlayerChoice, "select a move")?;
        let move_data = self
            .active()
            .moves
            .get(move_index)
            .cloned()
            .ok_or(ActionError::InvalidMoveIndex(move_index))?;

        if move_data.is_special {
            self.phase = BattlePhase::WaitingOnQuiz { move_index };
            bus.push(BattleEvent::QuizRequested {
                subject: move_data.subject,
            });
            return Ok(MoveSelection::QuizRequired {
                subject: move_data.subject,
                level: self.active().level,
            });
        }

        self.phase = BattlePhase::ResolvingPlayerMove;
        let damage = self.announce_full_hit(&move_data, bus);
        self.apply_player_damage(damage, bus);
        Ok(MoveSelection::Resolved)
    }

    /// Attach the question for a pending special move. A missing or
    /// malformed question is replaced by the fallback question.
    pub fn present_quiz(&mut self, question: Option<QuizQuestion>) -> ActionResult<&QuizQuestion> {
        let BattlePhase::WaitingOnQuiz { move_index } = self.phase else {
            return Err(ActionError::WrongPhase {
                action: "present a quiz",
                phase: self.phase,
            });
        };
        if self.pending_quiz.is_some() {
            return Err(ActionError::QuizAlreadyPresented);
        }

        let subject = self.active().moves[move_index].subject;
        let question = match question.map(QuizQuestion::validate) {
            Some(Ok(question)) => question,
            Some(Err(err)) => {
                warn!("Unusable {} question, using fallback: {}", subject, err);
                QuizQuestion::fallback(subject)
            }
            None => QuizQuestion::fallback(subject),
        };
        let presented: &QuizQuestion = self.pending_quiz.insert(question);
        Ok(presented)
    }

    /// Answer the pending question. Returns whether it was correct.
    pub fn answer_quiz(&mut self, answer: usize, bus: &mut EventBus) -> ActionResult<bool> {
        let BattlePhase::WaitingOnQuiz { move_index } = self.phase else {
            return Err(ActionError::WrongPhase {
                action: "answer a quiz",
                phase: self.phase,
            });
        };
        let quiz = self
            .pending_quiz
            .as_ref()
            .ok_or(ActionError::QuizNotPresented)?;
        if answer >= quiz.options.len() {
            return Err(ActionError::AnswerOutOfRange(answer));
        }
        let correct = quiz.is_correct(answer);
        self.pending_quiz = None;

        let move_data = self.active().moves[move_index].clone();
        self.phase = BattlePhase::ResolvingPlayerMove;
        bus.push(BattleEvent::QuizAnswered { correct });
        let damage = if correct {
            self.announce_full_hit(&move_data, bus)
        } else {
            calculate_failed_cast_damage(move_data.power)
        };
        self.apply_player_damage(damage, bus);
        Ok(correct)
    }

    /// Voluntary switches use up the turn; a forced switch hands control
    /// straight back to the player.
    pub fn switch_to(&mut self, index: usize, bus: &mut EventBus) -> ActionResult<()> {
        let forced = match self.phase {
            BattlePhase::PlayerChoice => false,
            BattlePhase::ForcedSwitch => true,
            other => {
                return Err(ActionError::WrongPhase {
                    action: "switch",
                    phase: other,
                })
            }
        };
        let target = self
            .party
            .get(index)
            .ok_or(ActionError::InvalidPartyIndex(index))?;
        if index == self.active {
            return Err(ActionError::AlreadyActive);
        }
        if target.is_fainted() {
            return Err(ActionError::CreatureFainted);
        }

        self.active = index;
        bus.push(BattleEvent::CreatureSwitched {
            name: self.active().name.clone(),
        });
        if forced {
            self.announce_player_turn(bus);
        } else {
            self.phase = BattlePhase::EnemyChoice;
        }
        Ok(())
    }

    /// Invite the enemy to join. Returns whether it accepted.
    pub fn recruit(&mut self, rng: &mut GameRng, bus: &mut EventBus) -> ActionResult<bool> {
        can_attempt_recruit(self.phase)?;
        bus.push(BattleEvent::RecruitAttempted {
            enemy: self.enemy.name.clone(),
        });

        if roll_capture_success(&self.enemy, rng) {
            bus.push(BattleEvent::RecruitSucceeded {
                enemy: self.enemy.name.clone(),
            });
            let mut recruit = self.enemy.clone();
            recruit.xp = 0;
            recruit.to_next_level = STARTING_TO_NEXT_LEVEL;
            self.caught = Some(recruit);
            self.end(BattleOutcome::Catch, bus);
            Ok(true)
        } else {
            bus.push(BattleEvent::RecruitRefused {
                enemy: self.enemy.name.clone(),
            });
            self.phase = BattlePhase::EnemyChoice;
            Ok(false)
        }
    }

    /// Running always succeeds.
    pub fn run(&mut self, bus: &mut EventBus) -> ActionResult<()> {
        self.ensure_phase(BattlePhase::PlayerChoice, "run")?;
        bus.push(BattleEvent::RanAway);
        self.end(BattleOutcome::Run, bus);
        Ok(())
    }

    // --- ENEMY TURN ---

    /// The enemy picks one of its moves uniformly at random and hits the
    /// active creature.
    pub fn enemy_turn(&mut self, rng: &mut GameRng, bus: &mut EventBus) -> ActionResult<()> {
        self.ensure_phase(BattlePhase::EnemyChoice, "take the enemy turn")?;
        self.phase = BattlePhase::ResolvingEnemyMove;

        let Some(move_data) = rng.pick(&self.enemy.moves, "enemy move choice").cloned() else {
            debug!("{} has no moves and loafs around", self.enemy.name);
            self.announce_player_turn(bus);
            return Ok(());
        };
        bus.push(BattleEvent::MoveUsed {
            user: self.enemy.name.clone(),
            move_name: move_data.name.clone(),
        });

        let damage = calculate_hit_damage(move_data.power, self.enemy.level, BattleSide::Enemy);
        let target = &mut self.party[self.active];
        target.take_damage(damage);
        bus.push(BattleEvent::DamageDealt {
            side: BattleSide::Player,
            target: target.name.clone(),
            damage,
            remaining_hp: target.current_hp,
        });

        if !target.is_fainted() {
            self.announce_player_turn(bus);
            return Ok(());
        }
        bus.push(BattleEvent::CreatureFainted {
            side: BattleSide::Player,
            name: target.name.clone(),
        });
        if self.party.iter().all(CreatureInst::is_fainted) {
            self.end(BattleOutcome::Lose, bus);
        } else {
            self.phase = BattlePhase::ForcedSwitch;
            bus.push(BattleEvent::SwitchRequired);
        }
        Ok(())
    }

    // --- INTERNALS ---

    fn ensure_phase(&self, expected: BattlePhase, action: &'static str) -> ActionResult<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(ActionError::WrongPhase {
                action,
                phase: self.phase,
            })
        }
    }

    fn announce_player_turn(&mut self, bus: &mut EventBus) {
        self.phase = BattlePhase::PlayerChoice;
        bus.push(BattleEvent::PlayerTurn {
            creature: self.active().name.clone(),
        });
    }

    fn announce_full_hit(&self, move_data: &MoveData, bus: &mut EventBus) -> u32 {
        let user = self.active();
        bus.push(BattleEvent::MoveUsed {
            user: user.name.clone(),
            move_name: move_data.name.clone(),
        });
        calculate_hit_damage(move_data.power, user.level, BattleSide::Player)
    }

    fn apply_player_damage(&mut self, damage: u32, bus: &mut EventBus) {
        self.enemy.take_damage(damage);
        bus.push(BattleEvent::DamageDealt {
            side: BattleSide::Enemy,
            target: self.enemy.name.clone(),
            damage,
            remaining_hp: self.enemy.current_hp,
        });

        if !self.enemy.is_fainted() {
            self.phase = BattlePhase::EnemyChoice;
            return;
        }
        bus.push(BattleEvent::CreatureFainted {
            side: BattleSide::Enemy,
            name: self.enemy.name.clone(),
        });
        self.award_victory(bus);
        self.end(BattleOutcome::Win, bus);
    }

    /// A level-up announcement replaces the plain victory line.
    fn award_victory(&mut self, bus: &mut EventBus) {
        let enemy = self.enemy.name.clone();
        let Some(xp) = RewardCalculator.victory_experience(self.opponent) else {
            bus.push(BattleEvent::Victory {
                enemy,
                xp_gained: None,
            });
            return;
        };

        let creature = &mut self.party[self.active];
        bus.push(BattleEvent::ExperienceGained {
            creature: creature.name.clone(),
            amount: xp,
        });
        match creature.gain_experience(xp) {
            Some(level) => bus.push(BattleEvent::LeveledUp {
                creature: creature.name.clone(),
                level,
            }),
            None => bus.push(BattleEvent::Victory {
                enemy,
                xp_gained: Some(xp),
            }),
        }
    }

    fn end(&mut self, outcome: BattleOutcome, bus: &mut EventBus) {
        self.phase = BattlePhase::BattleOver(outcome);
        bus.push(BattleEvent::BattleEnded { outcome });
        info!("Battle over: {:?}", outcome);
    }
}
