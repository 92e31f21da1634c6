use crate::content::QuizQuestion;
use crate::errors::{ContentError, GymError};
use crate::quest::{QuestState, MIND_BADGE};
use log::{info, warn};
use schema::Subject;

/// Subjects of the Mind Badge challenge, asked in this order.
pub const GYM_SUBJECTS: [Subject; 5] = [
    Subject::Math,
    Subject::ComputerScience,
    Subject::Language,
    Subject::History,
    Subject::Art,
];

/// Correct answers needed for the badge.
pub const PASS_THRESHOLD: usize = 3;

/// Party level used for the question batch when the party is empty.
pub const DEFAULT_CHALLENGE_LEVEL: u32 = 5;

pub const CHALLENGE_PROMPT: &str = "Librarian: To earn the Mind Badge, you must prove your mastery over 5 subjects: Math, CS, Language, History, and Art. Are you ready?";
pub const ALREADY_EARNED: &str =
    "Librarian: You have already proven your worth. Knowledge is infinite!";
pub const INTERFERENCE: &str = "Librarian: A magical interference prevented the test. Try again.";
pub const DISORGANIZED: &str =
    "Librarian: My books are currently disorganized. Please come back later.";

/// What happened after moving past an answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GymProgress {
    NextQuestion,
    Finished(GymResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GymResult {
    pub score: usize,
    pub total: usize,
}

impl GymResult {
    pub fn passed(&self) -> bool {
        self.score >= PASS_THRESHOLD
    }

    /// Grant the badge on a pass (idempotent) and return the Librarian's
    /// verdict.
    pub fn finalize(&self, quest: &mut QuestState) -> String {
        if self.passed() {
            if quest.award_badge(MIND_BADGE) {
                info!("{} earned with {}/{}", MIND_BADGE, self.score, self.total);
            }
            format!(
                "Librarian: Magnificent! You answered {}/{} correctly. You are worthy of this Badge.",
                self.score, self.total
            )
        } else {
            format!(
                "Librarian: You only got {}/{} correct. You must study more before I can grant you the Badge.",
                self.score, self.total
            )
        }
    }
}

/// A running knowledge challenge: one question at a time, exactly one answer
/// per question, no time limit.
#[derive(Debug, Clone, PartialEq)]
pub struct GymChallenge {
    questions: Vec<QuizQuestion>,
    index: usize,
    score: usize,
    answered: bool,
}

impl GymChallenge {
    /// Build a challenge from the questions that survived validation.
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self, GymError> {
        let questions: Vec<QuizQuestion> = questions
            .into_iter()
            .filter_map(|q| match q.validate() {
                Ok(q) => Some(q),
                Err(err) => {
                    warn!("Dropping gym question: {}", err);
                    None
                }
            })
            .collect();
        if questions.is_empty() {
            return Err(GymError::NoQuestions);
        }
        Ok(Self {
            questions,
            index: 0,
            score: 0,
            answered: false,
        })
    }

    /// Turn a provider batch into a challenge, or the Librarian's apology.
    pub fn from_batch(batch: Result<Vec<QuizQuestion>, ContentError>) -> Result<Self, &'static str> {
        match batch {
            Ok(questions) => Self::new(questions).map_err(|_| DISORGANIZED),
            Err(err) => {
                warn!("Gym batch request failed: {}", err);
                Err(INTERFERENCE)
            }
        }
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.index)
    }

    pub fn question_number(&self) -> usize {
        self.index + 1
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    /// Answer the current question. Returns whether it was correct.
    pub fn answer(&mut self, answer: usize) -> Result<bool, GymError> {
        if self.answered {
            return Err(GymError::AlreadyAnswered);
        }
        let question = self.current_question().ok_or(GymError::NoQuestions)?;
        if answer >= question.options.len() {
            return Err(GymError::AnswerOutOfRange(answer));
        }
        let correct = question.is_correct(answer);
        if correct {
            self.score += 1;
        }
        self.answered = true;
        Ok(correct)
    }

    pub fn feedback(correct: bool) -> &'static str {
        if correct {
            "Correct!"
        } else {
            "Incorrect."
        }
    }

    /// Move past an answered question.
    pub fn advance(&mut self) -> Result<GymProgress, GymError> {
        if !self.answered {
            return Err(GymError::NotAnswered);
        }
        self.answered = false;
        self.index += 1;
        if self.index < self.questions.len() {
            Ok(GymProgress::NextQuestion)
        } else {
            Ok(GymProgress::Finished(self.result()))
        }
    }

    pub fn result(&self) -> GymResult {
        GymResult {
            score: self.score,
            total: self.questions.len(),
        }
    }
}
