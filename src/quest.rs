use schema::TrainerId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const MIND_BADGE: &str = "Mind Badge";

/// Story progress. Every mutator only turns flags on or grows a set, so
/// progress can never be lost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestState {
    has_starter: bool,
    talked_to_professor: bool,
    badges: BTreeSet<String>,
    defeated_trainers: BTreeSet<TrainerId>,
}

impl QuestState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_starter(&self) -> bool {
        self.has_starter
    }

    pub fn talked_to_professor(&self) -> bool {
        self.talked_to_professor
    }

    pub fn grant_starter(&mut self) {
        self.has_starter = true;
        self.talked_to_professor = true;
    }

    /// Returns true only the first time a badge is awarded.
    pub fn award_badge(&mut self, badge: &str) -> bool {
        self.badges.insert(badge.to_string())
    }

    pub fn has_badge(&self, badge: &str) -> bool {
        self.badges.contains(badge)
    }

    pub fn badges(&self) -> impl Iterator<Item = &str> {
        self.badges.iter().map(String::as_str)
    }

    pub fn mark_trainer_defeated(&mut self, trainer: TrainerId) {
        self.defeated_trainers.insert(trainer);
    }

    pub fn is_trainer_defeated(&self, trainer: TrainerId) -> bool {
        self.defeated_trainers.contains(&trainer)
    }
}
