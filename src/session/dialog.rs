use log::debug;
use schema::TrainerId;
use std::collections::VecDeque;

/// Work deferred until the message that armed it is dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    StartGymChallenge,
    StartTrainerBattle(TrainerId),
    AdvanceGymQuestion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DialogEntry {
    text: String,
    continuations: Vec<PendingAction>,
}

/// Queue of player-facing messages. Only the front one is shown; it blocks
/// movement until dismissed.
#[derive(Debug, Clone, Default)]
pub struct Dialog {
    queue: VecDeque<DialogEntry>,
}

impl Dialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: impl Into<String>) {
        self.push_with(text, Vec::new());
    }

    /// Queue a message whose dismissal fires `continuations`, in order.
    pub fn push_with(&mut self, text: impl Into<String>, continuations: Vec<PendingAction>) {
        let text = text.into();
        debug!("Dialog: {}", text);
        self.queue.push_back(DialogEntry {
            text,
            continuations,
        });
    }

    pub fn current(&self) -> Option<&str> {
        self.queue.front().map(|entry| entry.text.as_str())
    }

    pub fn is_open(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Remove the current message and hand back its continuations. The
    /// entry is gone afterwards, so they can only ever fire once.
    pub fn dismiss(&mut self) -> Option<Vec<PendingAction>> {
        self.queue.pop_front().map(|entry| entry.continuations)
    }
}
