use super::{ContentProvider, MapRequest, QuizQuestion};
use crate::errors::ContentError;
use async_trait::async_trait;
use schema::Subject;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Provider double that replays canned responses. Map requests can be held
/// open on a `Notify` to simulate a slow generator.
#[derive(Default)]
pub(crate) struct ScriptedContentProvider {
    questions: Mutex<VecDeque<Result<QuizQuestion, ContentError>>>,
    batch: Mutex<Option<Result<Vec<QuizQuestion>, ContentError>>>,
    maps: Mutex<VecDeque<Result<Vec<Vec<u16>>, ContentError>>>,
    map_gate: Option<Arc<Notify>>,
    pub question_calls: AtomicUsize,
    pub map_calls: AtomicUsize,
}

impl ScriptedContentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_questions(self, questions: Vec<Result<QuizQuestion, ContentError>>) -> Self {
        *self.questions.lock().unwrap() = questions.into();
        self
    }

    pub fn with_batch(self, batch: Result<Vec<QuizQuestion>, ContentError>) -> Self {
        *self.batch.lock().unwrap() = Some(batch);
        self
    }

    pub fn with_maps(self, maps: Vec<Result<Vec<Vec<u16>>, ContentError>>) -> Self {
        *self.maps.lock().unwrap() = maps.into();
        self
    }

    pub fn gated_on(mut self, gate: Arc<Notify>) -> Self {
        self.map_gate = Some(gate);
        self
    }
}

/// A valid question whose answer is option `correct_index`.
pub(crate) fn question(text: &str, correct_index: usize) -> QuizQuestion {
    QuizQuestion {
        question: text.to_string(),
        options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
        correct_index,
        explanation: "Because.".to_string(),
    }
}

/// 12x12 walled zone with a straight corridor between the exits.
pub(crate) fn corridor_zone() -> Vec<Vec<u16>> {
    let mut tiles = vec![vec![1; 12]; 12];
    for row in tiles.iter_mut() {
        row[6] = 0;
    }
    tiles[0][6] = 3;
    tiles[11][6] = 3;
    tiles
}

#[async_trait]
impl ContentProvider for ScriptedContentProvider {
    async fn request_quiz_question(
        &self,
        _subject: Subject,
        _level: u32,
    ) -> Result<QuizQuestion, ContentError> {
        self.question_calls.fetch_add(1, Ordering::SeqCst);
        self.questions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ContentError::Unavailable))
    }

    async fn request_quiz_batch(
        &self,
        subjects: &[Subject],
        level: u32,
    ) -> Result<Vec<QuizQuestion>, ContentError> {
        let canned = self.batch.lock().unwrap().take();
        if let Some(batch) = canned {
            return batch;
        }
        let mut batch = Vec::new();
        for subject in subjects {
            if let Ok(question) = self.request_quiz_question(*subject, level).await {
                batch.push(question);
            }
        }
        Ok(batch)
    }

    async fn request_generated_map(
        &self,
        _request: &MapRequest,
    ) -> Result<Vec<Vec<u16>>, ContentError> {
        self.map_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.map_gate {
            gate.notified().await;
        }
        self.maps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ContentError::Unavailable))
    }
}
