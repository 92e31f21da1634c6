use super::{grade_level, AdviceRequest, ContentProvider, MapRequest, QuizQuestion};
use crate::errors::{ConfigError, ContentError};
use async_trait::async_trait;
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::{Position, Subject};
use serde::Deserialize;
use std::sync::Mutex;

const DEFAULT_BANK: &str = include_str!("../../data/questions.json");

// Tile legend for carved zones
const FLOOR: u16 = 0;
const WALL: u16 = 1;
const GRASS: u16 = 2;
const DOOR: u16 = 3;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BankEntry {
    subject: Subject,
    min_grade: u32,
    max_grade: u32,
    #[serde(flatten)]
    question: QuizQuestion,
}

/// Content provider that needs no network: questions come from a JSON
/// bank, zones are carved procedurally from a seed.
pub struct OfflineContentProvider {
    bank: Vec<BankEntry>,
    seed: u64,
    rng: Mutex<StdRng>,
}

impl OfflineContentProvider {
    pub fn new(seed: u64) -> Result<Self, ConfigError> {
        Self::from_json_bank(DEFAULT_BANK, seed)
    }

    /// Load a question bank in the provider wire format plus `subject`,
    /// `minGrade` and `maxGrade`. Malformed questions are skipped.
    pub fn from_json_bank(json: &str, seed: u64) -> Result<Self, ConfigError> {
        let entries: Vec<BankEntry> = serde_json::from_str(json)?;
        let total = entries.len();
        let bank: Vec<BankEntry> = entries
            .into_iter()
            .filter_map(|entry| match entry.question.clone().validate() {
                Ok(_) => Some(entry),
                Err(err) => {
                    warn!("Skipping bank question '{}': {}", entry.question.question, err);
                    None
                }
            })
            .collect();
        debug!("Question bank: {} of {} entries usable", bank.len(), total);
        Ok(Self {
            bank,
            seed,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        })
    }

    fn pick_question(&self, subject: Subject, level: u32) -> Option<QuizQuestion> {
        let grade = grade_level(level);
        let for_subject: Vec<&BankEntry> =
            self.bank.iter().filter(|e| e.subject == subject).collect();
        let graded: Vec<&BankEntry> = for_subject
            .iter()
            .copied()
            .filter(|e| (e.min_grade..=e.max_grade).contains(&grade))
            .collect();
        let pool = if graded.is_empty() { for_subject } else { graded };
        if pool.is_empty() {
            return None;
        }
        let index = match self.rng.lock() {
            Ok(mut rng) => rng.random_range(0..pool.len()),
            Err(poisoned) => poisoned.into_inner().random_range(0..pool.len()),
        };
        Some(pool[index].question.clone())
    }
}

#[async_trait]
impl ContentProvider for OfflineContentProvider {
    async fn request_quiz_question(
        &self,
        subject: Subject,
        level: u32,
    ) -> Result<QuizQuestion, ContentError> {
        self.pick_question(subject, level)
            .ok_or_else(|| ContentError::Request(format!("no {} questions in bank", subject)))
    }

    async fn request_generated_map(
        &self,
        request: &MapRequest,
    ) -> Result<Vec<Vec<u16>>, ContentError> {
        let seed = self.seed ^ (u64::from(request.zone_number)).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        carve_zone(request, seed)
    }

    async fn request_companion_advice(
        &self,
        request: &AdviceRequest,
    ) -> Result<String, ContentError> {
        let hint = if !request.has_starter {
            "Visit the Professor's lab in the south-east of town to get your first partner!"
                .to_string()
        } else if request.badge_count == 0 {
            "The Librarian in Library Village awards the Mind Badge to true scholars.".to_string()
        } else {
            format!(
                "{} looks interesting. The Unknown lies beyond Knowledge Peak!",
                request.location
            )
        };
        Ok(hint)
    }
}

/// Carve a bordered zone: random walls and grass, a guaranteed floor path
/// between consecutive exits, doors on every exit.
fn carve_zone(request: &MapRequest, seed: u64) -> Result<Vec<Vec<u16>>, ContentError> {
    let (width, height) = (request.width, request.height);
    if width < 3 || height < 3 {
        return Err(ContentError::Request(format!(
            "zone of {}x{} is too small",
            width, height
        )));
    }
    if let Some(exit) = request.exits.iter().find(|e| e.x >= width || e.y >= height) {
        return Err(ContentError::Request(format!("exit {} outside zone", exit)));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut tiles = vec![vec![WALL; width]; height];
    for row in tiles.iter_mut().take(height - 1).skip(1) {
        for tile in row.iter_mut().take(width - 1).skip(1) {
            let roll: f64 = rng.random();
            *tile = if roll < 0.3 {
                WALL
            } else if roll < 0.6 {
                GRASS
            } else {
                FLOOR
            };
        }
    }

    // Connect each exit to the next through the interior.
    let inner: Vec<Position> = request
        .exits
        .iter()
        .map(|exit| Position::new(exit.x.clamp(1, width - 2), exit.y.clamp(1, height - 2)))
        .collect();
    for pair in inner.windows(2) {
        carve_path(&mut tiles, pair[0], pair[1], &mut rng);
    }
    for (exit, inside) in request.exits.iter().zip(&inner) {
        tiles[inside.y][inside.x] = FLOOR;
        tiles[exit.y][exit.x] = DOOR;
    }
    Ok(tiles)
}

/// Wandering walk from `from` to `to`, always making progress on one axis.
fn carve_path(tiles: &mut [Vec<u16>], from: Position, to: Position, rng: &mut StdRng) {
    let mut current = from;
    tiles[current.y][current.x] = FLOOR;
    while current != to {
        let move_vertically = current.x == to.x || (current.y != to.y && rng.random_bool(0.6));
        if move_vertically {
            current.y = if to.y > current.y { current.y + 1 } else { current.y - 1 };
        } else {
            current.x = if to.x > current.x { current.x + 1 } else { current.x - 1 };
        }
        tiles[current.y][current.x] = FLOOR;
    }
}
