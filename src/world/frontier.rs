use super::map::{GameMap, GENERATED_EXITS, GENERATED_HEIGHT, GENERATED_WIDTH};
use super::World;
use crate::content::{ContentProvider, MapRequest};
use crate::errors::ContentError;
use log::{debug, info, warn};
use schema::{CreatureId, MapId};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const THEMES: [&str; 6] = [
    "dense jungle",
    "volcanic wasteland",
    "crystal clouds",
    "cybernetic ruins",
    "deep ocean trench",
    "starry void",
];

/// Every generated zone can spawn any creature.
pub const GENERATED_ENCOUNTERS: [CreatureId; 6] = [
    CreatureId::CalcBoy,
    CreatureId::SciGuy,
    CreatureId::HistHound,
    CreatureId::BookWorm,
    CreatureId::PaintPal,
    CreatureId::ByteBit,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontierState {
    Idle,
    /// A request is running in the background.
    InFlight,
    /// The result has been posted and waits for `pump`.
    Done,
}

/// Message posted back by a finished generation task.
#[derive(Debug)]
struct FrontierResult {
    zone_number: u32,
    theme: &'static str,
    tiles: Result<Vec<Vec<u16>>, ContentError>,
}

/// Extends the world past its last map in the background. At most one
/// request is in flight; results are only applied by `pump`.
pub struct FrontierGenerator {
    provider: Arc<dyn ContentProvider>,
    sender: mpsc::UnboundedSender<FrontierResult>,
    receiver: mpsc::UnboundedReceiver<FrontierResult>,
    task: Option<JoinHandle<()>>,
}

impl FrontierGenerator {
    pub fn new(provider: Arc<dyn ContentProvider>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            provider,
            sender,
            receiver,
            task: None,
        }
    }

    pub fn state(&self) -> FrontierState {
        match &self.task {
            None => FrontierState::Idle,
            Some(task) if task.is_finished() => FrontierState::Done,
            Some(_) => FrontierState::InFlight,
        }
    }

    /// Start generating the next zone if the player stands on the frontier
    /// and nothing is running yet. Returns whether a request was started.
    pub fn observe(&mut self, world: &World) -> bool {
        if !world.is_on_frontier() || self.task.is_some() {
            return false;
        }
        let Ok(runtime) = Handle::try_current() else {
            warn!("No async runtime; frontier generation skipped");
            return false;
        };

        let generated = world.generated_count();
        let zone_number = generated as u32 + 1;
        let theme = THEMES[generated % THEMES.len()];
        let request = MapRequest {
            zone_number,
            theme: theme.to_string(),
            width: GENERATED_WIDTH,
            height: GENERATED_HEIGHT,
            exits: GENERATED_EXITS.to_vec(),
        };
        info!("Generating zone {} ({})", zone_number, theme);

        let provider = Arc::clone(&self.provider);
        let sender = self.sender.clone();
        let request_task =
            runtime.spawn(async move { provider.request_generated_map(&request).await });
        self.task = Some(runtime.spawn(async move {
            // A provider that panics still reports back, as a failed request.
            let tiles = request_task.await.unwrap_or_else(|join_err| {
                Err(ContentError::Request(format!("generation task failed: {}", join_err)))
            });
            let result = FrontierResult {
                zone_number,
                theme,
                tiles,
            };
            if sender.send(result).is_err() {
                debug!("Frontier result dropped; generator is gone");
            }
        }));
        true
    }

    /// Fold a finished result into the world without waiting. Returns the id
    /// of the appended zone.
    pub fn pump(&mut self, world: &mut World) -> Option<MapId> {
        // Checked before the channel: a finished task has already posted.
        let finished = self.task.as_ref().is_some_and(JoinHandle::is_finished);
        match self.receiver.try_recv() {
            Ok(result) => self.apply(result, world),
            Err(_) => {
                if finished {
                    warn!("Frontier task ended without a result");
                    self.task = None;
                }
                None
            }
        }
    }

    /// Wait for the in-flight request, if any, and fold it in.
    pub async fn settle(&mut self, world: &mut World) -> Option<MapId> {
        let task = self.task.take()?;
        if let Err(err) = task.await {
            warn!("Frontier task failed: {}", err);
        }
        match self.receiver.try_recv() {
            Ok(result) => self.apply(result, world),
            Err(_) => {
                warn!("Frontier task ended without a result");
                None
            }
        }
    }

    fn apply(&mut self, result: FrontierResult, world: &mut World) -> Option<MapId> {
        self.task = None;
        let expected = world.generated_count() as u32 + 1;
        if result.zone_number != expected {
            warn!(
                "Discarding stale zone {} (expected {})",
                result.zone_number, expected
            );
            return None;
        }
        let tiles = match result.tiles {
            Ok(tiles) => tiles,
            Err(err) => {
                warn!("Zone {} ({}) generation failed: {}", result.zone_number, result.theme, err);
                return None;
            }
        };
        let map = GameMap::generated(result.zone_number, tiles, GENERATED_ENCOUNTERS.to_vec())?;
        let id = map.id;
        world.push_frontier(map);
        Some(id)
    }
}
