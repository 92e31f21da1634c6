use super::transitions::{DoorOutcome, Transition, MIST_MESSAGE};
use super::World;
use crate::catalog::Catalog;
use crate::creature::{average_level, heal_party, CreatureInst};
use crate::quest::{QuestState, MIND_BADGE};
use crate::rng::GameRng;
use crate::gym;
use log::{debug, info};
use schema::{CreatureId, Direction, Interaction, Position, TileData, TileKind, TrainerId};

const ENCOUNTER_CHANCE: f64 = 0.15;
const WARNING_CHANCE: f64 = 0.1;
const MIN_WILD_LEVEL: u32 = 2;
const STARTER: CreatureId = CreatureId::CalcBoy;

pub const HEAL_TILE_MESSAGE: &str = "A warm light heals your party!";
pub const NO_CREATURE_WARNING: &str =
    "It's dangerous to go into the wilderness without a creature! Go see the Professor.";
pub const TIRED_PARTY_WARNING: &str = "Your party is too tired to fight! Get to a healer!";

const PROFESSOR_WELCOME: &str = "Professor: Hello there! Welcome to the world of EduMon. It's dangerous to go alone without knowledge! Here, take this Additurt.";
const PROFESSOR_REMARK: &str = "Professor: How is Additurt doing? Remember to study hard!";
const NURSE_LINE: &str = "Nurse: I've restored your party to full health.";
const SAGE_LINE: &str = "Old Sage: You have reached the Peak of Knowledge! Beyond here lies the Infinite Unknown. Prepare yourself!";

/// Result of one step attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Wall or map edge: only facing changed.
    Blocked,
    Moved,
    Healed,
    Transitioned(Transition),
    /// Forward door on the frontier; generation should be (re)triggered.
    FrontierPending,
    Message(&'static str),
    Encounter(CreatureInst),
}

impl StepOutcome {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            StepOutcome::Healed => Some(HEAL_TILE_MESSAGE),
            StepOutcome::FrontierPending => Some(MIST_MESSAGE),
            StepOutcome::Message(text) => Some(*text),
            _ => None,
        }
    }
}

/// Result of talking to whatever the player faces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractOutcome {
    Nothing,
    Message(String),
    /// The Librarian offers the challenge; accepting happens when the
    /// prompt is dismissed.
    GymChallengeOffered(String),
    TrainerChallenge { trainer: TrainerId, message: String },
}

impl World {
    /// Try to move one tile. Facing always turns to `direction`.
    pub fn step(
        &mut self,
        direction: Direction,
        catalog: &Catalog,
        party: &mut [CreatureInst],
        rng: &mut GameRng,
    ) -> StepOutcome {
        self.facing = direction;
        let Some(target) = self.position.step(direction) else {
            return StepOutcome::Blocked;
        };
        let Some(tile) = self.tile_at(target, catalog) else {
            return StepOutcome::Blocked;
        };
        if tile.kind.is_blocking() {
            return StepOutcome::Blocked;
        }

        self.position = target;

        if tile.kind == TileKind::Healer {
            heal_party(party);
            return StepOutcome::Healed;
        }

        if let Some(warp) = tile.warp {
            let transition = Transition {
                map: warp.map.into(),
                position: warp.position,
            };
            self.apply_transition(transition);
            return StepOutcome::Transitioned(transition);
        }

        if tile.kind == TileKind::Door {
            match self.resolve_door(target) {
                DoorOutcome::Transition(transition) => {
                    self.apply_transition(transition);
                    return StepOutcome::Transitioned(transition);
                }
                DoorOutcome::FrontierPending => return StepOutcome::FrontierPending,
                DoorOutcome::Message(text) => return StepOutcome::Message(text),
                DoorOutcome::Nothing => {}
            }
        }

        self.roll_encounter(tile.kind, catalog, party, rng)
    }

    /// Act on the tile in front of the player.
    pub fn interact(
        &self,
        catalog: &Catalog,
        party: &mut Vec<CreatureInst>,
        quest: &mut QuestState,
    ) -> InteractOutcome {
        let Some(target) = self.position.step(self.facing) else {
            return InteractOutcome::Nothing;
        };
        let Some(tile) = self.tile_at(target, catalog) else {
            return InteractOutcome::Nothing;
        };

        if let Some(interaction) = tile.interaction {
            return match interaction {
                Interaction::Professor => {
                    if quest.has_starter() {
                        InteractOutcome::Message(PROFESSOR_REMARK.to_string())
                    } else {
                        let starter = CreatureInst::from_template(catalog.creature(STARTER), catalog);
                        info!("Received starter {}", starter.name);
                        *party = vec![starter];
                        quest.grant_starter();
                        InteractOutcome::Message(PROFESSOR_WELCOME.to_string())
                    }
                }
                Interaction::Healer => {
                    heal_party(party);
                    InteractOutcome::Message(NURSE_LINE.to_string())
                }
                Interaction::Sage => InteractOutcome::Message(SAGE_LINE.to_string()),
                Interaction::GymLeader => {
                    if quest.has_badge(MIND_BADGE) {
                        InteractOutcome::Message(gym::ALREADY_EARNED.to_string())
                    } else {
                        InteractOutcome::GymChallengeOffered(gym::CHALLENGE_PROMPT.to_string())
                    }
                }
            };
        }

        if tile.kind == TileKind::Trainer {
            if let Some(trainer_id) = tile.trainer {
                let trainer = catalog.trainer(trainer_id);
                if quest.is_trainer_defeated(trainer_id) {
                    return InteractOutcome::Message(format!(
                        "{}: {}",
                        trainer.name, trainer.post_battle
                    ));
                }
                return InteractOutcome::TrainerChallenge {
                    trainer: trainer_id,
                    message: format!("{}: {}", trainer.name, trainer.intro),
                };
            }
        }
        InteractOutcome::Nothing
    }

    /// Tile definition at `position` on the current map; None off the map.
    /// Ids missing from the catalog read as walls.
    fn tile_at<'a>(&self, position: Position, catalog: &'a Catalog) -> Option<&'a TileData> {
        let id = self.current_map().tile_id(position)?;
        catalog.tile(id).or_else(|| catalog.tile(super::map::WALL_TILE))
    }

    fn roll_encounter(
        &self,
        kind: TileKind,
        catalog: &Catalog,
        party: &[CreatureInst],
        rng: &mut GameRng,
    ) -> StepOutcome {
        let map = self.current_map();
        let eligible = kind == TileKind::Grass || map.id.encounters_everywhere();
        if !eligible || map.id.is_safe_zone() || map.encounters.is_empty() {
            return StepOutcome::Moved;
        }

        if party.is_empty() {
            return warn_sometimes(NO_CREATURE_WARNING, rng);
        }
        if party.iter().all(CreatureInst::is_fainted) {
            return warn_sometimes(TIRED_PARTY_WARNING, rng);
        }
        if !rng.chance(ENCOUNTER_CHANCE, "wild encounter") {
            return StepOutcome::Moved;
        }

        let Some(species) = rng.pick(&map.encounters, "encounter species").copied() else {
            return StepOutcome::Moved;
        };
        let spread = rng.pick_index(3, "wild level spread") as u32;
        let level = (average_level(party, MIN_WILD_LEVEL) + spread)
            .saturating_sub(1)
            .max(MIN_WILD_LEVEL);
        let wild = CreatureInst::wild(catalog.creature(species), catalog, level);
        debug!("Wild {} (Lv {}) on {}", wild.name, level, map.name);
        StepOutcome::Encounter(wild)
    }
}

fn warn_sometimes(text: &'static str, rng: &mut GameRng) -> StepOutcome {
    if rng.chance(WARNING_CHANCE, "wilderness warning") {
        StepOutcome::Message(text)
    } else {
        StepOutcome::Moved
    }
}
