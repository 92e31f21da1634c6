use super::World;
use schema::{MapId, Position};

pub const MIST_MESSAGE: &str = "The mist swirls ahead... (Generating next area)";
pub const STILL_FORMING_MESSAGE: &str = "The path ahead is still forming... (Please wait)";

/// A move to another map. Facing is never part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub map: MapId,
    pub position: Position,
}

/// What stepping onto a door resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoorOutcome {
    Transition(Transition),
    /// Forward door on the frontier; the next zone is not there yet.
    FrontierPending,
    Message(&'static str),
    /// Nothing behind this door; the step carries on as a normal move.
    Nothing,
}

impl World {
    /// Resolve the door at `at` on the current map: explicit door links
    /// first, then the map sequence by which edge the door sits on.
    pub fn resolve_door(&self, at: Position) -> DoorOutcome {
        let map = self.current_map();
        if let Some(link) = map.door_links.iter().find(|link| link.matches(at)) {
            return DoorOutcome::Transition(Transition {
                map: MapId::Static(link.to),
                position: link.arrival,
            });
        }

        let Some(index) = self.sequence_index() else {
            return DoorOutcome::Nothing;
        };
        if map.is_forward_edge(at) {
            match self.sequence.get(index + 1) {
                Some(next) => self.arrive(*next, true),
                None => DoorOutcome::FrontierPending,
            }
        } else if map.is_backward_edge(at) {
            match index.checked_sub(1).and_then(|i| self.sequence.get(i)) {
                Some(previous) => self.arrive(*previous, false),
                None => DoorOutcome::Nothing,
            }
        } else {
            DoorOutcome::Nothing
        }
    }

    fn arrive(&self, target: MapId, forward: bool) -> DoorOutcome {
        match self.map(target) {
            Some(map) => DoorOutcome::Transition(Transition {
                map: target,
                position: if forward {
                    map.forward_entry
                } else {
                    map.backward_entry
                },
            }),
            None => DoorOutcome::Message(STILL_FORMING_MESSAGE),
        }
    }
}
