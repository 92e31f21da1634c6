use schema::Direction;
use std::time::{Duration, Instant};

/// One player command for the world view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Move(Direction),
    Interact,
}

/// Turns press, hold and release of a direction into steps: one on press,
/// then one per interval while held.
#[derive(Debug, Clone)]
pub struct InputRepeater {
    interval: Duration,
    held: Option<(Direction, Instant)>,
}

impl InputRepeater {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            held: None,
        }
    }

    /// A new press replaces whatever was held before.
    pub fn press(&mut self, direction: Direction, now: Instant) -> InputEvent {
        self.held = Some((direction, now));
        InputEvent::Move(direction)
    }

    /// Releasing a direction other than the held one changes nothing.
    pub fn release(&mut self, direction: Direction) {
        if matches!(self.held, Some((held, _)) if held == direction) {
            self.held = None;
        }
    }

    /// The next repeat step, if the interval has elapsed since the last one.
    pub fn poll(&mut self, now: Instant) -> Option<InputEvent> {
        let (direction, last) = self.held?;
        if now.saturating_duration_since(last) < self.interval {
            return None;
        }
        self.held = Some((direction, last + self.interval));
        Some(InputEvent::Move(direction))
    }

    pub fn is_held(&self) -> bool {
        self.held.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_press_fires_once_then_repeats() {
        let mut repeater = InputRepeater::new(Duration::from_millis(150));
        let start = Instant::now();

        assert_eq!(
            repeater.press(Direction::Up, start),
            InputEvent::Move(Direction::Up)
        );
        assert_eq!(repeater.poll(start + Duration::from_millis(100)), None);
        assert_eq!(
            repeater.poll(start + Duration::from_millis(150)),
            Some(InputEvent::Move(Direction::Up))
        );
        assert_eq!(repeater.poll(start + Duration::from_millis(200)), None);
        assert_eq!(
            repeater.poll(start + Duration::from_millis(310)),
            Some(InputEvent::Move(Direction::Up))
        );
    }

    #[test]
    fn test_release_stops_repeat() {
        let mut repeater = InputRepeater::new(Duration::from_millis(150));
        let start = Instant::now();
        repeater.press(Direction::Left, start);

        repeater.release(Direction::Right);
        assert!(repeater.is_held());

        repeater.release(Direction::Left);
        assert!(!repeater.is_held());
        assert_eq!(repeater.poll(start + Duration::from_secs(1)), None);
    }
}
