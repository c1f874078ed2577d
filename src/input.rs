use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};

use crate::board::Direction;

// ============================================================================
// Actions
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Move(Direction),
    NewGame,
    Restart,
    Quit,
}

pub fn action_for_key(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Up => Action::Move(Direction::Up),
        KeyCode::Down => Action::Move(Direction::Down),
        KeyCode::Left => Action::Move(Direction::Left),
        KeyCode::Right => Action::Move(Direction::Right),
        KeyCode::Esc => Action::Quit,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' | 'k' => Action::Move(Direction::Up),
            's' | 'j' => Action::Move(Direction::Down),
            'a' | 'h' => Action::Move(Direction::Left),
            'd' | 'l' => Action::Move(Direction::Right),
            'n' => Action::NewGame,
            'r' => Action::Restart,
            'q' => Action::Quit,
            _ => return None,
        },
        _ => return None,
    };
    Some(action)
}

// ============================================================================
// Swipes
// ============================================================================

/// Terminal cells are roughly twice as tall as they are wide.
const COLUMN_SCALE: i32 = 2;

/// Direction of a drag of `dx` columns and `dy` rows, or `None` when the
/// dominant axis moved less than `threshold` rows.
pub fn swipe_direction(dx: i32, dy: i32, threshold: u16) -> Option<Direction> {
    let dx = dx / COLUMN_SCALE;
    let threshold = i32::from(threshold);
    if dx.abs() > dy.abs() {
        if dx.abs() < threshold {
            None
        } else if dx > 0 {
            Some(Direction::Right)
        } else {
            Some(Direction::Left)
        }
    } else if dy.abs() < threshold {
        None
    } else if dy > 0 {
        Some(Direction::Down)
    } else {
        Some(Direction::Up)
    }
}

/// Turns a left-button press and release into at most one swipe.
#[derive(Debug)]
pub struct SwipeTracker {
    start: Option<(u16, u16)>,
    threshold: u16,
}

impl SwipeTracker {
    pub fn new(threshold: u16) -> Self {
        Self {
            start: None,
            threshold,
        }
    }

    pub fn handle(&mut self, event: &MouseEvent) -> Option<Direction> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.start = Some((event.column, event.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (column, row) = self.start.take()?;
                let dx = i32::from(event.column) - i32::from(column);
                let dy = i32::from(event.row) - i32::from(row);
                swipe_direction(dx, dy, self.threshold)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn arrows_and_letters_map_to_moves() {
        assert_eq!(
            action_for_key(KeyCode::Left),
            Some(Action::Move(Direction::Left))
        );
        assert_eq!(
            action_for_key(KeyCode::Char('W')),
            Some(Action::Move(Direction::Up))
        );
        assert_eq!(action_for_key(KeyCode::Char('n')), Some(Action::NewGame));
        assert_eq!(action_for_key(KeyCode::Char('x')), None);
    }

    #[test]
    fn larger_axis_wins() {
        assert_eq!(swipe_direction(20, 3, 3), Some(Direction::Right));
        assert_eq!(swipe_direction(4, -5, 3), Some(Direction::Up));
    }

    #[test]
    fn short_drags_are_ignored() {
        assert_eq!(swipe_direction(2, 1, 3), None);
        assert_eq!(swipe_direction(0, 0, 1), None);
    }

    #[test]
    fn tracker_reports_on_release_only() {
        let mut tracker = SwipeTracker::new(2);
        assert_eq!(
            tracker.handle(&mouse(MouseEventKind::Down(MouseButton::Left), 10, 10)),
            None
        );
        assert_eq!(
            tracker.handle(&mouse(MouseEventKind::Up(MouseButton::Left), 10, 15)),
            Some(Direction::Down)
        );
        assert_eq!(
            tracker.handle(&mouse(MouseEventKind::Up(MouseButton::Left), 10, 2)),
            None
        );
    }
}
