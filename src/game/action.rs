use serde::{Deserialize, Serialize};

/// Absolute heading of the snake
///
/// Discriminants are the heading values used in the encoded state
/// (Up=0, Right=1, Down=2, Left=3), ordered clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// All headings in clockwise order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Heading index in `0..4`
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Inverse of [`Direction::index`], wrapping modulo 4
    pub fn from_index(idx: u8) -> Self {
        Self::ALL[(idx % 4) as usize]
    }

    /// Returns the delta (dx, dy) for moving in this direction
    ///
    /// The y axis grows downwards, so `Up` is `(0, -1)`.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// Heading after applying a relative turn
    pub fn turned(&self, action: RelativeAction) -> Self {
        match action {
            RelativeAction::TurnLeft => Self::from_index(self.index() + 3),
            RelativeAction::Straight => *self,
            RelativeAction::TurnRight => Self::from_index(self.index() + 1),
        }
    }
}

/// Action relative to the current heading
///
/// Discriminants are the action indices stored in the Q-table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelativeAction {
    TurnLeft = 0,
    Straight = 1,
    TurnRight = 2,
}

impl RelativeAction {
    pub const COUNT: usize = 3;

    pub const ALL: [RelativeAction; Self::COUNT] = [
        RelativeAction::TurnLeft,
        RelativeAction::Straight,
        RelativeAction::TurnRight,
    ];

    /// Action index in `0..3`
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Convert a table index back into an action, `None` if out of range
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
        assert_eq!(Direction::Right.delta(), (1, 0));
    }

    #[test]
    fn test_relative_turns() {
        assert_eq!(Direction::Right.turned(RelativeAction::TurnLeft), Direction::Up);
        assert_eq!(Direction::Right.turned(RelativeAction::TurnRight), Direction::Down);
        assert_eq!(Direction::Up.turned(RelativeAction::TurnLeft), Direction::Left);
        assert_eq!(Direction::Left.turned(RelativeAction::TurnRight), Direction::Up);

        for dir in Direction::ALL {
            assert_eq!(dir.turned(RelativeAction::Straight), dir);
            let back = dir
                .turned(RelativeAction::TurnLeft)
                .turned(RelativeAction::TurnRight);
            assert_eq!(back, dir);
        }
    }

    #[test]
    fn test_four_right_turns_is_identity() {
        let mut dir = Direction::Down;
        for _ in 0..4 {
            dir = dir.turned(RelativeAction::TurnRight);
        }
        assert_eq!(dir, Direction::Down);
    }

    #[test]
    fn test_index_roundtrip() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_index(dir.index()), dir);
        }
        for action in RelativeAction::ALL {
            assert_eq!(RelativeAction::from_index(action.index()), Some(action));
        }
        assert_eq!(RelativeAction::from_index(3), None);
    }
}
