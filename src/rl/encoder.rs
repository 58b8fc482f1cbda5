//! Discrete state encoding for the tabular agent
//!
//! The grid is reduced to six small integers: danger to the left, front and
//! right of the head (relative to the heading), the sign of the food offset on
//! each axis, and the heading itself. That gives 2·2·2·3·3·4 = 288 keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{GameState, RelativeAction};

/// Number of distinct encoded states
pub const STATE_SPACE_SIZE: usize = 2 * 2 * 2 * 3 * 3 * 4;

/// Q-table key derived from a [`GameState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EncodedState {
    pub danger_left: u8,
    pub danger_front: u8,
    pub danger_right: u8,
    /// Sign of `food.x - head.x`
    pub food_dx: i8,
    /// Sign of `food.y - head.y`
    pub food_dy: i8,
    /// Heading index (Up=0, Right=1, Down=2, Left=3)
    pub heading: u8,
}

impl EncodedState {
    /// Encode a game state
    pub fn encode(state: &GameState) -> Self {
        let heading = state.snake.direction;
        let head = state.snake.head();
        let danger = |action| u8::from(state.is_danger(heading.turned(action)));

        Self {
            danger_left: danger(RelativeAction::TurnLeft),
            danger_front: danger(RelativeAction::Straight),
            danger_right: danger(RelativeAction::TurnRight),
            food_dx: (state.food.x - head.x).signum() as i8,
            food_dy: (state.food.y - head.y).signum() as i8,
            heading: heading.index(),
        }
    }

    /// Whether every component is within its declared range
    pub fn is_valid(&self) -> bool {
        self.danger_left <= 1
            && self.danger_front <= 1
            && self.danger_right <= 1
            && (-1..=1).contains(&self.food_dx)
            && (-1..=1).contains(&self.food_dy)
            && self.heading <= 3
    }

    /// Dense mixed-radix index in `0..STATE_SPACE_SIZE`
    ///
    /// Only meaningful for valid states.
    pub fn pack(&self) -> u16 {
        let dangers = (self.danger_left << 2) | (self.danger_front << 1) | self.danger_right;
        let mut idx = dangers as u16;
        idx = idx * 3 + (self.food_dx + 1) as u16;
        idx = idx * 3 + (self.food_dy + 1) as u16;
        idx * 4 + self.heading as u16
    }

    /// Inverse of [`EncodedState::pack`]
    pub fn unpack(packed: u16) -> Option<Self> {
        if packed as usize >= STATE_SPACE_SIZE {
            return None;
        }
        let heading = (packed % 4) as u8;
        let rest = packed / 4;
        let food_dy = (rest % 3) as i8 - 1;
        let rest = rest / 3;
        let food_dx = (rest % 3) as i8 - 1;
        let dangers = (rest / 3) as u8;

        Some(Self {
            danger_left: (dangers >> 2) & 1,
            danger_front: (dangers >> 1) & 1,
            danger_right: dangers & 1,
            food_dx,
            food_dy,
            heading,
        })
    }
}

impl fmt::Display for EncodedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {}, {})",
            self.danger_left,
            self.danger_front,
            self.danger_right,
            self.food_dx,
            self.food_dy,
            self.heading
        )
    }
}
