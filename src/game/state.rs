use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    pub fn manhattan(&self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current heading
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    ///
    /// Segments trail behind the head, opposite to `direction`.
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .collect();

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Every segment except the tail, which vacates on a non-growing move
    pub fn body_without_tail(&self) -> &[Position] {
        &self.body[..self.body.len() - 1]
    }

    /// Push a new head, keeping the tail only when growing
    pub fn advance_to(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);
        if !grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub grid_width: usize,
    pub grid_height: usize,
    /// Food eaten this episode
    pub score: u32,
    /// Committed moves this episode
    pub steps: u32,
    pub is_alive: bool,
    /// Head-to-food Manhattan distance after the last committed move
    pub prev_distance: i32,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Position, grid_width: usize, grid_height: usize) -> Self {
        let prev_distance = snake.head().manhattan(food);
        Self {
            snake,
            food,
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            is_alive: true,
            prev_distance,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.body.contains(&pos)
    }

    /// Whether one step from the head along `direction` would be fatal
    ///
    /// The tail is ignored since it moves away unless the snake grows.
    pub fn is_danger(&self, direction: Direction) -> bool {
        let next = self.snake.head().moved_in_direction(direction);
        !self.is_in_bounds(next) || self.snake.body_without_tail().contains(&next)
    }

    /// Cells not covered by the snake, in row-major order
    pub fn free_cells(&self) -> Vec<Position> {
        let mut cells = Vec::with_capacity(self.grid_width * self.grid_height);
        for y in 0..self.grid_height as i32 {
            for x in 0..self.grid_width as i32 {
                let pos = Position::new(x, y);
                if !self.is_occupied_by_snake(pos) {
                    cells.push(pos);
                }
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_in_direction(Direction::Down), Position::new(5, 6));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(Position::new(0, 0).manhattan(Position::new(3, 4)), 7);
        assert_eq!(Position::new(2, 2).manhattan(Position::new(2, 2)), 0);
        assert_eq!(Position::new(5, 1).manhattan(Position::new(1, 5)), 8);
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(6, 6), Direction::Right, 2);
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.head(), Position::new(6, 6));
        assert_eq!(snake.tail(), Position::new(5, 6));
    }

    #[test]
    fn test_advance() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);

        snake.advance_to(Position::new(6, 5), false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(6, 5));
        assert_eq!(snake.tail(), Position::new(4, 5));

        snake.advance_to(Position::new(7, 5), true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.tail(), Position::new(4, 5));
    }

    #[test]
    fn test_danger_ignores_tail() {
        // Head (5,5) with a body curling around so the tail sits below the head
        let snake = Snake {
            body: vec![
                Position::new(5, 5),
                Position::new(6, 5),
                Position::new(6, 6),
                Position::new(5, 6),
            ],
            direction: Direction::Left,
        };
        let state = GameState::new(snake, Position::new(0, 0), 10, 10);

        assert!(state.is_danger(Direction::Right)); // neck
        assert!(!state.is_danger(Direction::Down)); // tail vacates
        assert!(!state.is_danger(Direction::Left));
    }

    #[test]
    fn test_bounds_checking() {
        let state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 2),
            Position::new(9, 9),
            12,
            10,
        );

        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(11, 9)));
        assert!(!state.is_in_bounds(Position::new(-1, 0)));
        assert!(!state.is_in_bounds(Position::new(12, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 10)));
    }

    #[test]
    fn test_free_cells_excludes_snake() {
        let state = GameState::new(
            Snake::new(Position::new(1, 0), Direction::Right, 2),
            Position::new(2, 1),
            3,
            2,
        );
        let free = state.free_cells();
        assert_eq!(free.len(), 4);
        assert!(!free.contains(&Position::new(0, 0)));
        assert!(!free.contains(&Position::new(1, 0)));
    }
}
