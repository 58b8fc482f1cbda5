use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{
    action::{Direction, RelativeAction},
    config::GameConfig,
    state::{CollisionType, GameState, Position, Snake},
};

/// Length of the snake at the start of every episode
pub const INITIAL_SNAKE_LENGTH: usize = 2;

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step (for RL training)
    pub reward: f32,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    fn terminal(reward: f32, collision_type: Option<CollisionType>) -> Self {
        Self {
            reward,
            terminated: true,
            info: StepInfo {
                ate_food: false,
                collision_type,
            },
        }
    }
}

/// The game engine that handles all game logic
///
/// Owns its random generator, so a fixed seed reproduces every food
/// placement and therefore every outcome.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration and seed
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`GameConfig::validate`].
    pub fn new(config: GameConfig, seed: u64) -> Self {
        if let Err(e) = config.validate() {
            panic!("invalid game configuration: {e}");
        }
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    ///
    /// The snake starts as two cells centered on the grid, heading right.
    pub fn reset(&mut self) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(
            Position::new(center_x, center_y),
            Direction::Right,
            INITIAL_SNAKE_LENGTH,
        );

        let free = GameState::new(
            snake.clone(),
            snake.head(),
            self.config.grid_width,
            self.config.grid_height,
        )
        .free_cells();
        // `new` rejected every grid without a free cell beside the snake
        let food = free[self.rng.gen_range(0..free.len())];

        GameState::new(snake, food, self.config.grid_width, self.config.grid_height)
    }

    /// Execute one step of the game
    ///
    /// The turn is applied to the heading before anything else, so a fatal
    /// move leaves the new heading in place with the body untouched.
    pub fn step(&mut self, state: &mut GameState, action: RelativeAction) -> StepResult {
        if !state.is_alive {
            return StepResult::terminal(0.0, None);
        }

        state.snake.direction = state.snake.direction.turned(action);
        let new_head = state.snake.head().moved_in_direction(state.snake.direction);
        let ate_food = new_head == state.food;

        if let Some(collision_type) = Self::check_collision(state, new_head, ate_food) {
            state.is_alive = false;
            return StepResult::terminal(self.config.death_penalty, Some(collision_type));
        }

        state.snake.advance_to(new_head, ate_food);

        let mut reward = self.config.step_penalty;
        let mut terminated = false;

        if ate_food {
            state.score += 1;
            reward += self.config.food_reward;
            match self.spawn_food(state) {
                Some(food) => state.food = food,
                None => {
                    // Board is full; nothing left to eat
                    state.is_alive = false;
                    terminated = true;
                }
            }
        }

        let distance = new_head.manhattan(state.food);
        if distance < state.prev_distance {
            reward += self.config.closer_bonus;
        } else if distance > state.prev_distance {
            reward += self.config.farther_penalty;
        }
        state.prev_distance = distance;

        state.steps += 1;

        StepResult {
            reward,
            terminated,
            info: StepInfo {
                ate_food,
                collision_type: None,
            },
        }
    }

    /// Check if the new head position causes a collision
    ///
    /// The tail only blocks the move when the snake is about to grow.
    fn check_collision(state: &GameState, pos: Position, growing: bool) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        let blocking = if growing {
            &state.snake.body[..]
        } else {
            state.snake.body_without_tail()
        };
        if blocking.contains(&pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Pick a free cell uniformly at random, `None` when the board is full
    fn spawn_food(&mut self, state: &GameState) -> Option<Position> {
        state.free_cells().choose(&mut self.rng).copied()
    }
}
