use serde::{Deserialize, Serialize};

use super::engine::INITIAL_SNAKE_LENGTH;
use crate::error::ConfigError;

/// Reward for eating food
pub const FOOD_REWARD: f32 = 10.0;
/// Reward for hitting a wall or the snake's own body
pub const DEATH_PENALTY: f32 = -10.0;
/// Cost charged on every committed move
pub const STEP_PENALTY: f32 = -0.01;
/// Shaping bonus when the head gets strictly closer to the food
pub const CLOSER_BONUS: f32 = 0.05;
/// Shaping penalty when the head gets strictly farther from the food
pub const FARTHER_PENALTY: f32 = -0.02;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,

    // Rewards (for RL)
    /// Reward for eating food
    pub food_reward: f32,
    /// Penalty for each step (encourages efficiency)
    pub step_penalty: f32,
    /// Penalty for dying
    pub death_penalty: f32,
    /// Bonus for moving closer to the food
    pub closer_bonus: f32,
    /// Penalty for moving away from the food
    pub farther_penalty: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 12,
            grid_height: 12,
            food_reward: FOOD_REWARD,
            step_penalty: STEP_PENALTY,
            death_penalty: DEATH_PENALTY,
            closer_bonus: CLOSER_BONUS,
            farther_penalty: FARTHER_PENALTY,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Square `n x n` grid
    pub fn square(n: usize) -> Self {
        Self::new(n, n)
    }

    /// The starting body is two cells wide and food needs a free cell beside it
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < INITIAL_SNAKE_LENGTH || self.grid_height < 1 {
            return Err(ConfigError::Validation(format!(
                "grid must be at least {INITIAL_SNAKE_LENGTH}x1, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.grid_width.saturating_mul(self.grid_height) <= INITIAL_SNAKE_LENGTH {
            return Err(ConfigError::Validation(format!(
                "grid {}x{} has no room for food next to the starting snake",
                self.grid_width, self.grid_height
            )));
        }
        if self.grid_width > i32::MAX as usize || self.grid_height > i32::MAX as usize {
            return Err(ConfigError::Validation("grid is too large".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 12);
        assert_eq!(config.grid_height, 12);
        assert_eq!(config.food_reward, 10.0);
        assert_eq!(config.death_penalty, -10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 9);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 9);
        assert_eq!(config.step_penalty, STEP_PENALTY);
    }

    #[test]
    fn test_degenerate_grid_rejected() {
        assert!(GameConfig::new(1, 5).validate().is_err());
        assert!(GameConfig::new(4, 0).validate().is_err());
        assert!(GameConfig::new(2, 1).validate().is_err());
        assert!(GameConfig::new(3, 1).validate().is_ok());
        assert!(GameConfig::new(2, 2).validate().is_ok());
    }
}
