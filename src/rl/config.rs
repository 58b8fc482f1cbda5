//! Q-learning hyperparameter configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for tabular Q-learning
///
/// Defaults are tuned for a 12x12 grid.
///
/// # Example
///
/// ```rust
/// use snake_qlearn::rl::QLearningConfig;
///
/// let config = QLearningConfig {
///     episodes: 500,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Number of training episodes
    ///
    /// Also the length of the epsilon decay.
    ///
    /// Default: 2500
    pub episodes: usize,

    /// Learning rate (alpha) of the TD update
    ///
    /// Default: 0.05
    pub alpha: f32,

    /// Discount factor for future rewards (gamma)
    ///
    /// Default: 0.90
    pub gamma: f32,

    /// Exploration rate at the first episode
    ///
    /// Default: 1.0
    pub eps_start: f32,

    /// Exploration floor reached at the last episode
    ///
    /// Default: 0.001
    pub eps_end: f32,

    /// Step cap per episode, truncates cyclic policies
    ///
    /// Default: 600
    pub max_steps: usize,

    /// Seed for the environment; the agent derives its own from it
    ///
    /// Default: 0
    pub seed: u64,

    /// Print a rolling average every N episodes
    ///
    /// Default: 200
    pub report_every: usize,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            episodes: 2500,
            alpha: 0.05,
            gamma: 0.90,
            eps_start: 1.0,
            eps_end: 0.001,
            max_steps: 600,
            seed: 0,
            report_every: 200,
        }
    }
}

impl QLearningConfig {
    /// Load a configuration from a TOML file
    ///
    /// Missing keys fall back to their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: QLearningConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(ConfigError::Validation(format!(
                "alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }

        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(ConfigError::Validation(format!(
                "gamma must be in [0, 1], got {}",
                self.gamma
            )));
        }

        if !(0.0..=1.0).contains(&self.eps_start) || !(0.0..=1.0).contains(&self.eps_end) {
            return Err(ConfigError::Validation(format!(
                "epsilon bounds must be in [0, 1], got {} -> {}",
                self.eps_start, self.eps_end
            )));
        }

        if self.eps_end > self.eps_start {
            return Err(ConfigError::Validation(format!(
                "eps_end ({}) cannot exceed eps_start ({})",
                self.eps_end, self.eps_start
            )));
        }

        if self.max_steps == 0 {
            return Err(ConfigError::Validation("max_steps must be at least 1".into()));
        }

        if self.report_every == 0 {
            return Err(ConfigError::Validation("report_every must be at least 1".into()));
        }

        Ok(())
    }

    /// Exploration schedule matching this configuration
    pub fn epsilon_schedule(&self) -> LinearEpsilon {
        LinearEpsilon::new(self.eps_start, self.eps_end, self.episodes)
    }
}

/// Linear epsilon decay from `start` to `end` over `episodes`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearEpsilon {
    start: f32,
    end: f32,
    episodes: usize,
}

impl LinearEpsilon {
    pub fn new(start: f32, end: f32, episodes: usize) -> Self {
        Self {
            start,
            end,
            episodes,
        }
    }

    /// Exploration rate for a 1-based episode number
    ///
    /// `max(end, start - (start - end) * episode / max(1, episodes))`,
    /// exactly `end` from the last scheduled episode on
    pub fn value(&self, episode: usize) -> f32 {
        let span = self.episodes.max(1);
        if episode >= span {
            return self.end;
        }
        let frac = episode as f64 / span as f64;
        let decayed = self.start as f64 - (self.start as f64 - self.end as f64) * frac;
        (decayed as f32).max(self.end)
    }
}
