//! Greedy evaluation of a trained Q-table
//!
//! Exploration is off and nothing is learned: the table is only read.
//! States never seen during training fall back to going straight.

use anyhow::{Context, Result};
use tracing::info;

use crate::game::{GameConfig, RelativeAction};
use crate::metrics::{EvalSummary, ScoreStats};
use crate::render::RenderOptions;
use crate::rl::{argmax, EncodedState, QTable, SnakeEnvironment};

/// Configuration for evaluation mode
#[derive(Debug, Clone)]
pub struct EvalConfig {
    pub game_config: GameConfig,

    /// Number of greedy episodes
    ///
    /// Default: 100
    pub episodes: usize,

    /// Environment seed
    ///
    /// Default: 123
    pub seed: u64,

    /// Step cap per episode
    ///
    /// Default: 500
    pub max_steps: usize,

    pub render: RenderOptions,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            episodes: 100,
            seed: 123,
            max_steps: 500,
            render: RenderOptions::headless(),
        }
    }
}

/// Greedy action, or go straight for a state the table has never seen
pub fn greedy_action(agent: &QTable, state: EncodedState) -> usize {
    agent
        .values(state)
        .map_or(RelativeAction::Straight.index(), argmax)
}

/// Run greedy episodes and aggregate their scores
pub fn evaluate(agent: &QTable, config: &EvalConfig) -> Result<EvalSummary> {
    config
        .game_config
        .validate()
        .context("invalid game configuration")?;

    let mut env = SnakeEnvironment::with_render(config.game_config.clone(), config.seed, &config.render)
        .context("failed to start renderer")?;

    let mut scores = Vec::with_capacity(config.episodes);
    for _ in 0..config.episodes {
        let mut state = env.reset();
        for _ in 0..config.max_steps {
            let (next_state, _reward, done, _info) = env.step(greedy_action(agent, state));
            state = next_state;
            if done {
                break;
            }
        }
        scores.push(env.state().score);
    }
    env.close();

    let stats = ScoreStats::from_scores(&scores);
    info!(
        episodes = config.episodes,
        mean = stats.mean,
        max = stats.max,
        "evaluation finished"
    );

    Ok(EvalSummary {
        episodes: config.episodes,
        grid_width: config.game_config.grid_width,
        grid_height: config.game_config.grid_height,
        seed: config.seed,
        max_steps: config.max_steps,
        mean_score: stats.mean,
        std_score: stats.std,
        max_score: stats.max,
        min_score: stats.min,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvalConfig::default();
        assert_eq!(config.episodes, 100);
        assert_eq!(config.seed, 123);
        assert_eq!(config.max_steps, 500);
    }

    #[test]
    fn test_unseen_state_goes_straight() {
        let agent = QTable::for_snake(0);
        let state = EncodedState::unpack(0).unwrap();
        assert_eq!(greedy_action(&agent, state), 1);
    }

    #[test]
    fn test_known_state_uses_argmax() {
        let mut agent = QTable::for_snake(0);
        let state = EncodedState::unpack(7).unwrap();
        agent.set_values(state, &[0.0, -1.0, 0.5]);
        assert_eq!(greedy_action(&agent, state), 2);

        agent.set_values(state, &[0.0, 0.0, 0.0]);
        assert_eq!(greedy_action(&agent, state), 0);
    }

    #[test]
    fn test_zero_episodes() {
        let config = EvalConfig {
            episodes: 0,
            ..Default::default()
        };
        let summary = evaluate(&QTable::for_snake(0), &config).unwrap();

        assert_eq!(summary.episodes, 0);
        assert_eq!(summary.mean_score, 0.0);
        assert_eq!(summary.std_score, 0.0);
        assert_eq!(summary.max_score, 0);
        assert_eq!(summary.min_score, 0);
    }

    #[test]
    fn test_empty_table_runs_straight_into_wall() {
        let config = EvalConfig {
            episodes: 3,
            ..Default::default()
        };
        let agent = QTable::for_snake(0);
        let summary = evaluate(&agent, &config).unwrap();

        assert_eq!(summary.episodes, 3);
        assert!(summary.max_score <= 5);
        assert!(agent.is_empty());
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let config = EvalConfig {
            episodes: 5,
            game_config: GameConfig::square(8),
            ..Default::default()
        };
        let mut agent = QTable::for_snake(0);
        for packed in 0..crate::rl::STATE_SPACE_SIZE as u16 {
            if let Some(state) = EncodedState::unpack(packed) {
                agent.set_values(state, &[0.1, 0.3, 0.2]);
            }
        }

        let a = evaluate(&agent, &config).unwrap();
        let b = evaluate(&agent, &config).unwrap();
        assert_eq!(a, b);
    }
}
