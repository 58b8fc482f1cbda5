//! Random-play demo for checking the renderer
//!
//! Plays one episode of uniformly random relative actions.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::{GameConfig, RelativeAction};
use crate::render::RenderOptions;
use crate::rl::{SnakeEnvironment, AGENT_SEED_SALT};

/// Step cap of the demo episode
pub const DEMO_MAX_STEPS: usize = 600;

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub game_config: GameConfig,
    pub seed: u64,
    pub max_steps: usize,
    pub render: RenderOptions,
}

impl DemoConfig {
    /// Rendering demo on the given grid
    pub fn new(game_config: GameConfig, seed: u64) -> Self {
        Self {
            game_config,
            seed,
            max_steps: DEMO_MAX_STEPS,
            render: RenderOptions {
                enabled: true,
                title: "Snake Demo".to_string(),
                ..Default::default()
            },
        }
    }
}

/// How the demo episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoOutcome {
    pub steps: usize,
    pub score: u32,
    pub alive: bool,
}

pub fn run_demo(config: &DemoConfig) -> Result<DemoOutcome> {
    config
        .game_config
        .validate()
        .context("invalid game configuration")?;

    let mut env = SnakeEnvironment::with_render(config.game_config.clone(), config.seed, &config.render)
        .context("demo needs a renderer; pass --render false to run headless")?;
    let mut rng = StdRng::seed_from_u64(config.seed ^ AGENT_SEED_SALT);

    env.reset();
    let mut steps = 0;
    while steps < config.max_steps {
        let (_, _, done, _) = env.step(rng.gen_range(0..RelativeAction::COUNT));
        steps += 1;
        if done {
            break;
        }
    }
    env.close();

    let state = env.state();
    Ok(DemoOutcome {
        steps,
        score: state.score,
        alive: state.is_alive,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headless(seed: u64) -> DemoConfig {
        let mut config = DemoConfig::new(GameConfig::square(10), seed);
        config.render = RenderOptions::headless();
        config
    }

    #[test]
    fn test_demo_requests_rendering() {
        let config = DemoConfig::new(GameConfig::default(), 0);
        assert!(config.render.enabled);
        assert_eq!(config.max_steps, 600);
    }

    #[test]
    fn test_headless_demo_ends() {
        let outcome = run_demo(&headless(4)).unwrap();
        assert!(outcome.steps >= 1);
        assert!(outcome.steps <= DEMO_MAX_STEPS);
        assert!(!outcome.alive || outcome.steps == DEMO_MAX_STEPS);
    }

    #[test]
    fn test_demo_is_reproducible() {
        assert_eq!(run_demo(&headless(9)).unwrap(), run_demo(&headless(9)).unwrap());
    }
}
