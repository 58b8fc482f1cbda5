use super::encoder::EncodedState;
use crate::error::RenderError;
use crate::game::{GameConfig, GameEngine, GameState, RelativeAction, StepInfo};
use crate::render::{Display, RenderOptions};

/// Snake environment for tabular reinforcement learning
///
/// Wraps the game engine and exposes:
/// - Encoded observations ([`EncodedState`])
/// - Discrete relative actions (0: turn left, 1: straight, 2: turn right)
/// - Standard RL interface (reset, step)
///
/// Rendering is optional and never changes outcomes.
pub struct SnakeEnvironment {
    engine: GameEngine,
    state: GameState,
    display: Display,
}

impl SnakeEnvironment {
    /// Create a headless Snake environment
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut engine = GameEngine::new(config, seed);
        let state = engine.reset();
        Self {
            engine,
            state,
            display: Display::headless(),
        }
    }

    /// Create an environment that renders according to `render`
    ///
    /// Fails when rendering is enabled but no renderer can start.
    pub fn with_render(
        config: GameConfig,
        seed: u64,
        render: &RenderOptions,
    ) -> Result<Self, RenderError> {
        let mut env = Self::new(config, seed);
        env.display = Display::from_options(render)?;
        Ok(env)
    }

    /// Attach an already initialised display
    pub fn set_display(&mut self, display: Display) {
        self.display = display;
    }

    /// Reset the environment and return the initial observation
    pub fn reset(&mut self) -> EncodedState {
        self.state = self.engine.reset();
        EncodedState::encode(&self.state)
    }

    /// Step the environment with a discrete action
    ///
    /// Actions:
    /// - 0: Turn left
    /// - 1: Go straight
    /// - 2: Turn right
    /// - other: Go straight
    ///
    /// Returns `(next_state, reward, done, info)`.
    pub fn step(&mut self, action_idx: usize) -> (EncodedState, f32, bool, StepInfo) {
        let action = RelativeAction::from_index(action_idx).unwrap_or(RelativeAction::Straight);
        let result = self.engine.step(&mut self.state, action);

        self.display.present(&self.state);

        (
            EncodedState::encode(&self.state),
            result.reward,
            result.terminated,
            result.info,
        )
    }

    /// Current observation without stepping
    pub fn observation(&self) -> EncodedState {
        EncodedState::encode(&self.state)
    }

    /// Get reference to current game state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_rendering(&self) -> bool {
        self.display.is_active()
    }

    /// Release the renderer, if any
    pub fn close(&mut self) {
        self.display.close();
    }
}
