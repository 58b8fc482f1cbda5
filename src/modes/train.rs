//! Training mode for the Q-learning agent
//!
//! This module implements the training loop. It runs episodes in the Snake
//! environment with epsilon-greedy exploration, applies a TD(0) update after
//! every step, and reports a rolling average of scores every few episodes.
//!
//! # Example
//!
//! ```rust,no_run
//! use snake_qlearn::game::GameConfig;
//! use snake_qlearn::modes::{TrainConfig, TrainMode};
//! use snake_qlearn::rl::QLearningConfig;
//!
//! let train_config = TrainConfig::new(GameConfig::square(12), QLearningConfig::default());
//! let outcome = TrainMode::new(train_config)?.run();
//! println!("best: {:?}", outcome.summary.best_score);
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::artifacts::{
    self, CONFIG_FILE, METRICS_FILE, PLOT_FILE, PLOT_WINDOW, QTABLE_FILE, SCORES_FILE,
};
use crate::game::GameConfig;
use crate::metrics::{Hyperparameters, TrainingRun, TrainingStats, TrainingSummary};
use crate::render::RenderOptions;
use crate::rl::{
    save_q_table, LinearEpsilon, QLearningConfig, QTable, SnakeEnvironment, AGENT_SEED_SALT,
};

/// Configuration for training mode
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Game configuration (grid size, rewards)
    pub game_config: GameConfig,

    /// Q-learning hyperparameters
    pub rl_config: QLearningConfig,

    /// Optional live view of training episodes
    pub render: RenderOptions,
}

impl TrainConfig {
    /// Create a headless training configuration
    ///
    /// # Example
    ///
    /// ```rust
    /// use snake_qlearn::game::GameConfig;
    /// use snake_qlearn::modes::TrainConfig;
    /// use snake_qlearn::rl::QLearningConfig;
    ///
    /// let config = TrainConfig::new(GameConfig::default(), QLearningConfig::default());
    /// assert!(!config.render.enabled);
    /// ```
    pub fn new(game_config: GameConfig, rl_config: QLearningConfig) -> Self {
        Self {
            game_config,
            rl_config,
            render: RenderOptions::headless(),
        }
    }

    /// Check both configurations before anything is started or written
    pub fn validate(&self) -> Result<()> {
        self.game_config
            .validate()
            .context("invalid game configuration")?;
        self.rl_config
            .validate()
            .context("invalid Q-learning configuration")?;
        Ok(())
    }

    /// Summary of the hyperparameters, as stored in `metrics.json`
    pub fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters::new(&self.game_config, &self.rl_config)
    }
}

/// Everything a finished training run produced
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    /// Trained value table
    pub agent: QTable,

    /// Score of every episode, in order
    pub scores: Vec<u32>,

    /// Aggregate statistics and hyperparameters
    pub summary: TrainingSummary,
}

/// Training mode for the Q-learning agent
///
/// Owns the agent and the environment for one run. The environment is seeded
/// with `rl_config.seed` and the agent with `rl_config.seed ^ AGENT_SEED_SALT`,
/// so a run is reproducible from its configuration alone.
pub struct TrainMode {
    /// Agent being trained
    agent: QTable,

    /// Snake environment for experience collection
    env: SnakeEnvironment,

    /// Rolling statistics for progress lines
    stats: TrainingStats,

    /// Full score history and best-score bookmark
    run: TrainingRun,

    /// Exploration schedule
    epsilon: LinearEpsilon,

    /// Training configuration
    config: TrainConfig,
}

impl TrainMode {
    /// Create a new training mode
    ///
    /// Validates both configurations and opens the renderer if requested.
    pub fn new(config: TrainConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.rl_config.seed;
        let env = SnakeEnvironment::with_render(config.game_config.clone(), seed, &config.render)
            .context("failed to start renderer")?;
        let agent = QTable::for_snake(seed ^ AGENT_SEED_SALT);
        let stats = TrainingStats::new(config.rl_config.report_every);
        let epsilon = config.rl_config.epsilon_schedule();

        Ok(Self {
            agent,
            env,
            stats,
            run: TrainingRun::new(),
            epsilon,
            config,
        })
    }

    /// Run the training loop
    ///
    /// Trains for `rl_config.episodes` episodes, printing progress every
    /// `rl_config.report_every` episodes, and returns the trained table with
    /// its score history and summary. Console output is held back while the
    /// terminal view owns the screen.
    pub fn run(mut self) -> TrainOutcome {
        if self.console_visible() {
            self.print_header();
        }

        let episodes = self.config.rl_config.episodes;
        let report_every = self.config.rl_config.report_every.max(1);

        for episode in 1..=episodes {
            let eps = self.epsilon.value(episode);

            let (episode_reward, episode_steps, episode_score) = self.run_episode(eps);

            self.stats
                .record_episode(episode_reward, episode_steps, episode_score, eps);
            self.run.record(episode_score);

            if episode % report_every == 0 && self.console_visible() {
                println!("{}", self.progress_line(episode));
            }
        }

        self.env.close();

        let summary = self
            .run
            .summarize(self.config.hyperparameters(), self.agent.len());

        println!("\nTraining complete!");
        println!(
            "mean={:.3} std={:.3} last100={:.3} states={}",
            summary.mean_score, summary.std_score, summary.last100_mean, summary.states_visited
        );

        TrainOutcome {
            agent: self.agent,
            scores: self.run.into_scores(),
            summary,
        }
    }

    /// Run a single training episode
    ///
    /// Returns total reward, steps taken and the final score. Hitting the step
    /// cap ends the episode like a termination would.
    fn run_episode(&mut self, eps: f32) -> (f32, usize, u32) {
        let alpha = self.config.rl_config.alpha;
        let gamma = self.config.rl_config.gamma;
        let max_steps = self.config.rl_config.max_steps;

        let mut state = self.env.reset();
        let mut episode_reward = 0.0;
        let mut episode_steps = 0;

        while episode_steps < max_steps {
            let action = self.agent.act(state, eps);
            let (next_state, reward, done, _info) = self.env.step(action);

            self.agent
                .update(state, action, reward, next_state, alpha, gamma);

            episode_reward += reward;
            episode_steps += 1;
            state = next_state;

            if done {
                break;
            }
        }

        if episode_steps == max_steps && self.env.state().is_alive {
            debug!(max_steps, "episode truncated at step cap");
        }

        (episode_reward, episode_steps, self.env.state().score)
    }

    /// Print training header information
    fn print_header(&self) {
        let rl = &self.config.rl_config;
        println!("{}", "=".repeat(70));
        println!("Q-learning Training - Snake");
        println!("{}", "=".repeat(70));
        println!("Episodes: {}", rl.episodes);
        println!(
            "Grid: {}x{}",
            self.config.game_config.grid_width, self.config.game_config.grid_height
        );
        println!("Q-learning Config:");
        println!("  Alpha: {}", rl.alpha);
        println!("  Gamma: {}", rl.gamma);
        println!("  Epsilon: {} -> {}", rl.eps_start, rl.eps_end);
        println!("  Max steps: {}", rl.max_steps);
        println!("  Seed: {}", rl.seed);
        println!("Logging: Every {} episodes", rl.report_every);
        println!("{}", "=".repeat(70));
        println!();
    }

    /// Progress lines would draw over the terminal view
    fn console_visible(&self) -> bool {
        !self.env.is_rendering()
    }

    /// One progress line, best score taken from the run history
    fn progress_line(&self, episode: usize) -> String {
        let best = match self.run.best() {
            Some(best) => format!("{}@{}", best.score, best.episode),
            None => "-".to_string(),
        };
        format!(
            "Ep {:4} | {} | best={}",
            episode,
            self.stats.format_summary(),
            best
        )
    }
}

/// Written to `config.json` of a training run
#[derive(Serialize)]
struct RunConfig<'a> {
    game: &'a GameConfig,
    q_learning: &'a QLearningConfig,
    render: &'a RenderOptions,
}

/// A finished run and where its files went
#[derive(Debug, Clone)]
pub struct SavedRun {
    pub run_dir: PathBuf,
    pub checkpoint: PathBuf,
    pub outcome: TrainOutcome,
}

/// Train and write every run file into a new directory under `runs_root`
///
/// The configuration is validated first, so a rejected run leaves no
/// directory behind.
pub fn train_into_run_dir(
    config: TrainConfig,
    runs_root: &Path,
    tag: Option<&str>,
) -> Result<SavedRun> {
    config.validate()?;

    let run_dir =
        artifacts::make_run_dir(runs_root, tag).context("failed to create run directory")?;
    artifacts::save_json(
        &run_dir.join(CONFIG_FILE),
        &RunConfig {
            game: &config.game_config,
            q_learning: &config.rl_config,
            render: &config.render,
        },
    )?;

    let outcome = TrainMode::new(config)?.run();

    let checkpoint = run_dir.join(QTABLE_FILE);
    save_q_table(&outcome.agent, &checkpoint)
        .with_context(|| format!("failed to save Q-table to {}", checkpoint.display()))?;
    artifacts::save_scores_csv(&run_dir.join(SCORES_FILE), &outcome.scores)?;
    artifacts::save_json(&run_dir.join(METRICS_FILE), &outcome.summary)?;
    artifacts::plot_scores(&outcome.scores, &run_dir.join(PLOT_FILE), PLOT_WINDOW)?;

    Ok(SavedRun {
        run_dir,
        checkpoint,
        outcome,
    })
}

/// Headless training with the given configurations
pub fn train(game_config: GameConfig, rl_config: QLearningConfig) -> Result<TrainOutcome> {
    Ok(TrainMode::new(TrainConfig::new(game_config, rl_config))?.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::{RecordingLog, RecordingRenderer};
    use crate::render::Display;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn quick_config(episodes: usize) -> TrainConfig {
        TrainConfig::new(
            GameConfig::square(8),
            QLearningConfig {
                episodes,
                max_steps: 100,
                report_every: 10,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_train_config_creation() {
        let config = TrainConfig::new(GameConfig::default(), QLearningConfig::default());
        assert_eq!(config.rl_config.episodes, 2500);
        assert_eq!(config.game_config.grid_width, 12);
        assert!(!config.render.enabled);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = quick_config(1);
        config.rl_config.alpha = 0.0;
        assert!(TrainMode::new(config).is_err());
    }

    #[test]
    fn test_run_single_episode() {
        let mut train_mode = TrainMode::new(quick_config(1)).unwrap();

        let (_reward, steps, _score) = train_mode.run_episode(1.0);
        assert!(steps > 0);
        assert!(steps <= 100);
        assert!(!train_mode.agent.is_empty());
    }

    #[test]
    fn test_run_records_every_episode() {
        let outcome = TrainMode::new(quick_config(25)).unwrap().run();

        assert_eq!(outcome.scores.len(), 25);
        assert_eq!(outcome.summary.hyperparameters.episodes, 25);
        assert_eq!(outcome.summary.states_visited, outcome.agent.len());
        assert!(outcome.summary.best_episode.is_some());
    }

    #[test]
    fn test_zero_episodes() {
        let outcome = TrainMode::new(quick_config(0)).unwrap().run();

        assert!(outcome.scores.is_empty());
        assert!(outcome.agent.is_empty());
        assert_eq!(outcome.summary.mean_score, 0.0);
        assert_eq!(outcome.summary.best_score, None);
        assert_eq!(outcome.summary.best_episode, None);
    }

    #[test]
    fn test_progress_line_reads_run_best() {
        let mut train_mode = TrainMode::new(quick_config(3)).unwrap();
        assert!(train_mode.progress_line(0).ends_with("best=-"));

        for score in [1, 4, 4] {
            train_mode.stats.record_episode(0.0, 1, score, 0.5);
            train_mode.run.record(score);
        }

        let line = train_mode.progress_line(3);
        assert!(line.starts_with("Ep    3 | avg(last10)=3.00"));
        assert!(line.ends_with("best=4@2"));
    }

    #[test]
    fn test_console_quiet_while_rendering() {
        let mut train_mode = TrainMode::new(quick_config(1)).unwrap();
        assert!(train_mode.console_visible());

        let log = Rc::new(RefCell::new(RecordingLog::default()));
        let options = RenderOptions {
            enabled: true,
            fps: 0,
            frame_skip: 1,
            ..Default::default()
        };
        let display =
            Display::with_renderer(Box::new(RecordingRenderer::new(log.clone())), &options)
                .unwrap();
        train_mode.env.set_display(display);

        assert!(!train_mode.console_visible());
        let outcome = train_mode.run();
        assert_eq!(outcome.scores.len(), 1);
        assert!(log.borrow().frames > 0);
    }

    #[test]
    fn test_invalid_config_leaves_no_run_dir() {
        let temp = TempDir::new().unwrap();
        let runs_root = temp.path().join("runs");
        let mut config = quick_config(1);
        config.rl_config.alpha = 0.0;

        assert!(train_into_run_dir(config, &runs_root, Some("bad")).is_err());
        assert!(!runs_root.exists());
    }

    #[test]
    fn test_run_dir_holds_every_file() {
        let temp = TempDir::new().unwrap();
        let saved = train_into_run_dir(quick_config(5), temp.path(), Some("quick")).unwrap();

        for file in [CONFIG_FILE, QTABLE_FILE, SCORES_FILE, METRICS_FILE, PLOT_FILE] {
            assert!(saved.run_dir.join(file).is_file(), "missing {file}");
        }
        assert_eq!(saved.checkpoint, saved.run_dir.join(QTABLE_FILE));
        assert_eq!(saved.outcome.scores.len(), 5);
    }

    #[test]
    fn test_step_cap_truncates() {
        let mut config = quick_config(1);
        config.rl_config.max_steps = 1;
        let mut train_mode = TrainMode::new(config).unwrap();

        let (_, steps, _) = train_mode.run_episode(0.0);
        assert_eq!(steps, 1);
    }
}
