//! Aggregate statistics written at the end of training and evaluation

use serde::{Deserialize, Serialize};

use crate::game::GameConfig;
use crate::rl::QLearningConfig;

/// Number of trailing episodes averaged into `last100_mean`
pub const LAST_N: usize = 100;

/// Mean, population std, max and min of a score sequence
///
/// An empty sequence yields all zeros rather than NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    pub mean: f64,
    pub std: f64,
    pub max: u32,
    pub min: u32,
}

impl ScoreStats {
    pub fn from_scores(scores: &[u32]) -> Self {
        if scores.is_empty() {
            return Self {
                mean: 0.0,
                std: 0.0,
                max: 0,
                min: 0,
            };
        }

        Self {
            mean: mean(scores),
            std: std_dev(scores),
            max: scores.iter().copied().max().unwrap_or(0),
            min: scores.iter().copied().min().unwrap_or(0),
        }
    }
}

/// Arithmetic mean, 0.0 for an empty slice
pub fn mean(scores: &[u32]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().map(|&s| s as f64).sum::<f64>() / scores.len() as f64
}

/// Population standard deviation, 0.0 for an empty slice
pub fn std_dev(scores: &[u32]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let m = mean(scores);
    let var = scores
        .iter()
        .map(|&s| {
            let d = s as f64 - m;
            d * d
        })
        .sum::<f64>()
        / scores.len() as f64;
    var.sqrt()
}

/// Hyperparameters recorded with a training summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    pub episodes: usize,
    pub grid_width: usize,
    pub grid_height: usize,
    pub alpha: f32,
    pub gamma: f32,
    pub eps_start: f32,
    pub eps_end: f32,
    pub max_steps: usize,
    pub seed: u64,
}

impl Hyperparameters {
    pub fn new(game: &GameConfig, rl: &QLearningConfig) -> Self {
        Self {
            episodes: rl.episodes,
            grid_width: game.grid_width,
            grid_height: game.grid_height,
            alpha: rl.alpha,
            gamma: rl.gamma,
            eps_start: rl.eps_start,
            eps_end: rl.eps_end,
            max_steps: rl.max_steps,
            seed: rl.seed,
        }
    }
}

/// Best episode of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestEpisode {
    pub score: u32,
    /// 1-based
    pub episode: usize,
}

/// Scores and best-score bookmark accumulated over one training run
#[derive(Debug, Clone, Default)]
pub struct TrainingRun {
    scores: Vec<u32>,
    best: Option<BestEpisode>,
}

impl TrainingRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next episode's score
    pub fn record(&mut self, score: u32) {
        self.scores.push(score);
        if self.best.map_or(true, |b| score > b.score) {
            self.best = Some(BestEpisode {
                score,
                episode: self.scores.len(),
            });
        }
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn best(&self) -> Option<BestEpisode> {
        self.best
    }

    pub fn into_scores(self) -> Vec<u32> {
        self.scores
    }

    /// Summarise the run
    pub fn summarize(&self, hyperparameters: Hyperparameters, states_visited: usize) -> TrainingSummary {
        let overall = ScoreStats::from_scores(&self.scores);
        let tail_start = self.scores.len().saturating_sub(LAST_N);

        TrainingSummary {
            hyperparameters,
            mean_score: overall.mean,
            std_score: overall.std,
            last100_mean: mean(&self.scores[tail_start..]),
            best_score: self.best.map(|b| b.score),
            best_episode: self.best.map(|b| b.episode),
            states_visited,
        }
    }
}

/// Final metrics of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    #[serde(flatten)]
    pub hyperparameters: Hyperparameters,
    pub mean_score: f64,
    pub std_score: f64,
    pub last100_mean: f64,
    /// `None` when no episode ran
    pub best_score: Option<u32>,
    pub best_episode: Option<usize>,
    /// Rows in the Q-table at the end of training
    pub states_visited: usize,
}

/// Aggregate statistics of a greedy evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalSummary {
    pub episodes: usize,
    pub grid_width: usize,
    pub grid_height: usize,
    pub seed: u64,
    pub max_steps: usize,
    pub mean_score: f64,
    pub std_score: f64,
    pub max_score: u32,
    pub min_score: u32,
}
