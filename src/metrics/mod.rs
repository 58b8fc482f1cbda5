pub mod summary;
pub mod training_stats;

pub use summary::{
    BestEpisode, EvalSummary, Hyperparameters, ScoreStats, TrainingRun, TrainingSummary,
};
pub use training_stats::TrainingStats;
