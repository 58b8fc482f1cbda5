pub mod demo;
pub mod eval;
pub mod train;

pub use demo::{run_demo, DemoConfig, DemoOutcome};
pub use eval::{evaluate, greedy_action, EvalConfig};
pub use train::{train, train_into_run_dir, SavedRun, TrainConfig, TrainMode, TrainOutcome};
