//! Snake QLearn - A Snake game learned by a tabular Q-learning agent
//!
//! This library provides:
//! - Core game logic with relative actions and shaped rewards (game module)
//! - State encoding, Q-table agent and persistence (rl module)
//! - Training, evaluation and demo runners (modes module)
//! - Score statistics and summaries (metrics module)
//! - Run directories, CSV/JSON output and score plots (artifacts module)
//! - Optional TUI rendering (render module)

pub mod artifacts;
pub mod error;
pub mod game;
#[cfg(feature = "tui")]
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
