//! Tabular reinforcement learning for the Snake game
//!
//! Provides:
//! - Compact relative-state encoding (danger bits, food direction, heading)
//! - RL environment interface over the game engine
//! - Q-value table with epsilon-greedy selection and TD(0) updates
//! - Hyperparameter configuration and epsilon schedule
//! - JSON snapshot persistence for trained tables

pub mod config;
pub mod encoder;
pub mod environment;
pub mod persistence;
pub mod q_table;

pub use config::{LinearEpsilon, QLearningConfig};
pub use encoder::{EncodedState, STATE_SPACE_SIZE};
pub use environment::SnakeEnvironment;
pub use persistence::{load_q_table, save_q_table, QTableSnapshot, SnapshotEntry};
pub use q_table::{argmax, QTable, AGENT_SEED_SALT};
