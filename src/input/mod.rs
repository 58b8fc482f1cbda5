//! Keyboard handling for the terminal renderer

pub mod handler;

pub use handler::{InputHandler, KeyAction};
