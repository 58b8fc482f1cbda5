//! Optional on-screen rendering
//!
//! The simulation never depends on a renderer. [`Display`] wraps an optional
//! [`Renderer`] with frame-skip and frame-rate pacing; when the user closes the
//! view or drawing fails, it drops the renderer and the caller carries on
//! headless.

pub mod pacer;
#[cfg(feature = "tui")]
pub mod terminal;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::RenderError;
use crate::game::GameState;

pub use pacer::FramePacer;
#[cfg(feature = "tui")]
pub use terminal::TerminalRenderer;

/// Minimal drawing surface
pub trait Renderer {
    /// Acquire the output surface
    fn init(&mut self) -> Result<(), RenderError>;

    /// Draw one frame of the current grid
    fn draw_frame(&mut self, state: &GameState) -> Result<(), RenderError>;

    /// Whether the user asked to close the view since the last poll
    fn poll_close(&mut self) -> Result<bool, RenderError>;

    /// Release the output surface; must be safe to call more than once
    fn shutdown(&mut self);
}

/// Rendering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Draw at all
    pub enabled: bool,
    /// Frame-rate cap, 0 disables throttling
    pub fps: u32,
    /// Draw every Nth step
    pub frame_skip: u32,
    /// Shown in the frame border
    pub title: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            fps: 20,
            frame_skip: 2,
            title: "Snake (Q-learning)".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn headless() -> Self {
        Self::default()
    }
}

/// Build the default renderer for this build
///
/// Fails when the crate was compiled without the `tui` feature.
pub fn create_renderer(title: &str) -> Result<Box<dyn Renderer>, RenderError> {
    #[cfg(feature = "tui")]
    {
        Ok(Box::new(TerminalRenderer::new(title)))
    }
    #[cfg(not(feature = "tui"))]
    {
        let _ = title;
        Err(RenderError::Unavailable(
            "built without the `tui` feature".to_string(),
        ))
    }
}

/// A renderer plus pacing, or nothing at all
pub struct Display {
    renderer: Option<Box<dyn Renderer>>,
    pacer: FramePacer,
}

impl Display {
    /// No-op display
    pub fn headless() -> Self {
        Self {
            renderer: None,
            pacer: FramePacer::new(1, 0),
        }
    }

    /// Open the default renderer if `options.enabled`
    ///
    /// Fails fast when rendering was requested but cannot start.
    pub fn from_options(options: &RenderOptions) -> Result<Self, RenderError> {
        if !options.enabled {
            return Ok(Self::headless());
        }
        let renderer = create_renderer(&options.title)?;
        Self::with_renderer(renderer, options)
    }

    /// Use a specific renderer
    pub fn with_renderer(
        mut renderer: Box<dyn Renderer>,
        options: &RenderOptions,
    ) -> Result<Self, RenderError> {
        renderer.init()?;
        Ok(Self {
            renderer: Some(renderer),
            pacer: FramePacer::new(options.frame_skip, options.fps),
        })
    }

    pub fn is_active(&self) -> bool {
        self.renderer.is_some()
    }

    /// Offer a frame; skipped frames and a closed view cost nothing
    pub fn present(&mut self, state: &GameState) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        if !self.pacer.should_draw() {
            return;
        }

        match renderer.poll_close() {
            Ok(true) => {
                info!("render window closed, continuing headless");
                self.close();
                return;
            }
            Ok(false) => {}
            Err(e) => {
                warn!("render input failed ({e}), continuing headless");
                self.close();
                return;
            }
        }

        if let Err(e) = renderer.draw_frame(state) {
            warn!("render draw failed ({e}), continuing headless");
            self.close();
            return;
        }

        self.pacer.throttle();
    }

    /// Shut the renderer down and stop drawing
    pub fn close(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.shutdown();
        }
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        self.close();
    }
}
