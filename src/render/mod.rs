//! Rendering boundary
//!
//! The episode controller hands a [`RenderFrame`] to a [`Renderer`] once per
//! tick on evaluation episodes. Renderers report back whether the user asked
//! to stop; they never influence the simulation otherwise.

pub mod pacer;
pub mod renderer;

use crate::game::{Grid, SimError};

pub use pacer::{FixedDelay, NoDelay, Pacer};
pub use renderer::TuiRenderer;

/// Everything a renderer may show for one tick
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    pub grid: &'a Grid,
    /// Previous and current snake cells, for trails
    pub ghost: &'a Grid,
    pub episode: usize,
    pub tick: u32,
    pub alive: usize,
    pub players: usize,
    pub max_reward: u32,
    pub exploring: bool,
}

pub trait Renderer {
    /// Draw one frame; `Ok(true)` means the user asked to stop
    fn present(&mut self, frame: &RenderFrame<'_>) -> Result<bool, SimError>;

    /// Called once per finished episode, rendered or not
    fn idle(&mut self) -> Result<bool, SimError> {
        Ok(false)
    }

    /// Release any resources held for drawing
    fn finish(&mut self) -> Result<(), SimError> {
        Ok(())
    }
}

/// Headless renderer: draws nothing and never stops
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn present(&mut self, _frame: &RenderFrame<'_>) -> Result<bool, SimError> {
        Ok(false)
    }
}
