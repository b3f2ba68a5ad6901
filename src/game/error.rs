use thiserror::Error;

/// Errors raised by the simulation core
#[derive(Debug, Error)]
pub enum SimError {
    /// The configuration cannot produce a playable episode
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Food had to be placed but every cell is taken
    #[error("no empty cell left to spawn food ({width}x{height} grid)")]
    NoEmptyCell { width: usize, height: usize },

    /// The renderer failed to draw or read input
    #[error("renderer failed: {0}")]
    Render(#[from] std::io::Error),
}
