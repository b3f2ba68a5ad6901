pub mod game_metrics;
pub mod training_stats;

pub use game_metrics::RunMetrics;
pub use training_stats::{EpisodeStats, StatsLog};
