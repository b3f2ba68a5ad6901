use std::time::{Duration, Instant};

use super::training_stats::EpisodeStats;

/// Process-wide counters kept by the episode controller
pub struct RunMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    /// Episodes finished so far
    pub episodes: usize,
    /// Best max reward of any finished episode
    pub best_reward: u32,
    /// Ticks simulated across finished episodes
    pub total_ticks: u64,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            episodes: 0,
            best_reward: 0,
            total_ticks: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_episode_end(&mut self, stats: &EpisodeStats) {
        self.episodes += 1;
        self.total_ticks += u64::from(stats.total_ticks);
        if stats.max_reward > self.best_reward {
            self.best_reward = stats.max_reward;
        }
        self.update();
    }

    /// Simulated ticks per wall-clock second
    pub fn ticks_per_second(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs > 0.0 {
            self.total_ticks as f64 / secs
        } else {
            0.0
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new()
    }
}
