//! Episode statistics handed to the policy on the evaluation cadence
//!
//! [`StatsLog`] keeps every recorded entry (so the full log can be persisted)
//! and a rolling window for smoothed statistics.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Summary of one finished episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeStats {
    /// 1-based episode index
    pub episode: usize,
    /// Tick of the first death, 0 if nobody died before the end
    pub first_death_tick: u32,
    /// Ticks simulated before every snake was dead
    pub total_ticks: u32,
    /// Highest reward any snake reached
    pub max_reward: u32,
}

/// Statistics log with rolling averages
///
/// # Example
///
/// ```rust
/// use snake_arena::metrics::{EpisodeStats, StatsLog};
///
/// let mut log = StatsLog::new(100);
/// log.record(EpisodeStats {
///     episode: 200,
///     first_death_tick: 14,
///     total_ticks: 63,
///     max_reward: 5,
/// });
///
/// assert_eq!(log.best_reward(), 5);
/// println!("{}", log.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct StatsLog {
    /// Every entry ever recorded
    entries: Vec<EpisodeStats>,

    /// Most recent entries (rolling window)
    window: VecDeque<EpisodeStats>,

    /// Window size for rolling averages
    window_size: usize,
}

impl StatsLog {
    /// Create a new log keeping `window_size` entries for rolling averages
    pub fn new(window_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            window: VecDeque::with_capacity(window_size),
            window_size,
        }
    }

    pub fn record(&mut self, stats: EpisodeStats) {
        if self.window.len() >= self.window_size {
            self.window.pop_front();
        }
        self.window.push_back(stats.clone());
        self.entries.push(stats);
    }

    /// All recorded entries, oldest first
    pub fn entries(&self) -> &[EpisodeStats] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mean max reward over the rolling window, 0.0 when empty
    pub fn mean_max_reward(&self) -> f32 {
        self.mean(|stats| stats.max_reward as f32)
    }

    /// Mean episode length over the rolling window
    pub fn mean_total_ticks(&self) -> f32 {
        self.mean(|stats| stats.total_ticks as f32)
    }

    /// Mean first-death tick over the rolling window
    pub fn mean_first_death_tick(&self) -> f32 {
        self.mean(|stats| stats.first_death_tick as f32)
    }

    /// Best max reward across every entry
    pub fn best_reward(&self) -> u32 {
        self.entries
            .iter()
            .map(|stats| stats.max_reward)
            .max()
            .unwrap_or(0)
    }

    /// Format a summary of the current statistics
    pub fn format_summary(&self) -> String {
        format!(
            "Entries: {} | Last {}: Reward: {:.2} | Best: {} | Ticks: {:.1} | First death: {:.1}",
            self.entries.len(),
            self.window.len(),
            self.mean_max_reward(),
            self.best_reward(),
            self.mean_total_ticks(),
            self.mean_first_death_tick(),
        )
    }

    fn mean<F: Fn(&EpisodeStats) -> f32>(&self, value: F) -> f32 {
        if self.window.is_empty() {
            0.0
        } else {
            self.window.iter().map(value).sum::<f32>() / self.window.len() as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(episode: usize, total_ticks: u32, max_reward: u32) -> EpisodeStats {
        EpisodeStats {
            episode,
            first_death_tick: total_ticks / 2,
            total_ticks,
            max_reward,
        }
    }

    #[test]
    fn test_new() {
        let log = StatsLog::new(100);
        assert!(log.is_empty());
        assert_eq!(log.window_size, 100);
    }

    #[test]
    fn test_empty_stats() {
        let log = StatsLog::new(100);
        assert_eq!(log.mean_max_reward(), 0.0);
        assert_eq!(log.mean_total_ticks(), 0.0);
        assert_eq!(log.best_reward(), 0);
    }

    #[test]
    fn test_record() {
        let mut log = StatsLog::new(100);
        log.record(entry(200, 50, 3));

        assert_eq!(log.len(), 1);
        assert!((log.mean_max_reward() - 3.0).abs() < 1e-5);
        assert!((log.mean_total_ticks() - 50.0).abs() < 1e-5);
        assert!((log.mean_first_death_tick() - 25.0).abs() < 1e-5);
    }

    #[test]
    fn test_rolling_average() {
        let mut log = StatsLog::new(3);

        log.record(entry(1, 10, 1));
        log.record(entry(2, 20, 2));
        log.record(entry(3, 30, 3));
        assert!((log.mean_max_reward() - 2.0).abs() < 1e-5);

        // a 4th entry evicts the first from the window, not from the log
        log.record(entry(4, 40, 4));
        assert!((log.mean_max_reward() - 3.0).abs() < 1e-5);
        assert_eq!(log.len(), 4);
        assert_eq!(log.entries()[0].episode, 1);
    }

    #[test]
    fn test_best_reward_spans_whole_log() {
        let mut log = StatsLog::new(1);
        log.record(entry(1, 10, 9));
        log.record(entry(2, 10, 2));

        assert_eq!(log.best_reward(), 9);
        assert!((log.mean_max_reward() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_format_summary() {
        let mut log = StatsLog::new(100);
        log.record(entry(200, 150, 5));

        let summary = log.format_summary();
        assert!(summary.contains("Entries: 1"));
        assert!(summary.contains("Last 1:"));
        assert!(summary.contains("Reward: 5.00"));
        assert!(summary.contains("Best: 5"));
        assert!(summary.contains("Ticks: 150.0"));
    }
}
