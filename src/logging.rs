//! Log routing
//!
//! Headless runs log to stderr. While the terminal renderer owns the screen,
//! log lines go to a file next to the saved agent instead, so they never land
//! on the raw-mode alternate screen.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Where log lines are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    Stderr,
    File(PathBuf),
}

impl LogDestination {
    /// `data/agent.json` → `data/agent.log` when the terminal view is active
    pub fn for_run(headless: bool, save_path: &Path) -> Self {
        if headless {
            LogDestination::Stderr
        } else {
            LogDestination::File(save_path.with_extension("log"))
        }
    }
}

/// `RUST_LOG` when set, `info` otherwise
pub fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Build a fmt subscriber writing to `destination`.
///
/// Log files are appended to; colors are only used on stderr.
pub fn subscriber(
    destination: &LogDestination,
    filter: EnvFilter,
) -> Result<impl tracing::Subscriber + Send + Sync + 'static> {
    let (writer, ansi) = match destination {
        LogDestination::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogDestination::File(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create directory: {:?}", parent))?;
                }
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
    };

    Ok(tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    use crate::game::{GameConfig, Simulation};
    use crate::modes::{TrainConfig, TrainMode};
    use crate::render::NullRenderer;
    use crate::rl::{AgentConfig, HeuristicAgent};
    use tempfile::TempDir;

    #[test]
    fn test_destination_follows_renderer() {
        let save_path = Path::new("data/agent.json");
        assert_eq!(LogDestination::for_run(true, save_path), LogDestination::Stderr);
        assert_eq!(
            LogDestination::for_run(false, save_path),
            LogDestination::File(PathBuf::from("data/agent.log"))
        );
    }

    #[test]
    fn test_terminal_run_logs_to_file() {
        let dir = TempDir::new().unwrap();
        let save_path = dir.path().join("runs").join("agent.json");
        let destination = LogDestination::for_run(false, &save_path);
        let subscriber = subscriber(&destination, EnvFilter::new("info")).unwrap();

        let config = GameConfig {
            evaluation_interval: 1,
            seed: Some(9),
            ..GameConfig::new(2, 10)
        };
        let agent = HeuristicAgent::new(
            AgentConfig {
                epsilon_start: 1.0,
                epsilon_min: 1.0,
                ..Default::default()
            },
            Some(9),
        );
        tracing::subscriber::with_default(subscriber, || {
            let sim = Simulation::new(config, agent, NullRenderer).unwrap();
            let mut mode = TrainMode::new(
                sim,
                TrainConfig {
                    max_episodes: Some(2),
                    ..TrainConfig::new(save_path.clone())
                },
            );
            mode.run(&AtomicBool::new(false)).unwrap();
        });

        let log = std::fs::read_to_string(dir.path().join("runs").join("agent.log")).unwrap();
        assert!(log.contains("training started"));
        assert!(log.contains("evaluation episode finished"));
        assert!(log.contains("agent saved"));
        assert!(!log.contains("\u{1b}["));
    }
}
