//! Saving and loading the baseline agent
//!
//! An agent is saved as two files:
//! - `<path>`: the [`AgentSnapshot`] as pretty JSON
//! - `<path>.stats.jsonl`: one [`EpisodeStats`] JSON object per line

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::agent::{AgentConfig, HeuristicAgent};
use crate::metrics::EpisodeStats;

/// Parameters saved with the agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub config: AgentConfig,
    pub epsilon: f32,
    pub training_rounds: usize,
    pub samples_seen: usize,
    /// Version identifier for compatibility checking
    pub version: String,
}

impl AgentSnapshot {
    pub fn new(config: AgentConfig, epsilon: f32, training_rounds: usize, samples_seen: usize) -> Self {
        Self {
            config,
            epsilon,
            training_rounds,
            samples_seen,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Path of the statistics log written next to a saved agent
pub fn stats_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".stats.jsonl");
    PathBuf::from(name)
}

/// Save the agent's parameters and its statistics log.
///
/// Creates parent directories if they don't exist.
pub fn save_agent(agent: &HeuristicAgent, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }

    let json = serde_json::to_string_pretty(&agent.snapshot())
        .context("Failed to serialize agent snapshot")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write agent to {:?}", path))?;

    let log_path = stats_path(path);
    let mut file = std::fs::File::create(&log_path)
        .with_context(|| format!("Failed to create stats log {:?}", log_path))?;
    for entry in agent.stats().entries() {
        let line = serde_json::to_string(entry).context("Failed to serialize stats entry")?;
        writeln!(file, "{}", line)
            .with_context(|| format!("Failed to write stats log {:?}", log_path))?;
    }

    tracing::info!(
        path = %path.display(),
        entries = agent.stats().len(),
        "agent saved"
    );

    Ok(())
}

/// Load a saved agent snapshot
pub fn load_agent(path: &Path) -> Result<AgentSnapshot> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read agent from {:?}", path))?;
    let snapshot: AgentSnapshot =
        serde_json::from_str(&json).context("Failed to deserialize agent snapshot")?;

    if snapshot.version != env!("CARGO_PKG_VERSION") {
        tracing::warn!(
            saved = %snapshot.version,
            current = env!("CARGO_PKG_VERSION"),
            "agent was saved by a different version"
        );
    }

    Ok(snapshot)
}

/// Read a statistics log written by [`save_agent`]
pub fn load_stats(path: &Path) -> Result<Vec<EpisodeStats>> {
    let log_path = stats_path(path);
    let text = std::fs::read_to_string(&log_path)
        .with_context(|| format!("Failed to read stats log {:?}", log_path))?;

    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).context("Failed to parse stats entry"))
        .collect()
}
