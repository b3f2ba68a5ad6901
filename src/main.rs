use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use snake_arena::game::{GameConfig, Simulation};
use snake_arena::logging::{self, LogDestination};
use snake_arena::modes::{StopReason, TrainConfig, TrainMode};
use snake_arena::render::{FixedDelay, NullRenderer, TuiRenderer};
use snake_arena::rl::{load_agent, AgentConfig, HeuristicAgent};
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "snake_arena")]
#[command(version, about = "Multi-snake arena training environment")]
struct Cli {
    /// JSON file with a game configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of snakes
    #[arg(long)]
    players: Option<usize>,

    /// Width and height of the square grid
    #[arg(long)]
    grid_size: Option<usize>,

    /// Food items kept on the grid
    #[arg(long)]
    food: Option<usize>,

    /// Render and explore every Nth episode
    #[arg(long)]
    eval_interval: Option<usize>,

    /// Batch size handed to the policy after every episode
    #[arg(long)]
    batch_size: Option<usize>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Never open the terminal renderer
    #[arg(long)]
    headless: bool,

    /// Delay after each rendered tick, in milliseconds
    #[arg(long, default_value = "100")]
    tick_delay_ms: u64,

    /// Where the agent is saved on exit
    #[arg(long, default_value = "data/agent.json")]
    save_path: PathBuf,

    /// Resume from a previously saved agent
    #[arg(long)]
    load: Option<PathBuf>,

    /// Stop after this many episodes
    #[arg(long)]
    max_episodes: Option<usize>,

    /// Save a checkpoint every N episodes (0 disables)
    #[arg(long, default_value = "1000")]
    checkpoint_frequency: usize,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(players) = self.players {
            config.player_count = players;
        }
        if let Some(size) = self.grid_size {
            config.grid_width = size;
            config.grid_height = size;
        }
        if let Some(food) = self.food {
            config.food_amount = food;
        }
        if let Some(interval) = self.eval_interval {
            config.evaluation_interval = interval;
        }
        if let Some(batch_size) = self.batch_size {
            config.train_batch_size = batch_size;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }

    fn agent(&self) -> Result<HeuristicAgent> {
        match &self.load {
            Some(path) => {
                let snapshot = load_agent(path)?;
                tracing::info!(
                    path = %path.display(),
                    training_rounds = snapshot.training_rounds,
                    epsilon = snapshot.epsilon,
                    "resuming agent"
                );
                Ok(HeuristicAgent::from_snapshot(snapshot, self.seed))
            }
            None => Ok(HeuristicAgent::new(AgentConfig::default(), self.seed)),
        }
    }

    fn train_config(&self) -> TrainConfig {
        TrainConfig {
            save_path: self.save_path.clone(),
            max_episodes: self.max_episodes,
            checkpoint_frequency: self.checkpoint_frequency,
        }
    }
}

fn run(cli: Cli, stop: Arc<AtomicBool>) -> Result<StopReason> {
    let config = cli.game_config()?;
    let agent = cli.agent()?;

    if cli.headless {
        let sim = Simulation::new(config, agent, NullRenderer)?;
        TrainMode::new(sim, cli.train_config()).run(&stop)
    } else {
        let renderer = TuiRenderer::new(FixedDelay::from_millis(cli.tick_delay_ms))
            .context("Failed to set up terminal")?;
        let sim = Simulation::new(config, agent, renderer)?;
        TrainMode::new(sim, cli.train_config()).run(&stop)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let destination = LogDestination::for_run(cli.headless, &cli.save_path);
    logging::subscriber(&destination, logging::default_filter())?
        .try_init()
        .context("Failed to install log subscriber")?;
    if let LogDestination::File(path) = &destination {
        eprintln!("Logging to {}", path.display());
    }

    let stop = Arc::new(AtomicBool::new(false));
    let signal_stop = Arc::clone(&stop);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping after the current tick");
            signal_stop.store(true, Ordering::Relaxed);
        }
    });

    // Ticks are synchronous; keep them off the async workers
    let reason = tokio::task::spawn_blocking(move || run(cli, stop))
        .await
        .context("Simulation task panicked")??;

    tracing::info!(reason = ?reason, "done");
    Ok(())
}
