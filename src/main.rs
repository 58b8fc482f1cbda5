use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use snake_qlearn::artifacts::{self, EVAL_FILE, QTABLE_FILE};
use snake_qlearn::game::GameConfig;
use snake_qlearn::modes::{
    evaluate, run_demo, train_into_run_dir, DemoConfig, EvalConfig, TrainConfig,
};
use snake_qlearn::render::RenderOptions;
use snake_qlearn::rl::{load_q_table, QLearningConfig, AGENT_SEED_SALT};

#[derive(Parser)]
#[command(name = "snake_qlearn")]
#[command(version, about = "Snake learned by tabular Q-learning")]
struct Cli {
    /// What to run
    #[arg(long, value_enum, default_value = "demo")]
    mode: Mode,

    /// Grid side length
    #[arg(long, default_value_t = 12)]
    grid: usize,

    /// Episodes to train or evaluate [default: 2500 train, 100 eval]
    #[arg(long)]
    episodes: Option<usize>,

    /// Environment seed [default: 0 train and demo, 123 eval]
    #[arg(long)]
    seed: Option<u64>,

    /// Learning rate
    #[arg(long)]
    alpha: Option<f32>,

    /// Discount factor
    #[arg(long)]
    gamma: Option<f32>,

    /// Initial exploration rate
    #[arg(long)]
    eps_start: Option<f32>,

    /// Final exploration rate
    #[arg(long)]
    eps_end: Option<f32>,

    /// Step cap per episode [default: 600 train, 500 eval]
    #[arg(long)]
    max_steps: Option<usize>,

    /// Draw the grid in the terminal [default: on for demo]
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    render: Option<bool>,

    /// Frame-rate cap while rendering
    #[arg(long, default_value_t = 20)]
    fps: u32,

    /// Draw every Nth step
    #[arg(long, default_value_t = 2)]
    frame_skip: u32,

    /// Directory holding run directories
    #[arg(long, default_value = "artifacts/runs")]
    runs_root: PathBuf,

    /// Suffix for the run directory name
    #[arg(long)]
    tag: Option<String>,

    /// Q-table file or run directory to evaluate [default: latest run]
    #[arg(long)]
    checkpoint: Option<PathBuf>,

    /// Where to write eval results [default: <run>/eval.json]
    #[arg(long)]
    out: Option<PathBuf>,

    /// TOML file with Q-learning hyperparameters; flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// One random-play episode on screen
    Demo,
    /// Train a Q-table into a new run directory
    Train,
    /// Greedy evaluation of a trained Q-table
    Eval,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let game_config = GameConfig::square(cli.grid);

    match cli.mode {
        Mode::Demo => demo(&cli, game_config),
        Mode::Train => train(&cli, game_config),
        Mode::Eval => eval(&cli, game_config),
    }
}

fn render_options(cli: &Cli, default_enabled: bool, title: &str) -> RenderOptions {
    RenderOptions {
        enabled: cli.render.unwrap_or(default_enabled),
        fps: cli.fps,
        frame_skip: cli.frame_skip,
        title: title.to_string(),
    }
}

fn demo(cli: &Cli, game_config: GameConfig) -> Result<()> {
    let mut config = DemoConfig::new(game_config, cli.seed.unwrap_or(0));
    config.render = render_options(cli, true, "Snake Demo");

    let outcome = run_demo(&config)?;
    println!(
        "[demo] steps={} score={} alive={}",
        outcome.steps, outcome.score, outcome.alive
    );
    Ok(())
}

fn train(cli: &Cli, game_config: GameConfig) -> Result<()> {
    let mut rl_config = match &cli.config {
        Some(path) => QLearningConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => QLearningConfig::default(),
    };
    if let Some(episodes) = cli.episodes {
        rl_config.episodes = episodes;
    }
    if let Some(seed) = cli.seed {
        rl_config.seed = seed;
    }
    if let Some(alpha) = cli.alpha {
        rl_config.alpha = alpha;
    }
    if let Some(gamma) = cli.gamma {
        rl_config.gamma = gamma;
    }
    if let Some(eps_start) = cli.eps_start {
        rl_config.eps_start = eps_start;
    }
    if let Some(eps_end) = cli.eps_end {
        rl_config.eps_end = eps_end;
    }
    if let Some(max_steps) = cli.max_steps {
        rl_config.max_steps = max_steps;
    }

    let mut train_config = TrainConfig::new(game_config, rl_config);
    train_config.render = render_options(cli, false, "Snake Q-learning");

    let saved = train_into_run_dir(train_config, &cli.runs_root, cli.tag.as_deref())?;

    println!("[run-dir]    {}", saved.run_dir.display());
    println!("[checkpoint] {}", saved.checkpoint.display());
    Ok(())
}

fn eval(cli: &Cli, game_config: GameConfig) -> Result<()> {
    let checkpoint = resolve_checkpoint(cli.checkpoint.as_deref(), &cli.runs_root)?;
    info!("evaluating {}", checkpoint.display());

    let seed = cli.seed.unwrap_or(123);
    let agent = load_q_table(&checkpoint, seed ^ AGENT_SEED_SALT)
        .with_context(|| format!("failed to load Q-table from {}", checkpoint.display()))?;

    let defaults = EvalConfig::default();
    let config = EvalConfig {
        game_config,
        episodes: cli.episodes.unwrap_or(defaults.episodes),
        seed,
        max_steps: cli.max_steps.unwrap_or(defaults.max_steps),
        render: render_options(cli, false, "Snake Eval"),
    };
    let summary = evaluate(&agent, &config)?;

    let out = match &cli.out {
        Some(out) => out.clone(),
        None => checkpoint
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(EVAL_FILE),
    };
    artifacts::save_json(&out, &summary)?;

    println!(
        "[eval] {} -> mean={:.2}, max={}",
        out.display(),
        summary.mean_score,
        summary.max_score
    );
    Ok(())
}

/// Q-table file from `--checkpoint`, or the one in the latest run
fn resolve_checkpoint(checkpoint: Option<&Path>, runs_root: &Path) -> Result<PathBuf> {
    let path = match checkpoint {
        Some(path) => path.to_path_buf(),
        None => artifacts::latest_run_dir(runs_root).context("train first")?,
    };
    if path.is_dir() {
        Ok(path.join(QTABLE_FILE))
    } else {
        Ok(path)
    }
}
