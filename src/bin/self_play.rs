use std::path::PathBuf;
use anyhow::{Context, Result};
use chess_zero::config::Config;
use chess_zero::dataset::write_examples;
use chess_zero::engine::evaluators::{ConvNetEvaluator, MaterialEvaluator, UniformEvaluator};
use chess_zero::engine::{Evaluator, SelfPlay};
use chess_zero::state::State;
use clap::{Parser, ValueEnum};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play self-play games and write the training examples", long_about = None)]
struct Args {
    /// TOML file with search, self-play and network settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the bincode dataset
    #[arg(short, long, default_value = "self_play.bin")]
    output: PathBuf,

    /// Overrides `self_play.num_games`
    #[arg(short, long)]
    games: Option<usize>,

    /// Starting position; the standard initial position if omitted
    #[arg(long)]
    fen: Option<String>,

    /// Position evaluator guiding the search
    #[arg(short, long, value_enum, default_value_t = EvaluatorKind::Network)]
    evaluator: EvaluatorKind,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EvaluatorKind {
    Network,
    Material,
    Uniform,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    let start = match &args.fen {
        Some(fen) => State::from_fen(fen)?,
        None => State::initial(),
    };
    let num_games = args.games.unwrap_or(config.self_play.num_games);

    let rng = match config.self_play.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let network;
    let material = MaterialEvaluator::default();
    let evaluator: &dyn Evaluator = match args.evaluator {
        EvaluatorKind::Uniform => &UniformEvaluator,
        EvaluatorKind::Material => &material,
        EvaluatorKind::Network => {
            network = ConvNetEvaluator::from_config(&config.network).context("building the network evaluator")?;
            info!(
                "network: {} residual blocks, {} filters",
                config.network.num_residual_blocks, config.network.num_filters
            );
            &network
        }
    };

    let mut self_play = SelfPlay::new(evaluator, config.search.clone(), config.self_play.clone(), rng);
    let examples = self_play.play_games(num_games, &start)?;
    write_examples(&args.output, &examples)?;
    info!("{} games, {} examples written to {}", num_games, examples.len(), args.output.display());
    Ok(())
}
