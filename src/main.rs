#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context};
use tracing::info;

use mazechase::app::{App, Autopilot};
use mazechase::config::GameConfig;
use mazechase::game::Game;
use mazechase::logging;
use mazechase::render::TextRenderer;
use mazechase::score_store::JsonFileStore;

/// Demo settings read from the command line.
#[derive(Debug, Default)]
struct Args {
    seed: Option<u64>,
    ticks: Option<u64>,
    high_score_file: Option<PathBuf>,
    /// Run as fast as possible instead of at 60 ticks per second.
    fast: bool,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
        let mut parsed = Args::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = args.next().context("--seed needs a value")?;
                    parsed.seed = Some(value.parse().with_context(|| format!("invalid seed: {value}"))?);
                }
                "--ticks" => {
                    let value = args.next().context("--ticks needs a value")?;
                    parsed.ticks = Some(value.parse().with_context(|| format!("invalid tick count: {value}"))?);
                }
                "--high-score-file" => {
                    parsed.high_score_file = Some(args.next().context("--high-score-file needs a path")?.into());
                }
                "--fast" => parsed.fast = true,
                other => bail!("unknown argument: {other}"),
            }
        }
        Ok(parsed)
    }
}

/// Runs a self-playing session in the terminal.
pub fn main() -> anyhow::Result<()> {
    logging::setup_logging()?;
    let args = Args::parse(env::args().skip(1))?;

    let mut config = GameConfig::default();
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut game = Game::new(config).context("failed to build the game")?;
    if let Some(path) = &args.high_score_file {
        game.set_high_score_store(JsonFileStore::new(path));
    }
    info!(seed = ?args.seed, high_score = game.high_score(), "Starting demo session");

    let mut app = App::new(game, Autopilot::default(), TextRenderer::new(std::io::stdout()), 30, !args.fast)?;
    let ticks = app.run_for(args.ticks)?;

    info!(ticks, score = app.game.score(), high_score = app.game.high_score(), "Demo finished");
    Ok(())
}
