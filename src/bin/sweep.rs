//! Sweep Driver
//!
//! Solves dreidel or Left-Center-Right for a range of player counts and
//! stakes, printing expected game length and each player's win probability.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, Level};

use markov_game_solver::games::dreidel::{Elimination, HalfRounding};
use markov_game_solver::markov::{LevelStats, SolverConfig};
use markov_game_solver::report::{dreidel_report, dreidel_work_estimate, lcr_report, GameReport, SweepReport};

#[derive(Parser, Debug)]
#[command(author, version, about = "Exact expected lengths and win probabilities of dreidel and LCR")]
struct Args {
    /// Solver settings as JSON (missing fields take defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Relative residual tolerance, overriding the config file
    #[arg(long, global = true)]
    tolerance: Option<f64>,

    /// Also write the results as JSON
    #[arg(long, global = true)]
    json: Option<PathBuf>,

    /// Log solver progress at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dreidel over a grid of player counts and starting coins.
    Dreidel {
        #[arg(long, default_value_t = 2)]
        min_players: usize,
        #[arg(long, default_value_t = 7)]
        max_players: usize,
        #[arg(long, default_value_t = 1)]
        min_coins: u32,
        #[arg(long, default_value_t = 15)]
        max_coins: u32,
        /// Who gets the odd coin on Hei
        #[arg(long, value_enum, default_value_t = Half::Up)]
        half: Half,
        /// When a player is out
        #[arg(long, value_enum, default_value_t = Rule::CannotPay)]
        elimination: Rule,
        /// Skip setups whose estimated work exceeds this
        #[arg(long, default_value_t = 1e8)]
        budget: f64,
    },
    /// Left-Center-Right over a range of player counts.
    Lcr {
        #[arg(long, default_value_t = 2)]
        min_players: usize,
        #[arg(long, default_value_t = 7)]
        max_players: usize,
        /// Starting coins per player
        #[arg(long, default_value_t = 3)]
        coins: u32,
        #[arg(long, default_value_t = 3)]
        max_dice: u32,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Half {
    Up,
    Down,
}

impl From<Half> for HalfRounding {
    fn from(half: Half) -> Self {
        match half {
            Half::Up => HalfRounding::Up,
            Half::Down => HalfRounding::Down,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Rule {
    CannotPay,
    Broke,
}

impl From<Rule> for Elimination {
    fn from(rule: Rule) -> Self {
        match rule {
            Rule::CannotPay => Elimination::CannotPay,
            Rule::Broke => Elimination::Broke,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let mut solver = match &args.config {
        Some(path) => SolverConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SolverConfig::default(),
    };
    if let Some(tolerance) = args.tolerance {
        solver = solver.with_tolerance(tolerance);
    }
    solver.validate()?;

    let sweep = match args.command {
        Command::Dreidel {
            min_players,
            max_players,
            min_coins,
            max_coins,
            half,
            elimination,
            budget,
        } => {
            check_range("players", min_players as u64, max_players as u64)?;
            check_range("coins", u64::from(min_coins), u64::from(max_coins))?;
            let mut sweep = SweepReport::new("dreidel", solver.clone());
            for players in min_players..=max_players {
                for coins in min_coins..=max_coins {
                    let work = dreidel_work_estimate(players, coins);
                    if work.map_or(true, |w| w as f64 > budget) {
                        info!(players, coins, ?work, "skipping setup over budget");
                        sweep.skip(players, coins, "estimated work over budget");
                        continue;
                    }
                    let report = with_progress(
                        format!("dreidel {} players x {} coins", players, coins),
                        2 * players as u64,
                        |tick| {
                            dreidel_report(
                                players,
                                coins,
                                half.into(),
                                elimination.into(),
                                &solver,
                                tick,
                            )
                        },
                    )?;
                    sweep.push(report);
                }
            }
            sweep
        }
        Command::Lcr {
            min_players,
            max_players,
            coins,
            max_dice,
        } => {
            check_range("players", min_players as u64, max_players as u64)?;
            let mut sweep = SweepReport::new("left-center-right", solver.clone());
            for players in min_players..=max_players {
                let levels = players as u64 * u64::from(coins);
                let report = with_progress(
                    format!("lcr {} players x {} coins", players, coins),
                    2 * levels,
                    |tick| lcr_report(players, coins, max_dice, &solver, tick),
                )?;
                sweep.push(report);
            }
            sweep
        }
    };

    print!("{}", sweep);

    if let Some(path) = &args.json {
        sweep
            .save_json(path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "saved results");
    }

    Ok(())
}

fn check_range(what: &str, min: u64, max: u64) -> Result<()> {
    if min > max {
        bail!("empty {} range: {} > {}", what, min, max);
    }
    Ok(())
}

/// Run one setup with a progress bar that ticks once per solved level.
fn with_progress<S, E>(label: String, levels: u64, solve: S) -> Result<GameReport>
where
    S: FnOnce(&mut dyn FnMut(&LevelStats)) -> std::result::Result<GameReport, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    let bar = ProgressBar::new(levels);
    bar.set_style(
        ProgressStyle::with_template("{msg:32} [{bar:30}] {pos}/{len} levels ({elapsed})")?
            .progress_chars("=> "),
    );
    bar.set_message(label.clone());

    let mut tick = |stats: &LevelStats| {
        bar.set_message(format!("{} (level {}, {} states)", label, stats.level, stats.states));
        bar.inc(1);
    };
    let result = solve(&mut tick);
    bar.finish_and_clear();

    let report = result.with_context(|| format!("solving {}", label))?;
    info!(
        game = %report.game,
        players = report.players,
        coins = report.coins_per_player,
        states = report.states,
        seconds = report.elapsed_seconds,
        "solved setup"
    );
    Ok(report)
}
