//! Solved results for canonical start states, and their export.
//!
//! A report pairs the two quantities for one table setup: expected game
//! length, and every player's win probability. Sweeps collect reports over a
//! range of player counts and stakes and render them as text or JSON.

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combinatorics::checked_binomial;
use crate::games::dreidel::{Dreidel, DreidelConfig, DreidelState, Elimination, HalfRounding};
use crate::games::lcr::{LcrConfig, LeftCenterRight};
use crate::games::seats::MAX_SEATS;
use crate::markov::{
    ConfigError, LayeredSolver, LevelStats, LeveledGame, Quantity, RotationalSymmetry, SolveError,
    SolverConfig,
};

const LCR_NAME: &str = "left-center-right";

/// Results for one table setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameReport {
    /// Game name
    pub game: String,
    /// Number of players at the start
    pub players: usize,
    /// Coins each player starts with
    pub coins_per_player: u32,
    /// Expected number of turns from the start state
    pub expected_turns: f64,
    /// Win probability of each player, in seating order
    pub win_probabilities: Vec<f64>,
    /// States enumerated per quantity
    pub states: usize,
    /// Wall time of both solves
    pub elapsed_seconds: f64,
}

/// Both quantities at `start`, with player 0 to move.
fn solve_start<G, F>(
    ev_game: G,
    wp_game: G,
    start: &G::State,
    config: &SolverConfig,
    mut on_level: F,
) -> Result<(f64, Vec<f64>, usize, f64), SolveError>
where
    G: RotationalSymmetry,
    F: FnMut(&LevelStats),
{
    let level = ev_game.level_of(start);

    let mut ev = LayeredSolver::new(ev_game, config.clone())?;
    ev.solve_with_callback(level, &mut on_level)?;
    let expected_turns = ev.value(start, 0);

    let mut wp = LayeredSolver::new(wp_game, config.clone())?;
    wp.solve_with_callback(level, &mut on_level)?;
    let win_probabilities = wp.player_values(start, 0);

    let elapsed = ev.stats().elapsed_seconds + wp.stats().elapsed_seconds;
    Ok((expected_turns, win_probabilities, ev.stats().total_states(), elapsed))
}

/// Solve dreidel for `players` players starting with `coins_each` coins.
///
/// The start state is the table right after the opening ante. `on_level`
/// sees every level solved, for both quantities.
pub fn dreidel_report<F>(
    players: usize,
    coins_each: u32,
    half_rounding: HalfRounding,
    elimination: Elimination,
    config: &SolverConfig,
    on_level: F,
) -> Result<GameReport, SolveError>
where
    F: FnMut(&LevelStats),
{
    if !(2..MAX_SEATS).contains(&players) {
        return Err(ConfigError::InvalidPlayers {
            players,
            min: 2,
            max: MAX_SEATS - 1,
        }
        .into());
    }
    let need = elimination.min_coins() + 1;
    if coins_each < need {
        return Err(ConfigError::StakeTooSmall { coins: coins_each, min: need }.into());
    }

    let num_coins = coins_each * players as u32;
    let rules = |quantity| -> Result<Dreidel, ConfigError> {
        Dreidel::new(
            DreidelConfig::new(num_coins, quantity)
                .with_half_rounding(half_rounding)
                .with_elimination(elimination),
        )
    };
    let start = DreidelState::opening(players, coins_each);
    let (expected_turns, win_probabilities, states, elapsed_seconds) = solve_start(
        rules(Quantity::ExpectedTurns)?,
        rules(Quantity::WinProbability)?,
        &start,
        config,
        on_level,
    )?;

    Ok(GameReport {
        game: "dreidel".to_string(),
        players,
        coins_per_player: coins_each,
        expected_turns,
        win_probabilities,
        states,
        elapsed_seconds,
    })
}

/// Solve Left-Center-Right for `players` players starting with `coins` each.
pub fn lcr_report<F>(
    players: usize,
    coins: u32,
    max_dice: u32,
    config: &SolverConfig,
    on_level: F,
) -> Result<GameReport, SolveError>
where
    F: FnMut(&LevelStats),
{
    if coins == 0 {
        return Err(ConfigError::NoCoins.into());
    }
    let rules = |quantity| LeftCenterRight::new(LcrConfig::new(players, quantity).with_max_dice(max_dice));
    let ev_game = rules(Quantity::ExpectedTurns)?;
    let wp_game = rules(Quantity::WinProbability)?;
    let start = ev_game.opening(coins);

    let (expected_turns, win_probabilities, states, elapsed_seconds) =
        solve_start(ev_game, wp_game, &start, config, on_level)?;

    Ok(GameReport {
        game: LCR_NAME.to_string(),
        players,
        coins_per_player: coins,
        expected_turns,
        win_probabilities,
        states,
        elapsed_seconds,
    })
}

/// Rough cost of solving dreidel with `players` players and `coins_each`
/// coins: sum over levels `n` of `n * C(total - 1 + n, n) * (n + 3)`.
///
/// `None` if the estimate overflows a `u64`.
pub fn dreidel_work_estimate(players: usize, coins_each: u32) -> Option<u64> {
    let total = u64::from(coins_each) * players as u64;
    let mut work: u64 = 0;
    for n in 2..=players as u64 {
        let states = checked_binomial((total + n).checked_sub(1)?, n)?;
        let level = n.checked_mul(states)?.checked_mul(n + 3)?;
        work = work.checked_add(level)?;
    }
    Some(work)
}

/// A configuration a sweep left out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedSetup {
    /// Number of players
    pub players: usize,
    /// Coins per player
    pub coins_per_player: u32,
    /// Why it was skipped
    pub reason: String,
}

/// Reports over a range of setups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    /// Game name
    pub game: String,
    /// Solver settings used for every setup
    pub solver: SolverConfig,
    /// Solved setups in sweep order
    pub reports: Vec<GameReport>,
    /// Setups that were not solved
    pub skipped: Vec<SkippedSetup>,
}

impl SweepReport {
    /// Create an empty sweep.
    pub fn new(game: &str, solver: SolverConfig) -> Self {
        Self {
            game: game.to_string(),
            solver,
            reports: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Add a solved setup.
    pub fn push(&mut self, report: GameReport) {
        self.reports.push(report);
    }

    /// Record a setup that was not solved.
    pub fn skip(&mut self, players: usize, coins_per_player: u32, reason: impl Into<String>) {
        self.skipped.push(SkippedSetup {
            players,
            coins_per_player,
            reason: reason.into(),
        });
    }

    /// Report for a setup, if it was solved.
    pub fn get(&self, players: usize, coins_per_player: u32) -> Option<&GameReport> {
        self.reports
            .iter()
            .find(|r| r.players == players && r.coins_per_player == coins_per_player)
    }

    /// Save to JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())
    }
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // LCR sweeps run one stake, so each player count is a single block.
        let by_stake = self.game != LCR_NAME;
        let indent = if by_stake { "        " } else { "    " };
        let mut players = None;
        for report in &self.reports {
            if players != Some(report.players) {
                writeln!(f, "{} players:", report.players)?;
                players = Some(report.players);
            }
            if by_stake {
                writeln!(f, "    {} coins per player:", report.coins_per_player)?;
            }
            writeln!(f, "{}{} = {}", indent, Quantity::ExpectedTurns.label(), report.expected_turns)?;
            for (player, p) in report.win_probabilities.iter().enumerate() {
                writeln!(f, "{}P(player {} wins) = {}", indent, player, p)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tight() -> SolverConfig {
        SolverConfig::default().with_tolerance(1e-10)
    }

    #[test]
    fn test_lcr_report_one_coin_each() {
        let mut levels = Vec::new();
        let report = lcr_report(2, 1, 3, &tight(), |s| levels.push(s.level)).unwrap();
        assert_eq!(report.players, 2);
        assert!((report.expected_turns - 2.0).abs() < 1e-8);
        assert!((report.win_probabilities[0] - 1.0 / 3.0).abs() < 1e-8);
        assert!((report.win_probabilities[1] - 2.0 / 3.0).abs() < 1e-8);
        assert_eq!(report.states, 2 + 3);
        // Levels 1 and 2, once per quantity
        assert_eq!(levels, vec![1, 2, 1, 2]);
    }

    #[test]
    fn test_dreidel_report() {
        let report =
            dreidel_report(3, 2, HalfRounding::Up, Elimination::CannotPay, &tight(), |_| {}).unwrap();
        assert_eq!(report.game, "dreidel");
        assert_eq!(report.win_probabilities.len(), 3);
        let total: f64 = report.win_probabilities.iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert!(report.expected_turns > 1.0);
    }

    #[test]
    fn test_dreidel_report_rejects_bad_setups() {
        let err = dreidel_report(3, 1, HalfRounding::Up, Elimination::Broke, &tight(), |_| {})
            .unwrap_err();
        assert!(matches!(
            err,
            SolveError::Config(ConfigError::StakeTooSmall { coins: 1, min: 2 })
        ));

        let err = dreidel_report(1, 5, HalfRounding::Up, Elimination::CannotPay, &tight(), |_| {})
            .unwrap_err();
        assert!(matches!(
            err,
            SolveError::Config(ConfigError::InvalidPlayers { players: 1, .. })
        ));
    }

    #[test]
    fn test_work_estimate() {
        // n = 2 only: 2 * C(3, 2) * 5
        assert_eq!(dreidel_work_estimate(2, 1), Some(30));
        // 6 coins: 2 * C(7, 2) * 5 + 3 * C(8, 3) * 6
        assert_eq!(dreidel_work_estimate(3, 2), Some(2 * 21 * 5 + 3 * 56 * 6));
        assert_eq!(dreidel_work_estimate(15, 1_000_000), None);
    }

    #[test]
    fn test_text_rendering() {
        let mut sweep = SweepReport::new("dreidel", SolverConfig::default());
        for coins in [1, 2] {
            sweep.push(GameReport {
                game: "dreidel".to_string(),
                players: 2,
                coins_per_player: coins,
                expected_turns: 1.5,
                win_probabilities: vec![0.75, 0.25],
                states: 0,
                elapsed_seconds: 0.0,
            });
        }
        let expected = "\
2 players:
    1 coins per player:
        E(# turns) = 1.5
        P(player 0 wins) = 0.75
        P(player 1 wins) = 0.25
    2 coins per player:
        E(# turns) = 1.5
        P(player 0 wins) = 0.75
        P(player 1 wins) = 0.25
";
        assert_eq!(sweep.to_string(), expected);
        assert!(sweep.get(2, 2).is_some());
        assert!(sweep.get(3, 2).is_none());
    }

    #[test]
    fn test_lcr_text_rendering() {
        let mut sweep = SweepReport::new("left-center-right", SolverConfig::default());
        sweep.push(GameReport {
            game: "left-center-right".to_string(),
            players: 2,
            coins_per_player: 3,
            expected_turns: 2.0,
            win_probabilities: vec![0.25, 0.75],
            states: 0,
            elapsed_seconds: 0.0,
        });
        let expected = "\
2 players:
    E(# turns) = 2
    P(player 0 wins) = 0.25
    P(player 1 wins) = 0.75
";
        assert_eq!(sweep.to_string(), expected);
    }

    #[test]
    fn test_save_json() {
        let mut sweep = SweepReport::new("left-center-right", SolverConfig::default());
        sweep.push(lcr_report(2, 1, 3, &tight(), |_| {}).unwrap());
        sweep.skip(9, 3, "over budget");

        let path = std::env::temp_dir().join("markov_game_solver_sweep_test.json");
        sweep.save_json(&path).unwrap();
        let loaded: SweepReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.reports.len(), 1);
        assert_eq!(loaded.skipped[0].reason, "over budget");
        assert_eq!(loaded.solver.restart, 50);
    }
}
