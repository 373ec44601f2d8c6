//! Search configuration.
//!
//! [`SearchOptions`] is read-only for the strategies. Defaults come from
//! [`crate::constants`]; the `with_*` setters allow chained construction:
//!
//! ```
//! use gamesearch::options::SearchOptions;
//!
//! let options = SearchOptions::default()
//!     .with_look_ahead(3)
//!     .with_alpha_beta(false);
//! assert!(options.validate().is_ok());
//! ```

use std::fmt;

use crate::constants::{
    DEFAULT_EXPLORE_EXPLOIT_RATIO, DEFAULT_LOOK_AHEAD, DEFAULT_MAX_QUIESCENT_DEPTH,
    DEFAULT_MAX_SIMULATIONS, DEFAULT_MIN_BEST_MOVES, DEFAULT_PERCENTAGE_BEST_MOVES,
    DEFAULT_PERCENT_LESS_THAN_BEST_THRESH, DEFAULT_RANDOM_LOOK_AHEAD, INFINITY,
};
use crate::error::SearchError;

/// An `(alpha, beta)` bound pair used by the pruning searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub alpha: i32,
    pub beta: i32,
}

impl Default for SearchWindow {
    fn default() -> Self {
        Self::full()
    }
}

impl SearchWindow {
    pub const fn new(alpha: i32, beta: i32) -> Self {
        Self { alpha, beta }
    }

    /// The widest window, `[-INFINITY, INFINITY]`.
    pub const fn full() -> Self {
        Self::new(-INFINITY, INFINITY)
    }

    /// Zero-width window just below `beta`.
    pub const fn null(beta: i32) -> Self {
        Self::new(beta - 1, beta)
    }

    /// The same window seen from the opponent.
    pub const fn negated(self) -> Self {
        Self::new(-self.beta, -self.alpha)
    }

    pub const fn is_ordered(&self) -> bool {
        self.alpha <= self.beta
    }

    pub fn midpoint(&self) -> i32 {
        ((i64::from(self.alpha) + i64::from(self.beta)) / 2) as i32
    }
}

impl fmt::Display for SearchWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.alpha, self.beta)
    }
}

/// Tuning knobs of the UCT strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct MonteCarloOptions {
    /// Number of simulations run per search.
    pub max_simulations: u32,
    /// Weight of the exploration term of UCB1.
    pub explore_exploit_ratio: f64,
    /// Maximum number of moves played by one random playout.
    pub random_look_ahead: u32,
    /// Seed for the playout random number generator.
    pub seed: u64,
    /// Number of threads running simulations.
    pub workers: usize,
}

impl Default for MonteCarloOptions {
    fn default() -> Self {
        Self {
            max_simulations: DEFAULT_MAX_SIMULATIONS,
            explore_exploit_ratio: DEFAULT_EXPLORE_EXPLOIT_RATIO,
            random_look_ahead: DEFAULT_RANDOM_LOOK_AHEAD,
            seed: 0,
            workers: 1,
        }
    }
}

/// Options shared by every search strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Number of plies searched by the brute-force strategies.
    pub look_ahead: u32,
    pub alpha_beta: bool,
    pub quiescence: bool,
    /// Deepest quiescence extension, counted past the horizon.
    pub max_quiescent_depth: u32,
    /// Percentage of generated moves kept per ply.
    pub percentage_best_moves: u32,
    /// Never keep fewer than this many moves per ply.
    pub min_best_moves: usize,
    /// Random playouts choose among moves within this percentage of the best.
    pub percent_less_than_best_thresh: u32,
    /// Window the brute-force searches start from. MTD(f) starts its first
    /// guess at the midpoint.
    pub initial_window: SearchWindow,
    pub monte_carlo: MonteCarloOptions,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            look_ahead: DEFAULT_LOOK_AHEAD,
            alpha_beta: true,
            quiescence: false,
            max_quiescent_depth: DEFAULT_MAX_QUIESCENT_DEPTH,
            percentage_best_moves: DEFAULT_PERCENTAGE_BEST_MOVES,
            min_best_moves: DEFAULT_MIN_BEST_MOVES,
            percent_less_than_best_thresh: DEFAULT_PERCENT_LESS_THAN_BEST_THRESH,
            initial_window: SearchWindow::full(),
            monte_carlo: MonteCarloOptions::default(),
        }
    }
}

impl SearchOptions {
    pub fn with_look_ahead(mut self, look_ahead: u32) -> Self {
        self.look_ahead = look_ahead;
        self
    }

    pub fn with_alpha_beta(mut self, alpha_beta: bool) -> Self {
        self.alpha_beta = alpha_beta;
        self
    }

    pub fn with_quiescence(mut self, quiescence: bool) -> Self {
        self.quiescence = quiescence;
        self
    }

    pub fn with_max_quiescent_depth(mut self, depth: u32) -> Self {
        self.max_quiescent_depth = depth;
        self
    }

    pub fn with_best_moves(mut self, percentage: u32, minimum: usize) -> Self {
        self.percentage_best_moves = percentage;
        self.min_best_moves = minimum;
        self
    }

    pub fn with_percent_less_than_best_thresh(mut self, percent: u32) -> Self {
        self.percent_less_than_best_thresh = percent;
        self
    }

    pub fn with_initial_window(mut self, window: SearchWindow) -> Self {
        self.initial_window = window;
        self
    }

    pub fn with_max_simulations(mut self, max_simulations: u32) -> Self {
        self.monte_carlo.max_simulations = max_simulations;
        self
    }

    pub fn with_explore_exploit_ratio(mut self, ratio: f64) -> Self {
        self.monte_carlo.explore_exploit_ratio = ratio;
        self
    }

    pub fn with_random_look_ahead(mut self, random_look_ahead: u32) -> Self {
        self.monte_carlo.random_look_ahead = random_look_ahead;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.monte_carlo.seed = seed;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.monte_carlo.workers = workers;
        self
    }

    /// Check every option against its documented range.
    pub fn validate(&self) -> Result<(), SearchError> {
        let invalid = |msg: String| Err(SearchError::InvalidOptions(msg));

        if self.max_quiescent_depth < self.look_ahead {
            return invalid(format!(
                "max quiescent depth {} is below look ahead {}",
                self.max_quiescent_depth, self.look_ahead
            ));
        }
        if self.percentage_best_moves > 100 {
            return invalid(format!(
                "percentage of best moves {} exceeds 100",
                self.percentage_best_moves
            ));
        }
        if self.min_best_moves < 1 {
            return invalid("minimum number of best moves must be at least 1".to_string());
        }
        if self.percent_less_than_best_thresh > 100 {
            return invalid(format!(
                "playout threshold {}% exceeds 100",
                self.percent_less_than_best_thresh
            ));
        }
        let window = self.initial_window;
        if window.alpha >= window.beta {
            return invalid(format!("initial window {window} is empty"));
        }

        let mc = &self.monte_carlo;
        if mc.max_simulations < 1 {
            return invalid("at least one simulation is required".to_string());
        }
        if !(mc.explore_exploit_ratio > 0.0 && mc.explore_exploit_ratio.is_finite()) {
            return invalid(format!(
                "explore/exploit ratio {} must be positive",
                mc.explore_exploit_ratio
            ));
        }
        if mc.workers < 1 {
            return invalid("at least one worker is required".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let options = SearchOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.look_ahead, DEFAULT_LOOK_AHEAD);
        assert!(options.alpha_beta);
        assert!(!options.quiescence);
        assert_eq!(options.monte_carlo.workers, 1);
    }

    #[test]
    fn test_window_helpers() {
        let window = SearchWindow::new(-3, 10);
        assert_eq!(window.negated(), SearchWindow::new(-10, 3));
        assert_eq!(SearchWindow::null(5), SearchWindow::new(4, 5));
        assert_eq!(SearchWindow::full().midpoint(), 0);
        assert!(window.is_ordered());
        assert!(!SearchWindow::new(2, 1).is_ordered());
    }

    #[test]
    fn test_rejects_out_of_range_options() {
        let cases = [
            SearchOptions::default().with_look_ahead(20),
            SearchOptions::default().with_best_moves(101, 1),
            SearchOptions::default().with_best_moves(50, 0),
            SearchOptions::default().with_percent_less_than_best_thresh(150),
            SearchOptions::default().with_initial_window(SearchWindow::new(5, 5)),
            SearchOptions::default().with_max_simulations(0),
            SearchOptions::default().with_explore_exploit_ratio(0.0),
            SearchOptions::default().with_explore_exploit_ratio(f64::NAN),
            SearchOptions::default().with_workers(0),
        ];
        for options in cases {
            assert!(
                matches!(options.validate(), Err(SearchError::InvalidOptions(_))),
                "{options:?} should be rejected"
            );
        }
    }
}
