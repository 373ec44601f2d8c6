//! Score sentinels, default search options and UCT parameters.
//!
//! Every score in the engine is an `i32` measured from a fixed reference
//! perspective. The sentinels below bound that range and must never be
//! approximated: the pruning decisions of all strategies depend on exact
//! comparisons against them.

// =============================================================================
// Score Sentinels
// =============================================================================

/// Any value with an absolute value at or above this marks a decided game.
pub const WINNING_VALUE: i32 = 8192;

/// Window bound that no evaluation can reach.
///
/// Leaves a wide margin above [`WINNING_VALUE`] so that summed heuristic
/// deltas never collide with the window edges.
pub const INFINITY: i32 = 32 * WINNING_VALUE;

// =============================================================================
// Brute-Force Search Defaults
// =============================================================================

/// Number of plies searched by default.
pub const DEFAULT_LOOK_AHEAD: u32 = 4;

/// Deepest quiescence extension (in plies past the nominal horizon).
pub const DEFAULT_MAX_QUIESCENT_DEPTH: u32 = 12;

/// Percentage of generated moves kept at each ply.
pub const DEFAULT_PERCENTAGE_BEST_MOVES: u32 = 100;

/// Lower bound on the number of moves kept at each ply.
pub const DEFAULT_MIN_BEST_MOVES: usize = 10;

/// Default difference between a move and its parent that counts as jeopardy.
pub const DEFAULT_JEOPARDY_WEIGHT: i32 = 100;

/// Upper bound on MTD(f) oracle calls for a single search.
pub const MAX_MTD_PASSES: usize = 64;

// =============================================================================
// Monte-Carlo (UCT) Defaults
// =============================================================================

/// Number of simulations per search.
pub const DEFAULT_MAX_SIMULATIONS: u32 = 10_000;

/// Weight of the exploration term of UCB1.
pub const DEFAULT_EXPLORE_EXPLOIT_RATIO: f64 = 1.0;

/// Maximum number of random moves in one playout.
pub const DEFAULT_RANDOM_LOOK_AHEAD: u32 = 20;

/// Playout moves are drawn from those within this percentage of the best.
pub const DEFAULT_PERCENT_LESS_THAN_BEST_THRESH: u32 = 0;

/// Divisor inside the UCB1 exploration term.
pub const UCT_EXPLORATION_DIVISOR: f64 = 5.0;

/// Selection value of a child that has never been visited.
pub const UNVISITED_UCT_VALUE: f64 = f64::INFINITY;
