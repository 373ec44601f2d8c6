//! Interchangeable best-move search strategies.
//!
//! Every strategy implements [`SearchStrategy`] for any [`Searchable`]
//! position:
//!
//! - [`MiniMaxStrategy`] - fixed-depth search alternating max and min
//! - [`NegaMaxStrategy`] - the same search with every node maximizing
//! - [`NegaScoutStrategy`] - NegaMax with null-window verification
//! - [`MtdStrategy`] - repeated null-window NegaMax converging on the value
//!
//! NegaMax, NegaScout and MTD(f) each have a memory variant that keeps
//! value bounds in a [`TranspositionTable`](transposition::TranspositionTable).
//! - [`UctStrategy`] - Monte-Carlo tree search with UCB1 selection
//!
//! Strategies are built directly or through [`create_strategy`].

mod brute;
pub mod minimax;
pub mod mtd;
pub mod negamax;
pub mod negascout;
pub mod transposition;
pub mod uct;
pub mod uct_node;

use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;
use crate::moves::Move;
use crate::options::SearchOptions;
use crate::searchable::Searchable;
use crate::weights::Weights;

pub use minimax::MiniMaxStrategy;
pub use mtd::MtdStrategy;
pub use negamax::NegaMaxStrategy;
pub use negascout::NegaScoutStrategy;
pub use uct::UctStrategy;

/// Counters collected during the most recent search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Moves made by the search. UCT counts one per random playout.
    pub moves_considered: u64,
    /// Progress through the top-level moves (or simulations), 0 to 100.
    pub percent_done: u32,
}

/// A search for the best reply to the last move played.
pub trait SearchStrategy<S: Searchable> {
    /// Find the best reply to `last` in `position`.
    ///
    /// The position is restored before returning. The returned move carries
    /// the backed-up value in its inherited value; `None` means no move
    /// could be searched.
    fn search(&mut self, position: &mut S, last: &Move<S::Action>) -> Option<Move<S::Action>>;

    /// Statistics of the most recent search.
    fn stats(&self) -> SearchStats;

    fn kind(&self) -> SearchStrategyType;
}

/// The available strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStrategyType {
    MiniMax,
    NegaMax,
    /// NegaMax backed by a transposition table.
    NegaMaxMemory,
    NegaScout,
    /// NegaScout backed by a transposition table.
    NegaScoutMemory,
    Mtd,
    /// MTD(f) backed by a transposition table.
    MtdMemory,
    Uct,
}

impl SearchStrategyType {
    pub const ALL: [SearchStrategyType; 8] = [
        SearchStrategyType::MiniMax,
        SearchStrategyType::NegaMax,
        SearchStrategyType::NegaMaxMemory,
        SearchStrategyType::NegaScout,
        SearchStrategyType::NegaScoutMemory,
        SearchStrategyType::Mtd,
        SearchStrategyType::MtdMemory,
        SearchStrategyType::Uct,
    ];

    /// True for the fixed-depth strategies (everything but UCT).
    pub fn is_brute_force(self) -> bool {
        self != SearchStrategyType::Uct
    }

    /// True for the variants that keep a transposition table.
    pub fn uses_memory(self) -> bool {
        matches!(
            self,
            SearchStrategyType::NegaMaxMemory
                | SearchStrategyType::NegaScoutMemory
                | SearchStrategyType::MtdMemory
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            SearchStrategyType::MiniMax => "minimax",
            SearchStrategyType::NegaMax => "negamax",
            SearchStrategyType::NegaMaxMemory => "negamax-memory",
            SearchStrategyType::NegaScout => "negascout",
            SearchStrategyType::NegaScoutMemory => "negascout-memory",
            SearchStrategyType::Mtd => "mtd",
            SearchStrategyType::MtdMemory => "mtd-memory",
            SearchStrategyType::Uct => "uct",
        }
    }
}

impl fmt::Display for SearchStrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchStrategyType {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == lower)
            .ok_or_else(|| SearchError::InvalidOptions(format!("unknown search strategy '{s}'")))
    }
}

/// Build a boxed strategy of the given kind.
pub fn create_strategy<'w, S>(
    kind: SearchStrategyType,
    options: SearchOptions,
    weights: &'w Weights,
) -> Result<Box<dyn SearchStrategy<S> + 'w>, SearchError>
where
    S: Searchable,
{
    Ok(match kind {
        SearchStrategyType::MiniMax => Box::new(MiniMaxStrategy::new(options, weights)?),
        SearchStrategyType::NegaMax => Box::new(NegaMaxStrategy::new(options, weights)?),
        SearchStrategyType::NegaMaxMemory => Box::new(NegaMaxStrategy::with_memory(options, weights)?),
        SearchStrategyType::NegaScout => Box::new(NegaScoutStrategy::new(options, weights)?),
        SearchStrategyType::NegaScoutMemory => {
            Box::new(NegaScoutStrategy::with_memory(options, weights)?)
        }
        SearchStrategyType::Mtd => Box::new(MtdStrategy::new(options, weights)?),
        SearchStrategyType::MtdMemory => Box::new(MtdStrategy::with_memory(options, weights)?),
        SearchStrategyType::Uct => Box::new(UctStrategy::new(options, weights)?),
    })
}
