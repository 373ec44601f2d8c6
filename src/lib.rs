//! gamesearch: adversarial game-tree search for two-player games.
//!
//! This crate provides interchangeable best-move search strategies that work
//! over any position implementing [`searchable::Searchable`].
//!
//! ## Modules
//!
//! - [`constants`] - Score sentinels and default option values
//! - [`error`] - Option and contract errors
//! - [`moves`] - Moves and move lists
//! - [`weights`] - Caller-owned evaluation weights
//! - [`searchable`] - The position contract
//! - [`options`] - Search configuration and windows
//! - [`best_moves`] - Per-ply move list truncation
//! - [`strategy`] - MiniMax, NegaMax, NegaScout, MTD(f) and UCT
//! - [`game_tree`] - Explicit game trees for testing and demos
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use gamesearch::game_tree::{TreePosition, example_tree};
//! use gamesearch::options::SearchOptions;
//! use gamesearch::strategy::{MiniMaxStrategy, SearchStrategy};
//! use gamesearch::weights::Weights;
//!
//! let tree = Arc::new(example_tree().unwrap());
//! let weights = Weights::default();
//! let options = SearchOptions::default().with_look_ahead(2);
//!
//! let mut strategy = MiniMaxStrategy::new(options, &weights).unwrap();
//! let mut position = TreePosition::new(Arc::clone(&tree));
//! let best = strategy.search(&mut position, &tree.root_move()).unwrap();
//! assert_eq!(best.action, "0");
//! assert_eq!(best.inherited_value, 7);
//! ```

pub mod best_moves;
pub mod constants;
pub mod error;
pub mod game_tree;
pub mod moves;
pub mod options;
pub mod searchable;
pub mod strategy;
pub mod weights;

pub use error::SearchError;
pub use moves::{Move, MoveList};
pub use options::{MonteCarloOptions, SearchOptions, SearchWindow};
pub use searchable::Searchable;
pub use weights::Weights;
