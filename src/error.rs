//! Errors raised by option validation and by search contract checks.

use thiserror::Error;
use tracing::error;

/// Everything that can go wrong before or during a search.
///
/// Only [`SearchError::InvalidOptions`] is an ordinary runtime outcome. The
/// other variants describe broken contracts between the engine and the
/// position it drives; see [`violated`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// An option is outside its documented range.
    #[error("invalid search options: {0}")]
    InvalidOptions(String),

    /// The position produced no moves although it does not report the game as done.
    #[error("no candidate moves generated for non-terminal position after {0}")]
    NoCandidateMoves(String),

    /// A recursion was entered with alpha above beta.
    #[error("search window inverted: alpha {alpha} > beta {beta}")]
    InvertedWindow { alpha: i32, beta: i32 },

    /// A make/undo pair did not balance.
    #[error("unbalanced make/undo: {0} moves outstanding")]
    UnbalancedMoves(i32),
}

/// Report a broken contract.
///
/// Fatal when debug assertions are on. Release builds log the violation and
/// the caller treats the node as having no move available.
pub(crate) fn violated(err: &SearchError) {
    if cfg!(debug_assertions) {
        panic!("search contract violated: {err}");
    }
    error!(%err, "search contract violated");
}
