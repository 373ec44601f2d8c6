//! Narrowing a generated move list to the candidates worth searching.

use crate::moves::MoveList;
use crate::options::SearchOptions;

/// Keeps the best `percentage` of a move list, but never fewer than `minimum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestMoveFinder {
    percentage: u32,
    minimum: usize,
}

impl BestMoveFinder {
    pub fn new(percentage: u32, minimum: usize) -> Self {
        Self {
            percentage,
            minimum,
        }
    }

    pub fn from_options(options: &SearchOptions) -> Self {
        Self::new(options.percentage_best_moves, options.min_best_moves)
    }

    /// Number of moves kept from a list of `size` moves.
    ///
    /// `max(minimum, ceil(size * percentage / 100))`, capped at `size`.
    pub fn num_to_keep(&self, size: usize) -> usize {
        let by_percent = (size * self.percentage as usize).div_ceil(100);
        by_percent.max(self.minimum).min(size)
    }

    /// Order `moves` best first for the side to move and truncate.
    ///
    /// Descending when player one is to move, ascending otherwise. The sort
    /// is stable, so ties keep their generation order.
    pub fn get_best_moves<A>(
        &self,
        player1_to_move: bool,
        mut moves: MoveList<A>,
        player1_perspective: bool,
    ) -> MoveList<A> {
        if player1_to_move == player1_perspective {
            moves.sort_descending();
        } else {
            moves.sort_ascending();
        }
        let keep = self.num_to_keep(moves.len());
        moves.truncate(keep);
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Move;

    fn descending(n: usize) -> MoveList<usize> {
        (0..n).map(|i| Move::new(i, true, 100 - i as i32)).collect()
    }

    #[test]
    fn test_percentage_rounds_up() {
        let finder = BestMoveFinder::new(20, 3);
        let best = finder.get_best_moves(true, descending(10), true);
        assert_eq!(best.len(), 3);
        assert_eq!(best.iter().map(|m| m.action).collect::<Vec<_>>(), vec![0, 1, 2]);

        let finder = BestMoveFinder::new(25, 1);
        assert_eq!(finder.get_best_moves(true, descending(10), true).len(), 3);
    }

    #[test]
    fn test_minimum_capped_at_size() {
        let finder = BestMoveFinder::new(10, 50);
        assert_eq!(finder.num_to_keep(7), 7);
        assert_eq!(finder.num_to_keep(0), 0);
    }

    #[test]
    fn test_player_two_keeps_lowest_values() {
        let finder = BestMoveFinder::new(30, 1);
        let best = finder.get_best_moves(false, descending(10), true);
        assert_eq!(best.iter().map(|m| m.value).collect::<Vec<_>>(), vec![91, 92, 93]);
    }

    #[test]
    fn test_ties_keep_generation_order() {
        let moves: MoveList<char> = [('a', 5), ('b', 9), ('c', 5), ('d', 9)]
            .into_iter()
            .map(|(c, v)| Move::new(c, true, v))
            .collect();
        let finder = BestMoveFinder::new(100, 1);
        let best = finder.get_best_moves(true, moves, true);
        assert_eq!(best.iter().map(|m| m.action).collect::<String>(), "bdac");
    }
}
