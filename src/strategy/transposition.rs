//! Transposition table for memory-enhanced MTD(f).
//!
//! Entries hold a lower and an upper bound on a position's NegaMax value
//! (seen from the side to move) together with the depth they were searched
//! to. Only entries searched at least as deep as the current request are used.

use std::collections::HashMap;

use crate::constants::INFINITY;
use crate::options::SearchWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    pub depth: i32,
    pub lower: i32,
    pub upper: i32,
}

/// Result of a table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// The stored bounds decide the node; no search needed.
    Cutoff(i32),
    /// Search the node with this tighter window.
    Narrowed(SearchWindow),
    Miss,
}

#[derive(Debug, Default)]
pub struct TranspositionTable {
    entries: HashMap<u64, TableEntry>,
    hits: u64,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of probes answered without a search.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn get(&self, key: u64) -> Option<TableEntry> {
        self.entries.get(&key).copied()
    }

    pub fn probe(&mut self, key: u64, depth: i32, window: SearchWindow) -> Probe {
        let Some(entry) = self.get(key) else {
            return Probe::Miss;
        };
        if entry.depth < depth {
            return Probe::Miss;
        }
        if entry.lower == entry.upper || entry.lower >= window.beta {
            self.hits += 1;
            return Probe::Cutoff(entry.lower);
        }
        if entry.upper <= window.alpha {
            self.hits += 1;
            return Probe::Cutoff(entry.upper);
        }
        Probe::Narrowed(SearchWindow::new(
            window.alpha.max(entry.lower),
            window.beta.min(entry.upper),
        ))
    }

    /// Record `value`, searched to `depth` with `window`.
    ///
    /// A fail-low value is an upper bound, a fail-high value a lower bound,
    /// anything in between exact. Bounds from equal depths are merged; a
    /// deeper entry replaces a shallower one and is never replaced by it.
    pub fn store(&mut self, key: u64, depth: i32, value: i32, window: SearchWindow) {
        let mut entry = TableEntry {
            depth,
            lower: -INFINITY,
            upper: INFINITY,
        };
        if value <= window.alpha {
            entry.upper = value;
        } else if value >= window.beta {
            entry.lower = value;
        } else {
            entry.lower = value;
            entry.upper = value;
        }

        match self.entries.get_mut(&key) {
            Some(old) if old.depth == depth => {
                old.lower = old.lower.max(entry.lower);
                old.upper = old.upper.min(entry.upper);
            }
            Some(old) if old.depth > depth => {}
            _ => {
                self.entries.insert(key, entry);
            }
        }
    }
}
