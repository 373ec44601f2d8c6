//! Evaluation weights owned by the caller.
//!
//! A game's static evaluator reads its tuning values from a [`Weights`]
//! table. The table is built once, then shared by reference with every
//! search; the engine itself only reads the jeopardy weight.

use crate::constants::DEFAULT_JEOPARDY_WEIGHT;

/// Immutable table of evaluation weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    values: Vec<f64>,
    jeopardy_weight: i32,
}

impl Default for Weights {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Weights {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            jeopardy_weight: DEFAULT_JEOPARDY_WEIGHT,
        }
    }

    /// Set the score swing above which a position counts as unstable.
    pub fn with_jeopardy_weight(mut self, jeopardy_weight: i32) -> Self {
        self.jeopardy_weight = jeopardy_weight;
        self
    }

    pub fn jeopardy_weight(&self) -> i32 {
        self.jeopardy_weight
    }

    /// Weight at `index`, or 0.0 when the table is shorter.
    pub fn get(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(0.0)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
