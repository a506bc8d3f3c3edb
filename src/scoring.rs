use std::fmt;
use std::sync::Arc;

use crate::{DEFAULT_MATCH, DEFAULT_MISMATCH};

pub type ScoreFn = Arc<dyn Fn(u8, u8) -> i32 + Send + Sync>;

/// Substitution score for a pair of symbols.
#[derive(Clone)]
pub enum Scoring {
    MatchMismatch { match_score: i32, mismatch_score: i32 },
    Custom(ScoreFn),
}

impl Scoring {
    pub fn new(match_score: i32, mismatch_score: i32) -> Self {
        Scoring::MatchMismatch {
            match_score,
            mismatch_score,
        }
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(u8, u8) -> i32 + Send + Sync + 'static,
    {
        Scoring::Custom(Arc::new(f))
    }

    #[inline]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        match self {
            Scoring::MatchMismatch {
                match_score,
                mismatch_score,
            } => {
                if a == b {
                    *match_score
                } else {
                    *mismatch_score
                }
            }
            Scoring::Custom(f) => f(a, b),
        }
    }
}

impl Default for Scoring {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH, DEFAULT_MISMATCH)
    }
}

impl fmt::Debug for Scoring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scoring::MatchMismatch {
                match_score,
                mismatch_score,
            } => f
                .debug_struct("MatchMismatch")
                .field("match_score", match_score)
                .field("mismatch_score", mismatch_score)
                .finish(),
            Scoring::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A cell of the DP matrix: `i` indexes prefixes of S, `j` prefixes of T.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub i: usize,
    pub j: usize,
}

impl Position {
    pub fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignmentStats {
    pub matches: u32,
    pub mismatches: u32,
    pub gaps: u32,
}

impl AlignmentStats {
    pub fn columns(&self) -> u32 {
        self.matches + self.mismatches + self.gaps
    }

    /// Fraction of alignment columns that are identical pairs.
    pub fn identity(&self) -> f64 {
        match self.columns() {
            0 => 0.0,
            n => self.matches as f64 / n as f64,
        }
    }
}
