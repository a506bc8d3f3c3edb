//! Dense score matrix plus the border initialisation and forward fill.
//!
//! Rows `0..=m` index prefixes of S, columns `0..=n` prefixes of T. The
//! matrix is a single flat buffer owned by one alignment; time and memory
//! are both `O(m * n)`, so callers that need bounded latency must cap
//! sequence lengths themselves.

use crate::alignment_mode::Regime;
use crate::scoring::{Position, Scoring};
use crate::AlignerError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DpMatrix {
    data: Vec<i32>,
    rows: usize,
    cols: usize,
}

impl DpMatrix {
    /// Zero-filled matrix of `rows * cols` cells.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0; rows * cols],
            rows,
            cols,
        }
    }

    /// Matrix sized for aligning `s` against `t`.
    pub fn for_sequences(s: &[u8], t: &[u8]) -> Self {
        Self::new(s.len() + 1, t.len() + 1)
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: i32) {
        self.data[row * self.cols + col] = value;
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.data[row * self.cols + col]
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, row: usize) -> &[i32] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    pub(crate) fn check_shape(&self, s: &[u8], t: &[u8]) -> Result<(), AlignerError> {
        if self.rows != s.len() + 1 || self.cols != t.len() + 1 {
            return Err(AlignerError::ShapeMismatch {
                rows: self.rows,
                cols: self.cols,
                expected_rows: s.len() + 1,
                expected_cols: t.len() + 1,
            });
        }
        Ok(())
    }

    /// Highest cell, first in row-major order on ties.
    pub(crate) fn best_cell(&self) -> Position {
        let mut best = Position::default();
        let mut best_score = self.get(0, 0);
        for i in 0..self.rows {
            for (j, &score) in self.row(i).iter().enumerate() {
                if score > best_score {
                    best_score = score;
                    best = Position::new(i, j);
                }
            }
        }
        best
    }

    /// Highest cell of `row`, leftmost on ties.
    pub(crate) fn best_in_row(&self, row: usize) -> Position {
        let mut best = 0;
        for (j, &score) in self.row(row).iter().enumerate() {
            if score > self.get(row, best) {
                best = j;
            }
        }
        Position::new(row, best)
    }

    /// Highest cell of `col`, topmost on ties.
    pub(crate) fn best_in_col(&self, col: usize) -> Position {
        let mut best = 0;
        for i in 1..self.rows {
            if self.get(i, col) > self.get(best, col) {
                best = i;
            }
        }
        Position::new(best, col)
    }
}

/// Writes the first row and column for `regime`. Interior cells are left
/// untouched, so the matrix is expected to start zeroed.
pub(crate) fn initialize(
    matrix: &mut DpMatrix,
    regime: &Regime,
    gap: i32,
) -> Result<(), AlignerError> {
    let (penalize_row, penalize_col) = match regime {
        Regime::Global => (true, true),
        Regime::Local => (false, false),
        Regime::SemiGlobal(free) => (!free.begin_t, !free.begin_s),
    };
    if penalize_row {
        for j in 0..matrix.cols() {
            matrix.set(0, j, border_score(gap, 0, j)?);
        }
    }
    if penalize_col {
        for i in 0..matrix.rows() {
            matrix.set(i, 0, border_score(gap, i, 0)?);
        }
    }
    Ok(())
}

fn border_score(gap: i32, i: usize, j: usize) -> Result<i32, AlignerError> {
    i32::try_from(i + j)
        .ok()
        .and_then(|steps| steps.checked_mul(gap))
        .ok_or(AlignerError::ScoreOverflow { i, j })
}

fn add(a: i32, b: i32, i: usize, j: usize) -> Result<i32, AlignerError> {
    a.checked_add(b).ok_or(AlignerError::ScoreOverflow { i, j })
}

/// Fills every interior cell from its upper, left and diagonal neighbours.
pub(crate) fn fill(
    matrix: &mut DpMatrix,
    s: &[u8],
    t: &[u8],
    regime: &Regime,
    gap: i32,
    scoring: &Scoring,
) -> Result<(), AlignerError> {
    matrix.check_shape(s, t)?;
    let (m, n) = (s.len(), t.len());
    for i in 1..=m {
        for j in 1..=n {
            let from_up = add(matrix.get(i - 1, j), regime.up_penalty(gap, j, n), i, j)?;
            let from_left = add(matrix.get(i, j - 1), regime.left_penalty(gap, i, m), i, j)?;
            let sub = scoring.score(s[i - 1], t[j - 1]);
            let from_diag = add(matrix.get(i - 1, j - 1), sub, i, j)?;
            let mut best = from_up.max(from_left).max(from_diag);
            if regime.clamps_at_zero() {
                best = best.max(0);
            }
            matrix.set(i, j, best);
        }
    }
    Ok(())
}
