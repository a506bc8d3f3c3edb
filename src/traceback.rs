use std::borrow::Cow;

use crate::alignment_mode::Regime;
use crate::matrix::DpMatrix;
use crate::scoring::{AlignmentStats, Position, Scoring};
use crate::{AlignerError, GAP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracebackOperation {
    Match,
    Mismatch,
    /// Symbol of T against a gap in S.
    Insertion,
    /// Symbol of S against a gap in T.
    Deletion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentResult {
    pub score: i32,
    pub aligned_s: Vec<u8>,
    pub aligned_t: Vec<u8>,
    pub operations: Vec<TracebackOperation>,
    /// Cell where the backward walk stopped.
    pub start_position: Position,
    /// Cell the backward walk started from.
    pub end_position: Position,
    pub matrix: Option<DpMatrix>,
}

impl AlignmentResult {
    pub fn aligned_s_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.aligned_s)
    }

    pub fn aligned_t_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.aligned_t)
    }

    pub fn statistics(&self) -> AlignmentStats {
        self.operations
            .iter()
            .fold(AlignmentStats::default(), |mut acc, op| {
                match op {
                    TracebackOperation::Match => acc.matches += 1,
                    TracebackOperation::Mismatch => acc.mismatches += 1,
                    TracebackOperation::Insertion | TracebackOperation::Deletion => acc.gaps += 1,
                }
                acc
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartRule {
    Corner,
    BestCell,
    BestInLastRow,
    BestInLastCol,
}

/// Unconsumed suffix written out as gaps before the walk begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrailingGaps {
    None,
    SuffixOfS,
    SuffixOfT,
}

/// Per-regime traceback behaviour, decided once up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TracePlan {
    start: StartRule,
    trailing: TrailingGaps,
    free_prefix_s: bool,
    free_prefix_t: bool,
    stop_at_zero: bool,
    floor_score: bool,
}

impl TracePlan {
    pub(crate) fn for_regime(regime: &Regime) -> Self {
        match regime {
            Regime::Global => Self {
                start: StartRule::Corner,
                trailing: TrailingGaps::None,
                free_prefix_s: false,
                free_prefix_t: false,
                stop_at_zero: false,
                floor_score: false,
            },
            Regime::Local => Self {
                start: StartRule::BestCell,
                trailing: TrailingGaps::None,
                free_prefix_s: false,
                free_prefix_t: false,
                stop_at_zero: true,
                floor_score: false,
            },
            Regime::SemiGlobal(free) => {
                let (start, trailing) = match (free.end_s, free.end_t) {
                    (true, true) => (StartRule::BestCell, TrailingGaps::None),
                    (true, false) => (StartRule::BestInLastRow, TrailingGaps::SuffixOfT),
                    (false, true) => (StartRule::BestInLastCol, TrailingGaps::SuffixOfS),
                    (false, false) => (StartRule::Corner, TrailingGaps::None),
                };
                Self {
                    start,
                    trailing,
                    free_prefix_s: free.begin_s,
                    free_prefix_t: free.begin_t,
                    // Both ends free terminates like a local alignment.
                    stop_at_zero: free.end_s && free.end_t,
                    floor_score: free.end_s || free.end_t,
                }
            }
        }
    }

    fn start_cell(&self, matrix: &DpMatrix) -> Position {
        let (last_row, last_col) = (matrix.rows() - 1, matrix.cols() - 1);
        match self.start {
            StartRule::Corner => Position::new(last_row, last_col),
            StartRule::BestCell => matrix.best_cell(),
            StartRule::BestInLastRow => matrix.best_in_row(last_row),
            StartRule::BestInLastCol => matrix.best_in_col(last_col),
        }
    }

    fn prefix_is_free(&self, i: usize, j: usize) -> bool {
        (self.free_prefix_t && i == 0) || (self.free_prefix_s && j == 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Diagonal,
    Up,
    Left,
}

/// Backward walk over a filled matrix.
pub(crate) struct Traceback<'a> {
    matrix: &'a DpMatrix,
    s: &'a [u8],
    t: &'a [u8],
    regime: Regime,
    gap: i32,
    scoring: &'a Scoring,
    aligned_s: Vec<u8>,
    aligned_t: Vec<u8>,
    operations: Vec<TracebackOperation>,
}

impl<'a> Traceback<'a> {
    pub(crate) fn new(
        matrix: &'a DpMatrix,
        s: &'a [u8],
        t: &'a [u8],
        regime: Regime,
        gap: i32,
        scoring: &'a Scoring,
    ) -> Self {
        let capacity = s.len() + t.len();
        Self {
            matrix,
            s,
            t,
            regime,
            gap,
            scoring,
            aligned_s: Vec::with_capacity(capacity),
            aligned_t: Vec::with_capacity(capacity),
            operations: Vec::with_capacity(capacity),
        }
    }

    /// Locates the optimal cell, then reconstructs the alignment ending
    /// there. The returned result carries no matrix.
    pub(crate) fn reconstruct_alignment(mut self) -> Result<AlignmentResult, AlignerError> {
        self.matrix.check_shape(self.s, self.t)?;
        let plan = TracePlan::for_regime(&self.regime);
        let end = plan.start_cell(self.matrix);
        let mut score = self.matrix.get(end.i, end.j);
        if plan.floor_score {
            score = score.max(0);
        }
        log::trace!("traceback from ({}, {}) with score {}", end.i, end.j, score);

        match plan.trailing {
            TrailingGaps::None => {}
            TrailingGaps::SuffixOfT => {
                for j in (end.j + 1..=self.t.len()).rev() {
                    self.push(GAP, self.t[j - 1], TracebackOperation::Insertion);
                }
            }
            TrailingGaps::SuffixOfS => {
                for i in (end.i + 1..=self.s.len()).rev() {
                    self.push(self.s[i - 1], GAP, TracebackOperation::Deletion);
                }
            }
        }

        let (mut i, mut j) = (end.i, end.j);
        while i > 0 || j > 0 {
            if plan.prefix_is_free(i, j) {
                log::trace!("free prefix reached at ({}, {})", i, j);
                break;
            }
            if plan.stop_at_zero && self.matrix.get(i, j) == 0 {
                log::trace!("zero cell reached at ({}, {})", i, j);
                break;
            }

            let step = if i > 0 && j > 0 {
                self.choose_step(i, j)?
            } else if i == 0 {
                Step::Left
            } else {
                Step::Up
            };

            match step {
                Step::Diagonal => {
                    let (a, b) = (self.s[i - 1], self.t[j - 1]);
                    let op = if a == b {
                        TracebackOperation::Match
                    } else {
                        TracebackOperation::Mismatch
                    };
                    self.push(a, b, op);
                    i -= 1;
                    j -= 1;
                }
                Step::Up => {
                    self.push(self.s[i - 1], GAP, TracebackOperation::Deletion);
                    i -= 1;
                }
                Step::Left => {
                    self.push(GAP, self.t[j - 1], TracebackOperation::Insertion);
                    j -= 1;
                }
            }
        }

        if self.aligned_s.len() != self.aligned_t.len() {
            return Err(AlignerError::LengthMismatch {
                s_len: self.aligned_s.len(),
                t_len: self.aligned_t.len(),
            });
        }

        // Built back to front.
        self.aligned_s.reverse();
        self.aligned_t.reverse();
        self.operations.reverse();

        Ok(AlignmentResult {
            score,
            aligned_s: self.aligned_s,
            aligned_t: self.aligned_t,
            operations: self.operations,
            start_position: Position::new(i, j),
            end_position: end,
            matrix: None,
        })
    }

    /// Picks the parent of an interior cell, preferring diagonal, then up,
    /// then left.
    fn choose_step(&self, i: usize, j: usize) -> Result<Step, AlignerError> {
        let (m, n) = (self.s.len(), self.t.len());
        let current = self.matrix.get(i, j);
        let diag = self
            .matrix
            .get(i - 1, j - 1)
            .saturating_add(self.scoring.score(self.s[i - 1], self.t[j - 1]));
        let up = self.matrix.get(i - 1, j).saturating_add(self.regime.up_penalty(self.gap, j, n));
        let left = self.matrix.get(i, j - 1).saturating_add(self.regime.left_penalty(self.gap, i, m));

        if current == diag {
            Ok(Step::Diagonal)
        } else if current == up {
            Ok(Step::Up)
        } else if current == left {
            Ok(Step::Left)
        } else {
            Err(AlignerError::TracebackInconsistency {
                i,
                j,
                score: current,
                diag,
                up,
                left,
            })
        }
    }

    fn push(&mut self, a: u8, b: u8, op: TracebackOperation) {
        self.aligned_s.push(a);
        self.aligned_t.push(b);
        self.operations.push(op);
    }
}
