//! Optimal pairwise alignment of two symbol sequences by dynamic
//! programming, in global, local and semi-global (free end-gap) modes.
//!
//! Every alignment fills a dense `(|S|+1) x (|T|+1)` matrix, so time and
//! memory grow as `O(|S| * |T|)`. Independent pairs can be spread over
//! threads with [`BatchAligner`].

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

pub mod alignment_mode;
pub mod batch;
pub mod config;
pub mod fasta;
pub mod matrix;
pub mod render;
pub mod scoring;
pub mod traceback;

pub use crate::alignment_mode::{AlignmentMode, AlignmentParams, FreeEnds, GapScheme};
pub use crate::batch::BatchAligner;
pub use crate::config::BatchConfig;
pub use crate::fasta::{read_fasta, FastaReader, FastaRecord};
pub use crate::matrix::DpMatrix;
pub use crate::render::render_matrix;
pub use crate::scoring::{AlignmentStats, Position, ScoreFn, Scoring};
pub use crate::traceback::{AlignmentResult, TracebackOperation};

use crate::alignment_mode::Regime;
use crate::traceback::Traceback;

// Default scoring parameters
pub const DEFAULT_MATCH: i32 = 1;
pub const DEFAULT_MISMATCH: i32 = -1;
pub const DEFAULT_GAP: i32 = -2;

/// Placeholder written into an aligned sequence opposite a consumed symbol.
pub const GAP: u8 = b'-';

#[derive(Debug, Error)]
pub enum AlignerError {
    #[error("Invalid alignment mode: {0:?}")]
    InvalidMode(String),
    #[error("Free end gaps require semi-global mode, got {0}")]
    FreeEndsRequireSemiGlobal(AlignmentMode),
    #[error("Affine gaps are not supported (open {open}, extend {extend})")]
    AffineGapUnsupported { open: i32, extend: i32 },
    #[error("CIGAR output is not implemented")]
    CigarUnsupported,
    #[error("Matrix is {rows}x{cols}, sequences need {expected_rows}x{expected_cols}")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
    #[error("Traceback error at ({i}, {j}): score {score}, parents (D,U,L) {diag}, {up}, {left}")]
    TracebackInconsistency {
        i: usize,
        j: usize,
        score: i32,
        diag: i32,
        up: i32,
        left: i32,
    },
    #[error("Score out of i32 range at cell ({i}, {j}); reduce the gap or substitution scores")]
    ScoreOverflow { i: usize, j: usize },
    #[error("Aligned sequences differ in length: {s_len} vs {t_len}")]
    LengthMismatch { s_len: usize, t_len: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid FASTA: {0}")]
    InvalidFasta(String),
    #[error("Invalid batch configuration: {0}")]
    InvalidBatchConfig(String),
    #[error("Batch worker failed: {0}")]
    WorkerError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rejected before any computation; fix the request.
    Configuration,
    /// Matrix allocated with the wrong dimensions.
    Shape,
    /// Fill and traceback disagree; a bug, not a runtime condition.
    Internal,
    Io,
}

impl AlignerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AlignerError::InvalidMode(_)
            | AlignerError::FreeEndsRequireSemiGlobal(_)
            | AlignerError::AffineGapUnsupported { .. }
            | AlignerError::CigarUnsupported
            | AlignerError::InvalidBatchConfig(_)
            | AlignerError::ScoreOverflow { .. } => ErrorCategory::Configuration,
            AlignerError::ShapeMismatch { .. } => ErrorCategory::Shape,
            AlignerError::TracebackInconsistency { .. }
            | AlignerError::LengthMismatch { .. }
            | AlignerError::WorkerError(_) => ErrorCategory::Internal,
            AlignerError::Io(_) | AlignerError::InvalidFasta(_) => ErrorCategory::Io,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sequence {
    data: Vec<u8>,
}

impl Sequence {
    pub fn new(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<&str> for Sequence {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

impl From<Vec<u8>> for Sequence {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl AsRef<[u8]> for Sequence {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[derive(Clone, Default)]
pub struct AlignerParameters {
    params: AlignmentParams,
    score_fn: Option<ScoreFn>,
    return_matrix: bool,
    return_cigar: bool,
}

impl AlignerParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: AlignmentMode) -> Self {
        self.params.mode = mode;
        self
    }

    pub fn with_gap(mut self, gap: GapScheme) -> Self {
        self.params.gap = gap;
        self
    }

    pub fn with_match_score(mut self, match_score: i32) -> Self {
        self.params.match_score = match_score;
        self
    }

    pub fn with_mismatch_score(mut self, mismatch_score: i32) -> Self {
        self.params.mismatch_score = mismatch_score;
        self
    }

    pub fn with_free_ends(mut self, free: FreeEnds) -> Self {
        self.params.free = Some(free);
        self
    }

    /// Replaces the match/mismatch pair with an arbitrary substitution score.
    pub fn with_score_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(u8, u8) -> i32 + Send + Sync + 'static,
    {
        self.score_fn = Some(Arc::new(f));
        self
    }

    /// Keep the filled matrix in the result.
    pub fn with_matrix(mut self, return_matrix: bool) -> Self {
        self.return_matrix = return_matrix;
        self
    }

    pub fn with_cigar(mut self, return_cigar: bool) -> Self {
        self.return_cigar = return_cigar;
        self
    }

    pub fn params(&self) -> &AlignmentParams {
        &self.params
    }
}

impl fmt::Debug for AlignerParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignerParameters")
            .field("params", &self.params)
            .field("score_fn", &self.score_fn.as_ref().map(|_| ".."))
            .field("return_matrix", &self.return_matrix)
            .field("return_cigar", &self.return_cigar)
            .finish()
    }
}

impl From<AlignmentParams> for AlignerParameters {
    fn from(params: AlignmentParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }
}

/// Validated alignment configuration, reusable across any number of pairs.
#[derive(Debug, Clone)]
pub struct Aligner {
    regime: Regime,
    gap: i32,
    scoring: Scoring,
    return_matrix: bool,
}

impl Aligner {
    pub fn new(params: AlignerParameters) -> Result<Self, AlignerError> {
        if params.return_cigar {
            return Err(AlignerError::CigarUnsupported);
        }
        let regime = params.params.resolve()?;
        let scoring = match params.score_fn {
            Some(f) => Scoring::Custom(f),
            None => Scoring::new(params.params.match_score, params.params.mismatch_score),
        };
        log::debug!("aligner configured: {:?}, gap {}, {:?}", regime, params.params.gap.open, scoring);
        Ok(Self {
            regime,
            gap: params.params.gap.open,
            scoring,
            return_matrix: params.return_matrix,
        })
    }

    pub fn align(&self, s: &[u8], t: &[u8]) -> Result<AlignmentResult, AlignerError> {
        let mut matrix = DpMatrix::for_sequences(s, t);
        log::debug!("filling {}x{} matrix", matrix.rows(), matrix.cols());

        matrix::initialize(&mut matrix, &self.regime, self.gap)?;
        matrix::fill(&mut matrix, s, t, &self.regime, self.gap, &self.scoring)?;

        let mut result =
            Traceback::new(&matrix, s, t, self.regime, self.gap, &self.scoring).reconstruct_alignment()?;
        if self.return_matrix {
            result.matrix = Some(matrix);
        }
        Ok(result)
    }

    pub fn align_sequences(&self, s: &Sequence, t: &Sequence) -> Result<AlignmentResult, AlignerError> {
        self.align(s.as_bytes(), t.as_bytes())
    }
}

/// One-shot alignment of `s` against `t`.
pub fn align(s: &[u8], t: &[u8], params: &AlignerParameters) -> Result<AlignmentResult, AlignerError> {
    Aligner::new(params.clone())?.align(s, t)
}
