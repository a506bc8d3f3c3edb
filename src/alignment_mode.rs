use std::fmt;
use std::str::FromStr;

use crate::{AlignerError, DEFAULT_GAP, DEFAULT_MATCH, DEFAULT_MISMATCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentMode {
    Global,     // Needleman-Wunsch
    Local,      // Smith-Waterman
    SemiGlobal, // Free end-gaps
}

impl fmt::Display for AlignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlignmentMode::Global => "global",
            AlignmentMode::Local => "local",
            AlignmentMode::SemiGlobal => "semi-global",
        };
        f.write_str(name)
    }
}

impl FromStr for AlignmentMode {
    type Err = AlignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "global" => Ok(AlignmentMode::Global),
            "local" => Ok(AlignmentMode::Local),
            "semi-global" | "semiglobal" => Ok(AlignmentMode::SemiGlobal),
            _ => Err(AlignerError::InvalidMode(s.to_string())),
        }
    }
}

/// Gap penalty policy. Only the linear model (`open == extend`) is aligned
/// today; the pair is kept so callers do not change when affine lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapScheme {
    pub open: i32,
    pub extend: i32,
}

impl GapScheme {
    pub fn linear(gap: i32) -> Self {
        Self {
            open: gap,
            extend: gap,
        }
    }

    pub fn is_linear(&self) -> bool {
        self.open == self.extend
    }
}

impl Default for GapScheme {
    fn default() -> Self {
        Self::linear(DEFAULT_GAP)
    }
}

/// Which end regions may be left unaligned without penalty in semi-global
/// mode.
///
/// `begin_t` lets the alignment skip a prefix of T for free, `begin_s` a
/// prefix of S. `end_s` lets T run on past the end of S for free, `end_t`
/// lets S run on past the end of T.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FreeEnds {
    pub begin_s: bool,
    pub begin_t: bool,
    pub end_s: bool,
    pub end_t: bool,
}

impl FreeEnds {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            begin_s: true,
            begin_t: true,
            end_s: true,
            end_t: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.begin_s || self.begin_t || self.end_s || self.end_t)
    }

    /// The flags that describe the same alignment with S and T exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            begin_s: self.begin_t,
            begin_t: self.begin_s,
            end_s: self.end_t,
            end_t: self.end_s,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentParams {
    pub mode: AlignmentMode,
    pub gap: GapScheme,
    pub match_score: i32,
    pub mismatch_score: i32,
    pub free: Option<FreeEnds>,
}

impl Default for AlignmentParams {
    fn default() -> Self {
        Self {
            mode: AlignmentMode::Global,
            gap: GapScheme::default(),
            match_score: DEFAULT_MATCH,
            mismatch_score: DEFAULT_MISMATCH,
            free: None,
        }
    }
}

impl AlignmentParams {
    /// Checks the mode/free-end combination and collapses it into the regime
    /// the matrix code runs on.
    pub(crate) fn resolve(&self) -> Result<Regime, AlignerError> {
        if !self.gap.is_linear() {
            return Err(AlignerError::AffineGapUnsupported {
                open: self.gap.open,
                extend: self.gap.extend,
            });
        }
        match (self.mode, self.free) {
            (AlignmentMode::Global, None) => Ok(Regime::Global),
            (AlignmentMode::Local, None) => Ok(Regime::Local),
            (mode @ (AlignmentMode::Global | AlignmentMode::Local), Some(_)) => {
                Err(AlignerError::FreeEndsRequireSemiGlobal(mode))
            }
            (AlignmentMode::SemiGlobal, free) => match free {
                Some(free) if !free.is_empty() => Ok(Regime::SemiGlobal(free)),
                _ => {
                    log::debug!("semi-global without free ends, aligning globally");
                    Ok(Regime::Global)
                }
            },
        }
    }
}

/// Resolved alignment regime. Semi-global always carries at least one free
/// end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Regime {
    Global,
    Local,
    SemiGlobal(FreeEnds),
}

impl Regime {
    pub(crate) fn clamps_at_zero(&self) -> bool {
        matches!(self, Regime::Local)
    }

    pub(crate) fn free_ends(&self) -> FreeEnds {
        match self {
            Regime::SemiGlobal(free) => *free,
            _ => FreeEnds::none(),
        }
    }

    /// Penalty for stepping down into column `j` (consuming S against a gap
    /// in T). Free once T is exhausted and its end is free.
    pub(crate) fn up_penalty(&self, gap: i32, j: usize, n: usize) -> i32 {
        if self.free_ends().end_t && j >= n {
            0
        } else {
            gap
        }
    }

    /// Penalty for stepping right along row `i` (consuming T against a gap
    /// in S). Free once S is exhausted and its end is free.
    pub(crate) fn left_penalty(&self, gap: i32, i: usize, m: usize) -> i32 {
        if self.free_ends().end_s && i >= m {
            0
        } else {
            gap
        }
    }
}
