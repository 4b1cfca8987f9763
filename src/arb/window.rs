/// The search window the resolver slides across the trade-ratio domain. A ranged
/// window is sampled in `pieces` equal sub-steps by one oracle call; the
/// degenerate point window re-reads a single ratio in full detail.
use std::fmt::{self, Display};

/// Stage widths of the coarse-to-fine ladder, in domain units.
///
/// Each ranged stage divides its window into [`PIECES`] sub-steps, so the
/// next stage's width is the current sub-step width; the trailing `1` is the
/// exact-point confirmation. These are policy constants kept for
/// compatibility with the deployed quoter, overridable via
/// [`crate::arb::resolver::ResolverConfig`].
pub const STAGE_WIDTHS: [u64; 5] = [10_000, 1_000, 100, 10, 1];

/// Sub-steps sampled per ranged oracle call.
pub const PIECES: u64 = 10;

/// A sampling window over the trade-ratio domain.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SearchWindow {
    /// Inclusive lower bound of the window
    pub start: u64,
    /// Exclusive upper bound for ranged windows; equals `start` for a point
    pub end: u64,
    /// Number of equal sub-steps the oracle samples
    pub pieces: u64,
}

impl SearchWindow {
    /// A ranged stage window `[start, start + width)` sampled in `pieces`
    /// sub-steps.
    #[must_use]
    pub fn stage(start: u64, width: u64, pieces: u64) -> Self {
        debug_assert!(width > 0 && pieces >= 1);
        Self {
            start,
            end: start + width,
            pieces,
        }
    }

    /// The exact-point window `start = end = point, pieces = 1` used for the
    /// confirmation query.
    #[must_use]
    pub const fn point(point: u64) -> Self {
        Self {
            start: point,
            end: point,
            pieces: 1,
        }
    }

    /// Whether this is the degenerate single-point window.
    #[must_use]
    pub const fn is_point(&self) -> bool {
        self.start == self.end
    }

    /// Width of one sub-step.
    #[must_use]
    pub const fn sub_step(&self) -> u64 {
        (self.end - self.start) / self.pieces
    }

    /// The sub-window at refinement offset `index`.
    ///
    /// Offsets at or past `pieces` are clamped to the last sub-step, so a
    /// stage that saw no breakeven degrades to the end of its window instead
    /// of failing.
    #[must_use]
    pub fn narrow(&self, index: u64) -> Self {
        let index = index.min(self.pieces - 1);
        let sub = self.sub_step();
        Self {
            start: self.start + sub * index,
            end: self.start + sub * index + sub,
            pieces: self.pieces,
        }
    }
}

impl Display for SearchWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}) x{}", self.start, self.end, self.pieces)
    }
}
