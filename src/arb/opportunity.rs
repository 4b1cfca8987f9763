/// A confirmed opportunity and the per-candidate outcome the dispatch layer
/// aggregates. Opportunities are transient: they live for one scan batch and
/// are superseded by the next.
use std::fmt::{self, Debug};

use alloy::primitives::I256;

use super::triangle::Triangle;

/// A candidate with a confirmed above-threshold profit at its resolved
/// trade-ratio point, plus the packed payload an execution would submit.
#[derive(Clone)]
pub struct Opportunity {
    /// The triangle the opportunity was found on
    pub triangle: Triangle,
    /// The resolved trade-ratio point
    pub point: u64,
    /// Packed execution payload, hex without `0x`
    pub payload: String,
    /// Confirmed profit at `point`
    pub profit: I256,
}

impl Debug for Opportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Opportunity(#{} @ {} profit {})",
            self.triangle.id, self.point, self.profit
        )
    }
}

/// The single outcome every dispatched candidate produces.
#[derive(Clone, Debug)]
pub enum Outcome {
    /// The search confirmed a profitable point
    Hit(Opportunity),
    /// The search terminated without a usable point; not an error
    Miss,
    /// An oracle call or payload assembly failed; the candidate was dropped
    Failed(String),
}

impl Outcome {
    /// Whether this outcome carries an opportunity.
    #[must_use]
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    /// Consumes the outcome, yielding its opportunity if any.
    #[must_use]
    pub fn into_opportunity(self) -> Option<Opportunity> {
        match self {
            Self::Hit(opportunity) => Some(opportunity),
            _ => None,
        }
    }
}
