/// A triangle is a cyclical three-hop trading path. Each hop ("leg") trades
/// through one pool via one router, so a triangle pins down three pools that
/// an execution would touch; those pool addresses double as the conflict keys
/// used by the selection pass.
use std::fmt::{self, Debug, Display};

use alloy::primitives::Address;

/// One hop of a triangle: the token sold into the hop, the router the hop
/// trades through, and the pool backing it.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct Leg {
    /// The token sold into this hop
    pub token: Address,
    /// The router the hop trades through
    pub router: Address,
    /// The pool backing the hop; shared-resource key for conflict detection
    pub pair: Address,
}

impl Debug for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} via {}", self.token, self.pair)
    }
}

/// A three-leg cyclical trading path, immutable after load.
///
/// The id is the backing-store primary key and stays unique across one index
/// snapshot. Legs are ordered: leg 0 sells `token0`, leg 1 sells the token
/// leg 0 bought, and leg 2 closes the cycle.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Triangle {
    /// Backing-store identifier, unique per snapshot
    pub id: i64,
    /// The three ordered hops of the cycle
    pub legs: [Leg; 3],
}

impl Triangle {
    /// Creates a triangle from its id and ordered legs.
    #[must_use]
    pub const fn new(id: i64, legs: [Leg; 3]) -> Self {
        Self { id, legs }
    }

    /// The three pool addresses, in leg order.
    ///
    /// These are the resource keys the selector deduplicates on: a pool may
    /// back at most one selected opportunity per run.
    #[must_use]
    pub const fn pairs(&self) -> [Address; 3] {
        [self.legs[0].pair, self.legs[1].pair, self.legs[2].pair]
    }

    /// The three token addresses, in leg order.
    #[must_use]
    pub const fn tokens(&self) -> [Address; 3] {
        [self.legs[0].token, self.legs[1].token, self.legs[2].token]
    }

    /// Whether this triangle shares a pool with `other`.
    #[must_use]
    pub fn conflicts_with(&self, other: &Self) -> bool {
        let theirs = other.pairs();
        self.pairs().iter().any(|pair| theirs.contains(pair))
    }
}

impl Debug for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Triangle(#{}, {:?}, {:?}, {:?})",
            self.id, self.legs[0], self.legs[1], self.legs[2]
        )
    }
}

impl Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "triangle #{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use crate::arb::test_helpers::*;

    #[test]
    fn test_pairs_in_leg_order() {
        let t = triangle(7, ("P0", "P1", "P2"));
        let pairs = t.pairs();
        assert_eq!(pairs[0], addr("P0"));
        assert_eq!(pairs[1], addr("P1"));
        assert_eq!(pairs[2], addr("P2"));
    }

    #[test]
    fn test_conflicts_with_shared_pool() {
        let a = triangle(1, ("X", "Y", "Z"));
        let b = triangle(2, ("Y", "W", "V"));
        let c = triangle(3, ("Q", "R", "S"));

        assert!(a.conflicts_with(&b));
        assert!(b.conflicts_with(&a));
        assert!(!a.conflicts_with(&c));
    }
}
