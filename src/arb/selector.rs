/// Conflict-free selection over one batch of confirmed opportunities.
///
/// A pool may back at most one executed opportunity per run, so the batch is
/// reduced to a pool-disjoint subset: profit-descending stable sort, then a
/// greedy scan that drops any opportunity sharing a pool with one already
/// accepted. This is a greedy weighted-independent-set approximation, kept
/// deliberately — feasible and profit-prioritized, not optimal.
use std::collections::HashSet;

use alloy::primitives::Address;
use log::error;

use super::opportunity::Opportunity;
use crate::oracle::CostEstimator;

/// Filters a batch down to a pool-disjoint, profit-descending subset.
///
/// The sort is stable, so opportunities with equal profit keep their
/// arrival order and the earlier one wins any pool conflict between them.
#[must_use]
pub fn select_disjoint(mut opportunities: Vec<Opportunity>) -> Vec<Opportunity> {
    opportunities.sort_by(|a, b| b.profit.cmp(&a.profit));

    let mut taken_pairs: HashSet<Address> = HashSet::new();
    let mut selected = Vec::new();
    for opportunity in opportunities {
        let pairs = opportunity.triangle.pairs();
        if pairs.iter().any(|pair| taken_pairs.contains(pair)) {
            continue;
        }
        taken_pairs.extend(pairs);
        selected.push(opportunity);
    }
    selected
}

/// Sums the estimated execution cost over a selection.
///
/// A failed estimate is logged and contributes zero; one bad payload must
/// not sink the batch total.
pub async fn estimate_total_cost(
    estimator: &dyn CostEstimator,
    selected: &[Opportunity],
) -> u64 {
    let mut total = 0u64;
    for opportunity in selected {
        let payload = match hex::decode(&opportunity.payload) {
            Ok(payload) => payload,
            Err(e) => {
                error!("cost estimate skipped, bad payload for {}: {e}", opportunity.triangle);
                continue;
            }
        };
        match estimator.estimate(&payload).await {
            Ok(cost) => total = total.saturating_add(cost),
            Err(e) => error!("cost estimate failed for {}: {e}", opportunity.triangle),
        }
    }
    total
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    #[test]
    fn test_drops_pool_conflicts_by_profit() {
        let batch = vec![
            opportunity(2, ("Y", "W", "V"), 8),
            opportunity(1, ("X", "Y", "Z"), 10),
            opportunity(3, ("Q", "R", "S"), 5),
        ];

        let selected = select_disjoint(batch);

        // B (profit 8) shares pool Y with A (profit 10) and is dropped.
        let ids: Vec<i64> = selected.iter().map(|o| o.triangle.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_output_is_profit_descending() {
        let batch = vec![
            opportunity(1, ("A", "B", "C"), 5),
            opportunity(2, ("D", "E", "F"), 50),
            opportunity(3, ("G", "H", "I"), 20),
        ];

        let profits: Vec<i64> = select_disjoint(batch)
            .iter()
            .map(|o| i64::try_from(o.profit).unwrap())
            .collect();
        assert_eq!(profits, vec![50, 20, 5]);
    }

    #[test]
    fn test_equal_profit_keeps_arrival_order() {
        let batch = vec![
            opportunity(7, ("X", "B", "C"), 10),
            opportunity(8, ("X", "E", "F"), 10),
        ];

        // Same profit, shared pool X: the first-arrived opportunity wins.
        let selected = select_disjoint(batch);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].triangle.id, 7);
    }

    #[test]
    fn test_empty_batch() {
        assert!(select_disjoint(Vec::new()).is_empty());
    }

    #[tokio::test]
    async fn test_cost_estimation_treats_failures_as_zero() {
        let batch = vec![
            opportunity(1, ("A", "B", "C"), 10),
            opportunity(2, ("D", "E", "F"), 8),
            opportunity(3, ("G", "H", "I"), 5),
        ];
        // Fails on triangle 2's payload, charges 21000 for the others.
        let estimator = FlakyEstimator::failing_on(batch[1].payload.clone());

        let total = estimate_total_cost(&estimator, &batch).await;
        assert_eq!(total, 42_000);
    }
}
