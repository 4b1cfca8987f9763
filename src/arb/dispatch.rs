/// Fan-out of one breakeven search per candidate under a fixed concurrency
/// budget, fan-in of every outcome into a single batch.
///
/// The quoter endpoint's tolerance for parallelism is unknown, so dispatch
/// is bounded by a semaphore instead of spawning one unchecked task per
/// candidate. Results land in a sink sized to the batch so no worker ever
/// blocks on a full channel, and the aggregator drains it only after every
/// worker has finished.
use std::sync::Arc;

use futures_util::future::join_all;
use log::{info, warn};
use tokio::sync::{mpsc, Semaphore};

use super::opportunity::Outcome;
use super::resolver::{resolve, ResolverConfig};
use super::triangle::Triangle;
use crate::oracle::RoiOracle;

/// Runs one resolver per triangle and collects every outcome.
///
/// Each of the N submitted candidates yields exactly one [`Outcome`] — a
/// hit, a miss, or a failure — for every worker budget; a worker that dies
/// mid-flight is recorded as a failure rather than silently dropped. The
/// returned batch carries no ordering relative to the input: callers must
/// treat it as an unordered multiset tagged by outcome kind.
pub async fn run_batch(
    oracle: Arc<dyn RoiOracle>,
    cfg: ResolverConfig,
    triangles: Vec<Triangle>,
    workers: usize,
) -> Vec<Outcome> {
    let total = triangles.len();
    let (tx, mut rx) = mpsc::channel::<Outcome>(total.max(1));
    let permits = Arc::new(Semaphore::new(workers.max(1)));
    let cfg = Arc::new(cfg);

    let mut handles = Vec::with_capacity(total);
    for triangle in triangles {
        let oracle = Arc::clone(&oracle);
        let cfg = Arc::clone(&cfg);
        let permits = Arc::clone(&permits);
        let tx = tx.clone();

        handles.push(tokio::spawn(async move {
            // The semaphore is never closed, so the permit always arrives.
            let _permit = permits.acquire_owned().await.ok();
            let outcome = match resolve(oracle.as_ref(), &cfg, &triangle).await {
                Ok(Some(opportunity)) => Outcome::Hit(opportunity),
                Ok(None) => Outcome::Miss,
                Err(error) => Outcome::Failed(format!("{error:#}")),
            };
            // Sink capacity equals the batch size; this never blocks.
            let _ = tx.send(outcome).await;
        }));
    }
    drop(tx);

    // Completion barrier: every submitted task reports before the sink is
    // drained.
    let joined = join_all(handles).await;

    let mut outcomes = Vec::with_capacity(total);
    for result in joined {
        if let Err(error) = result {
            warn!("resolver worker died: {error}");
            outcomes.push(Outcome::Failed(format!("resolver worker died: {error}")));
        }
    }
    while let Some(outcome) = rx.recv().await {
        outcomes.push(outcome);
    }

    let hits = outcomes.iter().filter(|o| o.is_hit()).count();
    let failures = outcomes
        .iter()
        .filter(|o| matches!(o, Outcome::Failed(_)))
        .count();
    info!(
        "dispatch: {total} candidates -> {hits} hits, {} misses, {failures} failures",
        outcomes.len() - hits - failures
    );

    outcomes
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    /// Outcome counts split by kind.
    fn count_kinds(outcomes: &[Outcome]) -> (usize, usize, usize) {
        let hits = outcomes.iter().filter(|o| o.is_hit()).count();
        let misses = outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Miss))
            .count();
        let failures = outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Failed(_)))
            .count();
        (hits, misses, failures)
    }

    #[tokio::test]
    async fn test_every_candidate_yields_one_outcome() {
        // 30 candidates: ids divisible by 3 fail at the oracle, ids
        // divisible by 2 (and not 3) resolve to the zero point, the rest
        // confirm opportunities.
        for workers in [1usize, 4, 64] {
            let oracle = Arc::new(MixedOracle::new());
            let triangles: Vec<_> = (1..=30)
                .map(|id| triangle(id, ("A", "B", "C")))
                .collect();

            let outcomes =
                run_batch(oracle, ResolverConfig::default(), triangles, workers).await;

            assert_eq!(outcomes.len(), 30, "workers={workers}");
            let (hits, misses, failures) = count_kinds(&outcomes);
            assert_eq!(hits, 10, "workers={workers}");
            assert_eq!(misses, 10, "workers={workers}");
            assert_eq!(failures, 10, "workers={workers}");
        }
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let oracle = Arc::new(SyntheticOracle::with_breakeven(100));
        let outcomes = run_batch(oracle, ResolverConfig::default(), Vec::new(), 4).await;
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_single_worker_serializes_without_loss() {
        let oracle = Arc::new(SyntheticOracle::with_breakeven(4_327));
        let triangles: Vec<_> = (1..=8).map(|id| triangle(id, ("A", "B", "C"))).collect();

        let outcomes = run_batch(oracle.clone(), ResolverConfig::default(), triangles, 1).await;

        assert_eq!(outcomes.len(), 8);
        assert!(outcomes.iter().all(Outcome::is_hit));
        // 4 ranged + 1 point call per candidate.
        assert_eq!(oracle.ranged_calls(), 32);
        assert_eq!(oracle.point_calls(), 8);
    }
}
