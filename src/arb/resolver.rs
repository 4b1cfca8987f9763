/// Coarse-to-fine breakeven search for one triangle.
///
/// The profit function over the trade-ratio domain is monotonically
/// non-increasing, so each stage needs just one oracle call: sample the
/// current window in ten sub-steps, find the first sub-step whose
/// representative profit is zero, and recurse into it at a tenth of the
/// width. Four ranged stages take `[0, 10000)` down to a single ratio; one
/// exact-point call then confirms the profit and supplies the payload
/// fields.
use std::time::Duration;

use alloy::primitives::I256;
use eyre::{eyre, Result, WrapErr};
use log::debug;

use super::calldata::build_payload;
use super::opportunity::Opportunity;
use super::sample::RoiVector;
use super::triangle::Triangle;
use super::window::{SearchWindow, PIECES, STAGE_WIDTHS};
use crate::oracle::RoiOracle;

/// Search policy for the resolver.
///
/// The defaults reproduce the deployed quoter's contract: a decade ladder
/// over `[0, 10000)`, ten sub-steps per stage, and a five-million-unit
/// minimum profit. They are configuration, not derivation; change them only
/// together with the quoter.
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Stage widths, coarse to fine; the final width-1 entry is the
    /// confirmation query
    pub stage_widths: [u64; 5],
    /// Sub-steps sampled per ranged stage
    pub pieces: u64,
    /// Minimum confirmed profit, inclusive
    pub min_profit: I256,
    /// Per-oracle-call deadline
    pub call_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            stage_widths: STAGE_WIDTHS,
            pieces: PIECES,
            min_profit: I256::try_from(5_000_000u64).unwrap_or(I256::ZERO),
            call_timeout: Duration::from_secs(5),
        }
    }
}

/// Resolves one triangle against the oracle.
///
/// Returns `Ok(Some(_))` for a confirmed opportunity, `Ok(None)` when the
/// search terminates without one (degenerate zero point, missing profit
/// field, or profit below the threshold), and `Err` on the first failed
/// oracle call or payload assembly. No retry is attempted; a failure aborts
/// only this candidate.
///
/// Call budget: exactly `stage_widths.len() - 1` ranged samples plus at most
/// one exact-point sample.
///
/// # Errors
/// Returns an error when an oracle call fails or times out, or when payload
/// assembly fails for an otherwise profitable candidate.
pub async fn resolve(
    oracle: &dyn RoiOracle,
    cfg: &ResolverConfig,
    triangle: &Triangle,
) -> Result<Option<Opportunity>> {
    let mut window = SearchWindow::stage(0, cfg.stage_widths[0], cfg.pieces);

    for stage in 0..cfg.stage_widths.len() - 1 {
        let words = sample_with_deadline(oracle, cfg, triangle, &window).await?;
        let index = RoiVector::new(words).breakeven_index();
        debug!(
            "{triangle}: stage {stage} window {window} -> offset {}",
            index.min(cfg.pieces - 1)
        );
        let narrowed = window.narrow(index);
        window = if stage + 1 < cfg.stage_widths.len() - 1 {
            SearchWindow::stage(narrowed.start, cfg.stage_widths[stage + 1], cfg.pieces)
        } else {
            narrowed
        };
    }

    // The final stage has sub-step width 1, so its narrowed start is the
    // resolved point. Ratio zero is defined as non-actionable.
    let point = window.start;
    if point == 0 {
        return Ok(None);
    }

    let words =
        sample_with_deadline(oracle, cfg, triangle, &SearchWindow::point(point)).await?;
    let frame = RoiVector::new(words);

    let Some(profit) = frame.profit() else {
        debug!("{triangle}: point {point} reply carries no profit field");
        return Ok(None);
    };
    if profit < cfg.min_profit {
        debug!("{triangle}: profit {profit} below threshold at point {point}");
        return Ok(None);
    }

    let payload = build_payload(triangle, &frame)
        .wrap_err_with(|| format!("payload assembly failed for {triangle}"))?;

    Ok(Some(Opportunity {
        triangle: triangle.clone(),
        point,
        payload,
        profit,
    }))
}

/// One oracle call under the configured per-call deadline.
async fn sample_with_deadline(
    oracle: &dyn RoiOracle,
    cfg: &ResolverConfig,
    triangle: &Triangle,
    window: &SearchWindow,
) -> Result<Vec<I256>> {
    tokio::time::timeout(cfg.call_timeout, oracle.sample(triangle, window))
        .await
        .map_err(|_| eyre!("oracle call timed out after {:?} for {triangle}", cfg.call_timeout))?
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    #[tokio::test]
    async fn test_converges_to_known_breakeven() {
        for breakeven in [1u64, 9, 10, 4_327, 5_000, 9_998] {
            let oracle = SyntheticOracle::with_breakeven(breakeven);
            let t = triangle(1, ("P0", "P1", "P2"));
            let opportunity = resolve(&oracle, &ResolverConfig::default(), &t)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(opportunity.point, breakeven, "breakeven {breakeven}");
        }
    }

    #[tokio::test]
    async fn test_call_budget() {
        let oracle = SyntheticOracle::with_breakeven(4_327);
        let t = triangle(1, ("P0", "P1", "P2"));
        resolve(&oracle, &ResolverConfig::default(), &t)
            .await
            .unwrap();

        assert_eq!(oracle.ranged_calls(), 4);
        assert_eq!(oracle.point_calls(), 1);
    }

    #[tokio::test]
    async fn test_zero_point_is_no_opportunity() {
        let oracle = SyntheticOracle::with_breakeven(0);
        let t = triangle(1, ("P0", "P1", "P2"));
        let resolved = resolve(&oracle, &ResolverConfig::default(), &t)
            .await
            .unwrap();

        assert!(resolved.is_none());
        // The search still walks every ranged stage but skips confirmation.
        assert_eq!(oracle.ranged_calls(), 4);
        assert_eq!(oracle.point_calls(), 0);
    }

    #[tokio::test]
    async fn test_all_profitable_window_degrades_to_last_sub_step() {
        // Every sub-step of every stage reports nonzero profit, so each
        // stage narrows to its last sub-step and the point lands on 9999.
        let oracle = SyntheticOracle::with_breakeven(u64::MAX);
        let t = triangle(1, ("P0", "P1", "P2"));
        let opportunity = resolve(&oracle, &ResolverConfig::default(), &t)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(opportunity.point, 9_999);
    }

    #[tokio::test]
    async fn test_threshold_is_inclusive() {
        let t = triangle(1, ("P0", "P1", "P2"));
        let cfg = ResolverConfig::default();

        let at_threshold = SyntheticOracle::with_breakeven(4_327).profit(5_000_000);
        assert!(resolve(&at_threshold, &cfg, &t).await.unwrap().is_some());

        let below = SyntheticOracle::with_breakeven(4_327).profit(4_999_999);
        assert!(resolve(&below, &cfg, &t).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_oracle_failure_aborts_candidate() {
        let oracle = FailingOracle::after(2);
        let t = triangle(1, ("P0", "P1", "P2"));
        let resolved = resolve(&oracle, &ResolverConfig::default(), &t).await;

        assert!(resolved.is_err());
        assert_eq!(oracle.calls(), 3); // two successes, one failure, no retry
    }

    #[tokio::test]
    async fn test_opportunity_carries_payload_and_profit() {
        let oracle = SyntheticOracle::with_breakeven(4_327).profit(7_000_000);
        let t = triangle(1, ("P0", "P1", "P2"));
        let opportunity = resolve(&oracle, &ResolverConfig::default(), &t)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(opportunity.profit, I256::try_from(7_000_000).unwrap());
        assert_eq!(opportunity.payload.len(), 8 + 2 + 9 * 40 + 6 * 24);
        assert_eq!(opportunity.triangle.id, 1);
    }
}
