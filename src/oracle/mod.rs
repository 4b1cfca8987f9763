//! Collaborator interfaces the scan pipeline consumes.
//!
//! The quoter oracle and the gas estimator live behind traits so the
//! resolver and selector stay independent of the transport; the production
//! adapters in [`eth_call`] speak to the chain through an alloy provider,
//! and the test suite substitutes synthetic implementations.

/// Alloy-backed production adapters
pub mod eth_call;

use alloy::primitives::I256;
use async_trait::async_trait;
use eyre::Result;

use crate::arb::triangle::Triangle;
use crate::arb::window::SearchWindow;

/// The profit-sampling oracle.
///
/// One call samples a triangle across a [`SearchWindow`] and returns the
/// decoded reply words (leading block plus one tuple per sub-step, see
/// [`crate::arb::sample`]). Exact-point confirmation reuses the same
/// entrypoint with a point window, mirroring the quoter contract's single
/// query function.
#[async_trait]
pub trait RoiOracle: Send + Sync {
    /// Samples `triangle` across `window`.
    ///
    /// # Errors
    /// Returns an error when the underlying call fails or reverts; the
    /// caller treats any failure as terminal for the candidate.
    async fn sample(&self, triangle: &Triangle, window: &SearchWindow) -> Result<Vec<I256>>;
}

/// The execution cost estimator.
///
/// Estimation failures are not fatal to a scan; callers log them and treat
/// the contribution as zero.
#[async_trait]
pub trait CostEstimator: Send + Sync {
    /// Estimated execution cost of submitting `payload`.
    ///
    /// # Errors
    /// Returns an error when the underlying estimation call fails.
    async fn estimate(&self, payload: &[u8]) -> Result<u64>;
}
