//! Alloy-backed adapters speaking to the deployed quoter contract over a
//! read-only provider.

use alloy::network::{Ethereum, TransactionBuilder};
use alloy::primitives::{Address, Bytes, I256, U256};
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use async_trait::async_trait;
use eyre::{Result, WrapErr};

use super::{CostEstimator, RoiOracle};
use crate::arb::triangle::Triangle;
use crate::arb::window::SearchWindow;

// The quoter simulates the three-hop cycle across the requested window and
// returns the raw word vector; both ranged and exact-point queries go through
// the same entrypoint.
sol! {
    #[sol(rpc)]
    contract TriangleQuoter {
        struct Triangular {
            address token0;
            address router0;
            address pair0;
            address token1;
            address router1;
            address pair1;
            address token2;
            address router2;
            address pair2;
        }

        function arbitrageQuery(
            Triangular calldata t,
            uint256 startRatio,
            uint256 endRatio,
            uint256 pieces
        ) external view returns (int256[] memory roi);
    }
}

/// Gas ceiling for quoter calls; the simulation walks three pools per
/// sub-step and needs far more than a default call allowance.
const QUOTER_CALL_GAS: u64 = 30_000_000;

/// Production [`RoiOracle`] issuing `eth_call` quoter queries.
pub struct EthCallOracle {
    /// Read-only provider the calls go through
    provider: RootProvider<Ethereum>,
    /// Caller address the quoter sees as `msg.sender`
    from: Address,
    /// Deployed quoter contract
    quoter: Address,
}

impl EthCallOracle {
    /// An oracle issuing quoter calls from `from` to the contract at
    /// `quoter`.
    #[must_use]
    pub const fn new(provider: RootProvider<Ethereum>, from: Address, quoter: Address) -> Self {
        Self {
            provider,
            from,
            quoter,
        }
    }

    /// The quoter's path argument: each leg contributes its token, router
    /// and pool.
    fn path(triangle: &Triangle) -> TriangleQuoter::Triangular {
        let [a, b, c] = &triangle.legs;
        TriangleQuoter::Triangular {
            token0: a.token,
            router0: a.router,
            pair0: a.pair,
            token1: b.token,
            router1: b.router,
            pair1: b.pair,
            token2: c.token,
            router2: c.router,
            pair2: c.pair,
        }
    }
}

#[async_trait]
impl RoiOracle for EthCallOracle {
    async fn sample(&self, triangle: &Triangle, window: &SearchWindow) -> Result<Vec<I256>> {
        let quoter = TriangleQuoter::new(self.quoter, &self.provider);
        let reply = quoter
            .arbitrageQuery(
                Self::path(triangle),
                U256::from(window.start),
                U256::from(window.end),
                U256::from(window.pieces),
            )
            .from(self.from)
            .gas(QUOTER_CALL_GAS)
            .call()
            .await
            .wrap_err_with(|| format!("quoter query failed for {triangle} over {window}"))?;
        Ok(reply.roi)
    }
}

/// Production [`CostEstimator`] backed by `eth_estimateGas`.
pub struct EthCostEstimator {
    /// Read-only provider the estimates go through
    provider: RootProvider<Ethereum>,
    /// Sender the simulated submission runs as
    from: Address,
    /// Contract the packed payload targets
    to: Address,
}

impl EthCostEstimator {
    /// An estimator simulating payload submission from `from` to the
    /// contract at `to`.
    #[must_use]
    pub const fn new(provider: RootProvider<Ethereum>, from: Address, to: Address) -> Self {
        Self { provider, from, to }
    }
}

#[async_trait]
impl CostEstimator for EthCostEstimator {
    async fn estimate(&self, payload: &[u8]) -> Result<u64> {
        let tx = TransactionRequest::default()
            .with_from(self.from)
            .with_to(self.to)
            .with_input(Bytes::from(payload.to_vec()));
        let gas = self
            .provider
            .estimate_gas(&tx)
            .await
            .wrap_err("gas estimation call failed")?;
        Ok(gas)
    }
}
