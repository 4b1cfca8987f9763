#![allow(dead_code)]
//! Shared builders and synthetic collaborators for the test suite.

use std::sync::atomic::{AtomicUsize, Ordering};

use alloy::primitives::{keccak256, Address, I256, U256};
use async_trait::async_trait;
use eyre::{bail, Result};

use super::opportunity::Opportunity;
use super::sample::{LEADING_WORDS, TUPLE_WORDS};
use super::triangle::{Leg, Triangle};
use super::window::SearchWindow;
use crate::oracle::{CostEstimator, RoiOracle};

/// A deterministic address derived from a short label.
pub fn addr(label: &str) -> Address {
    Address::from_word(keccak256(label.as_bytes()))
}

/// A triangle whose three pools carry the given labels; tokens and routers
/// are derived from the pool labels.
pub fn triangle(id: i64, pairs: (&str, &str, &str)) -> Triangle {
    let leg = |pair: &str| Leg {
        token: addr(&format!("token-{pair}")),
        router: addr(&format!("router-{pair}")),
        pair: addr(pair),
    };
    Triangle::new(id, [leg(pairs.0), leg(pairs.1), leg(pairs.2)])
}

/// A confirmed opportunity with the given pools and profit.
pub fn opportunity(id: i64, pairs: (&str, &str, &str), profit: i64) -> Opportunity {
    Opportunity {
        triangle: triangle(id, pairs),
        point: 1_000,
        payload: format!("{id:08x}"),
        profit: I256::try_from(profit).unwrap_or(I256::ZERO),
    }
}

/// An 8-word sub-step tuple whose representative profit is `profit`.
pub fn tuple_with_profit(profit: i64) -> Vec<I256> {
    tuple_from(I256::try_from(profit).unwrap_or(I256::ZERO))
}

/// A 14-word exact-point reply with the given address and profit words.
pub fn detail_words(a: Address, b: Address, c: Address, profit: i64) -> Vec<I256> {
    let as_word = |address: Address| I256::from_raw(U256::from_be_bytes(address.into_word().0));
    let mut words = vec![I256::ZERO; LEADING_WORDS + TUPLE_WORDS];
    words[0] = as_word(a);
    words[1] = as_word(b);
    words[2] = as_word(c);
    for (offset, value) in (3..14).zip(100i64..) {
        words[offset] = I256::try_from(value).unwrap_or(I256::ZERO);
    }
    words[12] = I256::try_from(profit).unwrap_or(I256::ZERO);
    words
}

/// The synthetic profit function: positive and decreasing up to the
/// breakeven ratio, zero strictly past it.
fn monotone_profit(breakeven: u64, ratio: u64) -> I256 {
    if ratio > breakeven {
        I256::ZERO
    } else {
        I256::try_from(breakeven.saturating_sub(ratio).saturating_add(1)).unwrap_or(I256::MAX)
    }
}

/// A ranged reply: each sub-step's representative profit is the function
/// value at that sub-step's upper edge.
fn ranged_reply(breakeven: u64, window: &SearchWindow) -> Vec<I256> {
    let sub = window.sub_step();
    let mut words = vec![I256::ZERO; LEADING_WORDS];
    for i in 0..window.pieces {
        words.extend(tuple_from(monotone_profit(
            breakeven,
            window.start + sub * (i + 1),
        )));
    }
    words
}

/// An 8-word tuple with the given representative word.
fn tuple_from(representative: I256) -> Vec<I256> {
    let mut tuple = vec![I256::ZERO; TUPLE_WORDS];
    tuple[0] = representative;
    tuple
}

/// An oracle over a synthetic monotonic profit curve with a known breakeven
/// ratio, counting its calls by kind.
pub struct SyntheticOracle {
    /// Last profitable ratio of the synthetic curve
    breakeven: u64,
    /// Profit reported by exact-point replies at or below the breakeven
    profit_value: i64,
    /// Ranged sample calls served
    ranged: AtomicUsize,
    /// Exact-point calls served
    point: AtomicUsize,
}

impl SyntheticOracle {
    /// An oracle whose curve stays profitable up to and including
    /// `breakeven`.
    pub fn with_breakeven(breakeven: u64) -> Self {
        Self {
            breakeven,
            profit_value: 6_000_000,
            ranged: AtomicUsize::new(0),
            point: AtomicUsize::new(0),
        }
    }

    /// Overrides the profit reported at the resolved point.
    pub fn profit(mut self, profit_value: i64) -> Self {
        self.profit_value = profit_value;
        self
    }

    /// Ranged sample calls served so far.
    pub fn ranged_calls(&self) -> usize {
        self.ranged.load(Ordering::SeqCst)
    }

    /// Exact-point calls served so far.
    pub fn point_calls(&self) -> usize {
        self.point.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoiOracle for SyntheticOracle {
    async fn sample(&self, _triangle: &Triangle, window: &SearchWindow) -> Result<Vec<I256>> {
        if window.is_point() {
            self.point.fetch_add(1, Ordering::SeqCst);
            let profit = if window.start <= self.breakeven {
                self.profit_value
            } else {
                0
            };
            Ok(detail_words(addr("ra"), addr("rb"), addr("rc"), profit))
        } else {
            self.ranged.fetch_add(1, Ordering::SeqCst);
            Ok(ranged_reply(self.breakeven, window))
        }
    }
}

/// An oracle that serves a fixed number of calls and then fails.
pub struct FailingOracle {
    /// Calls served before the failure
    healthy_calls: usize,
    /// Total calls observed
    calls: AtomicUsize,
}

impl FailingOracle {
    /// Fails every call after the first `healthy_calls`.
    pub fn after(healthy_calls: usize) -> Self {
        Self {
            healthy_calls,
            calls: AtomicUsize::new(0),
        }
    }

    /// Total calls observed, including the failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoiOracle for FailingOracle {
    async fn sample(&self, _triangle: &Triangle, window: &SearchWindow) -> Result<Vec<I256>> {
        let served = self.calls.fetch_add(1, Ordering::SeqCst);
        if served >= self.healthy_calls {
            bail!("oracle unavailable");
        }
        Ok(ranged_reply(5_000, window))
    }
}

/// An oracle whose behavior depends on the triangle id: ids divisible by 3
/// fail, remaining even ids resolve to the zero point, the rest confirm an
/// opportunity.
pub struct MixedOracle;

impl MixedOracle {
    /// Creates the composite oracle.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RoiOracle for MixedOracle {
    async fn sample(&self, triangle: &Triangle, window: &SearchWindow) -> Result<Vec<I256>> {
        if triangle.id % 3 == 0 {
            bail!("oracle unavailable for triangle {}", triangle.id);
        }
        let breakeven = if triangle.id % 2 == 0 { 0 } else { 4_327 };
        if window.is_point() {
            let profit = if window.start <= breakeven { 6_000_000 } else { 0 };
            Ok(detail_words(addr("ra"), addr("rb"), addr("rc"), profit))
        } else {
            Ok(ranged_reply(breakeven, window))
        }
    }
}

/// A cost estimator that fails on one designated payload and charges a flat
/// 21000 otherwise.
pub struct FlakyEstimator {
    /// Hex payload the estimator refuses
    fail_payload: String,
}

impl FlakyEstimator {
    /// Fails on `fail_payload` (hex, as stored on the opportunity).
    pub fn failing_on(fail_payload: String) -> Self {
        Self { fail_payload }
    }
}

#[async_trait]
impl CostEstimator for FlakyEstimator {
    async fn estimate(&self, payload: &[u8]) -> Result<u64> {
        if hex::encode(payload) == self.fail_payload {
            bail!("estimation reverted");
        }
        Ok(21_000)
    }
}
