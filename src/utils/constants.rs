use alloy::primitives::{address, Address};

/// Address quoter calls are issued from
pub const QUOTER_CALLER: Address = address!("0xcdecF7Ab7c6654139F65c6C1C7Ecbad653F0dfB0");
/// Deployed triangular-arbitrage quoter contract; payload gas estimates
/// target the same contract
pub const QUOTER_ADDRESS: Address = address!("0x84F7f6016e5ED7819f717994225D4f60c7Af5359");
