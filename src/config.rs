use std::env;
use std::time::Duration;

use alloy::primitives::{Address, I256};

use crate::arb::resolver::ResolverConfig;
use crate::utils::constants::{QUOTER_ADDRESS, QUOTER_CALLER};

/// Runtime configuration, read once from the environment at startup.
///
/// Every knob has a production default; `DATABASE_URL` and `RPC_URL` are the
/// only variables a deployment must provide.
#[derive(Clone, Debug)]
pub struct Config {
    /// Postgres connection string (`DATABASE_URL`)
    pub database_url: String,
    /// HTTP RPC endpoint of the node hosting the quoter (`RPC_URL`)
    pub rpc_url: String,
    /// Concurrent resolver workers per batch (`MANTIS_WORKERS`)
    pub workers: usize,
    /// Pause between scan batches (`MANTIS_SCAN_INTERVAL_MS`)
    pub scan_interval: Duration,
    /// Period of the index rebuild task (`MANTIS_REFRESH_INTERVAL_SECS`)
    pub refresh_interval: Duration,
    /// Minimum confirmed profit, inclusive (`MANTIS_MIN_PROFIT`)
    pub min_profit: I256,
    /// Per-oracle-call deadline (`MANTIS_ORACLE_TIMEOUT_MS`)
    pub oracle_timeout: Duration,
    /// Caller address quoter calls are issued from (`MANTIS_QUOTER_FROM`)
    pub quoter_from: Address,
    /// Quoter contract address (`MANTIS_QUOTER_TO`)
    pub quoter_to: Address,
    /// Where the batch report is written (`MANTIS_REPORT_PATH`)
    pub report_path: String,
}

impl Config {
    /// Reads the configuration from the environment.
    ///
    /// Unset or unparsable variables fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or_default(),
            rpc_url: env::var("RPC_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8545".to_string()),
            workers: parsed_var("MANTIS_WORKERS").unwrap_or(32),
            scan_interval: Duration::from_millis(
                parsed_var("MANTIS_SCAN_INTERVAL_MS").unwrap_or(3_000),
            ),
            refresh_interval: Duration::from_secs(
                parsed_var("MANTIS_REFRESH_INTERVAL_SECS").unwrap_or(3_600),
            ),
            min_profit: parsed_var::<i64>("MANTIS_MIN_PROFIT")
                .and_then(|value| I256::try_from(value).ok())
                .unwrap_or_else(|| ResolverConfig::default().min_profit),
            oracle_timeout: Duration::from_millis(
                parsed_var("MANTIS_ORACLE_TIMEOUT_MS").unwrap_or(5_000),
            ),
            quoter_from: parsed_var("MANTIS_QUOTER_FROM").unwrap_or(QUOTER_CALLER),
            quoter_to: parsed_var("MANTIS_QUOTER_TO").unwrap_or(QUOTER_ADDRESS),
            report_path: env::var("MANTIS_REPORT_PATH")
                .unwrap_or_else(|_| "results.json".to_string()),
        }
    }

    /// The resolver policy derived from this configuration.
    ///
    /// Stage widths and sub-step count keep their compatibility defaults;
    /// only the threshold and deadline are environment-tunable.
    #[must_use]
    pub fn resolver(&self) -> ResolverConfig {
        ResolverConfig {
            min_profit: self.min_profit,
            call_timeout: self.oracle_timeout,
            ..ResolverConfig::default()
        }
    }
}

/// An environment variable parsed into `T`, `None` when unset or invalid.
fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        let config = Config::from_env();
        assert_eq!(config.resolver().stage_widths, [10_000, 1_000, 100, 10, 1]);
        assert_eq!(config.resolver().pieces, 10);
        assert!(config.workers >= 1);
    }
}
