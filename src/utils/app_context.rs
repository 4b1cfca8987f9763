//! Application context shared by the scan pipeline and its background
//! tasks: configuration, the database pool, the chain provider and the
//! triangle index handle.

use std::sync::Arc;

use alloy::network::Ethereum;
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use eyre::{Error, Result};
use url::Url;

use crate::cache::IndexHandle;
use crate::config::Config;
use crate::utils::db_connect::{create_pool, DbPool};

/// Shared application context.
///
/// Constructed once at startup and handed to every task; the index handle
/// inside is the only mutable piece, and it mutates by snapshot swap only.
pub struct AppContext {
    /// Runtime configuration, read once from the environment
    pub config: Config,
    /// Async Postgres pool over the triangle backing store
    pub db: DbPool,
    /// Provider the quoter and estimator calls go through
    pub provider: RootProvider<Ethereum>,
    /// Handle to the current triangle index snapshot
    pub triangles: Arc<IndexHandle>,
}

impl AppContext {
    /// Creates the context from the environment.
    ///
    /// # Errors
    /// * If `DATABASE_URL` is missing or the pool cannot be built
    /// * If `RPC_URL` is not a valid URL
    pub async fn new() -> Result<Self, Error> {
        let config = Config::from_env();
        let db = create_pool(&config.database_url)?;
        let provider = Self::http_provider(&config.rpc_url)?;

        Ok(Self {
            config,
            db,
            provider,
            triangles: Arc::new(IndexHandle::new()),
        })
    }

    /// Creates an HTTP connection to the node hosting the quoter.
    ///
    /// # Errors
    /// * If `rpc_url` fails to parse
    pub fn http_provider(rpc_url: &str) -> Result<RootProvider<Ethereum>, Error> {
        let url = Url::parse(rpc_url)?;
        let provider = ProviderBuilder::new().on_http(url);
        Ok((*provider.root()).clone())
    }
}
