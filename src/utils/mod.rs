//! Utility functions and helpers.

/// Shared application context
pub mod app_context;
/// Well-known addresses and paths
pub mod constants;
/// Database connection pooling
pub mod db_connect;
/// Application logger setup
pub mod logger;
