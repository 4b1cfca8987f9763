/*!
 * # Mantis - Triangular Arbitrage Breakeven Scanner
 *
 * Mantis scans a large set of candidate three-hop trading cycles
 * ("triangles") against an on-chain quoter contract, locates the breakeven
 * trade ratio of each candidate with a coarse-to-fine search that spends one
 * oracle call per refinement stage, and picks a conflict-free,
 * profit-maximizing subset of the confirmed opportunities.
 *
 * ## Core Features
 *
 * - **Breakeven Search**: narrows the `[0, 10000)` ratio domain to a single
 *   point in five oracle round-trips
 * - **Bounded Dispatch**: runs thousands of independent searches under a
 *   fixed concurrency budget and aggregates every outcome into one report
 * - **Conflict-Free Selection**: greedy, profit-descending selection of
 *   opportunities with disjoint pool usage
 * - **Snapshot Index**: periodically rebuilt triangle index that readers
 *   observe only as complete snapshots
 *
 * ## Module Structure
 *
 * - `arb`: breakeven search, dispatch, selection and payload assembly
 * - `bot`: long-running scan loop and task wiring
 * - `cache`: in-memory triangle index with atomic snapshot swap
 * - `config`: configuration management for the system
 * - `db_service`: database interaction for the triangle backing store
 * - `models`: data models for the application
 * - `oracle`: quoter and gas-estimation collaborator interfaces
 * - `report`: batch report assembly and persistence
 * - `schemas`: database schema definitions
 * - `sync`: periodic index rebuild task
 * - `utils`: utility functions and helpers
 */

/// Breakeven search, dispatch, selection and payload assembly
pub mod arb;
/// Long-running scan loop and task wiring
pub mod bot;
/// In-memory triangle index with atomic snapshot swap
pub mod cache;
/// Configuration management for the system
pub mod config;
/// Database interaction for the triangle backing store
pub mod db_service;
/// Data models for the application
pub mod models;
/// Quoter and gas-estimation collaborator interfaces
pub mod oracle;
/// Batch report assembly and persistence
pub mod report;
/// Database schema definitions
pub mod schemas;
/// Periodic index rebuild task
pub mod sync;
/// Utility functions and helpers
pub mod utils;
