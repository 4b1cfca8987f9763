//! Timer-driven rebuild of the triangle index.
//!
//! One task owns the rebuild: on each tick it loads the full backing table
//! in ascending-id order, builds a brand-new snapshot off to the side and
//! installs it with a single swap. Readers are never blocked and never see a
//! partial index. A failed load leaves the previous snapshot in place;
//! stale-but-consistent beats no data.

use std::time::Instant;

use eyre::Result;

use crate::cache::TriangleIndex;
use crate::db_service::TriangleService;
use crate::models::triangle::TriangleRow;
use crate::utils::app_context::AppContext;

/// Runs the rebuild on the configured period until the process stops.
///
/// Rebuild errors are logged and swallowed here; the loop itself never
/// gives up.
pub async fn triangles(ctx: &AppContext) -> Result<()> {
    loop {
        tokio::time::sleep(ctx.config.refresh_interval).await;

        if let Err(e) = rebuild(ctx).await {
            log::error!("sync::triangles: rebuild failed, keeping previous snapshot: {e:#}");
        }
    }
}

/// Loads the backing table and installs a fresh snapshot.
///
/// # Errors
/// * If a pooled connection cannot be acquired
/// * If the table load fails; the previous snapshot stays published
pub async fn rebuild(ctx: &AppContext) -> Result<usize> {
    let started = Instant::now();

    let mut conn = ctx.db.get().await?;
    let rows = TriangleService::load_all(&mut conn).await?;
    drop(conn);

    let index = build_index(rows);
    let count = index.len();
    let pair_count = index.pair_count();
    ctx.triangles.install(index).await;

    log::info!(
        "sync::triangles: installed snapshot of {count} triangles over {pair_count} pools in {:?}",
        started.elapsed()
    );
    Ok(count)
}

/// Builds one complete snapshot from rows already in ascending-id order.
fn build_index(rows: Vec<TriangleRow>) -> TriangleIndex {
    let mut index = TriangleIndex::new();
    for row in rows {
        index.insert(row.into_triangle());
    }
    index
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::triangle::DBAddress;

    /// A row whose nine addresses are distinct and derived from the id.
    fn row(id: i64) -> TriangleRow {
        let label = |role: &str, leg: usize| -> DBAddress {
            let addr = alloy::primitives::Address::from_word(alloy::primitives::keccak256(
                format!("{role}-{leg}-{id}").as_bytes(),
            ));
            DBAddress::new(addr)
        };
        TriangleRow {
            id,
            token0: label("token", 0),
            router0: label("router", 0),
            pair0: label("pair", 0),
            token1: label("token", 1),
            router1: label("router", 1),
            pair1: label("pair", 1),
            token2: label("token", 2),
            router2: label("router", 2),
            pair2: label("pair", 2),
        }
    }

    #[test]
    fn test_build_index_indexes_every_row() {
        let index = build_index(vec![row(1), row(2), row(3)]);

        assert_eq!(index.len(), 3);
        // Three distinct pools per triangle, no sharing across ids.
        assert_eq!(index.pair_count(), 9);
        let triangle = index.get(2).unwrap();
        for pair in triangle.pairs() {
            assert_eq!(index.ids_for_pair(pair).len(), 1);
        }
    }

    #[test]
    fn test_build_index_empty_table() {
        let index = build_index(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.pair_count(), 0);
    }
}
