//! In-memory triangle index.
//!
//! Two maps over one snapshot: a forward map from triangle id to triangle,
//! and a reverse map from pool address to the ids of every triangle trading
//! through it. A snapshot is built privately in one pass and only then
//! published, so readers never observe a half-built index; publication swaps
//! a single `Arc` behind a short-lived write lock, and readers keep working
//! against whichever snapshot they cloned.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use alloy::primitives::Address;
use tokio::sync::RwLock;

use crate::arb::triangle::Triangle;

/// One complete, immutable index snapshot.
#[derive(Default)]
pub struct TriangleIndex {
    /// Forward map: triangle id to triangle
    triangles: HashMap<i64, Triangle>,
    /// Reverse map: pool address to ids of triangles trading through it
    by_pair: HashMap<Address, HashSet<i64>>,
}

impl TriangleIndex {
    /// An empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a triangle and indexes each of its pools.
    ///
    /// Re-inserting an id replaces the forward entry; the reverse entries of
    /// both versions remain until the next full rebuild, which is how the
    /// index is always produced.
    pub fn insert(&mut self, triangle: Triangle) {
        for pair in triangle.pairs() {
            self.by_pair.entry(pair).or_default().insert(triangle.id);
        }
        self.triangles.insert(triangle.id, triangle);
    }

    /// The triangle with the given id, if present.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&Triangle> {
        self.triangles.get(&id)
    }

    /// Ids of every triangle trading through `pair`.
    #[must_use]
    pub fn ids_for_pair(&self, pair: Address) -> HashSet<i64> {
        self.by_pair.get(&pair).cloned().unwrap_or_default()
    }

    /// Number of indexed triangles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the snapshot holds no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Number of distinct pools in the reverse map.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.by_pair.len()
    }

    /// The full working set for one dispatch batch, in ascending-id order.
    #[must_use]
    pub fn working_set(&self) -> Vec<Triangle> {
        let mut triangles: Vec<Triangle> = self.triangles.values().cloned().collect();
        triangles.sort_by_key(|t| t.id);
        triangles
    }
}

/// Shared handle to the current snapshot.
///
/// Readers clone the inner `Arc` and drop the lock immediately; the rebuild
/// task is the only writer and replaces the `Arc` wholesale. A reader
/// holding a pre-swap snapshot keeps a complete, consistent index for as
/// long as it needs it.
pub struct IndexHandle {
    /// The currently published snapshot
    current: RwLock<Arc<TriangleIndex>>,
}

impl IndexHandle {
    /// A handle over an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(TriangleIndex::new())),
        }
    }

    /// The current snapshot.
    pub async fn snapshot(&self) -> Arc<TriangleIndex> {
        Arc::clone(&*self.current.read().await)
    }

    /// Publishes a freshly built snapshot, superseding the previous one.
    pub async fn install(&self, index: TriangleIndex) {
        *self.current.write().await = Arc::new(index);
    }
}

impl Default for IndexHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    /// Every reverse-index id must resolve in the forward map and actually
    /// reference the pool it is filed under.
    fn assert_reverse_invariant(index: &TriangleIndex) {
        for (pair, ids) in &index.by_pair {
            for id in ids {
                let triangle = index.get(*id).expect("reverse id missing from forward map");
                assert!(triangle.pairs().contains(pair));
            }
        }
    }

    #[test]
    fn test_insert_indexes_all_pools() {
        let mut index = TriangleIndex::new();
        index.insert(triangle(1, ("X", "Y", "Z")));
        index.insert(triangle(2, ("Y", "W", "V")));

        assert_eq!(index.len(), 2);
        assert_eq!(index.pair_count(), 5);
        assert_eq!(
            index.ids_for_pair(addr("Y")),
            HashSet::from_iter([1i64, 2])
        );
        assert_eq!(index.ids_for_pair(addr("X")), HashSet::from_iter([1i64]));
        assert!(index.ids_for_pair(addr("unknown")).is_empty());
        assert_reverse_invariant(&index);
    }

    #[test]
    fn test_working_set_is_ascending_by_id() {
        let mut index = TriangleIndex::new();
        for id in [5i64, 1, 9, 3] {
            index.insert(triangle(id, ("A", "B", "C")));
        }
        let ids: Vec<i64> = index.working_set().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3, 5, 9]);
    }

    #[tokio::test]
    async fn test_reader_keeps_pre_swap_snapshot() {
        let handle = IndexHandle::new();

        let mut first = TriangleIndex::new();
        first.insert(triangle(1, ("X", "Y", "Z")));
        handle.install(first).await;

        // A reader takes its snapshot before the rebuild lands.
        let held = handle.snapshot().await;

        let mut second = TriangleIndex::new();
        second.insert(triangle(2, ("Q", "R", "S")));
        second.insert(triangle(3, ("T", "U", "V")));
        handle.install(second).await;

        // The held snapshot is still the complete first index: its forward
        // and reverse maps agree with each other, not with the new one.
        assert_eq!(held.len(), 1);
        assert!(held.get(1).is_some());
        assert!(held.get(2).is_none());
        assert_eq!(held.ids_for_pair(addr("X")), HashSet::from_iter([1i64]));
        assert!(held.ids_for_pair(addr("Q")).is_empty());
        assert_reverse_invariant(&held);

        // A fresh snapshot sees only the new index.
        let fresh = handle.snapshot().await;
        assert_eq!(fresh.len(), 2);
        assert!(fresh.get(1).is_none());
        assert_reverse_invariant(&fresh);
    }
}
