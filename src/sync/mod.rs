//! Background tasks keeping the in-memory state fresh.

/// Periodic triangle index rebuild
pub mod triangles;
