//! Database access for the triangle backing store.

/// Triangle queries
pub mod triangle_service;

pub use triangle_service::TriangleService;
