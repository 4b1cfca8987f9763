//! Database-facing data models.

/// Triangle rows and the address column wrapper
pub mod triangle;
