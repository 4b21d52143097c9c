//! Snapshot loading.
//!
//! This crate reads a pre-extracted genesis snapshot (bank balances and
//! supply, liquidity pairs and pools, farming stakes) from JSON and exposes
//! the lookups the exposure engine needs.

/// Loader errors.
pub mod error;
/// Snapshot document and lookups.
pub mod snapshot;

pub use error::SnapshotError;
pub use snapshot::{LiquidityParams, Snapshot};
