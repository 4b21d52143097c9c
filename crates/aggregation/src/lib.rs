//! Exposure aggregation over a genesis snapshot.
//!
//! This crate turns a [`Snapshot`](genesis_exposure_data::Snapshot) into a
//! per-account exposure table:
//! - Pool index with a reserve model per pool
//! - Reserve account classification
//! - Three-pass aggregation over balances, stakes and queued stakes
//! - Reconciliation against chain supply

/// Prelude module for convenient imports.
pub mod prelude;

/// Aggregation passes.
pub mod aggregator;
/// Engine configuration.
pub mod config;
/// Engine errors.
pub mod error;
/// Per-account exposure rows.
pub mod exposure;
/// Pool lookup tables and reserve models.
pub mod pool_index;
/// Supply reconciliation.
pub mod reconcile;
/// Infrastructure account classification.
pub mod reserve_accounts;
