//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use genesis_exposure_aggregation::prelude::*;
//! ```

// Aggregation
pub use crate::aggregator::{AggregationOutcome, AggregationStats, ExposureAggregator, aggregate};

// Configuration
pub use crate::config::ExposureConfig;

// Errors
pub use crate::error::EngineError;

// Exposure rows
pub use crate::exposure::{AccountExposure, ExposureRole, ExposureTable, RoleCounts};

// Pool index
pub use crate::pool_index::{PoolEntry, PoolIndex};

// Reconciliation
pub use crate::reconcile::{Residual, reconcile};

// Classification
pub use crate::reserve_accounts::ReserveAccountSet;
