//! Domain types for genesis exposure analysis.
//!
//! This crate holds the snapshot entities (pairs, pools, balances, stakes),
//! the 256-bit token amounts they carry, and the constant-product reserve
//! math that converts pool shares into their underlying reserves.

/// Snapshot entities.
pub mod entities;
/// Shared enums.
pub mod enums;
/// Reserve math errors.
pub mod error;
/// Pool math.
pub mod math;
/// Token amounts and coins.
pub mod token;

pub use error::MathError;
pub use token::{Coin, TokenAmount};
