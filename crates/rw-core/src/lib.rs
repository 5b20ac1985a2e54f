//! # rw-core — Shared foundation for RaffleWheel
//!
//! Error type, configuration and the randomness seam used by the wheel engine,
//! the browser host and the simulator.

pub mod config;
pub mod error;
pub mod random;

pub use config::*;
pub use error::*;
pub use random::*;

/// Full turn in radians
pub const TAU: f64 = std::f64::consts::TAU;
