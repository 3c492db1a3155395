//! Paper-trading arbitrage engine for short-dated binary up/down crypto
//! prediction markets across two venues.
//!
//! The public surface is the core evaluation engine (`core`): the snapshot
//! model, the order-book walker, the fill estimator, the per-coin state
//! machine, the arbitrage engine, the profile multiplexer, and the
//! resolution oracle. Venue clients, dashboard rendering, and CLI
//! navigation are deliberately out of scope (spec §1) and are represented
//! only by the `SnapshotSupplier` trait they would implement.

pub mod config;
pub mod core;
pub mod error;

pub use config::Config;
pub use error::{Error, Result};
