//! The arbitrage evaluation engine and the market-data snapshot model it
//! consumes (spec §2: components C1–C7). Snapshot suppliers (C8) are
//! external in production but ship one illustrative `FixtureSupplier`.

pub mod domain;
pub mod engine;
pub mod exchange;
pub mod fill_estimator;
pub mod multiplexer;
pub mod resolution;
pub mod service;
pub mod state_machine;
pub mod walker;
