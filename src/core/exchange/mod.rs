//! Snapshot suppliers (C8, out of scope): the pull-model trait the core
//! consumes, plus one non-networked `FixtureSupplier` for demos and tests.

pub mod fixture;
pub mod traits;

pub use fixture::FixtureSupplier;
pub use traits::SnapshotSupplier;
