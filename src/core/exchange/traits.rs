//! `SnapshotSupplier` (spec §6.1): the pull-model interface the core
//! consumes. Venue-specific WebSocket/REST clients are out of scope —
//! this trait is the seam a real implementation would plug into.

use std::collections::HashMap;

use crate::core::domain::{CoinId, Snapshot};
use crate::error::Result;

pub trait SnapshotSupplier: Send + Sync {
    /// Initialize subscriptions for the given coins. Called once at startup.
    fn start(&self, coins: &[CoinId]) -> Result<()>;

    /// Release subscriptions. Called once at shutdown, after engines quiesce.
    fn stop(&self);

    /// Return a stable map for the duration of the caller's use. Must be
    /// cheap (spec: "a few microseconds") — no I/O, no blocking.
    fn get_snapshots(&self) -> HashMap<CoinId, Snapshot>;
}
