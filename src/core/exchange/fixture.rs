//! `FixtureSupplier`: a deterministic, non-networked `SnapshotSupplier` that
//! replays a fixed map or a scripted per-tick sequence of maps. Used by the
//! `--headless` demo path and by integration tests driving the spec §8
//! end-to-end scenarios. This is explicitly *not* a venue P or venue K client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;

use crate::core::domain::{CoinId, Snapshot};
use crate::core::exchange::traits::SnapshotSupplier;
use crate::error::Result;

pub struct FixtureSupplier {
    frames: Vec<HashMap<CoinId, Snapshot>>,
    cursor: AtomicUsize,
    published: DashMap<CoinId, Snapshot>,
}

impl FixtureSupplier {
    /// A supplier that always returns the same map.
    #[must_use]
    pub fn fixed(snapshots: HashMap<CoinId, Snapshot>) -> Self {
        Self::scripted(vec![snapshots])
    }

    /// A supplier that advances through `frames` one at a time via `advance`.
    #[must_use]
    pub fn scripted(frames: Vec<HashMap<CoinId, Snapshot>>) -> Self {
        let published = DashMap::new();
        if let Some(first) = frames.first() {
            for (coin, snap) in first {
                published.insert(coin.clone(), snap.clone());
            }
        }
        Self {
            frames,
            cursor: AtomicUsize::new(0),
            published,
        }
    }

    /// Publish the next scripted frame, replacing the whole map atomically
    /// (spec §5: suppliers publish by atomically replacing their internal
    /// map reference). A no-op once the script is exhausted — the last
    /// frame keeps being served.
    pub fn advance(&self) {
        let next = self.cursor.load(Ordering::Acquire) + 1;
        if next >= self.frames.len() {
            return;
        }
        self.cursor.store(next, Ordering::Release);
        self.published.clear();
        for (coin, snap) in &self.frames[next] {
            self.published.insert(coin.clone(), snap.clone());
        }
    }
}

impl SnapshotSupplier for FixtureSupplier {
    fn start(&self, _coins: &[CoinId]) -> Result<()> {
        Ok(())
    }

    fn stop(&self) {}

    fn get_snapshots(&self) -> HashMap<CoinId, Snapshot> {
        self.published.iter().map(|entry| (entry.key().clone(), entry.value().clone())).collect()
    }
}
