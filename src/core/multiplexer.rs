//! Profile multiplexer (C6): drives N engines from one snapshot stream on a
//! fixed cadence, with render ticking independently.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

use crate::core::engine::ArbitrageEngine;
use crate::core::exchange::SnapshotSupplier;

/// A clock injected into the multiplexer's evaluation loop — the one place
/// in the binary allowed to read a wall clock; everything downstream of it
/// takes `now_ms` explicitly (spec §9: time injection).
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

pub struct ProfileMultiplexer {
    engines: Vec<ArbitrageEngine>,
    supplier_p: Arc<dyn SnapshotSupplier>,
    supplier_k: Arc<dyn SnapshotSupplier>,
    eval_interval_ms: u64,
    render_interval_ms: u64,
    clock: Arc<dyn Clock>,
}

impl ProfileMultiplexer {
    #[must_use]
    pub fn new(
        engines: Vec<ArbitrageEngine>,
        supplier_p: Arc<dyn SnapshotSupplier>,
        supplier_k: Arc<dyn SnapshotSupplier>,
        eval_interval_ms: u64,
        render_interval_ms: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            engines,
            supplier_p,
            supplier_k,
            eval_interval_ms: eval_interval_ms.max(1),
            render_interval_ms,
            clock,
        }
    }

    /// Drives both timers from a single `tokio::select!` loop so the render
    /// tick (cheap string composition from already-cloned views) can never
    /// block the evaluation tick (spec §5). Returns the engines so the
    /// caller can read final summaries after shutdown.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Vec<ArbitrageEngine> {
        let mut eval_ticker = tokio::time::interval(Duration::from_millis(self.eval_interval_ms));
        let mut render_ticker = tokio::time::interval(Duration::from_millis(self.render_interval_ms));

        loop {
            tokio::select! {
                _ = eval_ticker.tick() => {
                    let snaps_p = self.supplier_p.get_snapshots();
                    let snaps_k = self.supplier_k.get_snapshots();
                    let now_ms = self.clock.now_ms();
                    for engine in &mut self.engines {
                        engine.evaluate(&snaps_p, &snaps_k, now_ms);
                    }
                }
                _ = render_ticker.tick() => {
                    // Dashboard rendering is out of scope; this cadence only
                    // materializes the read-only projection a renderer would consume.
                    let _views: Vec<_> = self.engines.iter().map(|e| e.market_views()).collect();
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        for engine in &self.engines {
            let summary = engine.summary();
            info!(
                profile = engine.name(),
                total_trades = summary.total_trades,
                wins = summary.wins,
                losses = summary.losses,
                total_profit = %summary.total_profit,
                "final summary"
            );
        }

        self.supplier_p.stop();
        self.supplier_k.stop();

        self.engines
    }
}
