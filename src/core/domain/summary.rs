//! Engine-level summary and PnL history (C5).

use std::collections::VecDeque;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How many completed trades to retain in the PnL history ring before the
/// oldest point is dropped.
pub const PNL_HISTORY_CAPACITY: usize = 1_000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PnlPoint {
    pub ts_ms: i64,
    pub profit: Decimal,
    pub running_total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSummary {
    pub total_trades: u64,
    pub wins: u64,
    pub losses: u64,
    pub total_profit: Decimal,
    pub started_ms: i64,
    pub pnl_history: VecDeque<PnlPoint>,
}

impl EngineSummary {
    #[must_use]
    pub fn new(started_ms: i64) -> Self {
        Self {
            total_trades: 0,
            wins: 0,
            losses: 0,
            total_profit: Decimal::ZERO,
            started_ms,
            pnl_history: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn runtime_sec(&self, now_ms: i64) -> i64 {
        (now_ms - self.started_ms).max(0) / 1_000
    }

    /// A position was opened. `totalTrades` counts every position ever
    /// opened — open, resolved, or forced — so that
    /// `totalTrades == wins + losses + openPositions` holds at every tick
    /// (spec §8).
    pub fn record_open(&mut self) {
        self.total_trades += 1;
    }

    /// A position resolved: a win (`profit > 0`) or a loss.
    pub fn record_resolution(&mut self, now_ms: i64, profit: Decimal) {
        if profit > Decimal::ZERO {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.total_profit += profit;

        if self.pnl_history.len() >= PNL_HISTORY_CAPACITY {
            self.pnl_history.pop_front();
        }
        self.pnl_history.push_back(PnlPoint {
            ts_ms: now_ms,
            profit,
            running_total: self.total_profit,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn record_resolution_updates_win_loss_counts_and_total() {
        let mut summary = EngineSummary::new(0);
        summary.record_open();
        summary.record_open();
        summary.record_resolution(1_000, dec!(10));
        summary.record_resolution(2_000, dec!(-5));

        assert_eq!(summary.total_trades, 2);
        assert_eq!(summary.wins, 1);
        assert_eq!(summary.losses, 1);
        assert_eq!(summary.total_profit, dec!(5));
        assert_eq!(summary.pnl_history.len(), 2);
    }

    #[test]
    fn pnl_history_is_bounded() {
        let mut summary = EngineSummary::new(0);
        for i in 0..(PNL_HISTORY_CAPACITY + 10) {
            summary.record_open();
            summary.record_resolution(i as i64, dec!(1));
        }
        assert_eq!(summary.pnl_history.len(), PNL_HISTORY_CAPACITY);
        assert_eq!(summary.total_trades, (PNL_HISTORY_CAPACITY + 10) as u64);
    }
}
