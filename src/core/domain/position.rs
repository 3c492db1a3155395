//! Open position: a confirmed pair trade awaiting settlement.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::estimate::FillEstimate;
use super::ids::MarketKey;

/// Snapshot of the thresholds a position settles against, locked at open
/// time so a later market-data wobble can never move the strike under a
/// position that has already been entered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LockedThresholds {
    pub price_to_beat_p: Decimal,
    pub price_to_beat_k: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenPosition {
    pub direction: Direction,
    pub estimate: FillEstimate,
    pub opened_ms: i64,
    pub market_key_p: MarketKey,
    pub market_key_k: MarketKey,
    pub market_close_ms: i64,
    pub units: Decimal,
    pub spend_total: Decimal,
    pub locked: LockedThresholds,
}

impl OpenPosition {
    #[must_use]
    pub fn from_estimate(
        estimate: FillEstimate,
        opened_ms: i64,
        market_key_p: MarketKey,
        market_key_k: MarketKey,
        market_close_ms: i64,
        locked: LockedThresholds,
    ) -> Self {
        Self {
            direction: estimate.direction,
            units: estimate.units(),
            spend_total: estimate.spend_total(),
            estimate,
            opened_ms,
            market_key_p,
            market_key_k,
            market_close_ms,
            locked,
        }
    }

    #[must_use]
    pub fn is_past_close(&self, now_ms: i64) -> bool {
        now_ms >= self.market_close_ms
    }
}
