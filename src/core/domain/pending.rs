//! Pending order: a committed intent to open, awaiting decision latency.

use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::estimate::FillEstimate;
use super::ids::MarketKey;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingOrder {
    pub direction: Direction,
    pub market_key_p: MarketKey,
    pub market_key_k: MarketKey,
    pub estimate: FillEstimate,
    pub created_ms: i64,
    pub due_ms: i64,
}

impl PendingOrder {
    #[must_use]
    pub fn new(
        direction: Direction,
        market_key_p: MarketKey,
        market_key_k: MarketKey,
        estimate: FillEstimate,
        created_ms: i64,
        decision_latency_ms: i64,
    ) -> Self {
        Self {
            direction,
            market_key_p,
            market_key_k,
            estimate,
            created_ms,
            due_ms: created_ms + decision_latency_ms,
        }
    }

    #[must_use]
    pub fn is_due(&self, now_ms: i64) -> bool {
        now_ms >= self.due_ms
    }

    #[must_use]
    pub fn market_keys_match(&self, market_key_p: &MarketKey, market_key_k: &MarketKey) -> bool {
        &self.market_key_p == market_key_p && &self.market_key_k == market_key_k
    }
}
