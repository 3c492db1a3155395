//! Fill estimates (C3) and the order-book-walk results (C2) they combine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// Where a price came from: a real walk of resting liquidity, a display-only
/// best-ask fallback, or nothing available at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillSource {
    Orderbook,
    BestAsk,
    Unavailable,
}

impl FillSource {
    /// Ordering used to pick the "weaker" of two sources: `Unavailable` is
    /// weaker than `BestAsk`, which is weaker than `Orderbook`.
    fn rank(self) -> u8 {
        match self {
            Self::Orderbook => 2,
            Self::BestAsk => 1,
            Self::Unavailable => 0,
        }
    }

    #[must_use]
    pub fn weaker(self, other: Self) -> Self {
        if self.rank() <= other.rank() {
            self
        } else {
            other
        }
    }
}

/// Result of walking one side of one order book for a target notional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkResult {
    pub units: Decimal,
    pub effective_price: Decimal,
    pub spend: Decimal,
    pub shortfall: Option<Decimal>,
    pub source: FillSource,
}

impl WalkResult {
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            units: Decimal::ZERO,
            effective_price: Decimal::ZERO,
            spend: Decimal::ZERO,
            shortfall: None,
            source: FillSource::Unavailable,
        }
    }
}

/// Combined estimate of both legs of a pair trade for one direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillEstimate {
    pub direction: Direction,
    pub combined_cost: Decimal,
    pub units_p: Decimal,
    pub units_k: Decimal,
    pub spend_p: Decimal,
    pub spend_k: Decimal,
    pub effective_price_p: Decimal,
    pub effective_price_k: Decimal,
    pub gap: Decimal,
    pub source: FillSource,
    pub shortfall_p: Option<Decimal>,
    pub shortfall_k: Option<Decimal>,
}

impl FillEstimate {
    /// The tradeable pair count: the minimum of the two legs' filled units.
    #[must_use]
    pub fn units(&self) -> Decimal {
        self.units_p.min(self.units_k)
    }

    /// Total dollars committed across both legs at the reported prices.
    #[must_use]
    pub fn spend_total(&self) -> Decimal {
        self.spend_p + self.spend_k
    }
}
