//! Order-book walker (C2): price a target notional against one side of a book.

use rust_decimal::Decimal;

use crate::core::domain::{FillSource, OrderBook, PriceLevel, WalkResult};

/// Level filters from spec §4.1: a level with non-positive size, or a price
/// outside `(0, 1)` (the binary-market invariant), never participates.
fn level_is_tradeable(level: &PriceLevel) -> bool {
    level.size > Decimal::ZERO && level.price > Decimal::ZERO && level.price < Decimal::ONE
}

/// Walk `levels` (trusted to already be in priority order; never re-sorted)
/// consuming contiguous levels until `notional` is met, a fractional slice
/// of the last level if needed, or the side is exhausted.
fn walk_side(levels: &[PriceLevel], notional: Decimal, fallback_best_ask: Option<Decimal>) -> WalkResult {
    if levels.is_empty() {
        return match fallback_best_ask {
            Some(price) if price > Decimal::ZERO => WalkResult {
                units: notional / price,
                effective_price: price,
                spend: notional,
                shortfall: None,
                source: FillSource::BestAsk,
            },
            _ => WalkResult::unavailable(),
        };
    }

    let mut units = Decimal::ZERO;
    let mut spend = Decimal::ZERO;

    for level in levels.iter().filter(|l| level_is_tradeable(l)) {
        let remaining = notional - spend;
        if remaining <= Decimal::ZERO {
            break;
        }
        let level_value = level.price * level.size;
        if level_value <= remaining {
            units += level.size;
            spend += level_value;
        } else {
            let slice_units = remaining / level.price;
            units += slice_units;
            spend += remaining;
            break;
        }
    }

    let shortfall = if spend < notional {
        Some(notional - spend)
    } else {
        None
    };
    let effective_price = if units > Decimal::ZERO {
        spend / units
    } else {
        Decimal::ZERO
    };

    WalkResult {
        units,
        effective_price,
        spend,
        shortfall,
        source: FillSource::Orderbook,
    }
}

impl OrderBook {
    /// Walk the ask side for a target notional, falling back to the
    /// supplier's published best ask (display-only, infinite liquidity
    /// assumed) when the book has no resting asks at all.
    #[must_use]
    pub fn walk_asks(&self, notional: Decimal, fallback_best_ask: Option<Decimal>) -> WalkResult {
        walk_side(&self.asks, notional, fallback_best_ask)
    }
}
