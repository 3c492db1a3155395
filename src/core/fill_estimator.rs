//! Fill estimator (C3): combine two venues/sides into a pair estimate.

use rust_decimal::Decimal;

use crate::core::domain::{Direction, FillEstimate, FillSource, Snapshot};

/// Estimate the combined cost of one direction's pair trade at `notional`
/// per leg. Pure and side-effect free; safe to call for display even when
/// trading is gated off.
#[must_use]
pub fn estimate(direction: Direction, snap_p: &Snapshot, snap_k: &Snapshot, notional: Decimal) -> FillEstimate {
    let (token_p, token_k) = match direction {
        Direction::UpNo => (&snap_p.up_token_id, &snap_k.down_token_id),
        Direction::DownYes => (&snap_p.down_token_id, &snap_k.up_token_id),
    };

    let fallback_p = snap_p.best_ask.get(token_p).copied();
    let fallback_k = snap_k.best_ask.get(token_k).copied();

    let walk_p = snap_p
        .book_for(token_p)
        .map(|book| book.walk_asks(notional, fallback_p))
        .unwrap_or_else(|| match fallback_p {
            Some(price) if price > Decimal::ZERO => crate::core::domain::WalkResult {
                units: notional / price,
                effective_price: price,
                spend: notional,
                shortfall: None,
                source: FillSource::BestAsk,
            },
            _ => crate::core::domain::WalkResult::unavailable(),
        });

    let walk_k = snap_k
        .book_for(token_k)
        .map(|book| book.walk_asks(notional, fallback_k))
        .unwrap_or_else(|| match fallback_k {
            Some(price) if price > Decimal::ZERO => crate::core::domain::WalkResult {
                units: notional / price,
                effective_price: price,
                spend: notional,
                shortfall: None,
                source: FillSource::BestAsk,
            },
            _ => crate::core::domain::WalkResult::unavailable(),
        });

    let combined_cost = walk_p.effective_price + walk_k.effective_price;
    let source = if walk_p.source == FillSource::Orderbook
        && walk_k.source == FillSource::Orderbook
        && walk_p.shortfall.is_none()
        && walk_k.shortfall.is_none()
    {
        FillSource::Orderbook
    } else {
        walk_p.source.weaker(walk_k.source)
    };

    FillEstimate {
        direction,
        combined_cost,
        units_p: walk_p.units,
        units_k: walk_k.units,
        spend_p: walk_p.spend,
        spend_k: walk_k.spend,
        effective_price_p: walk_p.effective_price,
        effective_price_k: walk_k.effective_price,
        gap: Decimal::ONE - combined_cost,
        source,
        shortfall_p: walk_p.shortfall,
        shortfall_k: walk_k.shortfall,
    }
}
