//! Snapshot model (C1): one venue's view of one coin's binary market at one instant.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{CoinId, MarketKey, TokenId};

/// Which of the two venues a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    /// Venue P.
    P,
    /// Venue K.
    K,
}

/// Freshness of a supplier's connection to a venue for a given coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataStatus {
    Healthy,
    Stale,
    Disconnected,
}

/// Provenance of the strike/threshold value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceSource {
    PriceToBeat,
    Html,
    Missing,
    /// Catch-all for supplier-provided tags that don't match a known variant.
    Other(String),
}

impl ReferenceSource {
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// A single resting order at a price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Decimal,
    pub size: Decimal,
}

impl PriceLevel {
    #[must_use]
    pub const fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }
}

/// A trade print recorded at a timestamp, used for settlement fallback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeTick {
    pub price: Decimal,
    pub ts_ms: i64,
}

/// One side's order book for one token: ascending asks, descending bids.
///
/// Levels are trusted to already be in the invariant order (asks ascending,
/// bids descending); walking never re-sorts them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderBook {
    pub asks: Vec<PriceLevel>,
    pub bids: Vec<PriceLevel>,
    pub last_trade: Option<Decimal>,
    pub total_bid_value: Decimal,
    pub total_ask_value: Decimal,
}

impl OrderBook {
    #[must_use]
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    #[must_use]
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }
}

/// One venue's view of one coin's binary market at one instant.
///
/// Immutable by convention: any update to a market is published as a whole
/// new `Snapshot`, never a mutation of fields on an existing one (spec
/// invariant iv).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub venue: Venue,
    pub coin: CoinId,
    pub market_key: MarketKey,
    pub market_close_time_ms: i64,
    pub time_left_sec: i64,
    pub price_to_beat: Decimal,
    pub reference_price: Decimal,
    pub reference_source: ReferenceSource,
    pub crypto_price: Decimal,
    pub crypto_price_timestamp_ms: i64,
    /// Venue-K only: the venue's own settlement-time underlying print.
    pub underlying_value: Option<Decimal>,
    pub underlying_ts_ms: Option<i64>,
    pub data_status: DataStatus,
    pub up_token_id: TokenId,
    pub down_token_id: TokenId,
    pub up_outcome: String,
    pub down_outcome: String,
    pub order_books: std::collections::HashMap<TokenId, OrderBook>,
    pub best_bid: std::collections::HashMap<TokenId, Decimal>,
    pub best_ask: std::collections::HashMap<TokenId, Decimal>,
    pub price_history_with_ts: Vec<TradeTick>,
}

impl Snapshot {
    #[must_use]
    pub fn book_for(&self, token: &TokenId) -> Option<&OrderBook> {
        self.order_books.get(token)
    }

    #[must_use]
    pub fn is_healthy(&self) -> bool {
        matches!(self.data_status, DataStatus::Healthy)
    }

    #[must_use]
    pub fn has_threshold(&self) -> bool {
        self.price_to_beat > Decimal::ZERO && !self.reference_source.is_missing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn sample_snapshot(reference_source: ReferenceSource, price_to_beat: Decimal) -> Snapshot {
        Snapshot {
            venue: Venue::P,
            coin: CoinId::new("BTC"),
            market_key: MarketKey::new("KXBTC15M-1"),
            market_close_time_ms: 1_000,
            time_left_sec: 600,
            price_to_beat,
            reference_price: price_to_beat,
            reference_source,
            crypto_price: dec!(50000),
            crypto_price_timestamp_ms: 900,
            underlying_value: None,
            underlying_ts_ms: None,
            data_status: DataStatus::Healthy,
            up_token_id: TokenId::new("up"),
            down_token_id: TokenId::new("down"),
            up_outcome: "Up".into(),
            down_outcome: "Down".into(),
            order_books: HashMap::new(),
            best_bid: HashMap::new(),
            best_ask: HashMap::new(),
            price_history_with_ts: Vec::new(),
        }
    }

    #[test]
    fn has_threshold_requires_positive_price_and_known_source() {
        let snap = sample_snapshot(ReferenceSource::PriceToBeat, dec!(50000));
        assert!(snap.has_threshold());

        let missing = sample_snapshot(ReferenceSource::Missing, dec!(0));
        assert!(!missing.has_threshold());
    }

    #[test]
    fn is_healthy_matches_data_status() {
        let mut snap = sample_snapshot(ReferenceSource::PriceToBeat, dec!(50000));
        assert!(snap.is_healthy());
        snap.data_status = DataStatus::Stale;
        assert!(!snap.is_healthy());
    }
}
