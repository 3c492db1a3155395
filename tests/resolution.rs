//! Resolution-oracle force-close timing (spec §8) through the public API.

use std::collections::HashMap;

use rust_decimal_macros::dec;

use paper_arb::core::domain::{CoinId, DataStatus, MarketKey, ReferenceSource, Snapshot, TokenId, Venue};
use paper_arb::core::resolution::{resolve_pair, FORCE_PARTIAL_MS, FORCE_TOTAL_MS};

fn dark_snapshot(venue: Venue, close_ms: i64) -> Snapshot {
    Snapshot {
        venue,
        coin: CoinId::new("BTC"),
        market_key: MarketKey::new("KXBTC15M-1"),
        market_close_time_ms: close_ms,
        time_left_sec: 0,
        price_to_beat: dec!(50000),
        reference_price: dec!(50000),
        reference_source: ReferenceSource::PriceToBeat,
        crypto_price: rust_decimal::Decimal::ZERO,
        crypto_price_timestamp_ms: 0,
        underlying_value: None,
        underlying_ts_ms: None,
        data_status: DataStatus::Disconnected,
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
fn stays_open_before_the_partial_force_deadline() {
    let close_ms = 1_000_000;
    let snap_p = dark_snapshot(Venue::P, close_ms);
    let snap_k = dark_snapshot(Venue::K, close_ms);

    let result = resolve_pair(dec!(50000), dec!(50000), close_ms, Some(&snap_p), Some(&snap_k), close_ms + FORCE_PARTIAL_MS - 1);
    assert!(result.is_none());
}

#[test]
fn forces_a_loss_at_the_total_deadline_when_nothing_ever_arrives() {
    let close_ms = 1_000_000;
    let snap_p = dark_snapshot(Venue::P, close_ms);
    let snap_k = dark_snapshot(Venue::K, close_ms);

    let result = resolve_pair(dec!(50000), dec!(50000), close_ms, Some(&snap_p), Some(&snap_k), close_ms + FORCE_TOTAL_MS).unwrap();
    assert!(result.forced);
    assert!(!result.both_known());
}

#[test]
fn loosened_spot_fallback_completes_resolution_between_the_two_deadlines() {
    let close_ms = 1_000_000;
    let mut snap_p = dark_snapshot(Venue::P, close_ms);
    // Stale relative to close (beyond the normal spot-staleness window) but
    // still non-zero, so the 180s loosened fallback accepts it.
    snap_p.crypto_price = dec!(49000);
    snap_p.crypto_price_timestamp_ms = close_ms - 500_000;

    let mut snap_k = dark_snapshot(Venue::K, close_ms);
    snap_k.crypto_price = dec!(49500);
    snap_k.crypto_price_timestamp_ms = close_ms - 500_000;

    let now = close_ms + FORCE_PARTIAL_MS + 1_000;
    let result = resolve_pair(dec!(50000), dec!(50000), close_ms, Some(&snap_p), Some(&snap_k), now).unwrap();
    assert!(result.forced);
    assert!(result.both_known());
}
