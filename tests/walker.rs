//! Order-book-walker invariants (spec §8) exercised through the public API.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use paper_arb::core::domain::{FillSource, OrderBook, PriceLevel};

fn book(levels: Vec<(Decimal, Decimal)>) -> OrderBook {
    OrderBook {
        asks: levels.into_iter().map(|(p, s)| PriceLevel::new(p, s)).collect(),
        bids: Vec::new(),
        last_trade: None,
        total_bid_value: Decimal::ZERO,
        total_ask_value: Decimal::ZERO,
    }
}

#[test]
fn units_are_never_negative_and_spend_never_exceeds_notional_by_more_than_rounding() {
    let b = book(vec![(dec!(0.30), dec!(100)), (dec!(0.35), dec!(100))]);
    for notional in [dec!(1), dec!(10), dec!(30), dec!(65), dec!(1000)] {
        let result = b.walk_asks(notional, None);
        assert!(result.units >= Decimal::ZERO);
        assert!(result.spend <= notional + Decimal::new(1, 6));
    }
}

#[test]
fn full_liquidity_fill_has_no_shortfall_and_exact_spend() {
    let b = book(vec![(dec!(0.30), dec!(100)), (dec!(0.35), dec!(100))]);
    let result = b.walk_asks(dec!(65), None);
    assert_eq!(result.shortfall, None);
    assert_eq!(result.spend, dec!(65));
    assert_eq!(result.source, FillSource::Orderbook);
}

#[test]
fn insufficient_liquidity_reports_shortfall_but_keeps_partial_numbers() {
    let b = book(vec![(dec!(0.30), dec!(10))]);
    let result = b.walk_asks(dec!(100), None);
    assert_eq!(result.spend, dec!(3));
    assert_eq!(result.units, dec!(10));
    assert_eq!(result.shortfall, Some(dec!(97)));
}
