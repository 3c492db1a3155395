//! Arbitrage engine (C5): fan-out over a profile's coins for one tick.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::config::{CoinConfig, ProfileConfig};
use crate::core::domain::{CoinId, CoinRuntimeState, EngineSummary, MarketView, Snapshot};
use crate::core::service::logger::{LogLevel, Logger};
use crate::core::state_machine::{self, CoinEvent};
use crate::error::CoinError;

/// A venue-disagreement record written to `mismatch.log` as one JSON line
/// per occurrence, independent of the free-text profile/system sinks.
#[derive(Debug, Serialize)]
struct MismatchRecord<'a> {
    coin: &'a str,
    profile: &'a str,
    ts_ms: i64,
    reason: &'static str,
}

/// One profile's evaluation loop: owns a `CoinRuntimeState` per configured
/// coin plus the profile-level summary/PnL.
pub struct ArbitrageEngine {
    name: String,
    decision_latency_ms: i64,
    coins: Vec<(CoinId, CoinConfig)>,
    runtime: HashMap<CoinId, CoinRuntimeState>,
    summary: EngineSummary,
    logger: Logger,
    mismatch: Option<Arc<Logger>>,
}

impl ArbitrageEngine {
    #[must_use]
    pub fn new(profile: &ProfileConfig, started_ms: i64, logger: Logger) -> Self {
        Self::with_mismatch_sink(profile, started_ms, logger, None)
    }

    #[must_use]
    pub fn with_mismatch_sink(
        profile: &ProfileConfig,
        started_ms: i64,
        logger: Logger,
        mismatch: Option<Arc<Logger>>,
    ) -> Self {
        let coins: Vec<(CoinId, CoinConfig)> = profile
            .coins
            .iter()
            .map(|c| (CoinId::new(c.coin.clone()), c.clone()))
            .collect();
        let runtime = coins
            .iter()
            .map(|(id, _)| (id.clone(), CoinRuntimeState::new(id.clone())))
            .collect();

        Self {
            name: profile.name.clone(),
            decision_latency_ms: profile.decision_latency_ms,
            coins,
            runtime,
            summary: EngineSummary::new(started_ms),
            logger,
            mismatch,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run one tick: dispatch every configured coin to the state machine in
    /// configuration order (spec §5 ordering guarantee). A per-coin failure
    /// is caught, logged, and never prevents the remaining coins from being
    /// evaluated in the same tick (spec §4.4).
    pub fn evaluate(
        &mut self,
        snaps_p: &HashMap<CoinId, Snapshot>,
        snaps_k: &HashMap<CoinId, Snapshot>,
        now_ms: i64,
    ) {
        // Collect configs up front to avoid an overlapping `&mut self.runtime`
        // borrow while also needing `&self.coins` inside the loop.
        let coins = self.coins.clone();

        for (coin, cfg) in &coins {
            let result = self.evaluate_one(coin, cfg, snaps_p.get(coin), snaps_k.get(coin), now_ms);
            if let Err(err) = result {
                self.logger.log(LogLevel::Error, &format!("{err}"));
            }
        }
    }

    fn evaluate_one(
        &mut self,
        coin: &CoinId,
        cfg: &CoinConfig,
        snap_p: Option<&Snapshot>,
        snap_k: Option<&Snapshot>,
        now_ms: i64,
    ) -> Result<(), CoinError> {
        let prev = self
            .runtime
            .get(coin)
            .ok_or_else(|| CoinError::new(coin.clone(), "coin not registered in this profile"))?;

        let outcome = state_machine::step(coin, prev, snap_p, snap_k, cfg, self.decision_latency_ms, now_ms);

        if let Some(event) = &outcome.event {
            self.handle_event(coin, event, now_ms);
        }

        self.runtime.insert(coin.clone(), outcome.state);
        Ok(())
    }

    fn handle_event(&mut self, coin: &CoinId, event: &CoinEvent, now_ms: i64) {
        match event {
            CoinEvent::PendingCreated { direction, gap } => {
                self.logger.log(
                    LogLevel::Info,
                    &format!("{coin}: pending {direction:?} opened, gap={gap}"),
                );
            }
            CoinEvent::PendingCanceled { reason } => {
                self.logger.log(LogLevel::Warn, &format!("{coin}: pending canceled ({reason})"));
                if *reason == "market_key_changed" {
                    if let Some(mismatch) = &self.mismatch {
                        mismatch.log_json(&MismatchRecord {
                            coin: coin.as_str(),
                            profile: &self.name,
                            ts_ms: now_ms,
                            reason,
                        });
                    }
                }
            }
            CoinEvent::Opened { direction, units, spend_total } => {
                self.summary.record_open();
                self.logger.log(
                    LogLevel::Info,
                    &format!("{coin}: opened {direction:?} units={units} spend={spend_total}"),
                );
            }
            CoinEvent::Resolved { profit, forced } => {
                self.summary.record_resolution(now_ms, *profit);
                let label = if *forced { "forced " } else { "" };
                self.logger.log(
                    LogLevel::Info,
                    &format!("{coin}: {label}resolved profit={profit}"),
                );
            }
        }
    }

    #[must_use]
    pub fn summary(&self) -> &EngineSummary {
        &self.summary
    }

    #[must_use]
    pub fn market_views(&self) -> Vec<MarketView> {
        self.coins
            .iter()
            .filter_map(|(id, _)| self.runtime.get(id).map(|r| r.current_view.clone()))
            .collect()
    }

    #[must_use]
    pub fn logs(&self) -> Vec<String> {
        self.logger.snapshot()
    }

    /// Open positions currently tracked across all coins in this profile
    /// (used for the `totalTrades == wins + losses + openPositions` property).
    #[must_use]
    pub fn open_position_count(&self) -> usize {
        self.runtime.values().filter(|r| r.position.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoinConfig;
    use crate::core::domain::{DataStatus, MarketKey, OrderBook, PriceLevel, ReferenceSource, TokenId, Venue};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn cfg(coin: &str) -> CoinConfig {
        CoinConfig {
            coin: coin.into(),
            trade_allowed_time_left: 750,
            trade_stop_time_left: None,
            min_gap: dec!(0.04),
            max_spend_total: dec!(500),
            min_spend_total: Decimal::ZERO,
            max_spread: None,
            min_depth_value: None,
            max_price_staleness_sec: None,
            fill_usd: Some(dec!(500)),
            cooldown_ms: 0,
        }
    }

    fn profile(coin: &str) -> ProfileConfig {
        ProfileConfig {
            name: "default".into(),
            decision_latency_ms: 0,
            coins: vec![cfg(coin)],
        }
    }

    fn snapshot(venue: Venue, coin: &str, market_key: &str, up_ask: Decimal, down_ask: Decimal) -> Snapshot {
        let up_token = TokenId::new("up");
        let down_token = TokenId::new("down");
        let mut books = std::collections::HashMap::new();
        books.insert(
            up_token.clone(),
            OrderBook {
                asks: vec![PriceLevel::new(up_ask, dec!(500))],
                bids: Vec::new(),
                last_trade: None,
                total_bid_value: Decimal::ZERO,
                total_ask_value: Decimal::ZERO,
            },
        );
        books.insert(
            down_token.clone(),
            OrderBook {
                asks: vec![PriceLevel::new(down_ask, dec!(500))],
                bids: Vec::new(),
                last_trade: None,
                total_bid_value: Decimal::ZERO,
                total_ask_value: Decimal::ZERO,
            },
        );

        Snapshot {
            venue,
            coin: CoinId::new(coin),
            market_key: MarketKey::new(market_key),
            market_close_time_ms: 1_000,
            time_left_sec: 600,
            price_to_beat: dec!(50000),
            reference_price: dec!(50000),
            reference_source: ReferenceSource::PriceToBeat,
            crypto_price: dec!(50000),
            crypto_price_timestamp_ms: 0,
            underlying_value: None,
            underlying_ts_ms: None,
            data_status: DataStatus::Healthy,
            up_token_id: up_token,
            down_token_id: down_token,
            up_outcome: "Up".into(),
            down_outcome: "Down".into(),
            order_books: books,
            best_bid: std::collections::HashMap::new(),
            best_ask: std::collections::HashMap::new(),
            price_history_with_ts: Vec::new(),
        }
    }

    #[test]
    fn evaluate_opens_a_position_over_two_ticks() {
        let profile = profile("BTC");
        let mut engine = ArbitrageEngine::new(&profile, 0, Logger::new_ring_only("default"));

        let mut snaps_p = HashMap::new();
        let mut snaps_k = HashMap::new();
        snaps_p.insert(CoinId::new("BTC"), snapshot(Venue::P, "BTC", "KXBTC15M-1", dec!(0.40), dec!(0.60)));
        snaps_k.insert(CoinId::new("BTC"), snapshot(Venue::K, "BTC", "KXBTC15M-1", dec!(0.55), dec!(0.50)));

        engine.evaluate(&snaps_p, &snaps_k, 0);
        engine.evaluate(&snaps_p, &snaps_k, 0);

        assert_eq!(engine.summary().total_trades, 1);
        assert_eq!(engine.open_position_count(), 1);
    }

    #[test]
    fn evaluate_is_idempotent_for_a_repeated_tick() {
        let profile = profile("BTC");
        let mut engine = ArbitrageEngine::new(&profile, 0, Logger::new_ring_only("default"));

        let mut snaps_p = HashMap::new();
        let mut snaps_k = HashMap::new();
        snaps_p.insert(CoinId::new("BTC"), snapshot(Venue::P, "BTC", "KXBTC15M-1", dec!(0.40), dec!(0.60)));
        snaps_k.insert(CoinId::new("BTC"), snapshot(Venue::K, "BTC", "KXBTC15M-1", dec!(0.55), dec!(0.50)));

        engine.evaluate(&snaps_p, &snaps_k, 0);
        engine.evaluate(&snaps_p, &snaps_k, 0);
        let after_open = engine.open_position_count();
        engine.evaluate(&snaps_p, &snaps_k, 0);

        assert_eq!(after_open, engine.open_position_count());
        assert_eq!(engine.summary().total_trades, 1);
    }
}
