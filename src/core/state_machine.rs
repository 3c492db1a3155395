//! Coin state machine (C4): per-(profile, coin) lifecycle transitions.
//!
//! `step` is a pure function — it borrows the previous runtime state and
//! both snapshots and returns a new runtime state plus zero or one event.
//! Keeping it pure (no `&mut self` while reading snapshots) is what makes
//! the seven numbered transitions in spec §4.3 independently unit testable
//! without constructing a whole engine.

use rust_decimal::Decimal;

use crate::config::CoinConfig;
use crate::core::domain::{
    CoinId, CoinRuntimeState, CoinState, Direction, FillEstimate, FillSource, LockedThresholds, MarketView,
    OpenPosition, PendingOrder, Snapshot,
};
use crate::core::fill_estimator;
use crate::core::resolution::resolve_pair;

/// Observable effect of one `step` call, consumed by the engine for
/// summary bookkeeping and logging.
#[derive(Debug, Clone)]
pub enum CoinEvent {
    PendingCreated { direction: Direction, gap: Decimal },
    PendingCanceled { reason: &'static str },
    Opened { direction: Direction, units: Decimal, spend_total: Decimal },
    Resolved { profit: Decimal, forced: bool },
}

#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub state: CoinRuntimeState,
    pub event: Option<CoinEvent>,
}

fn spread_for(snap: &Snapshot, up_token: &crate::core::domain::TokenId) -> Option<Decimal> {
    let ask = snap.best_ask.get(up_token)?;
    let bid = snap.best_bid.get(up_token)?;
    Some(ask - bid)
}

fn depth_for(snap: &Snapshot) -> Decimal {
    snap.order_books.values().map(|b| b.total_ask_value).sum()
}

fn passes_optional_gates(cfg: &CoinConfig, snap_p: &Snapshot, snap_k: &Snapshot, est: &FillEstimate, now_ms: i64) -> bool {
    if let Some(max_spread) = cfg.max_spread {
        let token_p = match est.direction {
            Direction::UpNo => &snap_p.up_token_id,
            Direction::DownYes => &snap_p.down_token_id,
        };
        let token_k = match est.direction {
            Direction::UpNo => &snap_k.down_token_id,
            Direction::DownYes => &snap_k.up_token_id,
        };
        let widest = [spread_for(snap_p, token_p), spread_for(snap_k, token_k)]
            .into_iter()
            .flatten()
            .fold(Decimal::ZERO, Decimal::max);
        if widest > max_spread {
            return false;
        }
    }

    if let Some(min_depth) = cfg.min_depth_value {
        if depth_for(snap_p) < min_depth || depth_for(snap_k) < min_depth {
            return false;
        }
    }

    if let Some(max_staleness_sec) = cfg.max_price_staleness_sec {
        let staleness_p = (now_ms - snap_p.crypto_price_timestamp_ms) / 1_000;
        let staleness_k = (now_ms - snap_k.crypto_price_timestamp_ms) / 1_000;
        if staleness_p > max_staleness_sec || staleness_k > max_staleness_sec {
            return false;
        }
    }

    true
}

fn entry_gate_passes(cfg: &CoinConfig, snap_p: &Snapshot, snap_k: &Snapshot, last_decision_ms: i64, now_ms: i64) -> bool {
    if !snap_p.is_healthy() || !snap_k.is_healthy() {
        return false;
    }
    for snap in [snap_p, snap_k] {
        if snap.time_left_sec <= 0 {
            return false;
        }
        if snap.time_left_sec > cfg.trade_allowed_time_left {
            return false;
        }
        if let Some(stop) = cfg.trade_stop_time_left {
            if snap.time_left_sec <= stop {
                return false;
            }
        }
        if !snap.has_threshold() {
            return false;
        }
    }
    last_decision_ms + cfg.cooldown_ms <= now_ms
}

fn choose_direction(snap_p: &Snapshot, snap_k: &Snapshot, notional: Decimal) -> FillEstimate {
    let up_no = fill_estimator::estimate(Direction::UpNo, snap_p, snap_k, notional);
    let down_yes = fill_estimator::estimate(Direction::DownYes, snap_p, snap_k, notional);
    match Direction::pick_best(up_no.gap, down_yes.gap) {
        Direction::UpNo => up_no,
        Direction::DownYes => down_yes,
    }
}

/// PnL for one resolved position (spec §4.4): the guaranteed per-unit
/// payout when both legs settle, a full loss of spend otherwise.
fn compute_profit(position: &OpenPosition, outcome_known: bool) -> Decimal {
    if outcome_known {
        position.units * (Decimal::ONE - position.estimate.combined_cost)
    } else {
        -position.spend_total
    }
}

#[must_use]
pub fn step(
    coin: &CoinId,
    prev: &CoinRuntimeState,
    snap_p: Option<&Snapshot>,
    snap_k: Option<&Snapshot>,
    cfg: &CoinConfig,
    decision_latency_ms: i64,
    now_ms: i64,
) -> StepOutcome {
    let mut state = prev.clone();

    // 1. Market-key refresh: cancel any pending on a roll; positions settle
    // against their own locked market regardless of what the feed reports now.
    let key_p_changed = snap_p
        .map(|s| state.last_market_key_p.as_ref() != Some(&s.market_key))
        .unwrap_or(false);
    let key_k_changed = snap_k
        .map(|s| state.last_market_key_k.as_ref() != Some(&s.market_key))
        .unwrap_or(false);

    let mut event = None;

    if (key_p_changed || key_k_changed) && state.pending.is_some() {
        state.pending = None;
        event = Some(CoinEvent::PendingCanceled { reason: "market_key_changed" });
    }

    if let Some(s) = snap_p {
        state.last_market_key_p = Some(s.market_key.clone());
    }
    if let Some(s) = snap_k {
        state.last_market_key_k = Some(s.market_key.clone());
    }

    // 2. Resolve if Open and past close.
    if event.is_none() {
        if let Some(position) = state.position.clone() {
            if now_ms >= position.market_close_ms {
                let resolved = resolve_pair(
                    position.locked.price_to_beat_p,
                    position.locked.price_to_beat_k,
                    position.market_close_ms,
                    snap_p,
                    snap_k,
                    now_ms,
                );
                if let Some(outcome) = resolved {
                    let profit = compute_profit(&position, outcome.both_known());
                    state.position = None;
                    event = Some(CoinEvent::Resolved { profit, forced: outcome.forced });
                }
            }
        }
    }

    // 3/4/5. Entry gate + estimate + create pending (only when fully Idle).
    if event.is_none() && state.pending.is_none() && state.position.is_none() {
        if let (Some(sp), Some(sk)) = (snap_p, snap_k) {
            if entry_gate_passes(cfg, sp, sk, state.last_decision_ms, now_ms) {
                let notional = cfg.notional();
                let best = choose_direction(sp, sk, notional);
                let meets_gap = best.gap >= cfg.min_gap;
                let meets_spend = best.spend_total() >= cfg.min_spend_total;
                let meets_optional = passes_optional_gates(cfg, sp, sk, &best, now_ms);
                // best_ask/unavailable fills are display-only (spec §4.1, §7) — a
                // real entry requires both legs priced off actual resting liquidity.
                let meets_source = best.source == FillSource::Orderbook;

                if meets_gap && meets_spend && meets_optional && meets_source {
                    let pending = PendingOrder::new(
                        best.direction,
                        sp.market_key.clone(),
                        sk.market_key.clone(),
                        best,
                        now_ms,
                        decision_latency_ms,
                    );
                    event = Some(CoinEvent::PendingCreated { direction: best.direction, gap: best.gap });
                    state.pending = Some(pending);
                }
            }
        }
    }

    // 6. Pending -> Open once due, provided the re-estimate still clears the gate.
    if event.is_none() {
        if let Some(pending) = state.pending.clone() {
            if pending.is_due(now_ms) {
                match (snap_p, snap_k) {
                    (Some(sp), Some(sk)) if pending.market_keys_match(&sp.market_key, &sk.market_key) => {
                        let notional = cfg.notional();
                        let reestimate = fill_estimator::estimate(pending.direction, sp, sk, notional);
                        let meets_gap = reestimate.gap >= cfg.min_gap;
                        let meets_source = reestimate.source == FillSource::Orderbook;
                        if meets_gap && meets_source {
                            let locked = LockedThresholds {
                                price_to_beat_p: sp.price_to_beat,
                                price_to_beat_k: sk.price_to_beat,
                            };
                            let position = OpenPosition::from_estimate(
                                reestimate,
                                now_ms,
                                sp.market_key.clone(),
                                sk.market_key.clone(),
                                sp.market_close_time_ms.min(sk.market_close_time_ms),
                                locked,
                            );
                            event = Some(CoinEvent::Opened {
                                direction: position.direction,
                                units: position.units,
                                spend_total: position.spend_total,
                            });
                            state.last_decision_ms = now_ms;
                            state.pending = None;
                            state.position = Some(position);
                        } else {
                            state.pending = None;
                            let reason = if !meets_source { "fill_source_degraded" } else { "gap_no_longer_met" };
                            event = Some(CoinEvent::PendingCanceled { reason });
                        }
                    }
                    _ => {
                        state.pending = None;
                        event = Some(CoinEvent::PendingCanceled { reason: "market_key_changed" });
                    }
                }
            }
        }
    }

    state.state = if state.position.is_some() {
        if now_ms >= state.position.as_ref().map(|p| p.market_close_ms).unwrap_or(i64::MAX) {
            CoinState::Resolving
        } else {
            CoinState::Open
        }
    } else if state.pending.is_some() {
        CoinState::Pending
    } else {
        CoinState::Idle
    };

    state.current_view = build_view(coin, &state, snap_p, snap_k, cfg, now_ms);

    StepOutcome { state, event }
}

fn build_view(
    coin: &CoinId,
    state: &CoinRuntimeState,
    snap_p: Option<&Snapshot>,
    snap_k: Option<&Snapshot>,
    cfg: &CoinConfig,
    now_ms: i64,
) -> MarketView {
    let data_status = match (snap_p, snap_k) {
        (Some(p), Some(k)) if p.is_healthy() && k.is_healthy() => crate::core::domain::DataStatus::Healthy,
        (Some(_), Some(_)) => crate::core::domain::DataStatus::Stale,
        _ => crate::core::domain::DataStatus::Disconnected,
    };

    let (current_gap, estimate_up_no, estimate_down_yes, selected_direction) = match (snap_p, snap_k) {
        (Some(sp), Some(sk)) => {
            let notional = cfg.notional();
            let up_no = fill_estimator::estimate(Direction::UpNo, sp, sk, notional);
            let down_yes = fill_estimator::estimate(Direction::DownYes, sp, sk, notional);
            let best_gap = up_no.gap.max(down_yes.gap);
            let selected = if state.pending.is_none()
                && state.position.is_none()
                && entry_gate_passes(cfg, sp, sk, state.last_decision_ms, now_ms)
                && best_gap >= cfg.min_gap
            {
                Some(Direction::pick_best(up_no.gap, down_yes.gap))
            } else {
                None
            };
            (best_gap, Some(up_no), Some(down_yes), selected)
        }
        _ => (Decimal::ZERO, None, None, None),
    };

    MarketView {
        coin: coin.clone(),
        data_status,
        pending_direction: state.pending.as_ref().map(|p| p.direction),
        selected_direction,
        position: state.position.clone(),
        estimate_up_no_source: estimate_up_no.as_ref().map_or(FillSource::Unavailable, |e| e.source),
        estimate_down_yes_source: estimate_down_yes.as_ref().map_or(FillSource::Unavailable, |e| e.source),
        estimate_up_no,
        estimate_down_yes,
        current_gap,
        last_decision_ms: state.last_decision_ms,
    }
}
