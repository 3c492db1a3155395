//! Resolution oracle (C7): derive settlement outcomes from thresholds,
//! official prints, trade history, or spot fallback; force-resolve stuck
//! positions when settlement data never arrives.

use rust_decimal::Decimal;

use crate::core::domain::{OutcomeSource, ResolvedOutcome, Snapshot, Venue, VenueOutcome};

/// Partial force-resolution: one side known, the other still missing.
pub const FORCE_PARTIAL_MS: i64 = 180_000;
/// Total force-resolution: resolve as a loss regardless of what's known.
pub const FORCE_TOTAL_MS: i64 = 600_000;

/// Window, either side of close, within which an official print or trade
/// history sample is considered valid for settlement.
const CLOSE_WINDOW_MS: i64 = 60_000;
/// How stale a spot price may be (relative to close) and still count.
const SPOT_STALENESS_MS: i64 = 120_000;

/// Resolve one venue's leg against a locked threshold, in spec priority
/// order: official print (K only) → trade history → spot fallback → unknown.
#[must_use]
pub fn resolve_venue(snap: Option<&Snapshot>, threshold: Decimal, close_ms: i64) -> (VenueOutcome, OutcomeSource) {
    let Some(snap) = snap else {
        return (VenueOutcome::Unknown, OutcomeSource::Unknown);
    };

    if snap.venue == Venue::K {
        if let (Some(value), Some(ts)) = (snap.underlying_value, snap.underlying_ts_ms) {
            if (ts - close_ms).abs() <= CLOSE_WINDOW_MS {
                return (VenueOutcome::from_compare(value, threshold), OutcomeSource::OfficialPrint);
            }
        }
    }

    let window_start = close_ms - CLOSE_WINDOW_MS;
    let window_end = close_ms + CLOSE_WINDOW_MS;
    let closest = snap
        .price_history_with_ts
        .iter()
        .filter(|tick| tick.ts_ms >= window_start && tick.ts_ms <= window_end)
        .min_by_key(|tick| (tick.ts_ms - close_ms).abs());
    if let Some(tick) = closest {
        return (VenueOutcome::from_compare(tick.price, threshold), OutcomeSource::TradeHistory);
    }

    if snap.crypto_price > Decimal::ZERO && snap.crypto_price_timestamp_ms >= close_ms - SPOT_STALENESS_MS {
        return (VenueOutcome::from_compare(snap.crypto_price, threshold), OutcomeSource::SpotFallback);
    }

    (VenueOutcome::Unknown, OutcomeSource::Unknown)
}

/// Loosened spot fallback used only once force-resolution's partial clock
/// (180s past close) has fired: any non-zero spot print counts, regardless
/// of how stale it is relative to close.
fn loosened_spot_fallback(snap: Option<&Snapshot>, threshold: Decimal) -> (VenueOutcome, OutcomeSource) {
    match snap {
        Some(snap) if snap.crypto_price > Decimal::ZERO => {
            (VenueOutcome::from_compare(snap.crypto_price, threshold), OutcomeSource::SpotFallback)
        }
        _ => (VenueOutcome::Unknown, OutcomeSource::Unknown),
    }
}

/// Combine both venues' resolutions, applying the force-resolution clock.
///
/// Returns `None` when settlement is still pending and neither force
/// threshold has fired yet — the position stays open and the caller tries
/// again next tick. Returns `Some` once there is a final call to make,
/// whether from normal settlement data or a forced close.
#[must_use]
pub fn resolve_pair(
    threshold_p: Decimal,
    threshold_k: Decimal,
    close_ms: i64,
    snap_p: Option<&Snapshot>,
    snap_k: Option<&Snapshot>,
    now_ms: i64,
) -> Option<ResolvedOutcome> {
    let (mut venue_p, mut source_p) = resolve_venue(snap_p, threshold_p, close_ms);
    let (mut venue_k, mut source_k) = resolve_venue(snap_k, threshold_k, close_ms);

    if venue_p.is_known() && venue_k.is_known() {
        return Some(ResolvedOutcome {
            venue_p,
            venue_k,
            source_p,
            source_k,
            forced: false,
        });
    }

    let elapsed = now_ms - close_ms;
    if elapsed < FORCE_PARTIAL_MS {
        return None;
    }

    // 180s: one side known, the other missing — try a looser spot fallback
    // for the missing side before giving up on it.
    if !venue_p.is_known() {
        let (outcome, source) = loosened_spot_fallback(snap_p, threshold_p);
        venue_p = outcome;
        source_p = source;
    }
    if !venue_k.is_known() {
        let (outcome, source) = loosened_spot_fallback(snap_k, threshold_k);
        venue_k = outcome;
        source_k = source;
    }

    if venue_p.is_known() && venue_k.is_known() {
        return Some(ResolvedOutcome {
            venue_p,
            venue_k,
            source_p,
            source_k,
            forced: true,
        });
    }

    if elapsed >= FORCE_TOTAL_MS {
        return Some(ResolvedOutcome {
            venue_p,
            venue_k,
            source_p: if source_p == OutcomeSource::Unknown { OutcomeSource::Forced } else { source_p },
            source_k: if source_k == OutcomeSource::Unknown { OutcomeSource::Forced } else { source_k },
            forced: true,
        });
    }

    None
}
