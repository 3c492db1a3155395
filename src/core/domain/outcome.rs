//! Per-venue and combined settlement outcomes (C7).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The settled direction of the underlying relative to a locked threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueOutcome {
    Up,
    Down,
    Unknown,
}

impl VenueOutcome {
    /// `Up` iff `value > threshold`; `Down` iff `value < threshold`; on exact
    /// tie the venue's own rule is `Down` (the contract asks "above").
    #[must_use]
    pub fn from_compare(value: Decimal, threshold: Decimal) -> Self {
        if value > threshold {
            Self::Up
        } else {
            Self::Down
        }
    }

    #[must_use]
    pub fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Where a per-venue outcome was derived from, for logging/diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeSource {
    OfficialPrint,
    TradeHistory,
    SpotFallback,
    Forced,
    Unknown,
}

/// Combined result of resolving both legs of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedOutcome {
    pub venue_p: VenueOutcome,
    pub venue_k: VenueOutcome,
    pub source_p: OutcomeSource,
    pub source_k: OutcomeSource,
    pub forced: bool,
}

impl ResolvedOutcome {
    /// Both legs resolved to a known outcome (normal settlement path).
    #[must_use]
    pub fn both_known(&self) -> bool {
        self.venue_p.is_known() && self.venue_k.is_known()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn exact_tie_resolves_down() {
        assert_eq!(VenueOutcome::from_compare(dec!(50000), dec!(50000)), VenueOutcome::Down);
    }

    #[test]
    fn strictly_above_resolves_up() {
        assert_eq!(VenueOutcome::from_compare(dec!(50001), dec!(50000)), VenueOutcome::Up);
    }

    #[test]
    fn strictly_below_resolves_down() {
        assert_eq!(VenueOutcome::from_compare(dec!(49999), dec!(50000)), VenueOutcome::Down);
    }
}
