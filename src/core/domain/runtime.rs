//! Per-(profile, coin) runtime state: the mutable half of the state machine.

use serde::{Deserialize, Serialize};

use super::ids::MarketKey;
use super::market_view::MarketView;
use super::pending::PendingOrder;
use super::position::OpenPosition;

/// The coin's current phase in its trade lifecycle. `Resolved` is transient:
/// the engine observes it for one tick (to emit the event and update the
/// summary) and the coin then returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinState {
    Idle,
    Pending,
    Open,
    Resolving,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinRuntimeState {
    pub state: CoinState,
    pub last_market_key_p: Option<MarketKey>,
    pub last_market_key_k: Option<MarketKey>,
    pub pending: Option<PendingOrder>,
    pub position: Option<OpenPosition>,
    pub last_decision_ms: i64,
    pub current_view: MarketView,
}

impl CoinRuntimeState {
    #[must_use]
    pub fn new(coin: super::ids::CoinId) -> Self {
        Self {
            state: CoinState::Idle,
            last_market_key_p: None,
            last_market_key_k: None,
            pending: None,
            position: None,
            last_decision_ms: i64::MIN,
            current_view: MarketView::idle(coin),
        }
    }

    /// At most one of `{pending, position}` may be non-null (spec §8 invariant).
    #[must_use]
    pub fn invariant_holds(&self) -> bool {
        !(self.pending.is_some() && self.position.is_some())
    }
}
