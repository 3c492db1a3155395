//! Read-only per-coin projection consumed by the dashboard (out of scope)
//! and by tests.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::estimate::{FillEstimate, FillSource};
use super::ids::CoinId;
use super::position::OpenPosition;
use super::snapshot::DataStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketView {
    pub coin: CoinId,
    pub data_status: DataStatus,
    pub pending_direction: Option<Direction>,
    pub selected_direction: Option<Direction>,
    pub position: Option<OpenPosition>,
    pub estimate_up_no: Option<FillEstimate>,
    pub estimate_down_yes: Option<FillEstimate>,
    pub estimate_up_no_source: FillSource,
    pub estimate_down_yes_source: FillSource,
    pub current_gap: Decimal,
    pub last_decision_ms: i64,
}

impl MarketView {
    #[must_use]
    pub fn idle(coin: CoinId) -> Self {
        Self {
            coin,
            data_status: DataStatus::Disconnected,
            pending_direction: None,
            selected_direction: None,
            position: None,
            estimate_up_no: None,
            estimate_down_yes: None,
            estimate_up_no_source: FillSource::Unavailable,
            estimate_down_yes_source: FillSource::Unavailable,
            current_gap: Decimal::ZERO,
            last_decision_ms: i64::MIN,
        }
    }
}
