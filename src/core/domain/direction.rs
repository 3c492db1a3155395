//! Direction: which UP/DOWN leg is bought on which venue.

use serde::{Deserialize, Serialize};

/// `UpNo` = buy UP on venue P + buy DOWN/NO on venue K.
/// `DownYes` = buy DOWN on venue P + buy UP/YES on venue K.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    UpNo,
    DownYes,
}

impl Direction {
    /// Pick the direction with the larger gap, breaking exact ties (within
    /// `1e-9`, per spec) toward `UpNo`.
    ///
    /// Gaps are compared as `rust_decimal::Decimal`, so there is no binary
    /// float epsilon to reason about; the `1e-9` tolerance from spec.md is
    /// still honored explicitly since the oracle/estimator outputs can carry
    /// more decimal places than that.
    #[must_use]
    pub fn pick_best(gap_up_no: rust_decimal::Decimal, gap_down_yes: rust_decimal::Decimal) -> Self {
        let tie_tolerance = rust_decimal::Decimal::new(1, 9);
        if (gap_up_no - gap_down_yes).abs() <= tie_tolerance {
            Self::UpNo
        } else if gap_up_no > gap_down_yes {
            Self::UpNo
        } else {
            Self::DownYes
        }
    }
}
