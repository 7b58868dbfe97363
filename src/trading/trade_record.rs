use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{CloseReason, TradeStatus};
use crate::strategies::signals::TradeSignal;

/// A signal the user promoted to a tracked trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: Uuid,
    #[serde(flatten)]
    pub signal: TradeSignal,
    pub status: TradeStatus,
    pub opened_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub close_price: Option<f64>,
    /// Realised move in units of the signal's risk distance.
    #[serde(default)]
    pub r_multiple: Option<f64>,
}

impl Trade {
    pub fn open(signal: TradeSignal, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            signal,
            status: TradeStatus::Open,
            opened_at: now,
            closed_at: None,
            close_price: None,
            r_multiple: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Apply the single Open -> Closed transition. Returns false and leaves the
    /// trade untouched if it is already closed.
    pub(crate) fn close(
        &mut self,
        reason: CloseReason,
        price: Option<f64>,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.is_open() {
            return false;
        }
        self.status = reason.status();
        self.closed_at = Some(now);
        self.close_price = price;
        self.r_multiple = price.map(|p| self.r_multiple_at(p));
        true
    }

    pub fn r_multiple_at(&self, price: f64) -> f64 {
        if self.signal.risk_distance <= 0.0 {
            return 0.0;
        }
        let moved = (price - self.signal.entry_price) * self.signal.direction.sign();
        round2(moved / self.signal.risk_distance)
    }

    pub fn stop_hit(&self, price: f64) -> bool {
        (self.signal.stop_loss - price) * self.signal.direction.sign() >= 0.0
    }

    /// True once price reaches the first rung of the ladder.
    pub fn target_hit(&self, price: f64) -> bool {
        (price - self.signal.take_profits[0]) * self.signal.direction.sign() >= 0.0
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
