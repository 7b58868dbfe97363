use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{CloseReason, TradeStatus};
use crate::strategies::signals::TradeSignal;
use crate::trading::trade_record::Trade;

/// In-memory list of trades, most recent first. Owned by the caller; nothing
/// here is global.
#[derive(Debug, Default)]
pub struct TradeBook {
    trades: Vec<Trade>,
    /// When set, used instead of Utc::now() for timestamps (tests)
    pub sim_time: Option<DateTime<Utc>>,
}

impl TradeBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn now(&self) -> DateTime<Utc> {
        self.sim_time.unwrap_or_else(Utc::now)
    }

    /// Promote a signal to an Open trade and put it at the top of the list.
    pub fn open(&mut self, signal: TradeSignal) -> &Trade {
        let trade = Trade::open(signal, self.now());
        info!(
            "Opened {} {} {} @ {} [{}]",
            trade.signal.market,
            trade.signal.style,
            trade.signal.direction,
            trade.signal.entry_text(),
            trade.id
        );
        self.trades.insert(0, trade);
        &self.trades[0]
    }

    /// Close an Open trade. Unknown ids and already-closed trades are ignored;
    /// the return value only says whether anything changed.
    pub fn close(&mut self, id: Uuid, reason: CloseReason) -> bool {
        self.close_inner(id, reason, None)
    }

    /// Like `close`, additionally recording the exit price and R-multiple.
    pub fn close_at(&mut self, id: Uuid, reason: CloseReason, price: f64) -> bool {
        if !price.is_finite() {
            warn!("close ignored: price {} is not finite", price);
            return false;
        }
        self.close_inner(id, reason, Some(price))
    }

    fn close_inner(&mut self, id: Uuid, reason: CloseReason, price: Option<f64>) -> bool {
        let now = self.now();
        let Some(trade) = self.trades.iter_mut().find(|t| t.id == id) else {
            debug!("close ignored: no trade {}", id);
            return false;
        };
        let closed = trade.close(reason, price, now);
        if closed {
            info!("Closed {} {} as {}", trade.signal.market, trade.id, trade.status);
        } else {
            debug!("close ignored: trade {} already {}", id, trade.status);
        }
        closed
    }

    /// Close every Open trade on `market` whose stop or first target `price`
    /// has reached. Stops fill at the stop level, targets at `price`.
    /// Returns the trades closed by this call. Non-finite prices are ignored.
    pub fn check_price(&mut self, market: &str, price: f64) -> Vec<Trade> {
        if !price.is_finite() {
            warn!("Ignoring non-finite {} price {}", market, price);
            return Vec::new();
        }
        let now = self.now();
        let mut closed = Vec::new();

        for trade in self
            .trades
            .iter_mut()
            .filter(|t| t.is_open() && t.signal.market.eq_ignore_ascii_case(market))
        {
            let hit = if trade.stop_hit(price) {
                let stop = trade.signal.stop_loss;
                trade.close(CloseReason::StopLoss, Some(stop), now)
            } else if trade.target_hit(price) {
                trade.close(CloseReason::TakeProfit, Some(price), now)
            } else {
                false
            };
            if hit {
                info!(
                    "{} {} hit {} at {}",
                    trade.signal.market,
                    trade.id,
                    trade.status,
                    trade.signal.format_price(price)
                );
                closed.push(trade.clone());
            }
        }

        closed
    }

    /// Drop every trade that is no longer Open. Open trades keep their order.
    pub fn clear_history(&mut self) -> usize {
        let before = self.trades.len();
        self.trades.retain(Trade::is_open);
        let removed = before - self.trades.len();
        if removed > 0 {
            info!("Cleared {} closed trades", removed);
        }
        removed
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn get(&self, id: Uuid) -> Option<&Trade> {
        self.trades.iter().find(|t| t.id == id)
    }

    /// Resolve a full id or a unique prefix of its hyphenated form.
    pub fn find_by_prefix(&self, prefix: &str) -> Option<&Trade> {
        let prefix = prefix.trim().to_ascii_lowercase();
        if prefix.is_empty() {
            return None;
        }
        let mut matches = self
            .trades
            .iter()
            .filter(|t| t.id.to_string().starts_with(&prefix));
        match (matches.next(), matches.next()) {
            (Some(t), None) => Some(t),
            _ => None,
        }
    }

    pub fn open_trades(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|t| t.is_open())
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn stats(&self) -> TradeStats {
        let count = |s: TradeStatus| self.trades.iter().filter(|t| t.status == s).count();
        let open = count(TradeStatus::Open);
        let closed_tp = count(TradeStatus::ClosedTakeProfit);
        let closed_sl = count(TradeStatus::ClosedStopLoss);
        let closed_manual = count(TradeStatus::ClosedManual);

        let (manual_wins, manual_losses) = self
            .trades
            .iter()
            .filter(|t| t.status == TradeStatus::ClosedManual)
            .filter_map(|t| t.r_multiple)
            .fold((0, 0), |(w, l), r| {
                // Breakeven is neither a win nor a loss
                if r > 0.0 {
                    (w + 1, l)
                } else if r < 0.0 {
                    (w, l + 1)
                } else {
                    (w, l)
                }
            });

        let wins = closed_tp + manual_wins;
        let decided = wins + closed_sl + manual_losses;
        let win_rate = if decided > 0 {
            round1(wins as f64 / decided as f64 * 100.0)
        } else {
            0.0
        };

        let total_r = self.trades.iter().filter_map(|t| t.r_multiple).sum::<f64>();

        TradeStats {
            open,
            closed_tp,
            closed_sl,
            closed_manual,
            win_rate,
            total_r: (total_r * 100.0).round() / 100.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeStats {
    pub open: usize,
    pub closed_tp: usize,
    pub closed_sl: usize,
    pub closed_manual: usize,
    /// Percent of decided trades that were wins.
    pub win_rate: f64,
    pub total_r: f64,
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;
    use crate::test_helpers::{fixed_now, make_signal};

    fn book() -> TradeBook {
        let mut b = TradeBook::new();
        b.sim_time = Some(fixed_now());
        b
    }

    fn open_gold(book: &mut TradeBook, direction: Direction) -> Uuid {
        book.open(make_signal("XAUUSD", direction, 5000.0)).id
    }

    #[test]
    fn open_prepends_with_open_status() {
        let mut b = book();
        let first = open_gold(&mut b, Direction::Buy);
        let second = open_gold(&mut b, Direction::Sell);
        assert_eq!(b.len(), 2);
        assert_eq!(b.trades()[0].id, second);
        assert_eq!(b.trades()[1].id, first);
        assert!(b.trades().iter().all(Trade::is_open));
        assert_eq!(b.trades()[0].opened_at, fixed_now());
    }

    #[test]
    fn stop_loss_then_take_profit_keeps_stop_loss() {
        let mut b = book();
        let id = open_gold(&mut b, Direction::Buy);
        assert!(b.close(id, CloseReason::StopLoss));
        assert_eq!(b.get(id).unwrap().status, TradeStatus::ClosedStopLoss);

        assert!(!b.close(id, CloseReason::TakeProfit));
        assert_eq!(b.get(id).unwrap().status, TradeStatus::ClosedStopLoss);
    }

    #[test]
    fn close_unknown_id_is_noop() {
        let mut b = book();
        let id = open_gold(&mut b, Direction::Buy);
        assert!(!b.close(Uuid::new_v4(), CloseReason::Manual));
        assert_eq!(b.get(id).unwrap().status, TradeStatus::Open);
    }

    #[test]
    fn clear_history_keeps_open_trades_in_order() {
        let mut b = book();
        let a = open_gold(&mut b, Direction::Buy);
        let c = open_gold(&mut b, Direction::Buy);
        let d = open_gold(&mut b, Direction::Sell);
        b.close(c, CloseReason::Manual);

        assert_eq!(b.clear_history(), 1);
        let ids: Vec<Uuid> = b.trades().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![d, a]);
    }

    #[test]
    fn clear_history_on_all_open_is_noop() {
        let mut b = book();
        open_gold(&mut b, Direction::Buy);
        assert_eq!(b.clear_history(), 0);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn close_at_records_price_and_r() {
        let mut b = book();
        let id = open_gold(&mut b, Direction::Sell);
        assert!(b.close_at(id, CloseReason::Manual, 4950.0));
        let t = b.get(id).unwrap();
        assert_eq!(t.close_price, Some(4950.0));
        assert_eq!(t.r_multiple, Some(2.0));
        assert_eq!(t.closed_at, Some(fixed_now()));
    }

    #[test]
    fn check_price_closes_stops_and_targets() {
        let mut b = book();
        let long = open_gold(&mut b, Direction::Buy);
        let short = open_gold(&mut b, Direction::Sell);
        let other = b.open(make_signal("US30", Direction::Buy, 44000.0)).id;

        // Long stop 4975, short TP1 4975
        let closed = b.check_price("xauusd", 4970.0);
        assert_eq!(closed.len(), 2);

        let long_t = b.get(long).unwrap();
        assert_eq!(long_t.status, TradeStatus::ClosedStopLoss);
        assert_eq!(long_t.close_price, Some(4975.0));
        assert_eq!(long_t.r_multiple, Some(-1.0));

        let short_t = b.get(short).unwrap();
        assert_eq!(short_t.status, TradeStatus::ClosedTakeProfit);
        assert_eq!(short_t.close_price, Some(4970.0));

        assert_eq!(b.get(other).unwrap().status, TradeStatus::Open);
    }

    #[test]
    fn check_price_inside_range_changes_nothing() {
        let mut b = book();
        open_gold(&mut b, Direction::Buy);
        assert!(b.check_price("XAUUSD", 5001.0).is_empty());
        assert_eq!(b.open_trades().count(), 1);
    }

    #[test]
    fn non_finite_price_closes_nothing() {
        let mut b = book();
        let id = open_gold(&mut b, Direction::Buy);
        open_gold(&mut b, Direction::Sell);

        for price in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            assert!(b.check_price("XAUUSD", price).is_empty());
        }
        assert!(!b.close_at(id, CloseReason::Manual, f64::INFINITY));
        assert_eq!(b.open_trades().count(), 2);
        assert_eq!(b.stats().total_r, 0.0);
    }

    #[test]
    fn stats_count_outcomes() {
        let mut b = book();
        let tp = open_gold(&mut b, Direction::Buy);
        let sl = open_gold(&mut b, Direction::Buy);
        let manual_win = open_gold(&mut b, Direction::Buy);
        let manual_blind = open_gold(&mut b, Direction::Buy);
        open_gold(&mut b, Direction::Buy);

        b.close(tp, CloseReason::TakeProfit);
        b.close(sl, CloseReason::StopLoss);
        b.close_at(manual_win, CloseReason::Manual, 5010.0);
        b.close(manual_blind, CloseReason::Manual);

        let stats = b.stats();
        assert_eq!(stats.open, 1);
        assert_eq!(stats.closed_tp, 1);
        assert_eq!(stats.closed_sl, 1);
        assert_eq!(stats.closed_manual, 2);
        // 2 wins (tp, manual_win) out of 3 decided
        assert!((stats.win_rate - 66.7).abs() < 1e-9);
        assert!((stats.total_r - 0.4).abs() < 1e-9);
    }

    #[test]
    fn breakeven_manual_close_is_undecided() {
        let mut b = book();
        let tp = open_gold(&mut b, Direction::Buy);
        let flat = open_gold(&mut b, Direction::Buy);

        b.close(tp, CloseReason::TakeProfit);
        b.close_at(flat, CloseReason::Manual, 5000.0);

        let stats = b.stats();
        assert_eq!(stats.closed_manual, 1);
        assert_eq!(b.get(flat).unwrap().r_multiple, Some(0.0));
        assert!((stats.win_rate - 100.0).abs() < 1e-9);
        assert_eq!(stats.total_r, 0.0);
    }

    #[test]
    fn find_by_prefix_requires_unique_match() {
        let mut b = book();
        let id = open_gold(&mut b, Direction::Buy);
        let full = id.to_string();
        assert_eq!(b.find_by_prefix(&full[..8]).map(|t| t.id), Some(id));
        assert!(b.find_by_prefix("").is_none());
        assert!(b.find_by_prefix("zzzz").is_none());
    }
}
