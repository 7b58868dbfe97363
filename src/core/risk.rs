use serde::{Deserialize, Serialize};

use crate::models::{Direction, Market, TradingStyle};

/// Stop distance as a fraction of entry for the short-term style (0.1%).
pub const SCALP_RISK_FRACTION: f64 = 0.001;
/// Stop distance as a fraction of entry for the long-term style (0.5%).
pub const SWING_RISK_FRACTION: f64 = 0.005;
/// Number of take-profit targets, placed at 1R..5R.
pub const LADDER_RUNGS: usize = 5;

pub fn risk_fraction(style: TradingStyle) -> f64 {
    match style {
        TradingStyle::Scalp => SCALP_RISK_FRACTION,
        TradingStyle::Swing => SWING_RISK_FRACTION,
    }
}

/// Absolute offset between entry and stop for a given style.
pub fn risk_distance(entry: f64, style: TradingStyle) -> f64 {
    entry * risk_fraction(style)
}

/// Stop and take-profit ladder derived from an entry price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPlan {
    /// Unrounded 1R distance.
    pub risk_distance: f64,
    pub stop_loss: f64,
    pub take_profits: [f64; LADDER_RUNGS],
}

impl RiskPlan {
    /// Stop sits one risk distance against the trade; TP n sits n risk
    /// distances with it. Every level is rounded to the market precision.
    pub fn build(entry: f64, direction: Direction, style: TradingStyle, market: &Market) -> Self {
        let distance = risk_distance(entry, style);
        let sign = direction.sign();

        let stop_loss = market.round(entry - sign * distance);
        let mut take_profits = [0.0; LADDER_RUNGS];
        for (i, tp) in take_profits.iter_mut().enumerate() {
            let multiple = (i + 1) as f64;
            *tp = market.round(entry + sign * distance * multiple);
        }

        Self {
            risk_distance: distance,
            stop_loss,
            take_profits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tolerance(market: &Market) -> f64 {
        10f64.powi(-(market.precision as i32)) + 1e-9
    }

    #[test]
    fn scalp_distance_is_tighter_than_swing() {
        for entry in [1.054, 5052.0, 98_200.0] {
            let scalp = risk_distance(entry, TradingStyle::Scalp);
            let swing = risk_distance(entry, TradingStyle::Swing);
            assert!(scalp > 0.0);
            assert!(scalp < swing);
        }
    }

    #[test]
    fn buy_ladder_ascends_above_entry() {
        let market = Market::lookup("XAUUSD");
        let plan = RiskPlan::build(5000.0, Direction::Buy, TradingStyle::Swing, &market);
        // 0.5% of 5000 = 25
        assert!((plan.risk_distance - 25.0).abs() < 1e-9);
        assert!((plan.stop_loss - 4975.0).abs() < 1e-9);
        assert_eq!(plan.take_profits, [5025.0, 5050.0, 5075.0, 5100.0, 5125.0]);
    }

    #[test]
    fn sell_ladder_descends_below_entry() {
        let market = Market::lookup("XAUUSD");
        let plan = RiskPlan::build(5000.0, Direction::Sell, TradingStyle::Scalp, &market);
        assert!((plan.stop_loss - 5005.0).abs() < 1e-9);
        assert_eq!(plan.take_profits, [4995.0, 4990.0, 4985.0, 4980.0, 4975.0]);
    }

    #[test]
    fn rounded_gaps_match_risk_distance() {
        let market = Market::lookup("EURUSD");
        let entry = 1.0547;
        for direction in [Direction::Buy, Direction::Sell] {
            let plan = RiskPlan::build(entry, direction, TradingStyle::Scalp, &market);
            let mut prev = entry;
            for tp in plan.take_profits {
                let gap = (tp - prev) * direction.sign();
                assert!((gap - plan.risk_distance).abs() <= tolerance(&market));
                prev = tp;
            }
            let stop_gap = (entry - plan.stop_loss) * direction.sign();
            assert!((stop_gap - plan.risk_distance).abs() <= tolerance(&market));
        }
    }
}
