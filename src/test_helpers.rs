use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::core::risk::RiskPlan;
use crate::models::{Direction, Market, TradingStyle};
use crate::strategies::signals::TradeSignal;

/// 2024-01-15T12:00:00Z, the reference instant used across tests.
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-15T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A Swing signal at an exact entry, so the risk distance is entry * 0.5%.
pub fn make_signal(market: &str, direction: Direction, entry: f64) -> TradeSignal {
    let m = Market::lookup(market);
    let plan = RiskPlan::build(entry, direction, TradingStyle::Swing, &m);
    TradeSignal {
        direction,
        entry_price: entry,
        stop_loss: plan.stop_loss,
        take_profits: plan.take_profits,
        risk_distance: plan.risk_distance,
        confidence: 90,
        reasoning: "test signal".to_string(),
        generated_at: fixed_now(),
        market: m.symbol.clone(),
        precision: m.precision,
        style: TradingStyle::Swing,
        account_balance: 100.0,
    }
}

/// A Config suitable for testing: no simulated latency, fixed seed.
pub fn default_test_config() -> Config {
    Config {
        default_market: "XAUUSD".to_string(),
        default_style: TradingStyle::Scalp,
        default_balance: 100.0,
        signal_delay_ms: 0,
        scan_delay_ms: 0,
        scan_interval_secs: 60,
        scan_market: "XAUUSD".to_string(),
        rng_seed: Some(42),
        display_tz: chrono_tz::UTC,
        log_level: "ERROR".to_string(),
    }
}
