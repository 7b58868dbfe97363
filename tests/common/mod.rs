use chrono::{DateTime, Utc};

use signal_desk::config::Config;
use signal_desk::models::TradingStyle;

pub fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-17T13:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Zero-latency, seeded config so runs are fast and reproducible.
pub fn test_config() -> Config {
    let mut cfg = Config::from_env();
    cfg.default_market = "XAUUSD".to_string();
    cfg.default_style = TradingStyle::Scalp;
    cfg.default_balance = 100.0;
    cfg.signal_delay_ms = 0;
    cfg.scan_delay_ms = 0;
    cfg.scan_market = "XAUUSD".to_string();
    cfg.rng_seed = Some(2024);
    cfg.display_tz = chrono_tz::UTC;
    cfg
}
