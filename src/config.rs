use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::models::TradingStyle;

pub type SharedConfig = Arc<RwLock<Config>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Desk defaults
    pub default_market: String,
    pub default_style: TradingStyle,
    /// Substituted for balance input that is not a positive number.
    pub default_balance: f64,

    // Simulated latency
    pub signal_delay_ms: u64,
    pub scan_delay_ms: u64,

    // Scanner
    pub scan_interval_secs: u64,
    pub scan_market: String,

    /// Fixed RNG seed; None draws from OS entropy.
    pub rng_seed: Option<u64>,

    /// Zone used for scan-row and trade time labels.
    pub display_tz: Tz,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        Config {
            default_market: env("DEFAULT_MARKET", "XAUUSD").to_ascii_uppercase(),
            default_style: env("DEFAULT_STYLE", "scalp")
                .parse()
                .unwrap_or(TradingStyle::Scalp),
            default_balance: env("DEFAULT_BALANCE", "100")
                .parse()
                .ok()
                .filter(|b: &f64| b.is_finite() && *b > 0.0)
                .unwrap_or(100.0),
            signal_delay_ms: env("SIGNAL_DELAY_MS", "1500").parse().unwrap_or(1500),
            scan_delay_ms: env("SCAN_DELAY_MS", "600").parse().unwrap_or(600),
            scan_interval_secs: env("SCAN_INTERVAL_SECS", "60")
                .parse()
                .ok()
                .filter(|s| *s > 0)
                .unwrap_or(60),
            scan_market: env("SCAN_MARKET", "XAUUSD").to_ascii_uppercase(),
            rng_seed: std::env::var("RNG_SEED").ok().and_then(|s| s.parse().ok()),
            display_tz: env("DISPLAY_TZ", "UTC").parse().unwrap_or(chrono_tz::UTC),
            log_level: env("LOG_LEVEL", "INFO"),
        }
    }

    pub fn signal_delay(&self) -> Duration {
        Duration::from_millis(self.signal_delay_ms)
    }

    pub fn scan_delay(&self) -> Duration {
        Duration::from_millis(self.scan_delay_ms)
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }

    pub fn shared(self) -> SharedConfig {
        Arc::new(RwLock::new(self))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helpers::default_test_config;

    #[test]
    fn durations_follow_fields() {
        let mut cfg = default_test_config();
        cfg.signal_delay_ms = 1500;
        cfg.scan_interval_secs = 60;
        assert_eq!(cfg.signal_delay().as_millis(), 1500);
        assert_eq!(cfg.scan_delay().as_millis(), 0);
        assert_eq!(cfg.scan_interval().as_secs(), 60);
    }

    #[tokio::test]
    async fn shared_config_is_readable() {
        let shared = default_test_config().shared();
        assert_eq!(shared.read().await.default_market, "XAUUSD");
    }
}
