use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::feed::SignalSource;
use crate::models::{Market, ScanTimeframe, TradingStyle};
use crate::scanner::scan_rows;
use crate::strategies::signal_generator::generate_signal;
use crate::strategies::signals::{ScanRow, TradeSignal};

/// Local stand-in for an analysis backend: waits a fixed latency, then runs
/// the random generators. Never returns an error.
pub struct SimulatedSource {
    rng: StdRng,
    signal_delay: Duration,
    scan_delay: Duration,
    scan_market: Market,
    tz: Tz,
    /// When set, used instead of Utc::now() for timestamps (tests)
    pub sim_time: Option<DateTime<Utc>>,
}

impl SimulatedSource {
    pub fn new(cfg: &Config) -> Self {
        let rng = match cfg.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            signal_delay: cfg.signal_delay(),
            scan_delay: cfg.scan_delay(),
            scan_market: Market::lookup(&cfg.scan_market),
            tz: cfg.display_tz,
            sim_time: None,
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.sim_time.unwrap_or_else(Utc::now)
    }
}

async fn simulate_latency(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl SignalSource for SimulatedSource {
    async fn generate_signal(
        &mut self,
        market: &str,
        style: TradingStyle,
        balance: f64,
    ) -> Result<TradeSignal> {
        simulate_latency(self.signal_delay).await;
        let now = self.now();
        let signal = generate_signal(market, style, balance, now, &mut self.rng);
        debug!(
            "Generated {} {} {} @ {} ({}%)",
            signal.market,
            signal.style,
            signal.direction,
            signal.entry_text(),
            signal.confidence
        );
        Ok(signal)
    }

    async fn scan_market(&mut self, timeframe: ScanTimeframe) -> Result<Vec<ScanRow>> {
        simulate_latency(self.scan_delay).await;
        let now = self.now();
        Ok(scan_rows(&self.scan_market, timeframe, now, self.tz, &mut self.rng))
    }
}
