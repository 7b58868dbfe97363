pub mod simulated;

pub use simulated::SimulatedSource;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ScanTimeframe, TradingStyle};
use crate::strategies::signals::{ScanRow, TradeSignal};

/// Where the desk gets its signals and scan rows from.
#[async_trait]
pub trait SignalSource: Send {
    async fn generate_signal(
        &mut self,
        market: &str,
        style: TradingStyle,
        balance: f64,
    ) -> Result<TradeSignal>;

    /// May return an empty list; callers substitute a Wait row.
    async fn scan_market(&mut self, timeframe: ScanTimeframe) -> Result<Vec<ScanRow>>;
}
