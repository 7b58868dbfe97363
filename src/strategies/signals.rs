use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::risk::LADDER_RUNGS;
use crate::models::{Direction, Market, ScanTimeframe, TradingStyle};

/// A generated trade recommendation. Prices are already rounded to `precision`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub direction: Direction,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profits: [f64; LADDER_RUNGS],
    pub risk_distance: f64,
    pub confidence: u8,
    pub reasoning: String,
    pub generated_at: DateTime<Utc>,
    pub market: String,
    pub precision: u32,
    pub style: TradingStyle,
    pub account_balance: f64,
}

impl TradeSignal {
    pub fn format_price(&self, price: f64) -> String {
        format!("{:.*}", self.precision as usize, price)
    }

    pub fn entry_text(&self) -> String {
        self.format_price(self.entry_price)
    }

    pub fn stop_text(&self) -> String {
        self.format_price(self.stop_loss)
    }

    pub fn take_profit_texts(&self) -> Vec<String> {
        self.take_profits.iter().map(|&tp| self.format_price(tp)).collect()
    }
}

/// Entry price and side drawn for a market; the common root of both
/// `TradeSignal` and `ScanRow`.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub market: Market,
    pub direction: Direction,
    pub entry: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanRowKind {
    Buy,
    Sell,
    Wait,
}

impl From<Direction> for ScanRowKind {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Buy => ScanRowKind::Buy,
            Direction::Sell => ScanRowKind::Sell,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanStatus {
    #[serde(rename = "RUNNING")]
    Running,
    #[serde(rename = "HIT TP")]
    HitTp,
    #[serde(rename = "HIT SL")]
    HitSl,
    #[serde(rename = "WAITING")]
    Waiting,
}

/// Abbreviated signal summary shown by the market scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRow {
    pub time: String,
    pub market: String,
    pub style: TradingStyle,
    pub kind: ScanRowKind,
    /// Formatted entry; None on a Wait row.
    pub entry: Option<String>,
    pub target: Option<String>,
    pub status: ScanStatus,
    pub pips: String,
}

impl ScanRow {
    /// Running row for a freshly drawn quote. The target sits a fixed offset
    /// from entry in the trade direction.
    pub fn from_quote(quote: &Quote, timeframe: ScanTimeframe, time: String) -> Self {
        let target = quote.entry + quote.direction.sign() * timeframe.target_offset();
        Self {
            time,
            market: quote.market.symbol.clone(),
            style: timeframe.style(),
            kind: quote.direction.into(),
            entry: Some(quote.market.format(quote.entry)),
            target: Some(quote.market.format(target)),
            status: ScanStatus::Running,
            pips: "+0".to_string(),
        }
    }

    /// Placeholder shown when a scan yields nothing.
    pub fn waiting(market: &str, timeframe: ScanTimeframe, time: String) -> Self {
        Self {
            time,
            market: market.to_string(),
            style: timeframe.style(),
            kind: ScanRowKind::Wait,
            entry: None,
            target: None,
            status: ScanStatus::Waiting,
            pips: "0".to_string(),
        }
    }

    pub fn entry_text(&self) -> &str {
        self.entry.as_deref().unwrap_or("---")
    }

    pub fn target_text(&self) -> &str {
        self.target.as_deref().unwrap_or("---")
    }
}
