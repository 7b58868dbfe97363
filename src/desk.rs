use anyhow::{Context, Result};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::feed::SignalSource;
use crate::models::{CloseReason, TradingStyle};
use crate::strategies::signals::TradeSignal;
use crate::trading::{Trade, TradeBook};

/// Parse user balance input, substituting `default` for anything that is not
/// a finite number above zero.
pub fn coerce_balance(input: &str, default: f64) -> f64 {
    match input.trim().trim_start_matches('$').parse::<f64>() {
        Ok(b) if b.is_finite() && b > 0.0 => b,
        _ => {
            warn!("Balance '{}' is not a positive number, using {}", input.trim(), default);
            default
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignalRequest {
    Generated(TradeSignal),
    /// A signal was already on display; the request dismissed it instead.
    Cleared,
}

/// Session state behind the dashboard: selection, the signal on display and
/// the user's trades. `&mut self` on `request_signal` keeps at most one
/// generation in flight per desk.
pub struct Desk {
    source: Box<dyn SignalSource>,
    book: TradeBook,
    market: String,
    style: TradingStyle,
    default_balance: f64,
    displayed: Option<TradeSignal>,
}

impl Desk {
    pub fn new(cfg: &Config, source: Box<dyn SignalSource>) -> Self {
        Self {
            source,
            book: TradeBook::new(),
            market: cfg.default_market.clone(),
            style: cfg.default_style,
            default_balance: cfg.default_balance,
            displayed: None,
        }
    }

    pub fn market(&self) -> &str {
        &self.market
    }

    pub fn style(&self) -> TradingStyle {
        self.style
    }

    pub fn set_market(&mut self, market: &str) {
        self.market = market.trim().to_ascii_uppercase();
        info!("Market set to {}", self.market);
    }

    pub fn set_style(&mut self, style: TradingStyle) {
        self.style = style;
        info!("Style set to {}", self.style);
    }

    pub fn displayed(&self) -> Option<&TradeSignal> {
        self.displayed.as_ref()
    }

    pub fn book(&self) -> &TradeBook {
        &self.book
    }

    pub fn book_mut(&mut self) -> &mut TradeBook {
        &mut self.book
    }

    /// Generate a signal for the current selection, or dismiss the one on
    /// display. Bad balance input is coerced to the configured default.
    pub async fn request_signal(&mut self, balance_input: &str) -> Result<SignalRequest> {
        if self.displayed.take().is_some() {
            return Ok(SignalRequest::Cleared);
        }

        let balance = coerce_balance(balance_input, self.default_balance);
        info!(
            "Requesting {} {} signal for ${} account",
            self.market, self.style, balance
        );
        let signal = self
            .source
            .generate_signal(&self.market, self.style, balance)
            .await
            .with_context(|| format!("Failed to generate signal for {}", self.market))?;

        self.displayed = Some(signal.clone());
        Ok(SignalRequest::Generated(signal))
    }

    /// Promote the signal on display to an Open trade and clear the display.
    pub fn open_displayed(&mut self) -> Option<&Trade> {
        let signal = self.displayed.take()?;
        Some(self.book.open(signal))
    }

    pub fn close_trade(&mut self, id: Uuid, reason: CloseReason) -> bool {
        self.book.close(id, reason)
    }

    pub fn clear_history(&mut self) -> usize {
        self.book.clear_history()
    }
}
