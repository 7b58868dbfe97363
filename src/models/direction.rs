use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
        }
    }

    /// +1.0 for Buy, -1.0 for Sell. Multiplies a price offset into trade direction.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Buy => 1.0,
            Direction::Sell => -1.0,
        }
    }

    pub fn momentum_word(self) -> &'static str {
        match self {
            Direction::Buy => "upside",
            Direction::Sell => "downside",
        }
    }
}

/// Short-term (aggressive, tight stops) or long-term (position, wide stops).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradingStyle {
    Scalp,
    Swing,
}

impl fmt::Display for TradingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradingStyle::Scalp => write!(f, "SCALP"),
            TradingStyle::Swing => write!(f, "SWING"),
        }
    }
}

impl TradingStyle {
    /// Chart timeframes quoted in the reasoning text.
    pub fn timeframe_label(self) -> &'static str {
        match self {
            TradingStyle::Scalp => "M5/M15",
            TradingStyle::Swing => "H4/D1",
        }
    }
}

impl FromStr for TradingStyle {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scalp" | "short" | "short-term" => Ok(TradingStyle::Scalp),
            "swing" | "long" | "long-term" => Ok(TradingStyle::Swing),
            _ => Err(ParseError::Style(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeStatus {
    Open,
    ClosedTakeProfit,
    ClosedStopLoss,
    ClosedManual,
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeStatus::Open => write!(f, "OPEN"),
            TradeStatus::ClosedTakeProfit => write!(f, "CLOSED_TP"),
            TradeStatus::ClosedStopLoss => write!(f, "CLOSED_SL"),
            TradeStatus::ClosedManual => write!(f, "CLOSED_MANUAL"),
        }
    }
}

impl TradeStatus {
    pub fn is_open(self) -> bool {
        self == TradeStatus::Open
    }
}

/// Why a trade was closed. Maps one-to-one onto the closed `TradeStatus` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    TakeProfit,
    StopLoss,
    Manual,
}

impl CloseReason {
    pub fn status(self) -> TradeStatus {
        match self {
            CloseReason::TakeProfit => TradeStatus::ClosedTakeProfit,
            CloseReason::StopLoss => TradeStatus::ClosedStopLoss,
            CloseReason::Manual => TradeStatus::ClosedManual,
        }
    }
}

impl FromStr for CloseReason {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tp" | "takeprofit" | "take_profit" => Ok(CloseReason::TakeProfit),
            "sl" | "stoploss" | "stop_loss" => Ok(CloseReason::StopLoss),
            "manual" | "m" => Ok(CloseReason::Manual),
            _ => Err(ParseError::CloseReason(s.to_string())),
        }
    }
}
