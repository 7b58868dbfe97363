use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::error::ParseError;
use crate::models::TradingStyle;

/// Candle resolution the market scanner reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanTimeframe {
    #[serde(rename = "H1")]
    Hourly,
    #[serde(rename = "M1")]
    Minute,
}

impl ScanTimeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanTimeframe::Hourly => "H1",
            ScanTimeframe::Minute => "M1",
        }
    }

    pub fn style(&self) -> TradingStyle {
        match self {
            ScanTimeframe::Hourly => TradingStyle::Swing,
            ScanTimeframe::Minute => TradingStyle::Scalp,
        }
    }

    /// Fixed price offset from entry to the quoted scan target.
    pub fn target_offset(&self) -> f64 {
        match self {
            ScanTimeframe::Hourly => 5.0,
            ScanTimeframe::Minute => 1.5,
        }
    }
}

impl fmt::Display for ScanTimeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScanTimeframe {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h1" | "hourly" | "hour" => Ok(ScanTimeframe::Hourly),
            "m1" | "minute" | "min" => Ok(ScanTimeframe::Minute),
            _ => Err(ParseError::Timeframe(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeframe_style_and_offset() {
        assert_eq!(ScanTimeframe::Hourly.style(), TradingStyle::Swing);
        assert_eq!(ScanTimeframe::Minute.style(), TradingStyle::Scalp);
        assert!((ScanTimeframe::Hourly.target_offset() - 5.0).abs() < 1e-9);
        assert!((ScanTimeframe::Minute.target_offset() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn timeframe_from_str() {
        assert_eq!("H1".parse::<ScanTimeframe>().unwrap(), ScanTimeframe::Hourly);
        assert_eq!("minute".parse::<ScanTimeframe>().unwrap(), ScanTimeframe::Minute);
        assert!("4h".parse::<ScanTimeframe>().is_err());
    }
}
