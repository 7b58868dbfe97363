use serde::{Deserialize, Serialize};

/// Base price used for any symbol missing from `MARKETS`.
pub const FALLBACK_BASE_PRICE: f64 = 1000.0;
const FALLBACK_PRECISION: u32 = 2;

/// Approximate reference prices the simulator jitters around.
const MARKETS: &[(&str, f64, u32)] = &[
    ("XAUUSD", 5052.00, 2),
    ("EURUSD", 1.0540, 4),
    ("GBPUSD", 1.2690, 4),
    ("BTCUSD", 98200.00, 2),
    ("ETHUSD", 3350.00, 2),
    ("US30", 44100.00, 2),
    ("NAS100", 21200.00, 2),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub symbol: String,
    pub base_price: f64,
    /// Decimal places prices are quoted with.
    pub precision: u32,
    /// False when the symbol fell back to the generic base price.
    pub known: bool,
}

impl Market {
    /// Resolve a symbol against the reference table. Unknown symbols are not
    /// rejected; they get the fallback base price and 2-decimal precision.
    pub fn lookup(symbol: &str) -> Self {
        let symbol = symbol.trim().to_ascii_uppercase();
        match MARKETS.iter().find(|(s, _, _)| *s == symbol) {
            Some(&(_, base_price, precision)) => Self {
                symbol,
                base_price,
                precision,
                known: true,
            },
            None => Self {
                symbol,
                base_price: FALLBACK_BASE_PRICE,
                precision: FALLBACK_PRECISION,
                known: false,
            },
        }
    }

    pub fn known_symbols() -> impl Iterator<Item = &'static str> {
        MARKETS.iter().map(|(s, _, _)| *s)
    }

    pub fn round(&self, price: f64) -> f64 {
        round_to(price, self.precision)
    }

    pub fn format(&self, price: f64) -> String {
        format!("{:.*}", self.precision as usize, price)
    }
}

pub fn round_to(x: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (x * factor).round() / factor
}
