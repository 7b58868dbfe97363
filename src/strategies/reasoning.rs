use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Direction, TradingStyle};

/// Chart patterns the rationale text can cite.
pub const PATTERNS: &[&str] = &[
    "bullish flag formation",
    "double bottom structure",
    "liquidity sweep of previous lows",
    "break of structure (BOS)",
    "rejection from key demand zone",
    "moving average crossover",
    "RSI divergence",
    "volume imbalance fill",
    "bearish engulfing candle",
    "rejection from supply zone",
];

pub fn pick_pattern<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    PATTERNS.choose(rng).copied().unwrap_or(PATTERNS[0])
}

pub struct ReasoningInput<'a> {
    pub market: &'a str,
    pub style: TradingStyle,
    pub direction: Direction,
    pub pattern: &'a str,
    pub entry_text: &'a str,
    pub balance: f64,
}

pub fn render(input: &ReasoningInput<'_>) -> String {
    format!(
        "Algorithmic Analysis: {} structure on {} indicates {} momentum due to a {}. \
         Entry validated near {}. Stop loss calibrated for ${} account equity to maintain <2% risk.",
        input.market,
        input.style.timeframe_label(),
        input.direction.momentum_word(),
        input.pattern,
        input.entry_text,
        input.balance,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn render_interpolates_every_field() {
        let text = render(&ReasoningInput {
            market: "EURUSD",
            style: TradingStyle::Scalp,
            direction: Direction::Sell,
            pattern: "RSI divergence",
            entry_text: "1.0541",
            balance: 500.0,
        });
        assert!(text.contains("EURUSD"));
        assert!(text.contains("M5/M15"));
        assert!(text.contains("downside momentum"));
        assert!(text.contains("RSI divergence"));
        assert!(text.contains("near 1.0541"));
        assert!(text.contains("$500 account"));
    }

    #[test]
    fn swing_uses_higher_timeframes() {
        let text = render(&ReasoningInput {
            market: "XAUUSD",
            style: TradingStyle::Swing,
            direction: Direction::Buy,
            pattern: PATTERNS[0],
            entry_text: "5052.00",
            balance: 100.5,
        });
        assert!(text.contains("H4/D1"));
        assert!(text.contains("upside momentum"));
        assert!(text.contains("$100.5 account"));
    }

    #[test]
    fn picked_pattern_comes_from_vocabulary() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..30 {
            assert!(PATTERNS.contains(&pick_pattern(&mut rng)));
        }
    }
}
