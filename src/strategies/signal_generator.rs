use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;

use crate::core::pricing::random_price;
use crate::core::risk::RiskPlan;
use crate::models::{Direction, Market, TradingStyle};
use crate::strategies::reasoning::{self, ReasoningInput};
use crate::strategies::signals::{Quote, TradeSignal};

pub const MIN_CONFIDENCE: u8 = 82;
pub const MAX_CONFIDENCE: u8 = 99;

/// Draw an entry price and a 50/50 side for `market`.
pub fn draw_quote<R: Rng + ?Sized>(market: &Market, rng: &mut R) -> Quote {
    let entry = random_price(market, rng);
    let direction = if rng.gen_bool(0.5) {
        Direction::Buy
    } else {
        Direction::Sell
    };
    Quote {
        market: market.clone(),
        direction,
        entry,
    }
}

/// Build a full signal for `symbol`. Never fails: unknown symbols use the
/// fallback base price. `balance` is assumed positive; callers coerce bad input
/// before getting here.
pub fn generate_signal<R: Rng + ?Sized>(
    symbol: &str,
    style: TradingStyle,
    balance: f64,
    now: DateTime<Utc>,
    rng: &mut R,
) -> TradeSignal {
    let market = Market::lookup(symbol);
    if !market.known {
        debug!("No reference price for {}, using fallback base", market.symbol);
    }

    let quote = draw_quote(&market, rng);
    let plan = RiskPlan::build(quote.entry, quote.direction, style, &market);
    let confidence = rng.gen_range(MIN_CONFIDENCE..=MAX_CONFIDENCE);

    let entry_text = market.format(quote.entry);
    let pattern = reasoning::pick_pattern(rng);
    let reasoning = reasoning::render(&ReasoningInput {
        market: &market.symbol,
        style,
        direction: quote.direction,
        pattern,
        entry_text: &entry_text,
        balance,
    });

    TradeSignal {
        direction: quote.direction,
        entry_price: quote.entry,
        stop_loss: plan.stop_loss,
        take_profits: plan.take_profits,
        risk_distance: plan.risk_distance,
        confidence,
        reasoning,
        generated_at: now,
        precision: market.precision,
        market: market.symbol,
        style,
        account_balance: balance,
    }
}
