use rand::Rng;

use crate::models::Market;

/// Maximum jitter either side of the base price, as a fraction of it (0.05%).
pub const PRICE_JITTER: f64 = 0.0005;

/// Draw a plausible current price: the market's base price moved by a
/// uniform jitter in `[-PRICE_JITTER, +PRICE_JITTER]` of base, rounded to the
/// market's precision.
pub fn random_price<R: Rng + ?Sized>(market: &Market, rng: &mut R) -> f64 {
    let variance = market.base_price * PRICE_JITTER;
    let price = market.base_price + rng.gen_range(-variance..=variance);
    market.round(price)
}
