pub mod direction;
pub mod error;
pub mod market;
pub mod timeframe;

pub use direction::*;
pub use error::ParseError;
pub use market::Market;
pub use timeframe::ScanTimeframe;
