pub mod trade_book;
pub mod trade_record;

pub use trade_book::{TradeBook, TradeStats};
pub use trade_record::Trade;
