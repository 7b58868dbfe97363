pub mod reasoning;
pub mod signal_generator;
pub mod signals;

pub use signal_generator::{draw_quote, generate_signal};
pub use signals::{Quote, ScanRow, ScanRowKind, ScanStatus, TradeSignal};
