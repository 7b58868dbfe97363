/// Failure to parse a user-supplied name into one of the desk's enums.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown trading style '{0}' (expected scalp or swing)")]
    Style(String),

    #[error("unknown close reason '{0}' (expected tp, sl or manual)")]
    CloseReason(String),

    #[error("unknown scan timeframe '{0}' (expected hourly or minute)")]
    Timeframe(String),
}
