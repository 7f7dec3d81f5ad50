use rust_decimal::Decimal;

/// A validated monitoring request. The symbol is sanitized and
/// `buy_price < sell_price` holds by construction (`args::parse`), so the
/// invariant is never re-checked at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorRequest {
    pub symbol: String,
    pub sell_price: Decimal,
    pub buy_price: Decimal,
}
