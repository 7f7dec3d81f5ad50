use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::MonitorRequest;

/// Action derived from one price reading. Evaluated fresh every tick; no
/// history is kept, so there is no hysteresis between consecutive readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    Buy,
    Sell,
    None,
}

impl AlertAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertAction::Buy => "BUY",
            AlertAction::Sell => "SELL",
            AlertAction::None => "NONE",
        }
    }
}

/// Builds the subject and body for an alert email.
pub fn alert_message(
    action: AlertAction,
    request: &MonitorRequest,
    price: Decimal,
    observed_at: DateTime<Utc>,
) -> (String, String) {
    let subject = format!("Price alert for {}: {}", request.symbol, action.as_str());
    let body = format!(
        "A {} operation is suggested for {}.\n\n\
         Current price: {}\n\
         Sell threshold: {}\n\
         Buy threshold: {}\n\
         Observed at: {}\n",
        action.as_str(),
        request.symbol,
        price,
        request.sell_price,
        request.buy_price,
        observed_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );

    (subject, body)
}
