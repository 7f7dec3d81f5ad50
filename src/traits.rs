use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use rust_decimal::Decimal;

use crate::remote::FetchError;
use crate::services::DispatchError;

/// Current-price source for a symbol.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PriceFetcher: Send + Sync {
    async fn fetch_price(&self, symbol: &str) -> Result<Decimal, FetchError>;
}

/// Outbound alert channel.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn send_alert(&self, to: &str, subject: &str, body: &str)
    -> Result<(), DispatchError>;
}
