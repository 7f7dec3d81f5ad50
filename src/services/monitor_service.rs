use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::models::{AlertAction, MonitorRequest, alert_message};
use crate::traits::{AlertNotifier, PriceFetcher};

/// Fixed poll cadence.
pub const POLL_INTERVAL: Duration = Duration::from_secs(15);
/// Total fetch attempts per tick.
pub const MAX_FETCH_ATTEMPTS: u32 = 3;
/// The wait before attempt k+1 is `k * BACKOFF_STEP` (2s, then 4s).
pub const BACKOFF_STEP: Duration = Duration::from_secs(2);

/// Maps one price reading to the action it triggers. Boundary values are
/// inclusive. The buy check runs first and wins if both ever held.
pub fn evaluate(current: Decimal, sell: Decimal, buy: Decimal) -> AlertAction {
    if current <= buy {
        AlertAction::Buy
    } else if current >= sell {
        AlertAction::Sell
    } else {
        AlertAction::None
    }
}

/// Calls the fetcher with bounded retries and linear backoff. Persistent
/// failure becomes an absent reading rather than an error; monitoring picks
/// up again on the next tick. The backoff wait races the cancellation token.
pub async fn fetch_with_retry(
    fetcher: &dyn PriceFetcher,
    symbol: &str,
    cancel: &CancellationToken,
) -> Option<Decimal> {
    for attempt in 1..=MAX_FETCH_ATTEMPTS {
        match fetcher.fetch_price(symbol).await {
            Ok(price) => return Some(price),
            Err(e) if attempt == MAX_FETCH_ATTEMPTS => {
                error!(
                    "Price fetch for {} failed after {} attempts: {}",
                    symbol, MAX_FETCH_ATTEMPTS, e
                );
                return None;
            }
            Err(e) => {
                let backoff = BACKOFF_STEP * attempt;
                warn!(
                    "Price fetch for {} failed (attempt {}/{}), retrying in {:?}: {}",
                    symbol, attempt, MAX_FETCH_ATTEMPTS, backoff, e
                );
                tokio::select! {
                    _ = cancel.cancelled() => return None,
                    _ = time::sleep(backoff) => {}
                }
            }
        }
    }

    None
}

pub struct MonitorService {
    fetcher: Arc<dyn PriceFetcher>,
    notifier: Arc<dyn AlertNotifier>,
    request: MonitorRequest,
    destination: String,
    cancel: CancellationToken,
}

impl MonitorService {
    pub fn new(
        fetcher: Arc<dyn PriceFetcher>,
        notifier: Arc<dyn AlertNotifier>,
        request: MonitorRequest,
        destination: String,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            fetcher,
            notifier,
            request,
            destination,
            cancel,
        }
    }

    /// Runs until the token is cancelled. The first evaluation happens
    /// immediately; later ones on the fixed interval. Ticks are strictly
    /// sequential: a cycle's retries and dispatch finish before the next
    /// cycle starts, so fetches never overlap.
    pub async fn run(&self) {
        info!(
            "Monitoring {} - sell at {}, buy at {}",
            self.request.symbol, self.request.sell_price, self.request.buy_price
        );

        let mut ticker = time::interval(POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first interval tick completes immediately; consuming it here
        // makes the loop body evaluate once before the first 15s wait.
        ticker.tick().await;

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            self.tick().await;

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }
        }

        info!("Monitoring stopped for {}", self.request.symbol);
    }

    async fn tick(&self) {
        let Some(price) =
            fetch_with_retry(self.fetcher.as_ref(), &self.request.symbol, &self.cancel).await
        else {
            return;
        };

        match evaluate(price, self.request.sell_price, self.request.buy_price) {
            AlertAction::None => {
                info!(
                    "No alert for {} at {} (sell {}, buy {})",
                    self.request.symbol, price, self.request.sell_price, self.request.buy_price
                );
            }
            action => self.dispatch(action, price).await,
        }
    }

    async fn dispatch(&self, action: AlertAction, price: Decimal) {
        info!(
            "Threshold crossed for {}: {} at {}",
            self.request.symbol,
            action.as_str(),
            price
        );

        let (subject, body) = alert_message(action, &self.request, price, Utc::now());
        if let Err(e) = self
            .notifier
            .send_alert(&self.destination, &subject, &body)
            .await
        {
            error!(
                "Alert dispatch to {} for {} failed: {}",
                self.destination, self.request.symbol, e
            );
        }
    }
}
