use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use dotenvy::dotenv;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::Settings;
use crate::error::AppError;
use crate::logger::setup_logger;
use crate::remote::TwelveDataClient;
use crate::services::{EmailNotifier, MonitorService};

mod args;
mod config;
mod error;
mod logger;
mod models;
mod remote;
mod services;
mod traits;

#[tokio::main]
async fn main() -> ExitCode {
    setup_logger();
    dotenv().ok();
    debug!("System starting up...");

    let argv: Vec<String> = env::args().skip(1).collect();
    match run(argv).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Validates input, resolves configuration, wires the collaborators and
/// runs the monitoring loop until an interrupt cancels it. Every failure
/// mode maps to a distinct exit code; anything uncategorized surfaces as
/// `AppError::Unexpected`.
async fn run(argv: Vec<String>) -> Result<(), AppError> {
    let request = args::parse(&argv)?;
    debug!(
        "Monitoring request - symbol: {}, sell: {}, buy: {}",
        request.symbol, request.sell_price, request.buy_price
    );

    let settings = Settings::from_env()?;

    let fetcher = TwelveDataClient::new(settings.api_key.clone())
        .map_err(|e| AppError::Operation(format!("price client setup failed: {}", e)))?;
    let notifier = EmailNotifier::new(&settings.smtp)?;

    let cancel = CancellationToken::new();
    spawn_interrupt_listener(cancel.clone());

    let monitor = MonitorService::new(
        Arc::new(fetcher),
        Arc::new(notifier),
        request,
        settings.destination_email,
        cancel,
    );
    monitor.run().await;

    info!("Shutdown complete");
    Ok(())
}

fn spawn_interrupt_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, stopping monitor");
                cancel.cancel();
            }
            Err(e) => {
                error!("Failed to listen for interrupt: {}", e);
            }
        }
    });
}
