use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::logger::sanitize_for_log;
use crate::remote::get_base_url;
use crate::traits::PriceFetcher;

const MAX_SYMBOL_LEN: usize = 10;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Price endpoint payload. The API reports failures in-band with
/// `status: "error"` instead of an HTTP error code, so every field is
/// optional.
#[derive(Debug, Deserialize)]
struct PriceResponse {
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub struct TwelveDataClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TwelveDataClient {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent("price-alert/0.1.0")
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: get_base_url(),
            api_key,
        })
    }

    fn classify(err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(err)
        } else if err.is_decode() {
            FetchError::InvalidResponse(err.to_string())
        } else {
            FetchError::Network(err)
        }
    }

    fn parse_payload(payload: PriceResponse) -> Result<Decimal, FetchError> {
        if payload.status.as_deref() == Some("error") {
            let message = payload
                .message
                .as_deref()
                .map(sanitize_for_log)
                .unwrap_or_else(|| "error status without message".to_string());
            return Err(FetchError::InvalidResponse(message));
        }

        let raw = payload.price.ok_or_else(|| {
            FetchError::InvalidResponse("response carries no price field".to_string())
        })?;

        raw.parse::<Decimal>().map_err(|_| {
            FetchError::InvalidResponse(format!("unparsable price '{}'", sanitize_for_log(&raw)))
        })
    }
}

#[async_trait]
impl PriceFetcher for TwelveDataClient {
    async fn fetch_price(&self, symbol: &str) -> Result<Decimal, FetchError> {
        // The validator enforces both of these for CLI input; re-checked here
        // so the client never builds a request from a bad symbol.
        if symbol.trim().is_empty() {
            return Err(FetchError::InvalidResponse(
                "symbol must not be empty".to_string(),
            ));
        }
        if symbol.chars().count() > MAX_SYMBOL_LEN {
            return Err(FetchError::InvalidResponse(format!(
                "symbol '{}' is too long",
                sanitize_for_log(symbol)
            )));
        }

        let url = format!("{}/price", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol), ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(Self::classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::InvalidResponse(format!("HTTP {}", status)));
        }

        let payload = response
            .json::<PriceResponse>()
            .await
            .map_err(Self::classify)?;
        let price = Self::parse_payload(payload)?;

        debug!("Fetched price for {}: {}", symbol, price);
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> PriceResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn price_payload_parses_to_decimal() {
        let price = TwelveDataClient::parse_payload(payload(r#"{"price":"25.50"}"#)).unwrap();
        assert_eq!(price, Decimal::new(2550, 2));
    }

    #[test]
    fn in_band_error_status_maps_to_invalid_response() {
        let err = TwelveDataClient::parse_payload(payload(
            r#"{"code":404,"message":"symbol not found","status":"error"}"#,
        ))
        .unwrap_err();

        match err {
            FetchError::InvalidResponse(msg) => {
                assert!(msg.contains("symbol not found"), "got: {}", msg)
            }
            other => panic!("expected InvalidResponse, got {:?}", other),
        }
    }

    #[test]
    fn missing_price_field_is_invalid() {
        let err = TwelveDataClient::parse_payload(payload(r#"{}"#)).unwrap_err();
        assert!(matches!(err, FetchError::InvalidResponse(_)));
    }

    #[test]
    fn unparsable_price_field_is_invalid() {
        let err =
            TwelveDataClient::parse_payload(payload(r#"{"price":"not-a-number"}"#)).unwrap_err();
        match err {
            FetchError::InvalidResponse(msg) => {
                assert!(msg.contains("not-a-number"), "got: {}", msg)
            }
            other => panic!("expected InvalidResponse, got {:?}", other),
        }
    }
}
