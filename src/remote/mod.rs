use std::env;

pub mod twelvedata_client;

pub use twelvedata_client::{FetchError, TwelveDataClient};

pub fn get_base_url() -> String {
    env::var("TWELVEDATA_BASE_URL")
        .unwrap_or_else(|_| "https://api.twelvedata.com".to_string())
}
