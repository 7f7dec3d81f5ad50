use std::env;

use crate::error::AppError;

/// Runtime settings read from the environment. `.env` is loaded by main
/// before this runs.
#[derive(Debug, Clone)]
pub struct Settings {
    pub destination_email: String,
    pub api_key: String,
    pub smtp: SmtpSettings,
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub sender: String,
    pub username: String,
    pub password: String,
}

impl Settings {
    /// A missing destination email is its own failure mode (exit 3); every
    /// other missing or invalid setting means the fetcher/notifier cannot be
    /// configured (exit 5).
    pub fn from_env() -> Result<Self, AppError> {
        let destination_email = env::var("DESTINATION_EMAIL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(AppError::MissingDestinationEmail)?;

        let api_key = require("TWELVEDATA_API_KEY")?;

        let port_raw = require("SMTP_PORT")?;
        let port = port_raw.parse::<u16>().ok().filter(|p| *p > 0).ok_or_else(|| {
            AppError::Operation(format!(
                "SMTP_PORT '{}' is not a valid port number",
                port_raw
            ))
        })?;

        let smtp = SmtpSettings {
            server: require("SMTP_SERVER")?,
            port,
            sender: require("SMTP_SENDER")?,
            username: require("SMTP_USERNAME")?,
            password: require("SMTP_PASSWORD")?,
        };

        Ok(Settings {
            destination_email,
            api_key,
            smtp,
        })
    }
}

fn require(key: &str) -> Result<String, AppError> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Operation(format!("{} must be set", key)))
}
