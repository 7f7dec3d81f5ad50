use thiserror::Error;

/// Fatal errors for a run. Each variant maps to a fixed process exit code;
/// callers script against those values, so the mapping must stay stable.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("usage: price-alert <SYMBOL> <SELL_PRICE> <BUY_PRICE>")]
    Usage,

    #[error("price argument '{value}' is not a valid decimal number")]
    PriceParse { value: String },

    #[error("DESTINATION_EMAIL is not configured")]
    MissingDestinationEmail,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("operation error: {0}")]
    Operation(String),

    #[error("unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Usage => 1,
            AppError::PriceParse { .. } => 2,
            AppError::MissingDestinationEmail => 3,
            AppError::InvalidArgument(_) => 4,
            AppError::Operation(_) => 5,
            AppError::Unexpected(_) => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_stay_bit_exact() {
        assert_eq!(AppError::Usage.exit_code(), 1);
        assert_eq!(
            AppError::PriceParse {
                value: "abc".to_string()
            }
            .exit_code(),
            2
        );
        assert_eq!(AppError::MissingDestinationEmail.exit_code(), 3);
        assert_eq!(
            AppError::InvalidArgument("buy above sell".to_string()).exit_code(),
            4
        );
        assert_eq!(
            AppError::Operation("smtp misconfigured".to_string()).exit_code(),
            5
        );
        assert_eq!(
            AppError::Unexpected(anyhow::anyhow!("boom")).exit_code(),
            6
        );
    }

    #[test]
    fn usage_message_names_the_positional_arguments() {
        let msg = AppError::Usage.to_string();
        assert!(msg.contains("<SYMBOL>"), "got: {}", msg);
        assert!(msg.contains("<SELL_PRICE>"), "got: {}", msg);
        assert!(msg.contains("<BUY_PRICE>"), "got: {}", msg);
    }
}
