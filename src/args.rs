use rust_decimal::Decimal;

use crate::error::AppError;
use crate::models::MonitorRequest;

const MAX_SYMBOL_LEN: usize = 10;

/// Parses and validates the three positional arguments into a
/// `MonitorRequest`. Runs before any network activity and has no side
/// effects.
pub fn parse(args: &[String]) -> Result<MonitorRequest, AppError> {
    if args.len() != 3 {
        return Err(AppError::Usage);
    }

    for arg in args {
        if arg.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "arguments must not be empty".to_string(),
            ));
        }
    }

    let symbol = sanitize_symbol(&args[0]);
    if symbol.is_empty() {
        return Err(AppError::InvalidArgument(
            "symbol must not be empty".to_string(),
        ));
    }
    if symbol.chars().count() > MAX_SYMBOL_LEN {
        return Err(AppError::InvalidArgument(format!(
            "symbol '{}' is longer than {} characters",
            symbol, MAX_SYMBOL_LEN
        )));
    }

    let sell_price = parse_price(&args[1])?;
    let buy_price = parse_price(&args[2])?;

    if buy_price >= sell_price {
        return Err(AppError::InvalidArgument(format!(
            "buy price {} must be strictly below sell price {}",
            buy_price, sell_price
        )));
    }

    Ok(MonitorRequest {
        symbol,
        sell_price,
        buy_price,
    })
}

/// Trims and removes newline/carriage-return characters so the symbol is
/// safe in log lines and mail headers. Case is preserved.
fn sanitize_symbol(raw: &str) -> String {
    raw.trim().replace(['\n', '\r'], "")
}

fn parse_price(raw: &str) -> Result<Decimal, AppError> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| AppError::PriceParse {
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn well_formed_arguments_parse_unchanged() {
        let request = parse(&argv(&["PETR4", "25.50", "20.00"])).unwrap();

        assert_eq!(request.symbol, "PETR4");
        assert_eq!(request.sell_price, Decimal::new(2550, 2));
        assert_eq!(request.buy_price, Decimal::new(2000, 2));
    }

    #[test]
    fn wrong_arity_is_a_usage_error() {
        for args in [
            argv(&[]),
            argv(&["PETR4"]),
            argv(&["PETR4", "25.50"]),
            argv(&["PETR4", "25.50", "20.00", "extra"]),
        ] {
            let err = parse(&args).unwrap_err();
            assert_eq!(err.exit_code(), 1, "args: {:?}", args);
        }
    }

    #[test]
    fn empty_or_whitespace_arguments_are_rejected() {
        for args in [
            argv(&["", "25.50", "20.00"]),
            argv(&["   ", "25.50", "20.00"]),
            argv(&["PETR4", " ", "20.00"]),
            argv(&["PETR4", "25.50", "\t"]),
        ] {
            let err = parse(&args).unwrap_err();
            assert_eq!(err.exit_code(), 4, "args: {:?}", args);
        }
    }

    #[test]
    fn symbol_is_trimmed_and_stripped_of_line_breaks() {
        let request = parse(&argv(&["  PETR4\r\n", "25.50", "20.00"])).unwrap();
        assert_eq!(request.symbol, "PETR4");
    }

    #[test]
    fn symbol_case_is_preserved() {
        let request = parse(&argv(&["petr4", "25.50", "20.00"])).unwrap();
        assert_eq!(request.symbol, "petr4");
    }

    #[test]
    fn oversized_symbol_is_rejected() {
        let err = parse(&argv(&["TOOLONGSYMBOL", "25.50", "20.00"])).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn unparsable_prices_map_to_the_price_parse_code() {
        for args in [
            argv(&["PETR4", "abc", "20.00"]),
            argv(&["PETR4", "25.50", "abc"]),
            argv(&["PETR4", "25,50", "20.00"]),
        ] {
            let err = parse(&args).unwrap_err();
            assert_eq!(err.exit_code(), 2, "args: {:?}", args);
        }
    }

    #[test]
    fn inverted_or_equal_thresholds_are_rejected_for_any_symbol() {
        for symbol in ["PETR4", "VALE3", "x"] {
            let inverted = parse(&argv(&[symbol, "20.00", "25.00"])).unwrap_err();
            assert_eq!(inverted.exit_code(), 4, "symbol: {}", symbol);

            let equal = parse(&argv(&[symbol, "20.00", "20.00"])).unwrap_err();
            assert_eq!(equal.exit_code(), 4, "symbol: {}", symbol);
        }
    }

    #[test]
    fn prices_accept_surrounding_whitespace() {
        let request = parse(&argv(&["PETR4", " 25.50 ", " 20.00"])).unwrap();
        assert_eq!(request.sell_price, Decimal::new(2550, 2));
        assert_eq!(request.buy_price, Decimal::new(2000, 2));
    }
}
