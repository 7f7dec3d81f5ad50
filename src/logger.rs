use tracing_subscriber::EnvFilter;

pub fn setup_logger() {
    let filter = EnvFilter::new("info").add_directive("price_alert=debug".parse().unwrap());

    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_ansi(true)
        .compact()
        .with_env_filter(filter)
        .init();
}

/// Strips control characters and caps length so text from user input or
/// remote responses is safe to embed in a log line.
pub fn sanitize_for_log(input: &str) -> String {
    if input.trim().is_empty() {
        return "[EMPTY]".to_string();
    }

    input
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .take(100)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_becomes_placeholder() {
        assert_eq!(sanitize_for_log(""), "[EMPTY]");
        assert_eq!(sanitize_for_log("   \n"), "[EMPTY]");
    }

    #[test]
    fn control_characters_are_stripped() {
        assert_eq!(sanitize_for_log("PETR4\r\nfake log line"), "PETR4fake log line");
        assert_eq!(sanitize_for_log("\tAB\x07C"), "ABC");
    }

    #[test]
    fn long_input_is_truncated() {
        let long = "x".repeat(300);
        assert_eq!(sanitize_for_log(&long).len(), 100);
    }
}
