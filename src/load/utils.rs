/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Cleaned cell value, `None` when nothing is left.
pub fn non_empty(raw: &str) -> Option<String> {
    let s = clean_str(raw);
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Parse an amount cell, tolerating thousands separators.
/// Anything that is not a finite number yields `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = clean_str(raw).replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_quotes_and_whitespace() {
        assert_eq!(clean_str("  \" Ola \" "), "Ola");
        assert_eq!(clean_str("\""), "\"");
        assert_eq!(non_empty("   "), None);
        assert_eq!(non_empty(" x "), Some("x".to_string()));
    }

    #[test]
    fn amounts() {
        assert_eq!(parse_amount("1,200.5"), Some(1200.5));
        assert_eq!(parse_amount(" 42 "), Some(42.0));
        assert_eq!(parse_amount("-3"), Some(-3.0));
        assert_eq!(parse_amount("undisclosed"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount(""), None);
    }
}
