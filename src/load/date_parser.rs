use chrono::NaiveDate;

/// Parse a date cell with the first matching format.
/// Time components, if a format has them, are dropped.
pub fn parse_date<S: AsRef<str>>(s: &str, formats: &[S]) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt.as_ref()).ok())
}
