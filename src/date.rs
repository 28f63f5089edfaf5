//! Display formatting for dates coming out of the open-data API.

/// Shown in place of a missing value.
pub const UNKNOWN: &str = "—";

/// Rewrites an API date as `DD-MM-YYYY`.
///
/// Accepts ISO-like strings (`YYYY-MM-DD`, anything after the first ten
/// characters is ignored) and compact `YYYYMMDD` strings. Empty input yields
/// [`UNKNOWN`]; anything else is returned as-is. No calendar validation is
/// done, so `20241399` becomes `99-13-2024`.
pub fn format_date(raw: &str) -> String {
    if raw.is_empty() {
        return UNKNOWN.to_string();
    }

    let head: String = raw.chars().take(10).collect();
    let parts: Vec<&str> = head.split('-').collect();
    if let [year, month, day] = parts.as_slice() {
        return format!("{day}-{month}-{year}");
    }

    if is_compact_date(raw) {
        return format!("{}-{}-{}", &raw[6..8], &raw[4..6], &raw[0..4]);
    }

    raw.to_string()
}

/// `true` for exactly eight ASCII digits.
pub fn is_compact_date(value: &str) -> bool {
    value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit())
}
