//! Display formatting shared by the movie models.

use chrono::NaiveDate;

/// Placeholder for monetary and runtime values that are absent or zero.
pub const NOT_AVAILABLE: &str = "N/A";

/// Formats a dollar amount with thousands separators and no fractional part.
///
/// `None` and zero both render as [`NOT_AVAILABLE`].
///
/// ```
/// use movie_finder::domain::format::format_currency;
///
/// assert_eq!(format_currency(Some(1_234_567)), "$1,234,567");
/// assert_eq!(format_currency(Some(0)), "N/A");
/// assert_eq!(format_currency(None), "N/A");
/// ```
#[must_use]
pub fn format_currency(amount: Option<u64>) -> String {
    match amount {
        Some(value) if value > 0 => format!("${}", group_thousands(value)),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Converts a catalog date (`yyyy-MM-dd`) to `dd/MM/yyyy`.
///
/// Input that does not parse is returned unchanged, so an empty release date
/// stays empty.
#[must_use]
pub fn format_release_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_or_else(|_| date.to_string(), |d| d.format("%d/%m/%Y").to_string())
}

/// Formats a runtime in minutes as `"2h 16m"`, or `"45m"` under an hour.
#[must_use]
pub fn format_runtime(minutes: Option<u32>) -> String {
    match minutes {
        Some(m) if m >= 60 => format!("{}h {}m", m / 60, m % 60),
        Some(m) if m > 0 => format!("{m}m"),
        _ => NOT_AVAILABLE.to_string(),
    }
}
