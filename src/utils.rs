// Utility functions
use chrono::{DateTime, Utc};

/// Parses an RFC 3339 timestamp into `DateTime<Utc>`, if possible.
pub fn parse_datetime(date_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date_str.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Formats an amount as US dollars, e.g. `$1,249.99`.
pub fn format_price(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_with_offsets() {
        let a = parse_datetime("2024-05-30T10:15:00Z").unwrap();
        let b = parse_datetime("2024-05-30T12:15:00+02:00").unwrap();
        assert_eq!(a, b);
        assert!(parse_datetime("30/05/2024").is_none());
    }

    #[test]
    fn formats_usd() {
        assert_eq!(format_price(149.99), "$149.99");
        assert_eq!(format_price(0.0), "$0.00");
        assert_eq!(format_price(1249.5), "$1,249.50");
        assert_eq!(format_price(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_price(-5.25), "-$5.25");
    }
}
