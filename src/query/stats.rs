//! Presentation statistics for finished queries.
//!
//! Cost figures are a point-in-time estimate at the published per-terabyte
//! price, not billing data.

use chrono::TimeDelta;

/// Estimated price per terabyte scanned, in US dollars.
pub const COST_PER_TERABYTE_USD: f64 = 5.0;

/// Bytes in a (decimal) terabyte, as used for pricing.
pub const BYTES_PER_TERABYTE: f64 = 1_000_000_000_000.0;

/// Default number of decimals for [`human_readable_size`].
pub const DEFAULT_SIZE_PRECISION: usize = 2;

const SIZE_SUFFIXES: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Estimated cost in US dollars of scanning `bytes_scanned` bytes.
pub fn compute_cost(bytes_scanned: u64) -> f64 {
    bytes_scanned as f64 / BYTES_PER_TERABYTE * COST_PER_TERABYTE_USD
}

/// Formats a byte count using binary steps of 1024, capped at TB.
pub fn human_readable_size(bytes: u64, precision: usize) -> String {
    let mut size = bytes as f64;
    let mut suffix = 0;
    while size >= 1024.0 && suffix < SIZE_SUFFIXES.len() - 1 {
        size /= 1024.0;
        suffix += 1;
    }
    format!("{size:.precision$}{}", SIZE_SUFFIXES[suffix])
}

/// Formats a dollar amount with thousands separators: `$1,234.57`.
pub fn format_cost(cost: f64) -> String {
    let fixed = format!("{:.2}", cost.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if cost < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{fraction}")
}

/// Formats a wall-clock duration as `H:MM:SS`, dropping fractions of a second.
pub fn format_elapsed(elapsed: TimeDelta) -> String {
    let total = elapsed.num_seconds().max(0);
    format!(
        "{}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Link to the execution in the Athena console's history view.
pub fn console_link(region: &str, execution_id: &str) -> String {
    format!(
        "https://{region}.console.aws.amazon.com/athena/home?force&region={region}#query/history/{execution_id}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cost_per_terabyte() {
        assert_eq!(format!("{:.2}", compute_cost(1_000_000_000_000)), "5.00");
        assert_eq!(format!("{:.2}", compute_cost(0)), "0.00");
        assert_eq!(format!("{:.4}", compute_cost(100_000_000)), "0.0005");
    }

    #[test]
    fn test_human_readable_size() {
        assert_eq!(human_readable_size(0, 2), "0.00B");
        assert_eq!(human_readable_size(1023, 2), "1023.00B");
        assert_eq!(human_readable_size(1536, 2), "1.50KB");
        assert_eq!(human_readable_size(5 * 1024 * 1024, 2), "5.00MB");
        assert_eq!(human_readable_size(1_099_511_627_776, 2), "1.00TB");
    }

    #[test]
    fn test_human_readable_size_caps_at_terabytes() {
        assert_eq!(human_readable_size(1_099_511_627_776 * 2048, 2), "2048.00TB");
    }

    #[test]
    fn test_human_readable_size_precision() {
        assert_eq!(human_readable_size(1536, 0), "2KB");
        assert_eq!(human_readable_size(1536, 3), "1.500KB");
    }

    #[test]
    fn test_format_cost() {
        assert_eq!(format_cost(0.0), "$0.00");
        assert_eq!(format_cost(5.0), "$5.00");
        assert_eq!(format_cost(1234.567), "$1,234.57");
        assert_eq!(format_cost(1_000_000.0), "$1,000,000.00");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(TimeDelta::milliseconds(2_750)), "0:00:02");
        assert_eq!(format_elapsed(TimeDelta::seconds(3_725)), "1:02:05");
        assert_eq!(format_elapsed(TimeDelta::seconds(-4)), "0:00:00");
    }

    #[test]
    fn test_console_link() {
        assert_eq!(
            console_link("eu-west-1", "abc-123"),
            "https://eu-west-1.console.aws.amazon.com/athena/home?force&region=eu-west-1#query/history/abc-123"
        );
    }
}
