//! Formatting helpers shared by the CLI and the HTTP feed.
//!
//! Relative timestamps come in two registers: the short form used on
//! project cards (`~2y ago`) and the long form used in commit lists
//! (`3 days ago`). Both use 365-day years and 30-day months, and each unit
//! applies only when strictly more than one of it has elapsed.

use chrono::{DateTime, Utc};

const YEAR: f64 = 31_536_000.0;
const MONTH: f64 = 2_592_000.0;
const DAY: f64 = 86_400.0;
const HOUR: f64 = 3_600.0;
const MINUTE: f64 = 60.0;

fn elapsed_secs(ts: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - ts).num_seconds() as f64
}

/// Card form: `~Ny ago`, `~Nmo ago`, `~Nd ago`, or `recently`.
pub fn time_ago_short(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = elapsed_secs(ts, now);

    for (unit, suffix) in [(YEAR, "y"), (MONTH, "mo"), (DAY, "d")] {
        let n = secs / unit;
        if n > 1.0 {
            return format!("~{}{} ago", n.floor() as i64, suffix);
        }
    }
    "recently".to_string()
}

/// Detail form: `N years ago` down to `just now`.
pub fn time_ago_long(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = elapsed_secs(ts, now);

    for (unit, word) in [
        (YEAR, "years"),
        (MONTH, "months"),
        (DAY, "days"),
        (HOUR, "hours"),
        (MINUTE, "minutes"),
    ] {
        let n = secs / unit;
        if n > 1.0 {
            return format!("{} {} ago", n.floor() as i64, word);
        }
    }

    if secs < 10.0 {
        return "just now".to_string();
    }
    format!("{} seconds ago", secs.floor() as i64)
}

/// Stable `#rrggbb` colour for a language name.
pub fn language_color(language: &str) -> String {
    let mut hash: i32 = 0;
    for unit in language.encode_utf16() {
        hash = (unit as i32).wrapping_add((hash << 5).wrapping_sub(hash));
    }

    let mut color = String::from("#");
    for i in 0..3 {
        let value = (hash >> (i * 8)) & 0xFF;
        color.push_str(&format!("{:02x}", value));
    }
    color
}

/// `1234567` → `"1,234,567"`.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Abbreviated counts: `987` → `"987"`, `3812` → `"3.8K+"`, `2_500_000` → `"2.5M+"`.
///
/// Values are truncated, never rounded up, so the `+` always holds.
pub fn format_compact(n: u64) -> String {
    let (scaled, suffix) = match n {
        0..=999 => return n.to_string(),
        1_000..=999_999 => (n / 100, "K"),
        _ => (n / 100_000, "M"),
    };
    let whole = scaled / 10;
    let tenth = scaled % 10;
    if tenth == 0 {
        format!("{}{}+", whole, suffix)
    } else {
        format!("{}.{}{}+", whole, tenth, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_short_form() {
        let n = now();
        assert_eq!(time_ago_short(n - Duration::days(800), n), "~2y ago");
        assert_eq!(time_ago_short(n - Duration::days(95), n), "~3mo ago");
        assert_eq!(time_ago_short(n - Duration::days(5), n), "~5d ago");
        assert_eq!(time_ago_short(n - Duration::hours(20), n), "recently");
    }

    #[test]
    fn test_short_form_threshold_is_strict() {
        let n = now();
        // Exactly one year is not more than one year.
        assert_eq!(time_ago_short(n - Duration::days(365), n), "~12mo ago");
        assert_eq!(time_ago_short(n - Duration::days(1), n), "recently");
    }

    #[test]
    fn test_long_form() {
        let n = now();
        assert_eq!(time_ago_long(n - Duration::days(3), n), "3 days ago");
        assert_eq!(time_ago_long(n - Duration::hours(5), n), "5 hours ago");
        assert_eq!(time_ago_long(n - Duration::minutes(3), n), "3 minutes ago");
        assert_eq!(time_ago_long(n - Duration::seconds(45), n), "45 seconds ago");
        assert_eq!(time_ago_long(n - Duration::seconds(4), n), "just now");
    }

    #[test]
    fn test_language_color_is_stable_hex() {
        let a = language_color("TypeScript");
        assert_eq!(a, language_color("TypeScript"));
        assert_eq!(a.len(), 7);
        assert!(a.starts_with('#'));
        assert!(a[1..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, language_color("Rust"));
    }

    #[test]
    fn test_language_color_known_values() {
        // "a" hashes to 97 = 0x61.
        assert_eq!(language_color("a"), "#610000");
        assert_eq!(language_color(""), "#000000");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(3183), "3,183");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(588), "588");
        assert_eq!(format_compact(1000), "1K+");
        assert_eq!(format_compact(3812), "3.8K+");
        assert_eq!(format_compact(3899), "3.8K+");
        assert_eq!(format_compact(2_500_000), "2.5M+");
    }
}
