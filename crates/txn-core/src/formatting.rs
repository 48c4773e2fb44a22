//! Human-readable rendering of amounts, counts and shares.

/// Format an amount with thousands separators and a fixed number of decimals.
///
/// # Examples
///
/// ```
/// use txn_core::formatting::format_amount;
///
/// assert_eq!(format_amount(1234.5, 2), "1,234.50");
/// assert_eq!(format_amount(1234567.0, 0), "1,234,567");
/// assert_eq!(format_amount(-75.0, 2), "-75.00");
/// ```
pub fn format_amount(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.prec$}", value.abs(), prec = decimals);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = group_thousands(int_part);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }

    // "-0.00" reads badly; only keep the sign when something non-zero is shown.
    let shows_nonzero = out.chars().any(|c| c.is_ascii_digit() && c != '0');
    if value < 0.0 && shows_nonzero {
        format!("-{}", out)
    } else {
        out
    }
}

/// Format a count with the matching noun form.
///
/// # Examples
///
/// ```
/// use txn_core::formatting::format_count;
///
/// assert_eq!(format_count(1, "transaction"), "1 transaction");
/// assert_eq!(format_count(1200, "transaction"), "1,200 transactions");
/// ```
pub fn format_count(count: usize, noun: &str) -> String {
    let n = group_thousands(&count.to_string());
    if count == 1 {
        format!("{} {}", n, noun)
    } else {
        format!("{} {}s", n, noun)
    }
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero.
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_amount ────────────────────────────────────────────────────────

    #[test]
    fn test_format_amount_zero() {
        assert_eq!(format_amount(0.0, 0), "0");
        assert_eq!(format_amount(0.0, 2), "0.00");
    }

    #[test]
    fn test_format_amount_no_thousands() {
        assert_eq!(format_amount(225.0, 2), "225.00");
        assert_eq!(format_amount(123.456, 2), "123.46");
    }

    #[test]
    fn test_format_amount_with_thousands() {
        assert_eq!(format_amount(1_000.0, 0), "1,000");
        assert_eq!(format_amount(12_345.678, 1), "12,345.7");
        assert_eq!(format_amount(1_000_000.0, 2), "1,000,000.00");
    }

    #[test]
    fn test_format_amount_negative() {
        assert_eq!(format_amount(-9_876.5, 1), "-9,876.5");
    }

    #[test]
    fn test_format_amount_negative_rounding_to_zero() {
        assert_eq!(format_amount(-0.001, 2), "0.00");
    }

    // ── format_count ─────────────────────────────────────────────────────────

    #[test]
    fn test_format_count_plural() {
        assert_eq!(format_count(0, "transaction"), "0 transactions");
        assert_eq!(format_count(3, "month"), "3 months");
    }

    #[test]
    fn test_format_count_singular() {
        assert_eq!(format_count(1, "month"), "1 month");
    }

    // ── percentage ───────────────────────────────────────────────────────────

    #[test]
    fn test_percentage_basic() {
        let p = percentage(50.0, 200.0, 1);
        assert!((p - 25.0).abs() < 1e-9, "percentage = {p}");
    }

    #[test]
    fn test_percentage_zero_whole() {
        assert_eq!(percentage(10.0, 0.0, 2), 0.0);
    }

    #[test]
    fn test_percentage_rounding() {
        let p = percentage(1.0, 3.0, 2);
        assert!((p - 33.33).abs() < 1e-9, "percentage = {p}");
    }

    // ── group_thousands ──────────────────────────────────────────────────────

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("5"), "5");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("123456"), "123,456");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }
}
