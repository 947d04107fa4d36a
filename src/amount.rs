//! Amount input handling: sanitising keystrokes, lenient parsing and the
//! fixed-precision formatting used by the form.

/// Keep only digits and the first decimal point.
///
/// Additional points are dropped and the digits after them are joined onto
/// the fractional part, so `"1.2.3"` becomes `"1.23"`.
pub fn sanitize_amount(input: &str) -> String {
    let kept: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut parts = kept.split('.');
    let head = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();
    if rest.len() > 1 {
        format!("{}.{}", head, rest.concat())
    } else {
        kept
    }
}

/// Parse the longest numeric prefix of `input`, ignoring leading whitespace.
///
/// Returns `None` when no digits lead the string. Trailing garbage is
/// tolerated: `"12abc"` parses as `12`.
pub fn parse_amount(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    let prefix = &s[..end];
    // "5." and ".5" are fine for f64::from_str, a lone sign is excluded above.
    prefix.parse::<f64>().ok()
}

/// Round to 8 decimals and drop trailing zeros: `6000.00000000` -> `"6000"`.
pub fn round_to_8(value: f64) -> String {
    let fixed = format!("{:.8}", value);
    match fixed.parse::<f64>() {
        Ok(v) => v.to_string(),
        Err(_) => fixed,
    }
}

/// `≈ $<notional>` hint shown under the amount input.
pub fn notional_display(amount: &str, price: Option<f64>) -> Option<String> {
    let price = price.filter(|p| *p != 0.0)?;
    if amount.is_empty() {
        return None;
    }
    let value = parse_amount(amount)?;
    Some(format!("≈ ${:.2}", value * price))
}

/// Group the integer part with commas and keep up to three fraction digits,
/// e.g. `15000000` -> `"15,000,000"`, `1234.5` -> `"1,234.5"`.
pub fn format_thousands(value: f64) -> String {
    let negative = value < 0.0;
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_non_numeric() {
        assert_eq!(sanitize_amount("1a2b.3c"), "12.3");
        assert_eq!(sanitize_amount("$1,000"), "1000");
        assert_eq!(sanitize_amount("-5"), "5");
        assert_eq!(sanitize_amount(""), "");
    }

    #[test]
    fn sanitize_collapses_extra_points() {
        assert_eq!(sanitize_amount("1.2.3"), "1.23");
        assert_eq!(sanitize_amount("..5"), ".5");
        assert_eq!(sanitize_amount("1."), "1.");
    }

    #[test]
    fn parse_takes_numeric_prefix() {
        assert_eq!(parse_amount("12abc"), Some(12.0));
        assert_eq!(parse_amount("  2.5"), Some(2.5));
        assert_eq!(parse_amount(".5"), Some(0.5));
        assert_eq!(parse_amount("5."), Some(5.0));
        assert_eq!(parse_amount("-3"), Some(-3.0));
        assert_eq!(parse_amount("1e3x"), Some(1000.0));
        assert_eq!(parse_amount("1e"), Some(1.0));
    }

    #[test]
    fn parse_rejects_non_numeric() {
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("."), None);
        assert_eq!(parse_amount("-"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn round_to_8_trims_zeros() {
        assert_eq!(round_to_8(6000.0), "6000");
        assert_eq!(round_to_8(0.000_000_001), "0");
        assert_eq!(round_to_8(1.0 / 3.0), "0.33333333");
        assert_eq!(round_to_8(2.5), "2.5");
    }

    #[test]
    fn notional_display_needs_amount_and_price() {
        assert_eq!(notional_display("2", Some(3000.0)).as_deref(), Some("≈ $6000.00"));
        assert_eq!(notional_display("", Some(3000.0)), None);
        assert_eq!(notional_display("2", None), None);
        assert_eq!(notional_display("2", Some(0.0)), None);
        assert_eq!(notional_display("x", Some(1.0)), None);
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(format_thousands(15_000_000.0), "15,000,000");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(1234.5), "1,234.5");
        assert_eq!(format_thousands(-1234567.0), "-1,234,567");
    }
}
