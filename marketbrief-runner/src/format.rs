//! Number formatting for report text.

/// Placeholder for undefined values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Fixed decimals with thousands separators: `Some(1234.5)` -> `"1,234.50"`.
///
/// `None` and non-finite values render as `N/A`.
pub fn format_number(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => group_thousands(&format!("{v:.decimals$}")),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Signed percentage with two decimals: `Some(1.5)` -> `"+1.50%"`.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:+.2}%"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Percent change from `previous` to `current`; 0 when `previous` is zero.
pub fn change_pct(current: f64, previous: f64) -> f64 {
    if previous == 0.0 || !previous.is_finite() {
        return 0.0;
    }
    (current / previous - 1.0) * 100.0
}

fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.find('.') {
        Some(dot) => unsigned.split_at(dot),
        None => (unsigned, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}{frac_part}")
}
