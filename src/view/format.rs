// ---------------------------------------------------------------------------
// Number formatting for KPI tiles
// ---------------------------------------------------------------------------

/// `1234567` → `"1,234,567"`.
pub fn thousands(n: u64) -> String {
    group_digits(&n.to_string())
}

/// Dollar amount with thousands separators and `decimals` fraction digits,
/// e.g. `currency(-1234.5, 2)` → `"-$1,234.50"`.
pub fn currency(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return format!("${value}");
    }
    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };
    let sign = if value < 0.0 && text.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}${}.{f}", group_digits(int_part)),
        None => format!("{sign}${}", group_digits(int_part)),
    }
}

/// Multiplier such as `"2.5x"`.
pub fn multiplier(value: f64, decimals: usize) -> String {
    format!("{:.*}x", decimals, value)
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
