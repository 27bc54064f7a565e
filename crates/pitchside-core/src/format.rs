// Display formatting for monetary amounts.

/// Currency symbol of the source export.
pub const CURRENCY_SYMBOL: &str = "£";

/// Whole number with comma thousands separators: `1234567.4` -> `"1,234,567"`.
/// Ties round to even; non-finite input renders as `"-"`.
pub fn format_thousands(amount: f64) -> String {
    if !amount.is_finite() {
        return "-".to_string();
    }
    let rounded = amount.round_ties_even();
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Amount with currency symbol: `"£ 1,234,567"`.
pub fn format_currency(amount: f64) -> String {
    format!("{CURRENCY_SYMBOL} {}", format_thousands(amount))
}
