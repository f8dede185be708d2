/// Format a KRW value with thousands separators and no fraction digits
/// e.g. `1234567.8` -> `₩1,234,568`, `-1500` -> `-₩1,500`
pub fn format_krw(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}₩{}", sign, grouped)
}

/// Coin amounts are shown with 8 fraction digits
pub fn format_amount(value: f64) -> String {
    format!("{:.8}", value)
}

/// `+1.25%` / `-0.40%`
pub fn format_signed_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{:.2}%", value)
    } else {
        format!("{:.2}%", value)
    }
}
