/// Inserts a thousands separator into a string of digits.
/// The frontend KPI card carries a copy for its fallback formatting.
fn group_thousands(digits: &str, separator: char) -> String {
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(separator);
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Formats an integer with comma thousands separators
///
/// # Examples
/// ```text
/// format_number(1234567) == "1,234,567"
/// format_number(42) == "42"
/// ```
pub fn format_number(n: usize) -> String {
    group_thousands(&n.to_string(), ',')
}

/// Formats a money amount as dollars with thousands separators and two decimals
///
/// # Examples
/// ```text
/// format_currency(1234567.891) == "$1,234,567.89"
/// format_currency(0.0) == "$0.00"
/// ```
pub fn format_currency(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (integer_part, decimal_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    // "-0.00" is not a meaningful amount
    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!(
        "{}${}.{}",
        sign,
        group_thousands(integer_part, ','),
        decimal_part
    )
}

/// Counts are shown as plain integers
pub fn format_count(n: u64) -> String {
    n.to_string()
}
