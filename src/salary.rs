use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NOISE_REGEX: Regex = Regex::new(r"[^0-9.,\-]").unwrap();
    static ref NUMBER_PREFIX_REGEX: Regex = Regex::new(r"^-?(\d+(\.\d*)?|\.\d+)").unwrap();
}

/// Coerce a locale-formatted salary cell into a number.
///
/// The sheet publishes amounts as `$ 1.234.567,89`: `.` groups thousands and
/// `,` separates decimals. Currency symbols and any other noise are dropped,
/// group separators removed and the first comma turned into a decimal point.
/// The longest numeric prefix of what is left is parsed, so `1,5,7` reads as
/// `1.5`.
///
/// # Returns
/// * `f64` - A finite, non-negative amount. Anything unparsable is `0.0`.
///
/// # Examples
/// ```
/// use orgchart::salary::parse_salary;
///
/// assert_eq!(parse_salary("$ 1.234.567,89"), 1234567.89);
/// assert_eq!(parse_salary("abc"), 0.0);
/// ```
pub fn parse_salary(raw: &str) -> f64 {
    let cleaned = NOISE_REGEX.replace_all(raw, "").replace('.', "");
    let normalized = cleaned.replacen(',', ".", 1);

    let value = NUMBER_PREFIX_REGEX
        .find(&normalized)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0);

    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Format an amount for display the way es-CO locales print money:
/// `.` between thousands groups, `,` before at most three decimals.
pub fn format_salary(value: f64) -> String {
    let value = if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    };

    let scaled = (value * 1000.0).round() as u128;
    let integer = (scaled / 1000).to_string();
    let fraction = format!("{:03}", scaled % 1000);
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if fraction.is_empty() {
        grouped
    } else {
        format!("{},{}", grouped, fraction)
    }
}
