//! Lenient scalar parsing for source cells.

/// Parses a price cell after stripping `$`, `,` and whitespace.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|ch| *ch != '$' && *ch != ',' && !ch.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn parse_whole(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && value.fract() == 0.0)
}

/// Parses a year written as an integer or an integral float ("2023.0").
pub fn parse_year(raw: &str) -> Option<i32> {
    parse_whole(raw)
        .filter(|value| (1800.0..=2200.0).contains(value))
        .map(|value| value as i32)
}

/// Parses a quarter in `1..=4`.
pub fn parse_quarter(raw: &str) -> Option<u8> {
    parse_whole(raw)
        .filter(|value| (1.0..=4.0).contains(value))
        .map(|value| value as u8)
}

/// Parses an observation count, rounding float-typed counts.
pub fn parse_count(raw: &str) -> Option<i64> {
    raw.trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .map(|value| value.round() as i64)
}

/// Rounds to cents.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_strips_currency_formatting() {
        assert_eq!(parse_price("$1,250.00"), Some(1250.0));
        assert_eq!(parse_price(" 12.5 "), Some(12.5));
        assert_eq!(parse_price("$ 40"), Some(40.0));
        assert_eq!(parse_price("n/a"), None);
        assert_eq!(parse_price("$"), None);
        assert_eq!(parse_price("inf"), None);
    }

    #[test]
    fn year_and_quarter_accept_float_spellings() {
        assert_eq!(parse_year("2023"), Some(2023));
        assert_eq!(parse_year("2023.0"), Some(2023));
        assert_eq!(parse_year("2023.5"), None);
        assert_eq!(parse_year("FY23"), None);
        assert_eq!(parse_quarter("3.0"), Some(3));
        assert_eq!(parse_quarter("5"), None);
    }

    #[test]
    fn count_rounds() {
        assert_eq!(parse_count("12.0"), Some(12));
        assert_eq!(parse_count("1,204"), Some(1204));
        assert_eq!(parse_count("-3"), None);
        assert_eq!(round2(2.0 / 3.0), 0.67);
    }
}
