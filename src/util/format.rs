//! Display helpers for toast messages and the pages that raise them.

use chrono::{DateTime, Utc};

const MAGNITUDE_SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];

const BANNED_WORDS: [&str; 12] = [
    "fuck", "boobs", "ass", "sex", "shit", "bitch", "dick", "pussy", "dildo", "asshole", "cunt",
    "faggot",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("{0}: value is not a number")]
    NotANumber(&'static str),
    #[error("timestamp {0} is out of range")]
    OutOfRange(i64),
    #[error("the word {0} violates our policy")]
    BannedWord(&'static str),
}

/// Formats epoch milliseconds as `"D Mon YYYY"` in UTC, e.g. `"4 Jul 2023"`.
///
/// # Errors
///
/// Returns [`FormatError::OutOfRange`] for timestamps chrono cannot represent.
pub fn pretty_date(millis: i64) -> Result<String, FormatError> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|date| date.format("%-d %b %Y").to_string())
        .ok_or(FormatError::OutOfRange(millis))
}

/// Shortens a number with a magnitude suffix: `1_234_567.0` becomes `"1.2M"`.
///
/// # Errors
///
/// Returns [`FormatError::NotANumber`] for NaN.
pub fn format_number_magnitude(value: f64) -> Result<String, FormatError> {
    if value.is_nan() {
        return Err(FormatError::NotANumber("format_number_magnitude"));
    }
    let mut value = value;
    let mut magnitude = 0;
    while value >= 1000.0 && magnitude < MAGNITUDE_SUFFIXES.len() - 1 {
        value /= 1000.0;
        magnitude += 1;
    }
    Ok(format!("{value:.1}{}", MAGNITUDE_SUFFIXES[magnitude]))
}

/// Groups thousands and keeps two fraction digits, truncating: `1234.567` becomes `"1,234.56"`.
///
/// # Errors
///
/// Returns [`FormatError::NotANumber`] for NaN.
pub fn format_money(amount: f64) -> Result<String, FormatError> {
    if amount.is_nan() {
        return Err(FormatError::NotANumber("format_money"));
    }
    let text = amount.to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let (sign, digits) = whole
        .strip_prefix('-')
        .map_or(("", whole), |digits| ("-", digits));

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let fraction: String = fraction.chars().chain("00".chars()).take(2).collect();
    Ok(format!("{sign}{grouped}.{fraction}"))
}

/// Rejects text containing a banned word anywhere, even inside a longer word.
///
/// # Errors
///
/// Returns [`FormatError::BannedWord`] naming the first banned word found.
pub fn check_for_profanity(text: &str) -> Result<&str, FormatError> {
    BANNED_WORDS
        .iter()
        .copied()
        .find(|word| text.contains(word))
        .map_or(Ok(text), |word| Err(FormatError::BannedWord(word)))
}

/// `"tab-value"` becomes `"TabValue"`.
#[must_use]
pub fn dash_case_to_camel_case(input: &str) -> String {
    input
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{
        FormatError, check_for_profanity, dash_case_to_camel_case, format_money,
        format_number_magnitude, pretty_date,
    };

    #[test]
    fn pretty_date_uses_day_month_year() {
        assert_eq!(pretty_date(1_688_428_800_000).unwrap(), "4 Jul 2023");
        assert_eq!(pretty_date(0).unwrap(), "1 Jan 1970");
        assert_eq!(pretty_date(i64::MAX), Err(FormatError::OutOfRange(i64::MAX)));
    }

    #[test]
    fn magnitudes_get_suffixes() {
        assert_eq!(format_number_magnitude(999.0).unwrap(), "999.0");
        assert_eq!(format_number_magnitude(1_234_567.0).unwrap(), "1.2M");
        assert_eq!(format_number_magnitude(2_500.0).unwrap(), "2.5K");
        assert!(format_number_magnitude(f64::NAN).is_err());
    }

    #[test]
    fn money_groups_thousands_and_truncates() {
        assert_eq!(format_money(1234.56).unwrap(), "1,234.56");
        assert_eq!(format_money(1_000_000.0).unwrap(), "1,000,000.00");
        assert_eq!(format_money(12.5).unwrap(), "12.50");
        assert_eq!(format_money(1234.567).unwrap(), "1,234.56");
        assert_eq!(format_money(-9876.5).unwrap(), "-9,876.50");
        assert!(format_money(f64::NAN).is_err());
    }

    #[test]
    fn banned_words_are_rejected() {
        assert_eq!(check_for_profanity("build passed").unwrap_err(), FormatError::BannedWord("ass"));
        assert_eq!(check_for_profanity("Saved"), Ok("Saved"));
        assert_eq!(
            check_for_profanity("the word shit").unwrap_err().to_string(),
            "the word shit violates our policy"
        );
    }

    #[test]
    fn dash_case_becomes_camel_case() {
        assert_eq!(dash_case_to_camel_case("tab-value"), "TabValue");
        assert_eq!(dash_case_to_camel_case("home"), "Home");
        assert_eq!(dash_case_to_camel_case("a--b"), "AB");
    }
}
