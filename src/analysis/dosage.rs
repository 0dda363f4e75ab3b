use std::sync::LazyLock;

use regex::Regex;

use crate::models::{HerbInput, RawDosage};

/// First numeric token of a dosage string (compiled once via LazyLock).
static RE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").unwrap());

/// Parse a caller-supplied dosage into a number.
/// Handles: 15, 12.5, "15g", "15 g", "１５克", "3 slices (about 9g)".
/// Anything without a numeric token ("三片", "适量", "") is 0.0, as are
/// negative and non-finite numbers.
pub fn parse_dosage(raw: &RawDosage) -> f64 {
    match raw {
        RawDosage::Number(value) => sanitize(*value),
        RawDosage::Text(text) => parse_dosage_text(text).unwrap_or(0.0),
    }
}

/// First numeric token in `text`, full-width digits included.
pub fn parse_dosage_text(text: &str) -> Option<f64> {
    let normalized = normalize_digits(text);
    let token = RE_NUMBER.find(&normalized)?;
    token.as_str().parse::<f64>().ok().map(sanitize)
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn normalize_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            '．' => '.',
            _ => c,
        })
        .collect()
}

/// Format a dosage for display: 15.0 + "g" -> "15g", 1.5 + "g" -> "1.5g".
pub fn format_dosage(value: f64, unit: &str) -> String {
    format!("{value}{unit}")
}

/// Display form of an input's dosage. Free text without a number is shown
/// as written so "适量" is not rendered as "0g".
pub fn display_dosage(input: &HerbInput, value: f64) -> String {
    match &input.dosage {
        RawDosage::Text(text) if value == 0.0 && !text.trim().is_empty() => {
            text.trim().to_string()
        }
        _ => format_dosage(value, input.unit_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawDosage {
        RawDosage::Text(s.into())
    }

    #[test]
    fn bare_numbers() {
        assert_eq!(parse_dosage(&RawDosage::Number(15.0)), 15.0);
        assert_eq!(parse_dosage(&RawDosage::Number(0.0)), 0.0);
        assert_eq!(parse_dosage(&RawDosage::Number(-3.0)), 0.0);
        assert_eq!(parse_dosage(&RawDosage::Number(f64::NAN)), 0.0);
        assert_eq!(parse_dosage(&text("10")), 10.0);
    }

    #[test]
    fn unit_suffixes() {
        assert_eq!(parse_dosage(&text("15g")), 15.0);
        assert_eq!(parse_dosage(&text("15 g")), 15.0);
        assert_eq!(parse_dosage(&text("1.5g")), 1.5);
        assert_eq!(parse_dosage(&text("30克")), 30.0);
        assert_eq!(parse_dosage(&text("１５克")), 15.0);
    }

    #[test]
    fn multi_token_strings_take_first_number() {
        assert_eq!(parse_dosage(&text("3 slices (about 9g)")), 3.0);
        assert_eq!(parse_dosage(&text("10-15g")), 10.0);
        assert_eq!(parse_dosage(&text("先煎 20g")), 20.0);
    }

    #[test]
    fn no_numeric_token_is_zero() {
        assert_eq!(parse_dosage(&text("三片")), 0.0);
        assert_eq!(parse_dosage(&text("适量")), 0.0);
        assert_eq!(parse_dosage(&text("")), 0.0);
        assert_eq!(parse_dosage_text("n/a"), None);
    }

    #[test]
    fn format_dosage_display() {
        assert_eq!(format_dosage(15.0, "g"), "15g");
        assert_eq!(format_dosage(1.5, "g"), "1.5g");
        assert_eq!(format_dosage(0.0, "g"), "0g");
    }

    #[test]
    fn display_keeps_free_text_without_number() {
        let input = HerbInput::new("生姜", "三片");
        assert_eq!(display_dosage(&input, parse_dosage(&input.dosage)), "三片");

        let input = HerbInput::new("黄芪", "15g");
        assert_eq!(display_dosage(&input, parse_dosage(&input.dosage)), "15g");

        let input = HerbInput::new("黄芪", "").with_unit("");
        assert_eq!(display_dosage(&input, parse_dosage(&input.dosage)), "0g");

        let input = HerbInput::new("鹿茸", 1.5).with_unit("g");
        assert_eq!(display_dosage(&input, 1.5), "1.5g");
    }
}
