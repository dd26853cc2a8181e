//! Display helpers shared by the renderers

/// Format a count with thousands separators, e.g. `1234567` → `"1,234,567"`
///
/// Fractions keep at most three digits with trailing zeros dropped.
#[must_use]
pub fn format_count(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let rendered = format!("{:.3}", value.abs());
    let (whole, fraction) = rendered.split_once('.').unwrap_or((&rendered, ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && (whole != "0" || !fraction.is_empty()) {
        "-"
    } else {
        ""
    };

    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{fraction}")
    }
}

/// Format a z-score with two decimals and an explicit sign
#[must_use]
pub fn format_score(score: f64) -> String {
    format!("{score:+.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1000.0), "1,000");
        assert_eq!(format_count(1_234_567.0), "1,234,567");
        assert_eq!(format_count(12_345.678), "12,345.678");
        assert_eq!(format_count(412.5), "412.5");
        assert_eq!(format_count(-2500.0), "-2,500");
    }

    #[test]
    fn test_format_count_non_finite() {
        assert_eq!(format_count(f64::NAN), "0");
        assert_eq!(format_count(f64::INFINITY), "0");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(4.2), "+4.20");
        assert_eq!(format_score(-1.5), "-1.50");
    }

    proptest! {
        #[test]
        fn prop_grouping_removes_to_original(value in 0u64..10_000_000_000) {
            #[allow(clippy::cast_precision_loss)]
            let formatted = format_count(value as f64);
            prop_assert_eq!(formatted.replace(',', ""), value.to_string());
        }
    }
}
