// src/services/format.rs

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

fn format_grouped(value: f64, decimals: usize, signed: bool) -> String {
    let sign = if value < 0.0 {
        "-"
    } else if signed {
        "+"
    } else {
        ""
    };
    let rendered = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rendered.as_str(), None),
    };
    let mut out = format!("{}{}", sign, group_thousands(int_part));
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

pub fn format_zero_decimals(value: f64) -> String {
    format_grouped(value, 0, false)
}

pub fn format_two_digit(value: f64) -> String {
    format_grouped(value, 2, false)
}

pub fn format_two_digits_signed(value: f64) -> String {
    format_grouped(value, 2, true)
}

/// Formats a fraction as a signed percentage, e.g. `0.00123` -> `"+0.123%"`.
pub fn format_percent_three_decimals_signed(fraction: f64) -> String {
    format!("{:+.3}%", fraction * 100.0)
}

pub fn format_percent_five_decimals_signed(fraction: f64) -> String {
    format!("{:+.5}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_zero_decimals(0.0), "0");
        assert_eq!(format_zero_decimals(999.0), "999");
        assert_eq!(format_zero_decimals(15_537_393.0), "15,537,393");
        assert_eq!(format_two_digit(120_452_309.954), "120,452,309.95");
    }

    #[test]
    fn signed_variants_mark_both_directions() {
        assert_eq!(format_two_digits_signed(1234.5), "+1,234.50");
        assert_eq!(format_two_digits_signed(-1234.5), "-1,234.50");
    }

    #[test]
    fn percent_formatters_scale_fractions() {
        assert_eq!(format_percent_three_decimals_signed(0.00123), "+0.123%");
        assert_eq!(format_percent_five_decimals_signed(-0.0000123), "-0.00123%");
    }
}
