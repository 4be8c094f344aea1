use once_cell::sync::Lazy;
use regex::Regex;

// `YYYY-MM` keys produced by the year-month facets; months may be unpadded
static YEAR_MONTH_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{1,2})$").unwrap());

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Split a `YYYY-MM` key into numeric year and month (1-12).
pub fn parse_year_month(input: &str) -> Option<(u32, u32)> {
    let captures = YEAR_MONTH_REGEX.captures(input.trim())?;
    let year: u32 = captures[1].parse().ok()?;
    let month: u32 = captures[2].parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

/// Human-readable form of a year-month key.
///
/// # Examples
/// ```
/// use schedule_dashboard::utils::format_year_month;
/// assert_eq!(format_year_month("2025-03"), "March 2025");
/// assert_eq!(format_year_month(""), "All Months");
/// ```
pub fn format_year_month(year_month: &str) -> String {
    if year_month.is_empty() {
        return "All Months".to_string();
    }
    match parse_year_month(year_month).and_then(|(y, m)| Some((y, month_name(m)?))) {
        Some((year, name)) => format!("{} {}", name, year),
        None => year_month.to_string(),
    }
}

/// Label for a dropdown option, naming the empty "any" entry.
pub fn option_label(value: &str, any_label: &str) -> String {
    if value.is_empty() {
        any_label.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_padded_and_unpadded_months() {
        assert_eq!(parse_year_month("2025-03"), Some((2025, 3)));
        assert_eq!(parse_year_month("2025-3"), Some((2025, 3)));
        assert_eq!(parse_year_month("2025-13"), None);
        assert_eq!(parse_year_month("2025-00"), None);
        assert_eq!(parse_year_month("March"), None);
    }

    #[test]
    fn formats_year_months_for_display() {
        assert_eq!(format_year_month("2025-12"), "December 2025");
        assert_eq!(format_year_month(""), "All Months");
        assert_eq!(format_year_month("2025-xx"), "2025-xx");
    }

    #[test]
    fn month_names_are_one_based() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn any_option_gets_a_label() {
        assert_eq!(option_label("", "All Models"), "All Models");
        assert_eq!(option_label("RV1", "All Models"), "RV1");
    }
}
