use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

pub const ALLOWED_EXTENSIONS: [&str; 2] = ["xls", "xlsx"];

const DATE_TIME_FORMATS: [&str; 7] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 11] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
];

// A digit next to a date separator. Bare numbers like years never match.
static DATE_SHAPE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\d[-/.:\s,T]|[-/.:\s,]\d").ok());

// Year and month only, such as 2024-01 or 2024/1.
static YEAR_MONTH: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^(\d{4})[-/](\d{1,2})$").ok());

/// Whole numbers print without a fractional part, like spreadsheet text.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Full-string numeric parse. Partial parses and non-finite results are rejected.
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

pub fn is_date_string(s: &str) -> bool {
    let s = s.trim();
    let shaped = DATE_SHAPE.as_ref().map_or(false, |re| re.is_match(s));
    if !shaped {
        return false;
    }

    if DateTime::parse_from_rfc3339(s).is_ok() || DateTime::parse_from_rfc2822(s).is_ok() {
        return true;
    }

    DATE_TIME_FORMATS
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(s, format).is_ok())
        || DATE_FORMATS
            .iter()
            .any(|format| NaiveDate::parse_from_str(s, format).is_ok())
        || is_year_month(s)
}

fn is_year_month(s: &str) -> bool {
    let Some(caps) = YEAR_MONTH.as_ref().and_then(|re| re.captures(s)) else {
        return false;
    };

    match (caps[1].parse::<i32>(), caps[2].parse::<u32>()) {
        (Ok(year), Ok(month)) => NaiveDate::from_ymd_opt(year, month, 1).is_some(),
        _ => false,
    }
}

pub fn has_allowed_extension(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .map_or(false, |ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// File name with its last extension removed.
pub fn display_name(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(dot) if dot + 1 < file_name.len() && !file_name[dot + 1..].contains('/') => {
            file_name[..dot].to_string()
        }
        _ => file_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_rejects_partial_parses() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number(" 3.5 "), Some(3.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("12abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_is_date_string() {
        assert!(is_date_string("2024-01-01"));
        assert!(is_date_string("2024-01-01 10:30:00"));
        assert!(is_date_string("2024-01-01T10:30:00Z"));
        assert!(is_date_string("31/12/2023"));
        assert!(is_date_string("Jan 5, 2024"));
        assert!(!is_date_string("2024"));
        assert!(!is_date_string("red"));
        assert!(!is_date_string("2024-13-45"));
        assert!(!is_date_string("3.5"));
    }

    #[test]
    fn test_year_month_strings_are_dates() {
        assert!(is_date_string("2024-01"));
        assert!(is_date_string("2024/1"));
        assert!(is_date_string(" 2023-12 "));
        assert!(!is_date_string("2024-13"));
        assert!(!is_date_string("12-05"));
        assert!(!is_date_string("2024-00"));
    }

    #[test]
    fn test_has_allowed_extension() {
        assert!(has_allowed_extension("report.xlsx"));
        assert!(has_allowed_extension("LEGACY.XLS"));
        assert!(!has_allowed_extension("data.csv"));
        assert!(!has_allowed_extension("xlsx"));
    }

    #[test]
    fn test_display_name_strips_last_extension() {
        assert_eq!(display_name("report.final.xlsx"), "report.final");
        assert_eq!(display_name("sales.xls"), "sales");
        assert_eq!(display_name("noext"), "noext");
    }
}
