//! String format parsers: URIs, URI templates, dates and language tags

use super::error::ValueParsingError;
use super::primitive::parse_str;
use super::value::ParsedValue;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use url::Url;

/// BCP-47 language tag grammar (grandfathered tags, langtag, private use)
pub const LANGUAGE_TAG_PATTERN: &str = concat!(
    "^((?P<grandfathered>(en-GB-oed|i-ami|i-bnn|i-default|i-enochian|i-hak|i-klingon|i-lux|",
    "i-mingo|i-navajo|i-pwn|i-tao|i-tay|i-tsu|sgn-BE-FR|sgn-BE-NL|sgn-CH-DE)|",
    "(art-lojban|cel-gaulish|no-bok|no-nyn|zh-guoyu|zh-hakka|zh-min|zh-min-nan|zh-xiang))|",
    "((?P<language>([A-Za-z]{2,3}(-(?P<extlang>[A-Za-z]{3}(-[A-Za-z]{3}){0,2}))?)|",
    "[A-Za-z]{4}|[A-Za-z]{5,8})(-(?P<script>[A-Za-z]{4}))?",
    "(-(?P<region>[A-Za-z]{2}|[0-9]{3}))?",
    "(-(?P<variant>[A-Za-z0-9]{5,8}|[0-9][A-Za-z0-9]{3}))*",
    "(-(?P<extension>[0-9A-WY-Za-wy-z](-[A-Za-z0-9]{2,8})+))*",
    "(-(?P<privateUse>x(-[A-Za-z0-9]{1,8})+))?)|",
    "(?P<privateUse2>x(-[A-Za-z0-9]{1,8})+))$"
);

static LANGUAGE_TAG: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

pub(crate) fn language_tag_regex() -> Result<&'static Regex, ValueParsingError> {
    LANGUAGE_TAG
        .get_or_init(|| Regex::new(LANGUAGE_TAG_PATTERN))
        .as_ref()
        .map_err(|e| {
            ValueParsingError::new(
                &Value::Null,
                format!("Language tag pattern failed to compile: {}", e),
            )
        })
}

const URI_REFERENCE_FORBIDDEN: &[char] = &['<', '>', '"', '{', '}', '|', '\\', '^', '`'];

pub(crate) fn parse_uri(raw: &Value) -> Result<ParsedValue, ValueParsingError> {
    let value = parse_str(raw)?;
    Url::parse(value).map_err(|_| ValueParsingError::not_a_format(raw, "uri"))?;
    Ok(ParsedValue::String(value.to_string()))
}

/// Absolute URI, or a relative reference that resolves against a base
pub fn is_uri_reference(value: &str) -> bool {
    if value
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || URI_REFERENCE_FORBIDDEN.contains(&c))
    {
        return false;
    }
    if Url::parse(value).is_ok() {
        return true;
    }
    Url::parse("http://base.invalid/")
        .and_then(|base| base.join(value))
        .is_ok()
}

pub(crate) fn parse_uri_reference(raw: &Value) -> Result<ParsedValue, ValueParsingError> {
    let value = parse_str(raw)?;
    if !is_uri_reference(value) {
        return Err(ValueParsingError::not_a_format(raw, "uri-reference"));
    }
    Ok(ParsedValue::String(value.to_string()))
}

/// RFC 6570 expression syntax: balanced braces, known operators and valid varspecs
pub fn is_uri_template(value: &str) -> bool {
    let mut rest = value;
    loop {
        let Some(open) = rest.find(['{', '}']) else {
            return true;
        };
        if rest[open..].starts_with('}') {
            return false;
        }
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            return false;
        };
        let expression = &after[..close];
        if expression.contains('{') || !is_template_expression(expression) {
            return false;
        }
        rest = &after[close + 1..];
    }
}

fn is_template_expression(expression: &str) -> bool {
    let variables = match expression.chars().next() {
        Some('+' | '#' | '.' | '/' | ';' | '?' | '&') => &expression[1..],
        Some(_) => expression,
        None => return false,
    };
    variables.split(',').all(is_varspec)
}

fn is_varspec(varspec: &str) -> bool {
    let name = if let Some(name) = varspec.strip_suffix('*') {
        name
    } else if let Some((name, length)) = varspec.split_once(':') {
        let valid_length = !length.is_empty()
            && length.len() <= 4
            && !length.starts_with('0')
            && length.chars().all(|c| c.is_ascii_digit());
        if !valid_length {
            return false;
        }
        name
    } else {
        varspec
    };
    is_varname(name)
}

fn is_varname(name: &str) -> bool {
    if name.is_empty() || name.starts_with('.') {
        return false;
    }
    let bytes = name.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = bytes.get(i + 1..i + 3);
                if !hex.is_some_and(|h| h.iter().all(u8::is_ascii_hexdigit)) {
                    return false;
                }
                i += 3;
            }
            b if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' => i += 1,
            _ => return false,
        }
    }
    true
}

pub(crate) fn parse_uri_template(raw: &Value) -> Result<ParsedValue, ValueParsingError> {
    let value = parse_str(raw)?;
    if !is_uri_template(value) {
        return Err(ValueParsingError::not_a_format(raw, "uri-template"));
    }
    Ok(ParsedValue::String(value.to_string()))
}

/// `YYYY-MM-DD`, `YYYY-MM` or `YYYY`; partial dates start at the first day
pub fn parse_date_str(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    let mut parts = value.split('-');
    let year_part = parts.next()?;
    if year_part.len() != 4 || !year_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year: i32 = year_part.parse().ok()?;
    let month: u32 = match parts.next() {
        None => 1,
        Some(m) if m.len() == 2 && m.chars().all(|c| c.is_ascii_digit()) => m.parse().ok()?,
        Some(_) => return None,
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1)
}

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// RFC 3339, falling back to lenient ISO 8601; a missing offset means UTC
pub fn parse_date_time_str(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Some(date_time);
    }

    let normalized = match value.strip_suffix(['Z', 'z']) {
        Some(body) => format!("{}+00:00", body),
        None => value.to_string(),
    };
    for format in OFFSET_FORMATS {
        if let Ok(date_time) = DateTime::parse_from_str(&normalized, format) {
            return Some(date_time);
        }
    }

    let utc = FixedOffset::east_opt(0)?;
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(utc.from_utc_datetime(&naive));
        }
    }

    let date = parse_date_str(value)?;
    Some(utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

pub(crate) fn parse_date(raw: &Value) -> Result<ParsedValue, ValueParsingError> {
    let value = parse_str(raw)?;
    parse_date_str(value)
        .map(ParsedValue::Date)
        .ok_or_else(|| ValueParsingError::not_a_format(raw, "date"))
}

pub(crate) fn parse_date_time(raw: &Value) -> Result<ParsedValue, ValueParsingError> {
    let value = parse_str(raw)?;
    parse_date_time_str(value)
        .map(ParsedValue::DateTime)
        .ok_or_else(|| ValueParsingError::not_a_format(raw, "date-time"))
}

pub(crate) fn parse_language_tag(raw: &Value) -> Result<ParsedValue, ValueParsingError> {
    let value = parse_str(raw)?;
    let regex = language_tag_regex()?;
    if !regex.is_match(value) {
        return Err(ValueParsingError::new(
            raw,
            format!(
                "String value '{}' does not match regular expression {}",
                value,
                regex.as_str()
            ),
        ));
    }
    Ok(ParsedValue::String(value.to_string()))
}

/// An object of language tag → string
pub(crate) fn parse_localizable_string(raw: &Value) -> Result<ParsedValue, ValueParsingError> {
    let Value::Object(entries) = raw else {
        return Err(ValueParsingError::new(raw, "Value must be a dictionary"));
    };
    let regex = language_tag_regex()?;
    let mut result = BTreeMap::new();
    for (key, item) in entries {
        if !regex.is_match(key) {
            return Err(ValueParsingError::new(
                raw,
                format!(
                    "Key '{}' does not match the pattern '{}'",
                    key,
                    regex.as_str()
                ),
            ));
        }
        let text = parse_str(item)?;
        result.insert(key.clone(), ParsedValue::String(text.to_string()));
    }
    Ok(ParsedValue::Map(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn test_uri() {
        assert!(parse_uri(&json!("http://example.com/feed.json")).is_ok());
        assert!(parse_uri(&json!("urn:isbn:9780000000001")).is_ok());
        assert_eq!(
            parse_uri(&json!("feed.json")).unwrap_err().message,
            "'feed.json' is not a 'uri'"
        );
    }

    #[test]
    fn test_uri_reference() {
        assert!(is_uri_reference("http://example.com/a"));
        assert!(is_uri_reference("chapter1.html#p2"));
        assert!(is_uri_reference("../images/cover.jpg"));
        assert!(is_uri_reference(""));
        assert!(!is_uri_reference("has space.html"));
        assert!(!is_uri_reference("http://example.com/{id}"));
        assert_eq!(
            parse_uri_reference(&json!("a b")).unwrap_err().message,
            "'a b' is not a 'uri-reference'"
        );
    }

    #[test]
    fn test_uri_template() {
        assert!(is_uri_template("http://example.com/search{?query,page}"));
        assert!(is_uri_template("http://example.com/{id}/cover{.ext}"));
        assert!(is_uri_template("/items{/path*}{?q:10}"));
        assert!(is_uri_template("plain.html"));
        assert!(!is_uri_template("http://example.com/{id"));
        assert!(!is_uri_template("http://example.com/id}"));
        assert!(!is_uri_template("http://example.com/{}"));
        assert!(!is_uri_template("http://example.com/{!id}"));
        assert!(!is_uri_template("http://example.com/{id:0}"));
        assert!(is_uri_template("{%41b}"));
    }

    #[test]
    fn test_dates() {
        assert_eq!(parse_date_str("2020-02-29"), NaiveDate::from_ymd_opt(2020, 2, 29));
        assert_eq!(parse_date_str("2020-05"), NaiveDate::from_ymd_opt(2020, 5, 1));
        assert_eq!(parse_date_str("2020"), NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(parse_date_str("2020-13"), None);
        assert_eq!(
            parse_date(&json!("yesterday")).unwrap_err().message,
            "'yesterday' is not a 'date'"
        );
    }

    #[test]
    fn test_date_times() {
        let rfc = parse_date_time_str("2020-03-01T10:20:30+02:00").unwrap();
        assert_eq!(rfc.offset().local_minus_utc(), 7200);

        let naive = parse_date_time_str("2020-03-01T10:20").unwrap();
        assert_eq!(naive.hour(), 10);
        assert_eq!(naive.offset().local_minus_utc(), 0);

        let spaced = parse_date_time_str("2020-03-01 10:20:30.5Z").unwrap();
        assert_eq!(spaced.second(), 30);

        let date_only = parse_date_time_str("2020-03").unwrap();
        assert_eq!(date_only.month(), 3);

        assert_eq!(
            parse_date_time(&json!("not a date")).unwrap_err().message,
            "'not a date' is not a 'date-time'"
        );
    }

    #[test]
    fn test_language_tags() {
        assert!(parse_language_tag(&json!("en")).is_ok());
        assert!(parse_language_tag(&json!("zh-Hant-TW")).is_ok());
        assert!(parse_language_tag(&json!("i-klingon")).is_ok());
        assert!(parse_language_tag(&json!("x-private")).is_ok());
        assert!(parse_language_tag(&json!("english language")).is_err());
    }

    #[test]
    fn test_localizable_string() {
        let parsed = parse_localizable_string(&json!({"en": "Title", "fr": "Titre"})).unwrap();
        assert!(matches!(parsed, ParsedValue::Map(ref m) if m.len() == 2));

        let error = parse_localizable_string(&json!({"not a tag": "x"})).unwrap_err();
        assert!(error.message.starts_with("Key 'not a tag' does not match the pattern"));

        assert_eq!(
            parse_localizable_string(&json!("Title")).unwrap_err().message,
            "Value must be a dictionary"
        );
    }
}
