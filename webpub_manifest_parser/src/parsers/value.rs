//! Normalized values produced by the value parsers and their conversion into AST fields

use crate::ast::Node;
use chrono::{DateTime, FixedOffset, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;

/// Output of a successful [`ValueParser`](super::ValueParser) run
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedValue {
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    List(Vec<ParsedValue>),
    Map(BTreeMap<String, ParsedValue>),
    Node(Box<Node>),
}

impl ParsedValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ParsedValue::Bool(_) => "boolean",
            ParsedValue::Integer(_) => "integer",
            ParsedValue::Number(_) => "number",
            ParsedValue::String(_) => "string",
            ParsedValue::Date(_) => "date",
            ParsedValue::DateTime(_) => "date-time",
            ParsedValue::List(_) => "list",
            ParsedValue::Map(_) => "map",
            ParsedValue::Node(node) => node.kind().name(),
        }
    }
}

/// Conversion from a parsed value into the concrete type of an AST field
///
/// Returns `None` when the value has the wrong shape for the field.
pub trait FromParsed: Sized {
    fn from_parsed(value: ParsedValue) -> Option<Self>;
}

impl FromParsed for ParsedValue {
    fn from_parsed(value: ParsedValue) -> Option<Self> {
        Some(value)
    }
}

impl FromParsed for bool {
    fn from_parsed(value: ParsedValue) -> Option<Self> {
        match value {
            ParsedValue::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl FromParsed for i64 {
    fn from_parsed(value: ParsedValue) -> Option<Self> {
        match value {
            ParsedValue::Integer(i) => Some(i),
            _ => None,
        }
    }
}

impl FromParsed for f64 {
    fn from_parsed(value: ParsedValue) -> Option<Self> {
        match value {
            ParsedValue::Number(n) => Some(n),
            ParsedValue::Integer(i) => Some(i as f64),
            _ => None,
        }
    }
}

impl FromParsed for String {
    fn from_parsed(value: ParsedValue) -> Option<Self> {
        match value {
            ParsedValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl FromParsed for NaiveDate {
    fn from_parsed(value: ParsedValue) -> Option<Self> {
        match value {
            ParsedValue::Date(d) => Some(d),
            _ => None,
        }
    }
}

impl FromParsed for DateTime<FixedOffset> {
    fn from_parsed(value: ParsedValue) -> Option<Self> {
        match value {
            ParsedValue::DateTime(dt) => Some(dt),
            _ => None,
        }
    }
}

/// Single values are accepted as one-item lists
impl<T: FromParsed> FromParsed for Vec<T> {
    fn from_parsed(value: ParsedValue) -> Option<Self> {
        match value {
            ParsedValue::List(items) => items.into_iter().map(T::from_parsed).collect(),
            single => T::from_parsed(single).map(|item| vec![item]),
        }
    }
}

/// A date, or a full date and time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

impl DateValue {
    pub fn date(&self) -> NaiveDate {
        match self {
            DateValue::Date(d) => *d,
            DateValue::DateTime(dt) => dt.date_naive(),
        }
    }
}

impl FromParsed for DateValue {
    fn from_parsed(value: ParsedValue) -> Option<Self> {
        match value {
            ParsedValue::Date(d) => Some(DateValue::Date(d)),
            ParsedValue::DateTime(dt) => Some(DateValue::DateTime(dt)),
            _ => None,
        }
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            DateValue::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

fn string_map(entries: BTreeMap<String, ParsedValue>) -> Option<BTreeMap<String, String>> {
    entries
        .into_iter()
        .map(|(key, value)| String::from_parsed(value).map(|s| (key, s)))
        .collect()
}

/// A plain string or a language-tag → string mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalizableString {
    Plain(String),
    Localized(BTreeMap<String, String>),
}

impl Default for LocalizableString {
    fn default() -> Self {
        LocalizableString::Plain(String::new())
    }
}

impl LocalizableString {
    pub fn get(&self, language: &str) -> Option<&str> {
        match self {
            LocalizableString::Plain(s) => Some(s),
            LocalizableString::Localized(values) => values.get(language).map(String::as_str),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            LocalizableString::Plain(s) => s.is_empty(),
            LocalizableString::Localized(values) => values.is_empty(),
        }
    }
}

impl From<&str> for LocalizableString {
    fn from(value: &str) -> Self {
        LocalizableString::Plain(value.to_string())
    }
}

impl FromParsed for LocalizableString {
    fn from_parsed(value: ParsedValue) -> Option<Self> {
        match value {
            ParsedValue::String(s) => Some(LocalizableString::Plain(s)),
            ParsedValue::Map(entries) => string_map(entries).map(LocalizableString::Localized),
            _ => None,
        }
    }
}

/// Plain value, or the first translation
impl fmt::Display for LocalizableString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalizableString::Plain(s) => write!(f, "{}", s),
            LocalizableString::Localized(values) => {
                write!(f, "{}", values.values().next().map(String::as_str).unwrap_or(""))
            }
        }
    }
}

/// OPDS 2.0 feed title: a string, a list of strings or a localized mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Title {
    Plain(String),
    List(Vec<String>),
    Localized(BTreeMap<String, String>),
}

impl Default for Title {
    fn default() -> Self {
        Title::Plain(String::new())
    }
}

impl FromParsed for Title {
    fn from_parsed(value: ParsedValue) -> Option<Self> {
        match value {
            ParsedValue::String(s) => Some(Title::Plain(s)),
            ParsedValue::List(items) => items
                .into_iter()
                .map(String::from_parsed)
                .collect::<Option<Vec<_>>>()
                .map(Title::List),
            ParsedValue::Map(entries) => string_map(entries).map(Title::Localized),
            _ => None,
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = match self {
            Title::Plain(s) => Some(s),
            Title::List(items) => items.first(),
            Title::Localized(values) => values.values().next(),
        };
        write!(f, "{}", first.map(String::as_str).unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_value_becomes_list() {
        let single = Vec::<String>::from_parsed(ParsedValue::String("self".into()));
        assert_eq!(single, Some(vec!["self".to_string()]));

        let list = Vec::<String>::from_parsed(ParsedValue::List(vec![
            ParsedValue::String("a".into()),
            ParsedValue::String("b".into()),
        ]));
        assert_eq!(list, Some(vec!["a".to_string(), "b".to_string()]));

        let mixed = Vec::<String>::from_parsed(ParsedValue::List(vec![
            ParsedValue::String("a".into()),
            ParsedValue::Integer(1),
        ]));
        assert_eq!(mixed, None);
    }

    #[test]
    fn test_localizable_string() {
        let mut entries = BTreeMap::new();
        entries.insert("en".to_string(), ParsedValue::String("Moby-Dick".into()));
        entries.insert("fr".to_string(), ParsedValue::String("Moby Dick".into()));

        let localized = LocalizableString::from_parsed(ParsedValue::Map(entries)).unwrap();
        assert_eq!(localized.get("fr"), Some("Moby Dick"));
        assert_eq!(localized.to_string(), "Moby-Dick");

        let plain = LocalizableString::from_parsed(ParsedValue::String("T".into())).unwrap();
        assert_eq!(plain.get("de"), Some("T"));
    }

    #[test]
    fn test_title_shapes() {
        let list = Title::from_parsed(ParsedValue::List(vec![
            ParsedValue::String("First".into()),
            ParsedValue::String("Second".into()),
        ]))
        .unwrap();
        assert_eq!(list.to_string(), "First");
        assert_eq!(Title::from_parsed(ParsedValue::Bool(true)), None);
    }

    #[test]
    fn test_number_accepts_integer() {
        assert_eq!(f64::from_parsed(ParsedValue::Integer(3)), Some(3.0));
        assert_eq!(i64::from_parsed(ParsedValue::Number(3.0)), None);
    }
}
