//! Value parsers
//!
//! Each parser validates one raw JSON value against a type or format rule and
//! returns a normalized [`ParsedValue`]. Parsers compose: any field rule,
//! including unions such as "a string, a list of strings or an object", is a
//! tree of [`ValueParser`] variants.

pub mod combinators;
pub mod error;
pub mod format;
pub mod primitive;
pub mod value;

pub use error::ValueParsingError;
pub use primitive::Bounds;
pub use value::{DateValue, FromParsed, LocalizableString, ParsedValue, Title};

use crate::ast::{Node, NodeKind};
use regex::Regex;
use serde_json::Value;

/// Construction of nested AST nodes on behalf of [`ValueParser::TypeOf`]
///
/// Implemented by the syntax analyzer. Errors recorded while building a node
/// stay in the builder; `checkpoint`/`rollback` discard the ones recorded by
/// an alternative that ultimately failed.
pub trait NodeBuilder {
    fn build_node(&mut self, kind: NodeKind, raw: &Value) -> Result<Node, ValueParsingError>;

    /// Build a compact collection written as a bare array of links
    ///
    /// The array keeps its own location; no `links` segment is added below it.
    fn build_link_array(&mut self, kind: NodeKind, links: &Value) -> Result<Node, ValueParsingError> {
        self.build_node(kind, &serde_json::json!({ "links": links }))
    }

    fn push_key(&mut self, key: &str);

    fn push_index(&mut self, index: usize);

    fn pop(&mut self);

    fn checkpoint(&self) -> usize;

    fn rollback(&mut self, checkpoint: usize);

    /// Whether "true"/"false" strings parse as booleans
    fn accepts_boolean_strings(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub enum ValueParser {
    Integer(Bounds),
    Number(Bounds),
    Boolean,
    String,
    Pattern(Regex),
    Enum(&'static [&'static str]),

    Uri,
    UriReference,
    UriTemplate,
    Date,
    DateTime,
    LanguageTag,
    /// Object of language tag → string
    LocalizableString,

    AnyOf(Vec<ValueParser>),
    ArrayOf {
        item: Box<ValueParser>,
        unique: bool,
    },
    ObjectOf {
        value: Box<ValueParser>,
        key_pattern: Option<Regex>,
    },
    TypeOf(NodeKind),
}

impl ValueParser {
    pub fn integer(bounds: Bounds) -> Self {
        ValueParser::Integer(bounds)
    }

    pub fn number(bounds: Bounds) -> Self {
        ValueParser::Number(bounds)
    }

    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(ValueParser::Pattern)
    }

    pub fn any_of(parsers: Vec<ValueParser>) -> Self {
        ValueParser::AnyOf(parsers)
    }

    pub fn array_of(item: ValueParser) -> Self {
        ValueParser::ArrayOf {
            item: Box::new(item),
            unique: false,
        }
    }

    pub fn unique_array_of(item: ValueParser) -> Self {
        ValueParser::ArrayOf {
            item: Box::new(item),
            unique: true,
        }
    }

    pub fn object_of(value: ValueParser, key_pattern: Option<&str>) -> Result<Self, regex::Error> {
        let key_pattern = key_pattern.map(Regex::new).transpose()?;
        Ok(ValueParser::ObjectOf {
            value: Box::new(value),
            key_pattern,
        })
    }

    pub fn type_of(kind: NodeKind) -> Self {
        ValueParser::TypeOf(kind)
    }

    /// A string, or an object of translations
    pub fn localizable() -> Self {
        ValueParser::AnyOf(vec![ValueParser::String, ValueParser::LocalizableString])
    }

    /// A single string or a list of strings
    pub fn string_or_list() -> Self {
        ValueParser::AnyOf(vec![
            ValueParser::String,
            ValueParser::array_of(ValueParser::String),
        ])
    }

    /// A single language tag or a list of tags
    pub fn languages() -> Self {
        ValueParser::AnyOf(vec![
            ValueParser::LanguageTag,
            ValueParser::array_of(ValueParser::LanguageTag),
        ])
    }

    /// Plain date first, then a full date and time
    pub fn date_or_time() -> Self {
        ValueParser::AnyOf(vec![ValueParser::Date, ValueParser::DateTime])
    }

    /// A name, an object of `kind`, or a list mixing both
    pub fn one_or_many_named(kind: NodeKind) -> Self {
        let single = ValueParser::AnyOf(vec![ValueParser::String, ValueParser::TypeOf(kind)]);
        ValueParser::AnyOf(vec![single.clone(), ValueParser::array_of(single)])
    }

    pub fn parse(
        &self,
        raw: &Value,
        builder: &mut dyn NodeBuilder,
    ) -> Result<ParsedValue, ValueParsingError> {
        match self {
            ValueParser::Integer(bounds) => primitive::parse_integer(raw, bounds),
            ValueParser::Number(bounds) => primitive::parse_number(raw, bounds),
            ValueParser::Boolean => {
                primitive::parse_boolean(raw, builder.accepts_boolean_strings())
            }
            ValueParser::String => primitive::parse_string(raw),
            ValueParser::Pattern(regex) => primitive::parse_pattern(raw, regex),
            ValueParser::Enum(items) => primitive::parse_enum(raw, items),

            ValueParser::Uri => format::parse_uri(raw),
            ValueParser::UriReference => format::parse_uri_reference(raw),
            ValueParser::UriTemplate => format::parse_uri_template(raw),
            ValueParser::Date => format::parse_date(raw),
            ValueParser::DateTime => format::parse_date_time(raw),
            ValueParser::LanguageTag => format::parse_language_tag(raw),
            ValueParser::LocalizableString => format::parse_localizable_string(raw),

            ValueParser::AnyOf(parsers) => combinators::parse_any_of(parsers, raw, builder),
            ValueParser::ArrayOf { item, unique } => {
                combinators::parse_array_of(item, *unique, raw, builder)
            }
            ValueParser::ObjectOf { value, key_pattern } => {
                combinators::parse_object_of(value, key_pattern.as_ref(), raw, builder)
            }
            ValueParser::TypeOf(kind) => combinators::parse_type_of(*kind, raw, builder),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// Builder for parser tests that never meet a nested node
    #[derive(Default)]
    pub(crate) struct ScalarOnly {
        pub depth: usize,
        pub strict_booleans: bool,
    }

    impl NodeBuilder for ScalarOnly {
        fn build_node(&mut self, kind: NodeKind, raw: &Value) -> Result<Node, ValueParsingError> {
            Err(ValueParsingError::new(raw, format!("no builder for {}", kind.name())))
        }

        fn push_key(&mut self, _key: &str) {
            self.depth += 1;
        }

        fn push_index(&mut self, _index: usize) {
            self.depth += 1;
        }

        fn pop(&mut self) {
            self.depth -= 1;
        }

        fn checkpoint(&self) -> usize {
            0
        }

        fn rollback(&mut self, _checkpoint: usize) {}

        fn accepts_boolean_strings(&self) -> bool {
            !self.strict_booleans
        }
    }

    fn parse(parser: &ValueParser, raw: Value) -> Result<ParsedValue, ValueParsingError> {
        let mut builder = ScalarOnly::default();
        let result = parser.parse(&raw, &mut builder);
        assert_eq!(builder.depth, 0, "path push/pop must balance");
        result
    }

    #[test]
    fn test_any_of_reports_first_error() {
        let parser = ValueParser::any_of(vec![
            ValueParser::integer(Bounds::exclusive_minimum(0.0)),
            ValueParser::String,
        ]);

        assert_eq!(parse(&parser, json!("ok")), Ok(ParsedValue::String("ok".into())));
        assert_eq!(
            parse(&parser, json!(true)).unwrap_err().message,
            "Value 'true' must be an integer"
        );

        let reversed = ValueParser::any_of(vec![
            ValueParser::String,
            ValueParser::integer(Bounds::NONE),
        ]);
        assert_eq!(
            parse(&reversed, json!(true)).unwrap_err().message,
            "Value 'true' must be a string"
        );
    }

    #[test]
    fn test_unique_array_names_duplicate() {
        let parser = ValueParser::unique_array_of(ValueParser::String);

        let error = parse(&parser, json!(["context1", "context2", "context1"])).unwrap_err();
        assert_eq!(error.message, "Item 'context1' is not unique");

        assert!(parse(&ValueParser::array_of(ValueParser::String), json!(["a", "a"])).is_ok());
        assert_eq!(
            parse(&parser, json!("context1")).unwrap_err().message,
            "Value 'context1' must be a list"
        );
    }

    #[test]
    fn test_object_of_key_pattern() {
        let parser = ValueParser::object_of(ValueParser::integer(Bounds::NONE), Some("^[a-z]+$"))
            .unwrap();

        let parsed = parse(&parser, json!({"a": 1, "b": 2})).unwrap();
        assert!(matches!(parsed, ParsedValue::Map(ref m) if m.len() == 2));

        assert_eq!(
            parse(&parser, json!({"A": 1})).unwrap_err().message,
            "Key 'A' does not match the pattern '^[a-z]+$'"
        );
        assert_eq!(
            parse(&parser, json!([1])).unwrap_err().message,
            "Value must be a dictionary"
        );
        assert!(ValueParser::object_of(ValueParser::String, Some("(")).is_err());
    }

    #[test]
    fn test_string_or_list_and_date_or_time() {
        assert_eq!(
            parse(&ValueParser::string_or_list(), json!(["a", "b"])),
            Ok(ParsedValue::List(vec![
                ParsedValue::String("a".into()),
                ParsedValue::String("b".into())
            ]))
        );

        assert!(matches!(
            parse(&ValueParser::date_or_time(), json!("2020-01-02")),
            Ok(ParsedValue::Date(_))
        ));
        assert!(matches!(
            parse(&ValueParser::date_or_time(), json!("2020-01-02T10:00:00Z")),
            Ok(ParsedValue::DateTime(_))
        ));
        assert_eq!(
            parse(&ValueParser::date_or_time(), json!("soon")).unwrap_err().message,
            "'soon' is not a 'date'"
        );
    }

    #[test]
    fn test_type_of_rejects_scalars() {
        let parser = ValueParser::type_of(NodeKind::Link);
        assert_eq!(
            parse(&parser, json!(5)).unwrap_err().message,
            "Value '5' must be an instance of 'Link'"
        );
    }

    #[test]
    fn test_boolean_strings_follow_builder() {
        let mut strict = ScalarOnly {
            strict_booleans: true,
            ..ScalarOnly::default()
        };
        assert!(ValueParser::Boolean.parse(&json!("true"), &mut strict).is_err());
        assert_eq!(
            parse(&ValueParser::Boolean, json!("true")),
            Ok(ParsedValue::Bool(true))
        );
    }
}
