//! Composite parsers: any-of, array-of, object-of and nested node types

use super::error::ValueParsingError;
use super::value::ParsedValue;
use super::{NodeBuilder, ValueParser};
use crate::ast::NodeKind;
use crate::utils::display_value;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

/// First success wins; if every alternative fails, the first alternative's error is reported
pub(crate) fn parse_any_of(
    parsers: &[ValueParser],
    raw: &Value,
    builder: &mut dyn NodeBuilder,
) -> Result<ParsedValue, ValueParsingError> {
    let mut first_error = None;

    for parser in parsers {
        let checkpoint = builder.checkpoint();
        match parser.parse(raw, builder) {
            Ok(value) => return Ok(value),
            Err(error) => {
                builder.rollback(checkpoint);
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
        }
    }

    Err(first_error
        .unwrap_or_else(|| ValueParsingError::new(raw, "No alternatives to parse the value with")))
}

/// Parse every item of a JSON array
///
/// With `unique`, items are compared after parsing, so two spellings of the
/// same value (`"rel": "self"` and `"rel": ["self"]`) are duplicates. Parsed
/// values have no `Hash`: `f64` fields and date-times that compare equal
/// across UTC offsets rule out a key consistent with `PartialEq`, so each
/// item is checked against the ones before it.
pub(crate) fn parse_array_of(
    item_parser: &ValueParser,
    unique: bool,
    raw: &Value,
    builder: &mut dyn NodeBuilder,
) -> Result<ParsedValue, ValueParsingError> {
    let Value::Array(items) = raw else {
        return Err(ValueParsingError::expected(raw, "a list"));
    };

    let mut result: Vec<ParsedValue> = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        builder.push_index(index);
        let parsed = item_parser.parse(item, builder);
        builder.pop();
        let parsed = parsed?;

        if unique && result.contains(&parsed) {
            return Err(ValueParsingError::new(
                raw,
                format!("Item '{}' is not unique", display_value(item)),
            ));
        }
        result.push(parsed);
    }

    Ok(ParsedValue::List(result))
}

pub(crate) fn parse_object_of(
    value_parser: &ValueParser,
    key_pattern: Option<&Regex>,
    raw: &Value,
    builder: &mut dyn NodeBuilder,
) -> Result<ParsedValue, ValueParsingError> {
    let Value::Object(entries) = raw else {
        return Err(ValueParsingError::new(raw, "Value must be a dictionary"));
    };

    let mut result = BTreeMap::new();
    for (key, item) in entries {
        if let Some(pattern) = key_pattern {
            if !pattern.is_match(key) {
                return Err(ValueParsingError::new(
                    raw,
                    format!(
                        "Key '{}' does not match the pattern '{}'",
                        key,
                        pattern.as_str()
                    ),
                ));
            }
        }
        builder.push_key(key);
        let parsed = value_parser.parse(item, builder);
        builder.pop();
        result.insert(key.clone(), parsed?);
    }

    Ok(ParsedValue::Map(result))
}

/// Hands a raw object to the node builder
///
/// Kinds that are compact collections also accept a bare array of links.
pub(crate) fn parse_type_of(
    kind: NodeKind,
    raw: &Value,
    builder: &mut dyn NodeBuilder,
) -> Result<ParsedValue, ValueParsingError> {
    let node = match raw {
        Value::Object(_) => builder.build_node(kind, raw)?,
        Value::Array(_) if kind.accepts_link_array() => builder.build_link_array(kind, raw)?,
        _ => {
            return Err(ValueParsingError::new(
                raw,
                format!(
                    "Value '{}' must be an instance of '{}'",
                    display_value(raw),
                    kind.name()
                ),
            ))
        }
    };
    Ok(ParsedValue::Node(Box::new(node)))
}
