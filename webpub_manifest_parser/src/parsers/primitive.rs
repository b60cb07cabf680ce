//! Scalar parsers: numbers with bounds, booleans, strings, patterns and enums

use super::error::ValueParsingError;
use super::value::ParsedValue;
use crate::utils::display_value;
use regex::Regex;
use serde_json::Value;

/// Optional inclusive/exclusive limits for numeric parsers
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub minimum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
}

impl Bounds {
    pub const NONE: Bounds = Bounds {
        minimum: None,
        exclusive_minimum: None,
        maximum: None,
        exclusive_maximum: None,
    };

    /// `value >= minimum`
    pub const fn minimum(minimum: f64) -> Self {
        Bounds {
            minimum: Some(minimum),
            ..Self::NONE
        }
    }

    /// `value > minimum`
    pub const fn exclusive_minimum(minimum: f64) -> Self {
        Bounds {
            exclusive_minimum: Some(minimum),
            ..Self::NONE
        }
    }

    pub const fn with_maximum(self, maximum: f64) -> Self {
        Bounds {
            maximum: Some(maximum),
            ..self
        }
    }

    pub const fn with_exclusive_maximum(self, maximum: f64) -> Self {
        Bounds {
            exclusive_maximum: Some(maximum),
            ..self
        }
    }

    fn check(&self, value: f64, raw: &Value) -> Result<(), ValueParsingError> {
        let shown = display_value(raw);

        if let Some(minimum) = self.minimum {
            if value < minimum {
                return Err(ValueParsingError::new(
                    raw,
                    format!(
                        "Value {} is less than the minimum ({})",
                        shown,
                        format_bound(minimum)
                    ),
                ));
            }
        }
        if let Some(minimum) = self.exclusive_minimum {
            if value <= minimum {
                return Err(ValueParsingError::new(
                    raw,
                    format!(
                        "Value {} is less or equal than the exclusive minimum ({})",
                        shown,
                        format_bound(minimum)
                    ),
                ));
            }
        }
        if let Some(maximum) = self.maximum {
            if value > maximum {
                return Err(ValueParsingError::new(
                    raw,
                    format!(
                        "Value {} is greater than the maximum ({})",
                        shown,
                        format_bound(maximum)
                    ),
                ));
            }
        }
        if let Some(maximum) = self.exclusive_maximum {
            if value >= maximum {
                return Err(ValueParsingError::new(
                    raw,
                    format!(
                        "Value {} is greater or equal than the exclusive maximum ({})",
                        shown,
                        format_bound(maximum)
                    ),
                ));
            }
        }
        Ok(())
    }
}

// Integral bounds print without a fractional part
fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 && bound.abs() < 1e15 {
        format!("{}", bound as i64)
    } else {
        format!("{}", bound)
    }
}

pub(crate) fn parse_integer(raw: &Value, bounds: &Bounds) -> Result<ParsedValue, ValueParsingError> {
    let value = raw
        .as_i64()
        .ok_or_else(|| ValueParsingError::expected(raw, "an integer"))?;
    bounds.check(value as f64, raw)?;
    Ok(ParsedValue::Integer(value))
}

pub(crate) fn parse_number(raw: &Value, bounds: &Bounds) -> Result<ParsedValue, ValueParsingError> {
    let value = raw
        .as_f64()
        .ok_or_else(|| ValueParsingError::expected(raw, "a number"))?;
    bounds.check(value, raw)?;
    Ok(ParsedValue::Number(value))
}

pub(crate) fn parse_boolean(
    raw: &Value,
    accept_strings: bool,
) -> Result<ParsedValue, ValueParsingError> {
    match raw {
        Value::Bool(b) => Ok(ParsedValue::Bool(*b)),
        Value::String(s) if accept_strings && s == "true" => Ok(ParsedValue::Bool(true)),
        Value::String(s) if accept_strings && s == "false" => Ok(ParsedValue::Bool(false)),
        _ => Err(ValueParsingError::expected(raw, "boolean")),
    }
}

pub(crate) fn parse_str(raw: &Value) -> Result<&str, ValueParsingError> {
    raw.as_str()
        .ok_or_else(|| ValueParsingError::expected(raw, "a string"))
}

pub(crate) fn parse_string(raw: &Value) -> Result<ParsedValue, ValueParsingError> {
    parse_str(raw).map(|s| ParsedValue::String(s.to_string()))
}

pub(crate) fn parse_pattern(raw: &Value, regex: &Regex) -> Result<ParsedValue, ValueParsingError> {
    let value = parse_str(raw)?;
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

pub(crate) fn parse_enum(
    raw: &Value,
    items: &[&'static str],
) -> Result<ParsedValue, ValueParsingError> {
    let value = parse_str(raw)?;
    if !items.contains(&value) {
        return Err(ValueParsingError::new(
            raw,
            format!("Value '{}' is not among [{}]", value, items.join(", ")),
        ));
    }
    Ok(ParsedValue::String(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exclusive_minimum_message() {
        let error = parse_integer(&json!(-10), &Bounds::exclusive_minimum(0.0)).unwrap_err();
        assert_eq!(
            error.message,
            "Value -10 is less or equal than the exclusive minimum (0)"
        );
        assert_eq!(error.value, json!(-10));
    }

    #[test]
    fn test_bound_messages() {
        let bounds = Bounds::minimum(1.0).with_maximum(10.0);
        assert_eq!(
            parse_integer(&json!(0), &bounds).unwrap_err().message,
            "Value 0 is less than the minimum (1)"
        );
        assert_eq!(
            parse_integer(&json!(11), &bounds).unwrap_err().message,
            "Value 11 is greater than the maximum (10)"
        );
        assert_eq!(
            parse_number(&json!(2.5), &Bounds::NONE.with_exclusive_maximum(2.5))
                .unwrap_err()
                .message,
            "Value 2.5 is greater or equal than the exclusive maximum (2.5)"
        );
        assert_eq!(parse_integer(&json!(10), &bounds), Ok(ParsedValue::Integer(10)));
    }

    #[test]
    fn test_integer_is_strict() {
        assert_eq!(
            parse_integer(&json!("10"), &Bounds::NONE).unwrap_err().message,
            "Value '10' must be an integer"
        );
        assert!(parse_integer(&json!(1.5), &Bounds::NONE).is_err());
        assert_eq!(parse_number(&json!(3), &Bounds::NONE), Ok(ParsedValue::Number(3.0)));
    }

    #[test]
    fn test_boolean_strings() {
        assert_eq!(parse_boolean(&json!("true"), true), Ok(ParsedValue::Bool(true)));
        assert_eq!(parse_boolean(&json!("false"), true), Ok(ParsedValue::Bool(false)));
        assert_eq!(
            parse_boolean(&json!("true"), false).unwrap_err().message,
            "Value 'true' must be boolean"
        );
        assert!(parse_boolean(&json!("yes"), true).is_err());
    }

    #[test]
    fn test_pattern_and_enum() {
        let regex = Regex::new("^[a-z]+$").unwrap();
        assert!(parse_pattern(&json!("abc"), &regex).is_ok());
        assert_eq!(
            parse_pattern(&json!("ABC"), &regex).unwrap_err().message,
            "String value 'ABC' does not match regular expression ^[a-z]+$"
        );

        assert_eq!(
            parse_enum(&json!("up"), &["left", "right"]).unwrap_err().message,
            "Value 'up' is not among [left, right]"
        );
        assert_eq!(
            parse_enum(&json!(1), &["left"]).unwrap_err().message,
            "Value '1' must be a string"
        );
    }
}
