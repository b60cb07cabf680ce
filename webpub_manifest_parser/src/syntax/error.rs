//! Field-level errors recorded while mapping raw JSON onto AST nodes
//!
//! None of these abort analysis: the offending field keeps its default and
//! the analyzer moves on to the next one.

use crate::ast::NodeKind;
use crate::logging::codes::{self, Code, Severity};
use crate::parsers::ValueParsingError;
use crate::utils::Location;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("{node} object does not have a required property '{key}' at {location}")]
    MissingProperty {
        node: &'static str,
        property: &'static str,
        key: &'static str,
        location: Location,
    },

    #[error("{node}.{property} at {location}: {message}")]
    ValueParsing {
        node: &'static str,
        property: &'static str,
        location: Location,
        message: String,
    },

    #[error("{node}.{property} at {location}: parsed value of type '{found}' does not fit the field")]
    UnexpectedValueType {
        node: &'static str,
        property: &'static str,
        location: Location,
        found: &'static str,
    },

    #[error("{node}.{property} at {location}: {message}")]
    NestingTooDeep {
        node: &'static str,
        property: &'static str,
        location: Location,
        message: String,
    },

    #[error("Too many syntax errors, stopped recording after {limit}")]
    ErrorLimitReached { limit: usize },
}

impl SyntaxError {
    pub fn missing_property(
        kind: NodeKind,
        property: &'static str,
        key: &'static str,
        location: Location,
    ) -> Self {
        Self::MissingProperty {
            node: kind.name(),
            property,
            key,
            location,
        }
    }

    /// Wrap a parser failure, keeping the nesting limit distinct
    pub fn from_parsing(
        kind: NodeKind,
        property: &'static str,
        location: Location,
        error: ValueParsingError,
    ) -> Self {
        if error.is_nesting_too_deep() {
            Self::NestingTooDeep {
                node: kind.name(),
                property,
                location,
                message: error.message,
            }
        } else {
            Self::ValueParsing {
                node: kind.name(),
                property,
                location,
                message: error.message,
            }
        }
    }

    pub fn unexpected_value_type(
        kind: NodeKind,
        property: &'static str,
        location: Location,
        found: &'static str,
    ) -> Self {
        Self::UnexpectedValueType {
            node: kind.name(),
            property,
            location,
            found,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::MissingProperty { .. } => codes::syntax::MISSING_PROPERTY,
            Self::ValueParsing { .. } => codes::syntax::VALUE_PARSING_ERROR,
            Self::UnexpectedValueType { .. } => codes::syntax::UNEXPECTED_VALUE_TYPE,
            Self::NestingTooDeep { .. } => codes::syntax::NESTING_TOO_DEEP,
            Self::ErrorLimitReached { .. } => codes::syntax::ERROR_LIMIT_REACHED,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            Self::MissingProperty { .. } => "MissingProperty",
            Self::ValueParsing { .. } => "ValueParsing",
            Self::UnexpectedValueType { .. } => "UnexpectedValueType",
            Self::NestingTooDeep { .. } => "NestingTooDeep",
            Self::ErrorLimitReached { .. } => "ErrorLimitReached",
        }
    }

    /// Name of the node type the error was recorded on
    pub fn node(&self) -> Option<&'static str> {
        match self {
            Self::MissingProperty { node, .. }
            | Self::ValueParsing { node, .. }
            | Self::UnexpectedValueType { node, .. }
            | Self::NestingTooDeep { node, .. } => Some(*node),
            Self::ErrorLimitReached { .. } => None,
        }
    }

    pub fn property(&self) -> Option<&'static str> {
        match self {
            Self::MissingProperty { property, .. }
            | Self::ValueParsing { property, .. }
            | Self::UnexpectedValueType { property, .. }
            | Self::NestingTooDeep { property, .. } => Some(*property),
            Self::ErrorLimitReached { .. } => None,
        }
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::MissingProperty { location, .. }
            | Self::ValueParsing { location, .. }
            | Self::UnexpectedValueType { location, .. }
            | Self::NestingTooDeep { location, .. } => Some(location),
            Self::ErrorLimitReached { .. } => None,
        }
    }

    /// Parser message without the node and location prefix
    pub fn message(&self) -> String {
        match self {
            Self::ValueParsing { message, .. } | Self::NestingTooDeep { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }

    pub fn severity(&self) -> Severity {
        codes::get_severity(self.error_code().as_str())
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_property_message() {
        let error = SyntaxError::missing_property(
            NodeKind::Link,
            "href",
            "href",
            Location::root().child_key("links").child_index(0),
        );
        assert_eq!(
            error.to_string(),
            "Link object does not have a required property 'href' at /links/0"
        );
        assert_eq!(error.error_code(), codes::syntax::MISSING_PROPERTY);
        assert!(error.is_recoverable());
        assert!(!error.requires_halt());
    }

    #[test]
    fn test_nesting_limit_keeps_its_own_variant() {
        let raw = serde_json::json!({});
        let error = SyntaxError::from_parsing(
            NodeKind::Link,
            "children",
            Location::root(),
            ValueParsingError::nesting_too_deep(&raw, 64),
        );
        assert_eq!(error.error_code(), codes::syntax::NESTING_TOO_DEEP);
        assert_eq!(error.message(), "Nodes are nested deeper than 64 levels");

        let plain = SyntaxError::from_parsing(
            NodeKind::Link,
            "height",
            Location::root(),
            ValueParsingError::new(&raw, "bad"),
        );
        assert_eq!(plain.error_type(), "ValueParsing");
        assert_eq!(plain.property(), Some("height"));
    }
}
