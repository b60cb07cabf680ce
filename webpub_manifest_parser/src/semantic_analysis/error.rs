//! Business-rule violations found on a well-typed AST

use crate::ast::NodeKind;
use crate::config::compile_time::semantic::MAX_ERROR_MESSAGE_LENGTH;
use crate::logging::codes::{self, Code, Severity};
use crate::utils::truncate_message;
use std::fmt;

/// Outcome of a single rule check
pub type RuleResult = Result<(), SemanticError>;

/// Every rule the semantic analyzers enforce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    LinkHrefWrongFormat,
    LinkMissingRelProperty,
    MissingSelfLink,
    SelfLinkWrongHrefFormat,
    MissingRequiredSubcollection,
    CollectionWrongFormat,
    MissingTypeProperty,

    MissingRequiredFeedSubcollections,
    MissingAcquisitionLink,
    MissingNavigationLinkTitle,
    WrongGroupStructure,

    OdlFeedMissingPublications,
    OdlFeedRedundantGroups,
    OdlFeedRedundantFacets,
    OdlFeedRedundantNavigation,
    OdlPublicationLicensesOrOaLink,
    OdlLicenseSelfLink,
    OdlLicenseCheckoutLink,
}

impl Rule {
    pub fn code(&self) -> Code {
        use codes::semantic::*;
        match self {
            Rule::LinkHrefWrongFormat => LINK_HREF_WRONG_FORMAT,
            Rule::LinkMissingRelProperty => LINK_MISSING_REL_PROPERTY,
            Rule::MissingSelfLink => MISSING_SELF_LINK,
            Rule::SelfLinkWrongHrefFormat => SELF_LINK_WRONG_HREF_FORMAT,
            Rule::MissingRequiredSubcollection => MISSING_REQUIRED_SUBCOLLECTION,
            Rule::CollectionWrongFormat => COLLECTION_WRONG_FORMAT,
            Rule::MissingTypeProperty => MISSING_TYPE_PROPERTY,
            Rule::MissingRequiredFeedSubcollections => MISSING_REQUIRED_FEED_SUBCOLLECTIONS,
            Rule::MissingAcquisitionLink => MISSING_ACQUISITION_LINK,
            Rule::MissingNavigationLinkTitle => MISSING_NAVIGATION_LINK_TITLE,
            Rule::WrongGroupStructure => WRONG_GROUP_STRUCTURE,
            Rule::OdlFeedMissingPublications => ODL_FEED_MISSING_PUBLICATIONS,
            Rule::OdlFeedRedundantGroups => ODL_FEED_REDUNDANT_GROUPS,
            Rule::OdlFeedRedundantFacets => ODL_FEED_REDUNDANT_FACETS,
            Rule::OdlFeedRedundantNavigation => ODL_FEED_REDUNDANT_NAVIGATION,
            Rule::OdlPublicationLicensesOrOaLink => ODL_PUBLICATION_LICENSES_OR_OA_LINK,
            Rule::OdlLicenseSelfLink => ODL_LICENSE_SELF_LINK,
            Rule::OdlLicenseCheckoutLink => ODL_LICENSE_CHECKOUT_LINK,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rule::LinkHrefWrongFormat => "LinkHrefWrongFormat",
            Rule::LinkMissingRelProperty => "LinkMissingRelProperty",
            Rule::MissingSelfLink => "MissingSelfLink",
            Rule::SelfLinkWrongHrefFormat => "SelfLinkWrongHrefFormat",
            Rule::MissingRequiredSubcollection => "MissingRequiredSubcollection",
            Rule::CollectionWrongFormat => "CollectionWrongFormat",
            Rule::MissingTypeProperty => "MissingTypeProperty",
            Rule::MissingRequiredFeedSubcollections => "MissingRequiredFeedSubcollections",
            Rule::MissingAcquisitionLink => "MissingAcquisitionLink",
            Rule::MissingNavigationLinkTitle => "MissingNavigationLinkTitle",
            Rule::WrongGroupStructure => "WrongGroupStructure",
            Rule::OdlFeedMissingPublications => "OdlFeedMissingPublications",
            Rule::OdlFeedRedundantGroups => "OdlFeedRedundantGroups",
            Rule::OdlFeedRedundantFacets => "OdlFeedRedundantFacets",
            Rule::OdlFeedRedundantNavigation => "OdlFeedRedundantNavigation",
            Rule::OdlPublicationLicensesOrOaLink => "OdlPublicationLicensesOrOaLink",
            Rule::OdlLicenseSelfLink => "OdlLicenseSelfLink",
            Rule::OdlLicenseCheckoutLink => "OdlLicenseCheckoutLink",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SemanticError {
    #[error("{message}")]
    RuleViolation {
        rule: Rule,
        /// Type of the offending node
        node: NodeKind,
        property: Option<&'static str>,
        message: String,
    },

    #[error("Too many semantic errors, stopped recording after {limit}")]
    ErrorLimitReached { limit: usize },
}

impl SemanticError {
    pub fn violation(
        rule: Rule,
        node: NodeKind,
        property: Option<&'static str>,
        message: impl Into<String>,
    ) -> Self {
        Self::RuleViolation {
            rule,
            node,
            property,
            message: truncate_message(&message.into(), MAX_ERROR_MESSAGE_LENGTH),
        }
    }

    pub fn rule(&self) -> Option<Rule> {
        match self {
            Self::RuleViolation { rule, .. } => Some(*rule),
            Self::ErrorLimitReached { .. } => None,
        }
    }

    pub fn node(&self) -> Option<NodeKind> {
        match self {
            Self::RuleViolation { node, .. } => Some(*node),
            Self::ErrorLimitReached { .. } => None,
        }
    }

    pub fn property(&self) -> Option<&'static str> {
        match self {
            Self::RuleViolation { property, .. } => *property,
            Self::ErrorLimitReached { .. } => None,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::RuleViolation { rule, .. } => rule.code(),
            Self::ErrorLimitReached { .. } => codes::semantic::ERROR_LIMIT_REACHED,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            Self::RuleViolation { rule, .. } => rule.name(),
            Self::ErrorLimitReached { .. } => "ErrorLimitReached",
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
    fn test_violation_carries_rule_metadata() {
        let error = SemanticError::violation(
            Rule::MissingSelfLink,
            NodeKind::RwpmManifest,
            None,
            "Manifest 'T' does not have a required 'self' link",
        );

        assert_eq!(error.to_string(), "Manifest 'T' does not have a required 'self' link");
        assert_eq!(error.error_code(), codes::semantic::MISSING_SELF_LINK);
        assert_eq!(error.error_type(), "MissingSelfLink");
        assert_eq!(error.node(), Some(NodeKind::RwpmManifest));
        assert!(error.is_recoverable());
        assert_eq!(error.severity(), Severity::Medium);
    }

    #[test]
    fn test_long_messages_are_truncated() {
        let href = "h".repeat(MAX_ERROR_MESSAGE_LENGTH * 2);
        let error = SemanticError::violation(
            Rule::LinkHrefWrongFormat,
            NodeKind::Link,
            Some("href"),
            format!("Link's href '{}' is not a valid URI reference", href),
        );
        assert!(error.to_string().len() <= MAX_ERROR_MESSAGE_LENGTH);
    }
}
