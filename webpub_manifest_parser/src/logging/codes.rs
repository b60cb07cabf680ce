//! Error and success codes with their classification metadata
//!
//! Every code an analyzer can emit is declared here together with its
//! category, severity and recovery behaviour.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Document loading and decoding error codes
pub mod document {
    use super::Code;

    pub const DOCUMENT_NOT_FOUND: Code = Code::new("E005");
    pub const DOCUMENT_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_DOCUMENT: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const MALFORMED_JSON: Code = Code::new("E013");
    pub const ROOT_NOT_OBJECT: Code = Code::new("E014");
}

/// Syntax analysis error codes
pub mod syntax {
    use super::Code;

    pub const MISSING_PROPERTY: Code = Code::new("E040");
    pub const VALUE_PARSING_ERROR: Code = Code::new("E041");
    pub const NESTING_TOO_DEEP: Code = Code::new("E042");
    pub const UNEXPECTED_VALUE_TYPE: Code = Code::new("E043");
    pub const ERROR_LIMIT_REACHED: Code = Code::new("E044");
}

/// Semantic analysis error codes
pub mod semantic {
    use super::Code;

    // Rules shared by every format
    pub const LINK_HREF_WRONG_FORMAT: Code = Code::new("E180");
    pub const LINK_MISSING_REL_PROPERTY: Code = Code::new("E181");
    pub const MISSING_SELF_LINK: Code = Code::new("E182");
    pub const SELF_LINK_WRONG_HREF_FORMAT: Code = Code::new("E183");
    pub const MISSING_REQUIRED_SUBCOLLECTION: Code = Code::new("E184");
    pub const COLLECTION_WRONG_FORMAT: Code = Code::new("E185");
    pub const MISSING_TYPE_PROPERTY: Code = Code::new("E186");

    // OPDS 2.0
    pub const MISSING_REQUIRED_FEED_SUBCOLLECTIONS: Code = Code::new("E187");
    pub const MISSING_ACQUISITION_LINK: Code = Code::new("E188");
    pub const MISSING_NAVIGATION_LINK_TITLE: Code = Code::new("E189");
    pub const WRONG_GROUP_STRUCTURE: Code = Code::new("E190");

    // ODL
    pub const ODL_FEED_MISSING_PUBLICATIONS: Code = Code::new("E191");
    pub const ODL_FEED_REDUNDANT_GROUPS: Code = Code::new("E192");
    pub const ODL_FEED_REDUNDANT_FACETS: Code = Code::new("E193");
    pub const ODL_FEED_REDUNDANT_NAVIGATION: Code = Code::new("E194");
    pub const ODL_PUBLICATION_LICENSES_OR_OA_LINK: Code = Code::new("E195");
    pub const ODL_LICENSE_SELF_LINK: Code = Code::new("E196");
    pub const ODL_LICENSE_CHECKOUT_LINK: Code = Code::new("E197");

    pub const ERROR_LIMIT_REACHED: Code = Code::new("E198");
}

/// Registry contract error codes
pub mod registry {
    use super::Code;

    pub const DUPLICATE_KEY: Code = Code::new("E230");
    pub const UNKNOWN_KEY: Code = Code::new("E231");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const DOCUMENT_LOAD_SUCCESS: Code = Code::new("I006");
    pub const SYNTAX_ANALYSIS_COMPLETE: Code = Code::new("I040");
    pub const SEMANTIC_ANALYSIS_COMPLETE: Code = Code::new("I070");
    pub const MANIFEST_PARSING_COMPLETE: Code = Code::new("I090");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

type MetadataRow = (
    &'static str,
    &'static str,
    Severity,
    bool,
    bool,
    &'static str,
    &'static str,
);

// (code, category, severity, recoverable, requires_halt, description, action)
const METADATA_TABLE: &[MetadataRow] = &[
    ("ERR001", "System", Severity::Critical, false, true,
        "Critical internal error", "File a bug report with the offending document"),
    ("ERR002", "System", Severity::Critical, false, true,
        "Logging or parser initialization failure", "Check configuration and environment variables"),

    ("E005", "Document", Severity::High, false, true,
        "Manifest file not found", "Check the file path"),
    ("E007", "Document", Severity::High, false, true,
        "Manifest exceeds the maximum document size", "Split the feed or raise the compile-time limit"),
    ("E008", "Document", Severity::High, false, true,
        "Manifest document is empty", "Provide a non-empty JSON document"),
    ("E009", "Document", Severity::High, false, true,
        "Permission denied reading the manifest", "Check file permissions"),
    ("E010", "Document", Severity::High, false, true,
        "Manifest bytes could not be decoded", "Pass the correct encoding label"),
    ("E011", "Document", Severity::High, false, true,
        "I/O error while reading the manifest", "Retry or check the underlying storage"),
    ("E012", "Document", Severity::High, false, true,
        "Invalid manifest path", "Pass a path to a regular file"),
    ("E013", "Document", Severity::High, false, true,
        "Manifest is not well-formed JSON", "Fix the JSON syntax"),
    ("E014", "Document", Severity::High, false, true,
        "Manifest root is not a JSON object", "Wrap the document in a JSON object"),

    ("E040", "Syntax", Severity::Medium, true, false,
        "Required property is missing", "Add the property to the manifest"),
    ("E041", "Syntax", Severity::Medium, true, false,
        "Property value does not conform to its type or format", "Fix the property value"),
    ("E042", "Syntax", Severity::High, true, false,
        "Nodes are nested deeper than allowed", "Flatten alternate/children link chains"),
    ("E043", "Syntax", Severity::High, true, false,
        "Parsed value does not fit the target field", "File a bug report: descriptor and field disagree"),
    ("E044", "Syntax", Severity::High, true, false,
        "Syntax error limit reached", "Fix the reported errors and parse again"),

    ("E180", "Semantic", Severity::Medium, true, false,
        "Link href is not a valid URI reference", "Fix the link's href"),
    ("E181", "Semantic", Severity::Medium, true, false,
        "Manifest link has no relation", "Add a 'rel' to the link"),
    ("E182", "Semantic", Severity::Medium, true, false,
        "Manifest has no 'self' link", "Add a link with rel 'self'"),
    ("E183", "Semantic", Severity::Medium, true, false,
        "'self' link href is not an absolute URI", "Use the canonical absolute URI of the manifest"),
    ("E184", "Semantic", Severity::Medium, true, false,
        "Required subcollection is missing", "Add the subcollection"),
    ("E185", "Semantic", Severity::Medium, true, false,
        "Subcollection must be compact", "Remove metadata and nested subcollections"),
    ("E186", "Semantic", Severity::Medium, true, false,
        "Subcollection link has no media type", "Add a 'type' to the link"),
    ("E187", "Semantic", Severity::Medium, true, false,
        "OPDS 2.0 feed has none of publications, navigation, groups", "Add one of the subcollections"),
    ("E188", "Semantic", Severity::Medium, true, false,
        "OPDS 2.0 publication has no acquisition link", "Add an acquisition link"),
    ("E189", "Semantic", Severity::Medium, true, false,
        "OPDS 2.0 navigation link has no title", "Add a title to the navigation link"),
    ("E190", "Semantic", Severity::Medium, true, false,
        "OPDS 2.0 group mixes navigation and publications", "Split the group"),
    ("E191", "Semantic", Severity::Medium, true, false,
        "ODL feed has no publications", "Add a publications subcollection"),
    ("E192", "Semantic", Severity::Medium, true, false,
        "ODL feed contains groups", "Remove the groups subcollection"),
    ("E193", "Semantic", Severity::Medium, true, false,
        "ODL feed contains facets", "Remove the facets subcollection"),
    ("E194", "Semantic", Severity::Medium, true, false,
        "ODL feed contains navigation", "Remove the navigation subcollection"),
    ("E195", "Semantic", Severity::Medium, true, false,
        "ODL publication has neither licenses nor an open-access link", "Add licenses or an open-access link"),
    ("E196", "Semantic", Severity::Medium, true, false,
        "ODL license self link is not typed as a License Info Document", "Fix the self link's type"),
    ("E197", "Semantic", Severity::Medium, true, false,
        "ODL license borrow link is not typed as a License Status Document", "Fix the borrow link's type"),
    ("E198", "Semantic", Severity::High, true, false,
        "Semantic error limit reached", "Fix the reported errors and parse again"),

    ("E230", "Registry", Severity::Critical, false, true,
        "Registry entry redefines an existing key", "Use a new key when extending a registry"),
    ("E231", "Registry", Severity::High, false, true,
        "Registry key is not defined", "Register the key before using it"),

    ("I004", "System", Severity::Low, true, false,
        "Logging system initialized", "Continue"),
    ("I006", "Document", Severity::Low, true, false,
        "Manifest document loaded", "Continue to JSON decoding"),
    ("I040", "Syntax", Severity::Low, true, false,
        "Syntax analysis completed", "Continue to semantic analysis"),
    ("I070", "Semantic", Severity::Low, true, false,
        "Semantic analysis completed", "Inspect the result's error list"),
    ("I090", "Pipeline", Severity::Low, true, false,
        "Manifest parsing completed", "Inspect the result's error list"),
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        METADATA_TABLE
            .iter()
            .map(|&(code, category, severity, recoverable, halt, description, action)| {
                (
                    code,
                    ErrorMetadata::new(
                        code,
                        category,
                        severity,
                        recoverable,
                        halt,
                        description,
                        action,
                    ),
                )
            })
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from error code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for a code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for a code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category for a code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

/// Check that every code in `codes` has registered metadata
pub fn validate_codes(codes: &[Code]) -> Result<(), String> {
    for code in codes {
        if get_error_metadata(code.as_str()).is_none() {
            return Err(format!("Missing metadata for code: {}", code));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique_in_table() {
        let registry = get_error_registry();
        assert_eq!(registry.len(), METADATA_TABLE.len());
    }

    #[test]
    fn test_semantic_codes_have_metadata() {
        let all = [
            semantic::LINK_HREF_WRONG_FORMAT,
            semantic::LINK_MISSING_REL_PROPERTY,
            semantic::MISSING_SELF_LINK,
            semantic::SELF_LINK_WRONG_HREF_FORMAT,
            semantic::MISSING_REQUIRED_SUBCOLLECTION,
            semantic::COLLECTION_WRONG_FORMAT,
            semantic::MISSING_TYPE_PROPERTY,
            semantic::MISSING_REQUIRED_FEED_SUBCOLLECTIONS,
            semantic::MISSING_ACQUISITION_LINK,
            semantic::MISSING_NAVIGATION_LINK_TITLE,
            semantic::WRONG_GROUP_STRUCTURE,
            semantic::ODL_FEED_MISSING_PUBLICATIONS,
            semantic::ODL_FEED_REDUNDANT_GROUPS,
            semantic::ODL_FEED_REDUNDANT_FACETS,
            semantic::ODL_FEED_REDUNDANT_NAVIGATION,
            semantic::ODL_PUBLICATION_LICENSES_OR_OA_LINK,
            semantic::ODL_LICENSE_SELF_LINK,
            semantic::ODL_LICENSE_CHECKOUT_LINK,
            semantic::ERROR_LIMIT_REACHED,
        ];
        assert!(validate_codes(&all).is_ok());
    }

    #[test]
    fn test_classification_lookups() {
        assert_eq!(get_category("E040"), "Syntax");
        assert!(is_recoverable("E041"));
        assert!(!requires_halt("E182"));
        assert!(requires_halt("E230"));
        assert_eq!(get_severity("ERR001"), Severity::Critical);
    }

    #[test]
    fn test_unknown_code_fallbacks() {
        assert_eq!(get_description("Z999"), "Unknown error");
        assert_eq!(get_category("Z999"), "Unknown");
        assert_eq!(get_action("Z999"), "No specific action available");
        assert!(validate_codes(&[Code::new("Z999")]).is_err());
    }
}
