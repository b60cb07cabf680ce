use crate::logging::codes::{Code, Severity};
use crate::semantic_analysis::SemanticError;
use crate::syntax::SyntaxError;
use std::collections::BTreeMap;
use std::time::Duration;

/// One recoverable problem found in a document, from either analysis stage
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalyzerError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

impl AnalyzerError {
    pub fn error_code(&self) -> Code {
        match self {
            AnalyzerError::Syntax(error) => error.error_code(),
            AnalyzerError::Semantic(error) => error.error_code(),
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            AnalyzerError::Syntax(error) => error.error_type(),
            AnalyzerError::Semantic(error) => error.error_type(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            AnalyzerError::Syntax(error) => error.severity(),
            AnalyzerError::Semantic(error) => error.severity(),
        }
    }
}

/// Best-effort tree plus every error found, syntax errors first
#[derive(Debug, Clone)]
pub struct ManifestParserResult<T> {
    pub root: T,
    pub errors: Vec<AnalyzerError>,
    pub processing_duration: Duration,
}

impl<T> ManifestParserResult<T> {
    /// The only success signal: no errors in either stage
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn syntax_errors(&self) -> impl Iterator<Item = &SyntaxError> {
        self.errors.iter().filter_map(|error| match error {
            AnalyzerError::Syntax(error) => Some(error),
            AnalyzerError::Semantic(_) => None,
        })
    }

    pub fn semantic_errors(&self) -> impl Iterator<Item = &SemanticError> {
        self.errors.iter().filter_map(|error| match error {
            AnalyzerError::Semantic(error) => Some(error),
            AnalyzerError::Syntax(_) => None,
        })
    }

    pub fn error_count_by_code(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for error in &self.errors {
            *counts.entry(error.error_code().as_str()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use crate::logging::codes;
    use crate::semantic_analysis::Rule;
    use crate::utils::Location;

    #[test]
    fn test_partitions_and_counts() {
        let result = ManifestParserResult {
            root: (),
            errors: vec![
                SyntaxError::missing_property(NodeKind::Link, "href", "href", Location::root())
                    .into(),
                SemanticError::violation(Rule::MissingSelfLink, NodeKind::RwpmManifest, None, "a")
                    .into(),
                SemanticError::violation(Rule::MissingSelfLink, NodeKind::RwpmManifest, None, "b")
                    .into(),
            ],
            processing_duration: Duration::ZERO,
        };

        assert!(!result.is_valid());
        assert_eq!(result.syntax_errors().count(), 1);
        assert_eq!(result.semantic_errors().count(), 2);

        let counts = result.error_count_by_code();
        assert_eq!(counts[codes::syntax::MISSING_PROPERTY.as_str()], 1);
        assert_eq!(counts[codes::semantic::MISSING_SELF_LINK.as_str()], 2);
    }
}
