//! Error accumulation for one semantic pass

use super::error::{RuleResult, SemanticError};
use crate::config::compile_time::semantic::MAX_SEMANTIC_ERRORS;
use crate::{log_debug, log_error};

/// Ordered error list shared by every rule of one pass
#[derive(Debug, Clone, Default)]
pub struct AnalysisContext {
    errors: Vec<SemanticError>,
    log_violations: bool,
}

impl AnalysisContext {
    pub fn new(log_violations: bool) -> Self {
        Self {
            errors: Vec::new(),
            log_violations,
        }
    }

    pub fn reset(&mut self) {
        self.errors.clear();
    }

    /// Record the violation a rule returned, if any; never stops the caller
    pub fn check(&mut self, result: RuleResult) {
        if let Err(error) = result {
            self.record(error);
        }
    }

    pub fn record(&mut self, error: SemanticError) {
        if self.errors.len() > MAX_SEMANTIC_ERRORS {
            return;
        }
        if self.errors.len() == MAX_SEMANTIC_ERRORS {
            let limit = SemanticError::ErrorLimitReached {
                limit: MAX_SEMANTIC_ERRORS,
            };
            log_error!(limit.error_code(), &limit.to_string());
            self.errors.push(limit);
            return;
        }

        if self.log_violations {
            log_debug!("Recorded rule violation",
                "code" => error.error_code(),
                "rule" => error.error_type(),
                "message" => &error
            );
        }
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[SemanticError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<SemanticError> {
        std::mem::take(&mut self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use crate::semantic_analysis::error::Rule;

    fn violation() -> SemanticError {
        SemanticError::violation(Rule::MissingAcquisitionLink, NodeKind::Opds2Publication, None, "x")
    }

    #[test]
    fn test_check_keeps_going() {
        let mut context = AnalysisContext::new(false);
        context.check(Ok(()));
        context.check(Err(violation()));
        context.check(Err(violation()));
        assert_eq!(context.errors().len(), 2);

        assert_eq!(context.take_errors().len(), 2);
        assert!(context.errors().is_empty());
    }

    #[test]
    fn test_error_cap() {
        let _ = crate::logging::init_global_logging();
        let mut context = AnalysisContext::new(false);
        for _ in 0..(MAX_SEMANTIC_ERRORS + 10) {
            context.record(violation());
        }
        assert_eq!(context.errors().len(), MAX_SEMANTIC_ERRORS + 1);
        assert!(matches!(
            context.errors().last(),
            Some(SemanticError::ErrorLimitReached { .. })
        ));
    }
}
