//! Syntax analysis: raw JSON value tree to typed AST
//!
//! Each node type's descriptor table drives the mapping; nested nodes recurse
//! through the value parsers back into the analyzer. Field-level failures are
//! collected, never raised.

mod analyzer;
mod error;

pub use analyzer::SyntaxAnalyzer;
pub use error::SyntaxError;

use crate::parsers::ValueParsingError;
use crate::properties::AstNode;
use crate::registry::ManifestFormat;
use serde_json::Value;

/// Analyze `raw` as a `T` with default registries and preferences
pub fn analyze<T: AstNode>(
    format: ManifestFormat,
    raw: &Value,
) -> Result<(T, Vec<SyntaxError>), ValueParsingError> {
    SyntaxAnalyzer::new(format).analyze::<T>(raw)
}
