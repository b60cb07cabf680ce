// Internal modules
pub mod ast;
pub mod config;
pub mod document;
#[macro_use]
pub mod logging;
pub mod node_finder;
pub mod parsers;
pub mod pipeline;
pub mod properties;
pub mod registry;
pub mod semantic_analysis;
pub mod syntax;
pub mod utils;

// Re-export key types for library consumers
pub use ast::{Manifestlike, Node, NodeKind, NodeRef, OdlFeed, Opds2Feed, RwpmManifest};
pub use document::DocumentError;
pub use node_finder::find_parent_or_self;
pub use pipeline::{
    AnalyzerError, ManifestParser, ManifestParserFactory, ManifestParserResult, OdlFeedParserFactory,
    Opds2FeedParserFactory, PipelineError, RwpmManifestParserFactory,
};
pub use registry::ManifestFormat;
pub use semantic_analysis::SemanticError;
pub use syntax::SyntaxError;
