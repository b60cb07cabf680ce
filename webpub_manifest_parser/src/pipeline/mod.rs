//! Parser facade: document loading, syntax analysis and semantic analysis in one call

mod error;
mod factory;
mod parser;
mod result;

pub use error::PipelineError;
pub use factory::{
    ManifestParserFactory, OdlFeedParserFactory, Opds2FeedParserFactory, RwpmManifestParserFactory,
};
pub use parser::ManifestParser;
pub use result::{AnalyzerError, ManifestParserResult};
