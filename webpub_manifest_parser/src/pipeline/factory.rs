use super::ManifestParser;
use crate::ast::{Manifestlike, OdlFeed, Opds2Feed, RwpmManifest};
use crate::config::RuntimeConfig;
use crate::properties::AstNode;
use crate::registry::ManifestFormat;

/// Builds a parser preconfigured for one document format
pub trait ManifestParserFactory {
    type Root: AstNode + Manifestlike;

    const FORMAT: ManifestFormat = <Self::Root as Manifestlike>::FORMAT;

    fn create(&self) -> ManifestParser<Self::Root> {
        ManifestParser::new()
    }

    fn create_with_config(&self, config: RuntimeConfig) -> ManifestParser<Self::Root> {
        ManifestParser::with_config(config)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RwpmManifestParserFactory;

impl ManifestParserFactory for RwpmManifestParserFactory {
    type Root = RwpmManifest;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Opds2FeedParserFactory;

impl ManifestParserFactory for Opds2FeedParserFactory {
    type Root = Opds2Feed;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OdlFeedParserFactory;

impl ManifestParserFactory for OdlFeedParserFactory {
    type Root = OdlFeed;
}
