//! The parse entry points: raw input to a typed, validated tree

use super::error::json_type_name;
use super::{AnalyzerError, ManifestParserResult, PipelineError};
use crate::ast::Manifestlike;
use crate::config::RuntimeConfig;
use crate::document::DocumentLoader;
use crate::logging::{self, codes};
use crate::properties::AstNode;
use crate::registry::{CollectionRole, FormatRegistries, ManifestFormat};
use crate::semantic_analysis::SemanticAnalyzer;
use crate::syntax::SyntaxAnalyzer;
use crate::{log_error, log_info, log_success};
use serde_json::Value;
use std::io::Read;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

static NEXT_DOCUMENT_ID: AtomicUsize = AtomicUsize::new(0);

/// Parses documents whose root node is `T`, with the registries of `T::FORMAT`
///
/// Each call runs syntax analysis and then semantic analysis on the
/// resulting tree. Document problems end up in
/// [`ManifestParserResult::errors`]; only input that cannot be turned into a
/// JSON object is reported as a [`PipelineError`].
#[derive(Debug, Clone)]
pub struct ManifestParser<T> {
    registries: FormatRegistries,
    config: RuntimeConfig,
    _root: PhantomData<fn() -> T>,
}

impl<T: AstNode + Manifestlike> Default for ManifestParser<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: AstNode + Manifestlike> ManifestParser<T> {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    /// The first configuration in the process also installs its logging preferences
    pub fn with_config(config: RuntimeConfig) -> Self {
        if !logging::is_initialized() {
            let _ = logging::init_global_logging_with_config(&config.logging);
        }
        Self {
            registries: FormatRegistries::for_format(T::FORMAT).clone(),
            config,
            _root: PhantomData,
        }
    }

    /// Register additional collection roles; redefining a known role is a contract violation
    pub fn with_roles(
        mut self,
        roles: impl IntoIterator<Item = CollectionRole>,
    ) -> Result<Self, PipelineError> {
        self.registries = self.registries.with_roles(roles)?;
        Ok(self)
    }

    pub fn format(&self) -> ManifestFormat {
        self.registries.format
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn parse_str(&self, text: &str) -> Result<ManifestParserResult<T>, PipelineError> {
        self.in_document("<string>", || self.parse_text(text))
    }

    pub fn parse_value(&self, value: &Value) -> Result<ManifestParserResult<T>, PipelineError> {
        self.in_document("<value>", || self.analyze(value))
    }

    /// Decode `bytes` (UTF-8 first, then `encoding`) and parse them
    pub fn parse_bytes(
        &self,
        bytes: &[u8],
        encoding: Option<&str>,
    ) -> Result<ManifestParserResult<T>, PipelineError> {
        self.in_document("<bytes>", || {
            let document = self.loader().load_bytes(bytes, "<bytes>", encoding)?;
            self.parse_text(&document.text)
        })
    }

    pub fn parse_reader<R: Read>(
        &self,
        reader: R,
        encoding: Option<&str>,
    ) -> Result<ManifestParserResult<T>, PipelineError> {
        self.in_document("<reader>", || {
            let document = self.loader().load_reader(reader, "<reader>", encoding)?;
            self.parse_text(&document.text)
        })
    }

    pub fn parse_file(
        &self,
        file_path: &str,
        encoding: Option<&str>,
    ) -> Result<ManifestParserResult<T>, PipelineError> {
        self.in_document(file_path, || {
            let document = self.loader().load_file(file_path, encoding)?;
            self.parse_text(&document.text)
        })
    }

    fn loader(&self) -> DocumentLoader {
        DocumentLoader::from_preferences(&self.config.document)
    }

    fn in_document<R>(&self, source: &str, f: impl FnOnce() -> R) -> R {
        let id = NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed);
        logging::with_document_context(source, id, f)
    }

    fn parse_text(&self, text: &str) -> Result<ManifestParserResult<T>, PipelineError> {
        let value: Value = serde_json::from_str(text.trim()).map_err(|e| {
            let error = PipelineError::from(e);
            log_error!(error.error_code(), "Malformed JSON document", "error" => &error);
            error
        })?;
        self.analyze(&value)
    }

    fn analyze(&self, value: &Value) -> Result<ManifestParserResult<T>, PipelineError> {
        let start = Instant::now();

        if !value.is_object() {
            let error = PipelineError::NotAnObject {
                found: json_type_name(value),
            };
            log_error!(error.error_code(), "Document root is not an object",
                "found" => json_type_name(value)
            );
            return Err(error);
        }

        log_info!("Starting manifest parsing",
            "format" => self.format(),
            "root" => T::KIND.name()
        );

        let mut syntax =
            SyntaxAnalyzer::with_preferences(self.registries.clone(), self.config.syntax.clone());
        let (root, syntax_errors) = syntax.analyze::<T>(value).map_err(|_| {
            PipelineError::NotAnObject {
                found: json_type_name(value),
            }
        })?;

        let mut semantic = SemanticAnalyzer::with_preferences(
            self.registries.clone(),
            self.config.semantic.clone(),
        );
        let semantic_errors = semantic.analyze(root.as_node_ref());

        let mut errors: Vec<AnalyzerError> = Vec::with_capacity(syntax_errors.len() + semantic_errors.len());
        errors.extend(syntax_errors.into_iter().map(AnalyzerError::from));
        errors.extend(semantic_errors.into_iter().map(AnalyzerError::from));

        let result = ManifestParserResult {
            root,
            errors,
            processing_duration: start.elapsed(),
        };

        log_success!(
            codes::success::MANIFEST_PARSING_COMPLETE,
            "Manifest parsing completed",
            "format" => self.format(),
            "valid" => result.is_valid(),
            "syntax_errors" => result.syntax_errors().count(),
            "semantic_errors" => result.semantic_errors().count(),
            "duration_ms" => format!("{:.2}", result.processing_duration.as_secs_f64() * 1000.0)
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{NodeKind, OdlFeed, Opds2Feed, RwpmManifest};
    use crate::document::DocumentError;
    use crate::registry::rwpm;
    use crate::semantic_analysis::Rule;
    use crate::syntax::SyntaxError;
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::io::Write;

    fn rwpm_parser() -> ManifestParser<RwpmManifest> {
        let _ = crate::logging::init_global_logging();
        ManifestParser::new()
    }

    const MINIMAL_RWPM: &str = r#"{"metadata":{"title":"T"},"links":[{"rel":"self","href":"http://example.com/m.json","type":"application/webpub+json"}],"readingOrder":[{"href":"http://example.com/c1.html","type":"text/html"}]}"#;

    #[test]
    fn test_minimal_rwpm_manifest() {
        let result = rwpm_parser().parse_str(MINIMAL_RWPM).expect("parse");

        assert!(result.is_valid(), "{:?}", result.errors);
        assert_eq!(result.root.metadata.title.to_string(), "T");
        let reading_order = result.root.reading_order().expect("reading order");
        assert_eq!(reading_order.links.len(), 1);
    }

    #[test]
    fn test_numeric_bound_violation() {
        let mut value: Value = serde_json::from_str(MINIMAL_RWPM).expect("json");
        value["readingOrder"][0]["height"] = json!(-10);

        let result = rwpm_parser().parse_value(&value).expect("parse");
        assert_eq!(result.errors.len(), 1);
        let error = result.syntax_errors().next().expect("syntax error");
        assert_eq!(error.message(), "Value -10 is less or equal than the exclusive minimum (0)");

        let link = &result.root.reading_order().expect("reading order").links[0];
        assert_eq!(link.height, None);
        assert_eq!(link.href, "http://example.com/c1.html");
    }

    #[test]
    fn test_missing_self_link_reported_once() {
        let value = json!({
            "metadata": {"title": "T"},
            "links": [{"rel": "alternate", "href": "m.json"}],
            "readingOrder": [{"href": "c1.html", "type": "text/html"}]
        });

        let result = rwpm_parser().parse_value(&value).expect("parse");
        let rules: Vec<_> = result.semantic_errors().filter_map(|e| e.rule()).collect();
        assert_eq!(rules, vec![Rule::MissingSelfLink]);
    }

    #[test]
    fn test_syntax_errors_precede_semantic_errors() {
        let value = json!({
            "metadata": {"title": "T", "modified": "yesterday"},
            "links": [{"rel": "self", "href": "http://example.com/m.json"}]
        });

        let result = rwpm_parser().parse_value(&value).expect("parse");
        assert_matches!(result.errors.as_slice(), [
            AnalyzerError::Syntax(SyntaxError::ValueParsing { property: "modified", .. }),
            AnalyzerError::Semantic(_),
        ]);
        assert_eq!(result.root.metadata.title.to_string(), "T");
    }

    #[test]
    fn test_opds2_feed_without_sub_collections() {
        let _ = crate::logging::init_global_logging();
        let value = json!({
            "metadata": {"title": "Catalog"},
            "links": [{"rel": "self", "href": "http://example.com/feed.json", "type": "application/opds+json"}]
        });

        let result = ManifestParser::<Opds2Feed>::new()
            .parse_value(&value)
            .expect("parse");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].error_code(),
            codes::semantic::MISSING_REQUIRED_FEED_SUBCOLLECTIONS
        );
    }

    #[test]
    fn test_odl_publication_without_licenses() {
        let _ = crate::logging::init_global_logging();
        let value = json!({
            "metadata": {"title": "Lending"},
            "links": [{"rel": "self", "href": "http://example.com/feed.json"}],
            "publications": [{
                "metadata": {"title": "Book"},
                "links": [{"rel": "self", "href": "http://example.com/book.json"}],
                "images": [{"href": "http://example.com/cover.jpg"}],
                "licenses": []
            }]
        });

        let result = ManifestParser::<OdlFeed>::new()
            .parse_value(&value)
            .expect("parse");
        assert_eq!(result.errors.len(), 1, "{:?}", result.errors);
        assert_eq!(
            result.errors[0].error_code(),
            codes::semantic::ODL_PUBLICATION_LICENSES_OR_OA_LINK
        );
        assert_matches!(
            &result.errors[0],
            AnalyzerError::Semantic(error) if error.node() == Some(NodeKind::OdlPublication)
        );
    }

    #[test]
    fn test_non_object_roots() {
        let parser = rwpm_parser();
        assert_matches!(
            parser.parse_str("[1, 2]"),
            Err(PipelineError::NotAnObject { found: "array" })
        );
        assert_matches!(parser.parse_value(&json!("x")), Err(PipelineError::NotAnObject { .. }));
        assert_matches!(parser.parse_str("{\"metadata\": "), Err(PipelineError::Json { .. }));
    }

    #[test]
    fn test_parse_file_and_reader() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(MINIMAL_RWPM.as_bytes()).expect("write");
        let path = file.path().to_string_lossy().to_string();

        let parser = rwpm_parser();
        assert!(parser.parse_file(&path, None).expect("parse").is_valid());
        assert!(parser
            .parse_reader(MINIMAL_RWPM.as_bytes(), Some("utf-8"))
            .expect("parse")
            .is_valid());
        assert_matches!(
            parser.parse_file("/no/such/manifest.json", None),
            Err(PipelineError::Document(DocumentError::NotFound { .. }))
        );
    }

    #[test]
    fn test_parse_bytes_with_bom() {
        let mut bytes = b"\xEF\xBB\xBF".to_vec();
        bytes.extend_from_slice(MINIMAL_RWPM.as_bytes());

        assert!(rwpm_parser().parse_bytes(&bytes, None).expect("parse").is_valid());
    }

    #[test]
    fn test_redefining_a_role_is_a_contract_violation() {
        let result = rwpm_parser().with_roles([rwpm::TOC]);
        assert_matches!(result, Err(PipelineError::Contract(_)));

        let parser = rwpm_parser()
            .with_roles([CollectionRole::new("extras").compact()])
            .expect("new role");
        let mut value: Value = serde_json::from_str(MINIMAL_RWPM).expect("json");
        value["extras"] = json!([{"href": "http://example.com/x"}]);

        let result = parser.parse_value(&value).expect("parse");
        assert!(result.is_valid(), "{:?}", result.errors);
        assert!(result.root.sub_collections.get_by_role("extras").is_some());
    }

    #[test]
    fn test_root_type_selects_the_format() {
        assert_eq!(ManifestParser::<RwpmManifest>::new().format(), ManifestFormat::Rwpm);
        assert_eq!(ManifestParser::<Opds2Feed>::new().format(), ManifestFormat::Opds2);
        assert_eq!(ManifestParser::<OdlFeed>::new().format(), ManifestFormat::Odl);

        // An ODL feed never picks up the RWPM readingOrder requirement
        let value = json!({
            "metadata": {"title": "Lending"},
            "links": [{"rel": "self", "href": "http://example.com/feed.json"}],
            "publications": []
        });
        let result = ManifestParser::<OdlFeed>::new().parse_value(&value).expect("parse");
        assert!(result
            .errors
            .iter()
            .all(|e| e.error_code() != codes::semantic::MISSING_REQUIRED_SUBCOLLECTION));
    }

    #[test]
    fn test_configured_parser_installs_logging() {
        let config = RuntimeConfig::default();
        let parser = ManifestParser::<RwpmManifest>::with_config(config);
        assert!(logging::is_initialized());
        assert!(parser.parse_str(MINIMAL_RWPM).expect("parse").is_valid());
    }
}
