//! Semantic analysis: cross-field and cross-node rules over a typed AST
//!
//! Dispatch is a single `match` over [`NodeRef`]. Format-specific handlers run
//! the base rules first and then add their own, so an OPDS 2.0 publication
//! gets every link check plus the acquisition rule. Each violation is recorded
//! in the shared [`AnalysisContext`] and visiting continues with the next node.

mod base;
mod context;
mod error;
mod odl;
mod opds2;
mod rwpm;

pub use context::AnalysisContext;
pub use error::{Rule, RuleResult, SemanticError};

use crate::ast::NodeRef;
use crate::config::runtime::SemanticPreferences;
use crate::logging::codes;
use crate::registry::{FormatRegistries, ManifestFormat};
use crate::{log_debug, log_info, log_success};
use std::time::Instant;

pub struct SemanticAnalyzer {
    registries: FormatRegistries,
    preferences: SemanticPreferences,
    context: AnalysisContext,
}

impl SemanticAnalyzer {
    pub fn new(format: ManifestFormat) -> Self {
        Self::with_preferences(
            FormatRegistries::for_format(format).clone(),
            SemanticPreferences::default(),
        )
    }

    pub fn with_preferences(
        registries: FormatRegistries,
        preferences: SemanticPreferences,
    ) -> Self {
        let context = AnalysisContext::new(preferences.log_rule_violations);
        Self {
            registries,
            preferences,
            context,
        }
    }

    pub fn format(&self) -> ManifestFormat {
        self.registries.format
    }

    /// Check every rule reachable from `root`; errors come back in discovery order
    pub fn analyze(&mut self, root: NodeRef<'_>) -> Vec<SemanticError> {
        let start = Instant::now();
        self.context.reset();

        log_info!("Starting semantic analysis",
            "format" => self.format(),
            "root" => root.kind().name()
        );

        self.visit(root);
        let errors = self.context.take_errors();

        log_success!(
            codes::success::SEMANTIC_ANALYSIS_COMPLETE,
            "Semantic analysis completed",
            "errors" => errors.len(),
            "duration_ms" => format!("{:.2}", start.elapsed().as_secs_f64() * 1000.0)
        );

        errors
    }

    pub(crate) fn visit(&mut self, node: NodeRef<'_>) {
        match node {
            NodeRef::RwpmManifest(manifest) => self.visit_rwpm_manifest(manifest),
            NodeRef::Opds2Feed(feed) => self.visit_opds2_feed(feed),
            NodeRef::Opds2Publication(publication) => self.visit_opds2_publication(publication),
            NodeRef::Opds2Navigation(navigation) => self.visit_opds2_navigation(navigation),
            NodeRef::Opds2Group(group) => self.visit_opds2_group(group),
            NodeRef::OdlFeed(feed) => self.visit_odl_feed(feed),
            NodeRef::OdlPublication(publication) => self.visit_odl_publication(publication),
            NodeRef::OdlLicense(license) => self.visit_odl_license(license),
            NodeRef::Collection(collection) => self.visit_collection(collection),
            NodeRef::Link(link) => self.visit_link(link),
            other => self.visit_children(other),
        }
    }

    fn visit_children(&mut self, node: NodeRef<'_>) {
        log_debug!("Visiting node", "kind" => node.kind().name());
        for child in node.children() {
            self.visit(child);
        }
    }
}

/// Analyze `root` with default registries and preferences for `format`
pub fn analyze(format: ManifestFormat, root: NodeRef<'_>) -> Vec<SemanticError> {
    SemanticAnalyzer::new(format).analyze(root)
}
