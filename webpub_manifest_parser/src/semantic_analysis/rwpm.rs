use super::SemanticAnalyzer;
use crate::ast::RwpmManifest;
use crate::log_debug;

impl SemanticAnalyzer {
    /// RWPM rules live in its role table: `readingOrder` is required and,
    /// like `resources`, needs a media type on every link
    pub(super) fn visit_rwpm_manifest(&mut self, manifest: &RwpmManifest) {
        log_debug!("Visiting RWPM manifest", "title" => manifest.metadata.label());
        self.visit_manifest(manifest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Collection, Link, LinkList, NodeRef, PresentationMetadata};
    use crate::logging::codes;
    use crate::registry::{rwpm, ManifestFormat};
    use crate::semantic_analysis::{Rule, SemanticError};

    fn analyze(manifest: &RwpmManifest) -> Vec<SemanticError> {
        let _ = crate::logging::init_global_logging();
        SemanticAnalyzer::new(ManifestFormat::Rwpm).analyze(NodeRef::from(manifest))
    }

    fn manifest_with(sub_collections: Vec<Collection>) -> RwpmManifest {
        RwpmManifest {
            metadata: PresentationMetadata::titled("Moby-Dick"),
            links: LinkList::new(vec![
                Link::new("https://example.com/manifest.json").with_rel("self")
            ]),
            sub_collections: sub_collections.into(),
            ..RwpmManifest::default()
        }
    }

    #[test]
    fn test_missing_reading_order() {
        let errors = analyze(&manifest_with(vec![]));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error_code(), codes::semantic::MISSING_REQUIRED_SUBCOLLECTION);
        assert_eq!(
            errors[0].to_string(),
            "Manifest 'Moby-Dick' does not contain a required 'readingOrder' subcollection"
        );
    }

    #[test]
    fn test_reading_order_and_resources_need_types() {
        let manifest = manifest_with(vec![
            Collection::with_links(
                rwpm::READING_ORDER,
                LinkList::new(vec![
                    Link::new("c1.html").with_type("text/html"),
                    Link::new("c2.html"),
                ]),
            ),
            Collection::with_links(
                rwpm::RESOURCES,
                LinkList::new(vec![Link::new("cover.jpg")]),
            ),
            Collection::with_links(rwpm::TOC, LinkList::new(vec![Link::new("c1.html")])),
        ]);

        let errors = analyze(&manifest);
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "readingOrder subcollection's link 'c2.html' does not have a required 'type' property",
                "resources subcollection's link 'cover.jpg' does not have a required 'type' property",
            ]
        );
        assert!(errors
            .iter()
            .all(|e| e.rule() == Some(Rule::MissingTypeProperty)));
    }
}
