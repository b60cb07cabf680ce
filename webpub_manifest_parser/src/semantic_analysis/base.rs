//! Format-agnostic rules: links, self link, collection roles

use super::error::{Rule, RuleResult, SemanticError};
use super::SemanticAnalyzer;
use crate::ast::{Collection, Link, LinkList, Manifestlike, NodeKind, NodeRef};
use crate::parsers::format::is_uri_reference;
use crate::registry::{rwpm, CollectionRole};
use url::Url;

/// Non-templated hrefs must be URI references
pub(super) fn link_href(link: &Link) -> RuleResult {
    if link.is_templated() || is_uri_reference(&link.href) {
        return Ok(());
    }
    Err(SemanticError::violation(
        Rule::LinkHrefWrongFormat,
        NodeKind::Link,
        Some("href"),
        format!("Link's href '{}' is not a valid URI reference", link.href),
    ))
}

pub(super) fn link_rel(link: &Link) -> RuleResult {
    if !link.rels.is_empty() {
        return Ok(());
    }
    Err(SemanticError::violation(
        Rule::LinkMissingRelProperty,
        NodeKind::Link,
        Some("rels"),
        format!("Manifest link '{}' does not have a required 'rel' property", link.href),
    ))
}

/// The first `self` link must exist and point at an absolute URI
pub(super) fn self_link<M: Manifestlike>(manifest: &M) -> RuleResult {
    let Some(link) = manifest.links().first_by_rel(rwpm::SELF.key) else {
        return Err(SemanticError::violation(
            Rule::MissingSelfLink,
            manifest.as_node_ref().kind(),
            None,
            format!(
                "Manifest '{}' does not have a required 'self' link",
                manifest.label()
            ),
        ));
    };

    if Url::parse(&link.href).is_ok() {
        return Ok(());
    }
    Err(SemanticError::violation(
        Rule::SelfLinkWrongHrefFormat,
        NodeKind::Link,
        Some("href"),
        format!(
            "Manifest 'self' link's href {} is incorrect: it must be an absolute URI to the canonical location of the manifest",
            link.href
        ),
    ))
}

pub(super) fn required_role<M: Manifestlike>(manifest: &M, role: &CollectionRole) -> RuleResult {
    if manifest.sub_collections().get_by_role(role.key).is_some() {
        return Ok(());
    }
    Err(SemanticError::violation(
        Rule::MissingRequiredSubcollection,
        manifest.as_node_ref().kind(),
        Some(role.key),
        format!(
            "Manifest '{}' does not contain a required '{}' subcollection",
            manifest.label(),
            role.key
        ),
    ))
}

/// Collections under a compact role carry links only
pub(super) fn collection_format(collection: &Collection) -> RuleResult {
    match collection.role {
        Some(role) if role.compact && !collection.is_compact() => {
            Err(SemanticError::violation(
                Rule::CollectionWrongFormat,
                NodeKind::Collection,
                None,
                format!("Collection {} must be compact but it is not", role.key),
            ))
        }
        _ => Ok(()),
    }
}

pub(super) fn link_type(role: &CollectionRole, link: &Link) -> RuleResult {
    if link.media_type.is_some() {
        return Ok(());
    }
    Err(SemanticError::violation(
        Rule::MissingTypeProperty,
        NodeKind::Link,
        Some("media_type"),
        format!(
            "{} subcollection's link '{}' does not have a required 'type' property",
            role.key, link.href
        ),
    ))
}

impl SemanticAnalyzer {
    /// Rules shared by every document root, in evaluation order
    pub(super) fn visit_manifest<M: Manifestlike>(&mut self, manifest: &M) {
        self.visit(manifest.metadata_node());
        self.visit_links(manifest.links());

        for link in manifest.links() {
            self.context.check(link_rel(link));
        }
        self.context.check(self_link(manifest));

        for collection in manifest.sub_collections() {
            self.visit_collection(collection);
        }

        let required: Vec<CollectionRole> =
            self.registries.required_roles().copied().collect();
        for role in &required {
            self.context.check(required_role(manifest, role));
        }
    }

    pub(super) fn visit_links(&mut self, links: &LinkList) {
        for link in links {
            self.visit_link(link);
        }
    }

    pub(super) fn visit_link(&mut self, link: &Link) {
        if self.preferences.check_link_hrefs {
            self.context.check(link_href(link));
        }
        for child in NodeRef::from(link).children() {
            self.visit(child);
        }
    }

    pub(super) fn visit_collection(&mut self, collection: &Collection) {
        self.context.check(collection_format(collection));

        if let Some(role) = collection.role.filter(|role| role.type_required) {
            for link in &collection.links {
                self.context.check(link_type(&role, link));
            }
        }

        for child in NodeRef::from(collection).children() {
            self.visit(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{LinkList, PresentationMetadata, RwpmManifest};
    use crate::logging::codes;
    use crate::registry::ManifestFormat;

    fn manifest() -> RwpmManifest {
        RwpmManifest {
            metadata: PresentationMetadata::titled("T"),
            links: LinkList::new(vec![Link::new("http://example.com/m.json").with_rel("self")]),
            sub_collections: vec![Collection::with_links(
                rwpm::READING_ORDER,
                LinkList::new(vec![Link::new("c1.html").with_type("text/html")]),
            )]
            .into(),
            ..RwpmManifest::default()
        }
    }

    fn analyze(manifest: &RwpmManifest) -> Vec<SemanticError> {
        let _ = crate::logging::init_global_logging();
        SemanticAnalyzer::new(ManifestFormat::Rwpm).analyze(NodeRef::from(manifest))
    }

    #[test]
    fn test_valid_manifest() {
        assert!(analyze(&manifest()).is_empty());
    }

    #[test]
    fn test_missing_self_link_is_reported_once() {
        let mut manifest = manifest();
        manifest.links = LinkList::new(vec![Link::new("http://example.com/alt").with_rel("alternate")]);

        let errors = analyze(&manifest);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error_code(), codes::semantic::MISSING_SELF_LINK);
        assert_eq!(errors[0].to_string(), "Manifest 'T' does not have a required 'self' link");
    }

    #[test]
    fn test_relative_self_link() {
        let mut manifest = manifest();
        manifest.links = LinkList::new(vec![Link::new("m.json").with_rel("self")]);

        let errors = analyze(&manifest);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "Manifest 'self' link's href m.json is incorrect: it must be an absolute URI to the canonical location of the manifest"
        );
    }

    #[test]
    fn test_links_without_rel() {
        let mut manifest = manifest();
        manifest.links.push(Link::new("http://example.com/a"));
        manifest.links.push(Link::new("http://example.com/b"));

        let errors = analyze(&manifest);
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "Manifest link 'http://example.com/a' does not have a required 'rel' property",
                "Manifest link 'http://example.com/b' does not have a required 'rel' property",
            ]
        );
    }

    #[test]
    fn test_compact_role_with_metadata() {
        let mut manifest = manifest();
        let mut toc = Collection::with_links(rwpm::TOC, LinkList::default());
        toc.metadata = Some(PresentationMetadata::titled("Contents"));
        manifest.sub_collections.push(toc);

        let errors = analyze(&manifest);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule(), Some(Rule::CollectionWrongFormat));
        assert_eq!(errors[0].to_string(), "Collection toc must be compact but it is not");
    }

    #[test]
    fn test_href_checks_reach_nested_links() {
        let mut manifest = manifest();
        let mut alternate = Link::new("http://example.com/x y");
        alternate.templated = Some(false);
        manifest.links[0].alternates.push(alternate);

        let mut templated = Link::new("http://example.com/{?q} z");
        templated.templated = Some(true);
        manifest.links[0].alternates.push(templated);

        let errors = analyze(&manifest);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "Link's href 'http://example.com/x y' is not a valid URI reference"
        );
    }

    #[test]
    fn test_rule_functions_in_isolation() {
        assert!(link_rel(&Link::new("a").with_rel("cover")).is_ok());
        assert!(link_type(&rwpm::RESOURCES, &Link::new("a").with_type("image/png")).is_ok());

        let error = link_type(&rwpm::RESOURCES, &Link::new("cover.jpg")).unwrap_err();
        assert_eq!(
            error.to_string(),
            "resources subcollection's link 'cover.jpg' does not have a required 'type' property"
        );
        assert_eq!(error.property(), Some("media_type"));
    }
}
