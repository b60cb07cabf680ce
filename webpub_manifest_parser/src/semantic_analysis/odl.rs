use super::error::{Rule, RuleResult, SemanticError};
use super::SemanticAnalyzer;
use crate::ast::{Link, NodeKind, NodeRef, OdlFeed, OdlLicense, OdlPublication};
use crate::log_debug;
use crate::registry::{odl, opds2, rwpm, MediaType};

fn feed_violation(rule: Rule, property: &'static str, message: String) -> SemanticError {
    SemanticError::violation(rule, NodeKind::OdlFeed, Some(property), message)
}

pub(super) fn feed_publications(feed: &OdlFeed) -> RuleResult {
    if !feed.publications.is_empty() {
        return Ok(());
    }
    Err(feed_violation(
        Rule::OdlFeedMissingPublications,
        "publications",
        format!(
            "ODL feed '{}' does not contain required 'publications' subcollection",
            feed.metadata.label()
        ),
    ))
}

pub(super) fn feed_groups(feed: &OdlFeed) -> RuleResult {
    if feed.groups.is_empty() {
        return Ok(());
    }
    Err(feed_violation(
        Rule::OdlFeedRedundantGroups,
        "groups",
        format!(
            "ODL feed '{}' contains redundant 'groups' subcollections",
            feed.metadata.label()
        ),
    ))
}

pub(super) fn feed_facets(feed: &OdlFeed) -> RuleResult {
    if feed.facets.is_empty() {
        return Ok(());
    }
    Err(feed_violation(
        Rule::OdlFeedRedundantFacets,
        "facets",
        format!(
            "ODL feed '{}' contains redundant 'facets' subcollections",
            feed.metadata.label()
        ),
    ))
}

pub(super) fn feed_navigation(feed: &OdlFeed) -> RuleResult {
    if feed.navigation.is_none() {
        return Ok(());
    }
    Err(feed_violation(
        Rule::OdlFeedRedundantNavigation,
        "navigation",
        format!(
            "ODL feed '{}' contains redundant 'navigation' subcollection",
            feed.metadata.label()
        ),
    ))
}

pub(super) fn licenses_or_open_access(publication: &OdlPublication) -> RuleResult {
    if !publication.licenses.is_empty()
        || publication.links.first_by_rel(opds2::OPEN_ACCESS.key).is_some()
    {
        return Ok(());
    }
    Err(SemanticError::violation(
        Rule::OdlPublicationLicensesOrOaLink,
        NodeKind::OdlPublication,
        Some("licenses"),
        format!(
            "ODL publication '{}' does not contain neither 'licenses' subcollection nor an Open-Access Acquisition Link ({})",
            publication.metadata.label(),
            opds2::OPEN_ACCESS.key
        ),
    ))
}

/// Only the first link with `rel` counts
fn first_link_has_type(license: &OdlLicense, rel: &str, media_type: MediaType) -> bool {
    license
        .links
        .first_by_rel(rel)
        .and_then(|link: &Link| link.media_type.as_deref())
        == Some(media_type.key)
}

pub(super) fn license_self_link(license: &OdlLicense) -> RuleResult {
    if first_link_has_type(license, rwpm::SELF.key, odl::LICENSE_INFO_DOCUMENT) {
        return Ok(());
    }
    Err(SemanticError::violation(
        Rule::OdlLicenseSelfLink,
        NodeKind::OdlLicense,
        Some("links"),
        format!(
            "ODL license '{}' does not contain a 'self' link to the License Info Document",
            license.metadata.identifier
        ),
    ))
}

pub(super) fn license_checkout_link(license: &OdlLicense) -> RuleResult {
    if first_link_has_type(license, opds2::BORROW.key, odl::LICENSE_STATUS_DOCUMENT) {
        return Ok(());
    }
    Err(SemanticError::violation(
        Rule::OdlLicenseCheckoutLink,
        NodeKind::OdlLicense,
        Some("links"),
        format!(
            "ODL license '{}' does not contain a 'checkout' link to the License Status Document",
            license.metadata.identifier
        ),
    ))
}

impl SemanticAnalyzer {
    pub(super) fn visit_odl_feed(&mut self, feed: &OdlFeed) {
        self.visit_manifest(feed);

        self.context.check(feed_publications(feed));
        self.context.check(feed_groups(feed));
        self.context.check(feed_facets(feed));
        self.context.check(feed_navigation(feed));

        for publication in &feed.publications {
            self.visit_odl_publication(publication);
        }
    }

    pub(super) fn visit_odl_publication(&mut self, publication: &OdlPublication) {
        self.context.check(licenses_or_open_access(publication));
        self.visit_children(NodeRef::from(publication));
    }

    pub(super) fn visit_odl_license(&mut self, license: &OdlLicense) {
        log_debug!("Visiting ODL license", "identifier" => &license.metadata.identifier);
        self.visit_links(&license.links);

        self.context.check(license_self_link(license));
        self.context.check(license_checkout_link(license));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{
        CompactCollection, LicenseMetadata, LinkList, Opds2Facet, Opds2FeedMetadata, Opds2Group,
        Opds2Navigation, PresentationMetadata,
    };
    use crate::logging::codes;
    use crate::registry::ManifestFormat;

    fn license(self_type: &str, borrow_type: &str) -> OdlLicense {
        let mut checkout = Link::new("http://example.com/checkout/{?id}")
            .with_rel(opds2::BORROW.key)
            .with_type(borrow_type);
        checkout.templated = Some(true);

        OdlLicense {
            metadata: LicenseMetadata {
                identifier: "urn:uuid:1".to_string(),
                formats: vec!["application/epub+zip".to_string()],
                ..LicenseMetadata::default()
            },
            links: LinkList::new(vec![
                Link::new("http://example.com/license/1")
                    .with_rel("self")
                    .with_type(self_type),
                checkout,
            ]),
        }
    }

    fn publication(licenses: Vec<OdlLicense>) -> OdlPublication {
        OdlPublication {
            metadata: PresentationMetadata::titled("Book"),
            links: LinkList::new(vec![
                Link::new("http://example.com/book").with_rel("self")
            ]),
            images: CompactCollection {
                role: Some(opds2::IMAGES),
                links: LinkList::new(vec![Link::new("http://example.com/cover.jpg")]),
            },
            licenses,
            ..OdlPublication::default()
        }
    }

    fn feed(publications: Vec<OdlPublication>) -> OdlFeed {
        OdlFeed {
            metadata: Opds2FeedMetadata::titled("Lending"),
            links: LinkList::new(vec![
                Link::new("http://example.com/feed.json").with_rel("self")
            ]),
            publications,
            ..OdlFeed::default()
        }
    }

    fn analyze(feed: &OdlFeed) -> Vec<SemanticError> {
        let _ = crate::logging::init_global_logging();
        SemanticAnalyzer::new(ManifestFormat::Odl).analyze(NodeRef::from(feed))
    }

    fn valid_license() -> OdlLicense {
        license(odl::LICENSE_INFO_DOCUMENT.key, odl::LICENSE_STATUS_DOCUMENT.key)
    }

    #[test]
    fn test_valid_feed() {
        assert!(analyze(&feed(vec![publication(vec![valid_license()])])).is_empty());
    }

    #[test]
    fn test_publication_without_licenses() {
        let errors = analyze(&feed(vec![publication(vec![])]));

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].error_code(),
            codes::semantic::ODL_PUBLICATION_LICENSES_OR_OA_LINK
        );
        assert_eq!(
            errors[0].to_string(),
            "ODL publication 'Book' does not contain neither 'licenses' subcollection nor an Open-Access Acquisition Link (http://opds-spec.org/acquisition/open-access)"
        );
    }

    #[test]
    fn test_open_access_link_replaces_licenses() {
        let mut publication = publication(vec![]);
        publication
            .links
            .push(Link::new("http://example.com/book.epub").with_rel(opds2::OPEN_ACCESS.key));

        assert!(analyze(&feed(vec![publication])).is_empty());
    }

    #[test]
    fn test_license_link_media_types() {
        let licenses = vec![
            license("application/json", odl::LICENSE_STATUS_DOCUMENT.key),
            license(odl::LICENSE_INFO_DOCUMENT.key, "text/html"),
        ];
        let errors = analyze(&feed(vec![publication(licenses)]));
        assert!(errors.iter().all(SemanticError::is_recoverable));

        let rules: Vec<_> = errors.iter().filter_map(SemanticError::rule).collect();
        assert_eq!(rules, vec![Rule::OdlLicenseSelfLink, Rule::OdlLicenseCheckoutLink]);
        assert_eq!(
            errors[0].to_string(),
            "ODL license 'urn:uuid:1' does not contain a 'self' link to the License Info Document"
        );
    }

    #[test]
    fn test_feed_level_checks() {
        let mut feed = feed(vec![]);
        feed.navigation = Some(Opds2Navigation::default());
        feed.groups = vec![Opds2Group::default()];
        feed.facets = vec![Opds2Facet::default()];

        let errors = analyze(&feed);
        let rules: Vec<_> = errors.iter().filter_map(SemanticError::rule).collect();
        assert_eq!(
            rules,
            vec![
                Rule::OdlFeedMissingPublications,
                Rule::OdlFeedRedundantGroups,
                Rule::OdlFeedRedundantFacets,
                Rule::OdlFeedRedundantNavigation,
            ]
        );
        assert_eq!(
            errors[0].to_string(),
            "ODL feed 'Lending' does not contain required 'publications' subcollection"
        );
        assert_eq!(
            errors[2].to_string(),
            "ODL feed 'Lending' contains redundant 'facets' subcollections"
        );
        assert_eq!(errors[2].error_code(), codes::semantic::ODL_FEED_REDUNDANT_FACETS);
    }
}
