//! OPDS 2.0 feed, publication, navigation and group rules

use super::error::{Rule, RuleResult, SemanticError};
use super::SemanticAnalyzer;
use crate::ast::{Link, NodeKind, NodeRef, Opds2Feed, Opds2Group, Opds2Navigation, Opds2Publication};
use crate::registry::opds2::ACQUISITION_RELATIONS;

pub(super) fn feed_sub_collections(feed: &Opds2Feed) -> RuleResult {
    if !feed.publications.is_empty() || feed.navigation.is_some() || !feed.groups.is_empty() {
        return Ok(());
    }
    Err(SemanticError::violation(
        Rule::MissingRequiredFeedSubcollections,
        NodeKind::Opds2Feed,
        None,
        "OPDS 2.0 feed must contain one of the following sub-collections: publications, navigation, groups",
    ))
}

pub(super) fn is_acquisition_link(link: &Link) -> bool {
    ACQUISITION_RELATIONS
        .iter()
        .any(|relation| link.has_rel(relation.key))
}

pub(super) fn acquisition_link(publication: &Opds2Publication) -> RuleResult {
    if publication.links.iter().any(is_acquisition_link) {
        return Ok(());
    }
    Err(SemanticError::violation(
        Rule::MissingAcquisitionLink,
        NodeKind::Opds2Publication,
        Some("links"),
        "OPDS 2.0 publication must contain at least one acquisition link",
    ))
}

pub(super) fn navigation_link_title(link: &Link) -> RuleResult {
    if link.title.is_some() {
        return Ok(());
    }
    Err(SemanticError::violation(
        Rule::MissingNavigationLinkTitle,
        NodeKind::Link,
        Some("title"),
        "OPDS 2.0 navigation link must contain a title",
    ))
}

pub(super) fn group_structure(group: &Opds2Group) -> RuleResult {
    if group.publications.is_empty() || group.navigation.is_none() {
        return Ok(());
    }
    Err(SemanticError::violation(
        Rule::WrongGroupStructure,
        NodeKind::Opds2Group,
        None,
        "OPDS 2.0 group must contain either a single navigation collection or a single publications collection",
    ))
}

impl SemanticAnalyzer {
    pub(super) fn visit_opds2_feed(&mut self, feed: &Opds2Feed) {
        self.visit_manifest(feed);
        self.context.check(feed_sub_collections(feed));

        for publication in &feed.publications {
            self.visit_opds2_publication(publication);
        }
        if let Some(navigation) = &feed.navigation {
            self.visit_opds2_navigation(navigation);
        }
        for facet in &feed.facets {
            self.visit_children(NodeRef::from(facet));
        }
        for group in &feed.groups {
            self.visit_opds2_group(group);
        }
    }

    pub(super) fn visit_opds2_publication(&mut self, publication: &Opds2Publication) {
        self.visit_children(NodeRef::from(publication));
        self.context.check(acquisition_link(publication));
    }

    pub(super) fn visit_opds2_navigation(&mut self, navigation: &Opds2Navigation) {
        self.visit_links(&navigation.links);
        for link in &navigation.links {
            self.context.check(navigation_link_title(link));
        }
    }

    /// Groups relax the feed rules: metadata is optional
    pub(super) fn visit_opds2_group(&mut self, group: &Opds2Group) {
        if let Some(metadata) = &group.metadata {
            self.visit_children(NodeRef::from(metadata));
        }
        self.context.check(group_structure(group));

        for publication in &group.publications {
            self.visit_opds2_publication(publication);
        }
        if let Some(navigation) = &group.navigation {
            self.visit_opds2_navigation(navigation);
        }
        self.visit_links(&group.links);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CompactCollection, LinkList, Opds2FeedMetadata, PresentationMetadata};
    use crate::logging::codes;
    use crate::registry::{opds2, ManifestFormat};

    fn feed() -> Opds2Feed {
        Opds2Feed {
            metadata: Opds2FeedMetadata::titled("Catalog"),
            links: LinkList::new(vec![
                Link::new("http://example.com/catalog.json").with_rel("self")
            ]),
            ..Opds2Feed::default()
        }
    }

    fn publication(rel: &str) -> Opds2Publication {
        Opds2Publication {
            metadata: PresentationMetadata::titled("Book"),
            links: LinkList::new(vec![Link::new("http://example.com/book.epub").with_rel(rel)]),
            images: CompactCollection {
                role: Some(opds2::IMAGES),
                links: LinkList::new(vec![Link::new("http://example.com/cover.jpg")]),
            },
            ..Opds2Publication::default()
        }
    }

    fn navigation(titled: bool) -> Opds2Navigation {
        let mut link = Link::new("http://example.com/new").with_rel("current");
        if titled {
            link.title = Some("New".to_string());
        }
        Opds2Navigation {
            links: LinkList::new(vec![link]),
        }
    }

    fn analyze(feed: &Opds2Feed) -> Vec<SemanticError> {
        let _ = crate::logging::init_global_logging();
        SemanticAnalyzer::new(ManifestFormat::Opds2).analyze(NodeRef::from(feed))
    }

    #[test]
    fn test_feed_without_sub_collections() {
        let errors = analyze(&feed());

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].error_code(),
            codes::semantic::MISSING_REQUIRED_FEED_SUBCOLLECTIONS
        );
    }

    #[test]
    fn test_publication_acquisition_relations() {
        let mut feed = feed();
        feed.publications = vec![
            publication(opds2::ACQUISITION.key),
            publication(opds2::OPEN_ACCESS.key),
            publication("alternate"),
            publication("cover"),
        ];

        let errors = analyze(&feed);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "OPDS 2.0 publication must contain at least one acquisition link"
        );
    }

    #[test]
    fn test_navigation_links_need_titles() {
        let mut feed = feed();
        feed.navigation = Some(navigation(false));

        let errors = analyze(&feed);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule(), Some(Rule::MissingNavigationLinkTitle));

        feed.navigation = Some(navigation(true));
        assert!(analyze(&feed).is_empty());
    }

    #[test]
    fn test_group_mixing_navigation_and_publications() {
        let mut feed = feed();
        feed.groups = vec![
            Opds2Group {
                publications: vec![publication(opds2::BORROW.key)],
                navigation: Some(navigation(true)),
                ..Opds2Group::default()
            },
            Opds2Group {
                metadata: Some(Opds2FeedMetadata::titled("Staff picks")),
                publications: vec![publication(opds2::BUY.key)],
                ..Opds2Group::default()
            },
        ];

        let errors = analyze(&feed);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error_code(), codes::semantic::WRONG_GROUP_STRUCTURE);
    }

    #[test]
    fn test_group_publications_are_checked() {
        let mut feed = feed();
        feed.groups = vec![Opds2Group {
            navigation: None,
            publications: vec![publication("cover")],
            ..Opds2Group::default()
        }];

        let errors = analyze(&feed);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule(), Some(Rule::MissingAcquisitionLink));
    }
}
