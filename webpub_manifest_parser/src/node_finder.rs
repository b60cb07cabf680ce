//! Locating the enclosing node of a given kind
//!
//! Used when reporting errors, e.g. to name the publication that owns an
//! offending link. Nodes are matched by identity, so two equal links in
//! different publications resolve to their own parents.

use crate::ast::{NodeKind, NodeRef};

/// Walk `root` depth-first looking for `target`, then return the nearest node
/// (the target itself first, then its ancestors) whose kind is `kind` or a
/// specialization of it
pub fn find_parent_or_self<'a>(
    root: NodeRef<'a>,
    target: NodeRef<'_>,
    kind: NodeKind,
) -> Option<NodeRef<'a>> {
    let mut ancestors = Vec::new();
    let path = find_path(root, &target, &mut ancestors)?;

    std::iter::once(path)
        .chain(ancestors.into_iter().rev())
        .find(|node| node.kind().is_a(kind))
}

/// On success `ancestors` holds the chain from `root` down to the target's parent
fn find_path<'a>(
    current: NodeRef<'a>,
    target: &NodeRef<'_>,
    ancestors: &mut Vec<NodeRef<'a>>,
) -> Option<NodeRef<'a>> {
    if current.is_same(target) {
        return Some(current);
    }

    ancestors.push(current);
    for child in current.children() {
        if let Some(found) = find_path(child, target, ancestors) {
            return Some(found);
        }
    }
    ancestors.pop();
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{
        CompactCollection, Link, LinkList, OdlFeed, OdlPublication, Opds2Feed, Opds2FeedMetadata,
        Opds2Publication, PresentationMetadata,
    };

    fn publication(title: &str, href: &str) -> Opds2Publication {
        Opds2Publication {
            metadata: PresentationMetadata::titled(title),
            links: LinkList::new(vec![Link::new(href).with_rel("self")]),
            images: CompactCollection::default(),
            ..Opds2Publication::default()
        }
    }

    fn feed() -> Opds2Feed {
        Opds2Feed {
            metadata: Opds2FeedMetadata::titled("Catalog"),
            links: LinkList::new(vec![Link::new("http://example.com/feed").with_rel("self")]),
            publications: vec![
                publication("First", "http://example.com/same"),
                publication("Second", "http://example.com/same"),
            ],
            ..Opds2Feed::default()
        }
    }

    #[test]
    fn test_finds_owning_publication_by_identity() {
        let feed = feed();
        let link = &feed.publications[1].links[0];
        assert_eq!(feed.publications[0].links[0], *link);

        let found = find_parent_or_self(
            NodeRef::from(&feed),
            NodeRef::from(link),
            NodeKind::Opds2Publication,
        );
        assert!(found.is_some_and(|node| node.is_same(&NodeRef::from(&feed.publications[1]))));
    }

    #[test]
    fn test_returns_self_when_kind_matches() {
        let feed = feed();
        let link = &feed.links[0];

        let found = find_parent_or_self(NodeRef::from(&feed), NodeRef::from(link), NodeKind::Link);
        assert!(found.is_some_and(|node| node.is_same(&NodeRef::from(link))));
    }

    #[test]
    fn test_general_kind_matches_specialized_parent() {
        let odl = OdlFeed {
            publications: vec![OdlPublication {
                links: LinkList::new(vec![Link::new("http://example.com/book")]),
                ..OdlPublication::default()
            }],
            ..OdlFeed::default()
        };
        let link = &odl.publications[0].links[0];

        let found = find_parent_or_self(
            NodeRef::from(&odl),
            NodeRef::from(link),
            NodeKind::Opds2Publication,
        );
        assert_eq!(found.map(|node| node.kind()), Some(NodeKind::OdlPublication));

        let root = find_parent_or_self(NodeRef::from(&odl), NodeRef::from(link), NodeKind::Opds2Feed);
        assert_eq!(root.map(|node| node.kind()), Some(NodeKind::OdlFeed));
    }

    #[test]
    fn test_unreachable_target() {
        let feed = feed();
        let stray = Link::new("http://example.com/feed").with_rel("self");

        assert!(find_parent_or_self(
            NodeRef::from(&feed),
            NodeRef::from(&stray),
            NodeKind::Opds2Feed
        )
        .is_none());
    }

    #[test]
    fn test_no_ancestor_of_kind() {
        let feed = feed();
        let link = &feed.links[0];

        assert!(find_parent_or_self(
            NodeRef::from(&feed),
            NodeRef::from(link),
            NodeKind::OdlLicense
        )
        .is_none());
    }
}
