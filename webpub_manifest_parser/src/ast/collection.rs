use super::link::links_parser;
use super::{LinkList, NodeKind, NodeRef, PresentationMetadata};
use crate::parsers::{FromParsed, ParsedValue, ValueParser};
use crate::properties::{set, set_opt, AstNode, PropertyDescriptor};
use crate::registry::CollectionRole;
use serde_json::Value;
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

/// Links only: no metadata, no subcollections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompactCollection {
    pub role: Option<CollectionRole>,
    pub links: LinkList,
}

impl AstNode for CompactCollection {
    const KIND: NodeKind = NodeKind::CompactCollection;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<CompactCollection>>> =
            OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![PropertyDescriptor::new(
                "links",
                "links",
                links_parser(),
                set(|c: &mut CompactCollection| &mut c.links),
            )
            .required()]
        })
    }

    fn children(&self) -> Vec<NodeRef<'_>> {
        self.links.node_refs().collect()
    }
}

/// A grouping of metadata, links and role-keyed subcollections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    pub role: Option<CollectionRole>,
    pub metadata: Option<PresentationMetadata>,
    pub links: LinkList,
    pub sub_collections: CollectionList,
    pub extra: BTreeMap<String, Value>,
}

impl Collection {
    pub fn with_links(role: CollectionRole, links: LinkList) -> Self {
        Self {
            role: Some(role),
            links,
            ..Self::default()
        }
    }

    pub fn is_compact(&self) -> bool {
        self.metadata.is_none() && self.sub_collections.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.metadata.is_some() && !self.sub_collections.is_empty()
    }

    pub fn role_key(&self) -> &str {
        self.role.as_ref().map_or("", |role| role.key)
    }
}

impl AstNode for Collection {
    const KIND: NodeKind = NodeKind::Collection;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<Collection>>> = OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "metadata",
                    "metadata",
                    ValueParser::type_of(NodeKind::PresentationMetadata),
                    set_opt(|c: &mut Collection| &mut c.metadata),
                ),
                PropertyDescriptor::new(
                    "links",
                    "links",
                    links_parser(),
                    set(|c: &mut Collection| &mut c.links),
                )
                .required(),
            ]
        })
    }

    fn sub_collections_mut(&mut self) -> Option<&mut CollectionList> {
        Some(&mut self.sub_collections)
    }

    fn extra_mut(&mut self) -> Option<&mut BTreeMap<String, Value>> {
        Some(&mut self.extra)
    }

    fn children(&self) -> Vec<NodeRef<'_>> {
        self.metadata
            .iter()
            .map(NodeRef::from)
            .chain(self.links.node_refs())
            .chain(self.sub_collections.node_refs())
            .collect()
    }
}

/// Ordered list of subcollections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionList(pub Vec<Collection>);

impl CollectionList {
    /// First collection under `role`
    pub fn get_by_role(&self, role: &str) -> Option<&Collection> {
        self.0.iter().find(|c| c.role_key() == role)
    }

    pub fn all_by_role<'a>(&'a self, role: &'a str) -> impl Iterator<Item = &'a Collection> + 'a {
        self.0.iter().filter(move |c| c.role_key() == role)
    }

    pub(crate) fn node_refs(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.0.iter().map(NodeRef::from)
    }
}

impl Deref for CollectionList {
    type Target = Vec<Collection>;

    fn deref(&self) -> &Vec<Collection> {
        &self.0
    }
}

impl DerefMut for CollectionList {
    fn deref_mut(&mut self) -> &mut Vec<Collection> {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a CollectionList {
    type Item = &'a Collection;
    type IntoIter = std::slice::Iter<'a, Collection>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<Collection>> for CollectionList {
    fn from(collections: Vec<Collection>) -> Self {
        CollectionList(collections)
    }
}

impl FromParsed for CollectionList {
    fn from_parsed(value: ParsedValue) -> Option<Self> {
        Vec::<Collection>::from_parsed(value).map(CollectionList)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Link;
    use crate::registry::rwpm;

    #[test]
    fn test_compact_and_full_predicates() {
        let mut collection = Collection::with_links(rwpm::TOC, LinkList::default());
        assert!(collection.is_compact());
        assert!(!collection.is_full());

        collection.metadata = Some(PresentationMetadata::titled("Chapters"));
        assert!(!collection.is_compact());
        assert!(!collection.is_full());

        collection
            .sub_collections
            .push(Collection::with_links(rwpm::LOI, LinkList::default()));
        assert!(collection.is_full());
    }

    #[test]
    fn test_get_by_role() {
        let toc = Collection::with_links(
            rwpm::TOC,
            LinkList::new(vec![Link::new("http://example.com/toc")]),
        );
        let list = CollectionList(vec![
            Collection::with_links(rwpm::RESOURCES, LinkList::default()),
            toc.clone(),
        ]);

        assert_eq!(list.get_by_role("toc"), Some(&toc));
        assert!(list.get_by_role("readingOrder").is_none());
        assert_eq!(list.all_by_role("resources").count(), 1);
    }
}
