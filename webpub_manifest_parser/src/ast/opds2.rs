//! OPDS 2.0 catalog nodes

use super::link::links_parser;
use super::manifest::context_parser;
use super::{
    CollectionList, CompactCollection, LinkList, Manifestlike, NodeKind, NodeRef,
    PresentationMetadata,
};
use crate::parsers::{Bounds, DateValue, ParsedValue, Title, ValueParser};
use crate::properties::{set, set_opt, AstNode, PropertyDescriptor};
use crate::registry::{opds2, ManifestFormat};
use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Price {
    pub value: f64,
    /// ISO 4217 code
    pub currency: String,
}

impl AstNode for Price {
    const KIND: NodeKind = NodeKind::Price;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<Price>>> = OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "value",
                    "value",
                    ValueParser::number(Bounds::minimum(0.0)),
                    set(|p: &mut Price| &mut p.value),
                )
                .required(),
                PropertyDescriptor::new(
                    "currency",
                    "currency",
                    ValueParser::Enum(opds2::CURRENCIES),
                    set(|p: &mut Price| &mut p.currency),
                )
                .required(),
            ]
        })
    }
}

/// Indirect acquisition: the media type obtained, and what it in turn yields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcquisitionObject {
    pub media_type: String,
    pub child: Vec<AcquisitionObject>,
}

impl AstNode for AcquisitionObject {
    const KIND: NodeKind = NodeKind::AcquisitionObject;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<AcquisitionObject>>> =
            OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "media_type",
                    "type",
                    ValueParser::String,
                    set(|a: &mut AcquisitionObject| &mut a.media_type),
                )
                .required(),
                PropertyDescriptor::new(
                    "child",
                    "child",
                    ValueParser::array_of(ValueParser::type_of(NodeKind::AcquisitionObject)),
                    set(|a: &mut AcquisitionObject| &mut a.child),
                ),
            ]
        })
    }

    fn children(&self) -> Vec<NodeRef<'_>> {
        self.child.iter().map(NodeRef::from).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Holds {
    pub total: Option<i64>,
    pub position: Option<i64>,
}

impl AstNode for Holds {
    const KIND: NodeKind = NodeKind::Holds;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<Holds>>> = OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "total",
                    "total",
                    ValueParser::integer(Bounds::minimum(0.0)),
                    set_opt(|h: &mut Holds| &mut h.total),
                ),
                PropertyDescriptor::new(
                    "position",
                    "position",
                    ValueParser::integer(Bounds::minimum(0.0)),
                    set_opt(|h: &mut Holds| &mut h.position),
                ),
            ]
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Copies {
    pub total: Option<i64>,
    pub available: Option<i64>,
}

impl AstNode for Copies {
    const KIND: NodeKind = NodeKind::Copies;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<Copies>>> = OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "total",
                    "total",
                    ValueParser::integer(Bounds::minimum(0.0)),
                    set_opt(|c: &mut Copies| &mut c.total),
                ),
                PropertyDescriptor::new(
                    "available",
                    "available",
                    ValueParser::integer(Bounds::minimum(0.0)),
                    set_opt(|c: &mut Copies| &mut c.available),
                ),
            ]
        })
    }
}

const AVAILABILITY_STATES: &[&str] = &["available", "unavailable", "reserved", "ready"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Availability {
    pub state: String,
    pub since: Option<DateValue>,
    pub until: Option<DateValue>,
}

impl AstNode for Availability {
    const KIND: NodeKind = NodeKind::Availability;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<Availability>>> = OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "state",
                    "state",
                    ValueParser::Enum(AVAILABILITY_STATES),
                    set(|a: &mut Availability| &mut a.state),
                )
                .required(),
                PropertyDescriptor::new(
                    "since",
                    "since",
                    ValueParser::date_or_time(),
                    set_opt(|a: &mut Availability| &mut a.since),
                ),
                PropertyDescriptor::new(
                    "until",
                    "until",
                    ValueParser::date_or_time(),
                    set_opt(|a: &mut Availability| &mut a.until),
                ),
            ]
        })
    }
}

/// Link properties only OPDS 2.0 documents carry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Opds2LinkProperties {
    pub number_of_items: Option<i64>,
    pub price: Option<Price>,
    pub indirect_acquisition: Vec<AcquisitionObject>,
    pub holds: Option<Holds>,
    pub copies: Option<Copies>,
    pub availability: Option<Availability>,
}

impl AstNode for Opds2LinkProperties {
    const KIND: NodeKind = NodeKind::Opds2LinkProperties;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<Opds2LinkProperties>>> =
            OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "number_of_items",
                    "numberOfItems",
                    ValueParser::integer(Bounds::minimum(0.0)),
                    set_opt(|p: &mut Opds2LinkProperties| &mut p.number_of_items),
                ),
                PropertyDescriptor::new(
                    "price",
                    "price",
                    ValueParser::type_of(NodeKind::Price),
                    set_opt(|p: &mut Opds2LinkProperties| &mut p.price),
                ),
                PropertyDescriptor::new(
                    "indirect_acquisition",
                    "indirectAcquisition",
                    ValueParser::array_of(ValueParser::type_of(NodeKind::AcquisitionObject)),
                    set(|p: &mut Opds2LinkProperties| &mut p.indirect_acquisition),
                ),
                PropertyDescriptor::new(
                    "holds",
                    "holds",
                    ValueParser::type_of(NodeKind::Holds),
                    set_opt(|p: &mut Opds2LinkProperties| &mut p.holds),
                ),
                PropertyDescriptor::new(
                    "copies",
                    "copies",
                    ValueParser::type_of(NodeKind::Copies),
                    set_opt(|p: &mut Opds2LinkProperties| &mut p.copies),
                ),
                PropertyDescriptor::new(
                    "availability",
                    "availability",
                    ValueParser::type_of(NodeKind::Availability),
                    set_opt(|p: &mut Opds2LinkProperties| &mut p.availability),
                ),
            ]
            .into_iter()
            .map(|descriptor| descriptor.since(ManifestFormat::Opds2))
            .collect()
        })
    }

    fn children(&self) -> Vec<NodeRef<'_>> {
        self.price
            .iter()
            .map(NodeRef::from)
            .chain(self.indirect_acquisition.iter().map(NodeRef::from))
            .chain(self.holds.iter().map(NodeRef::from))
            .chain(self.copies.iter().map(NodeRef::from))
            .chain(self.availability.iter().map(NodeRef::from))
            .collect()
    }
}

fn title_parser() -> ValueParser {
    ValueParser::any_of(vec![
        ValueParser::String,
        ValueParser::array_of(ValueParser::String),
        ValueParser::LocalizableString,
    ])
}

/// Feed-level metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Opds2FeedMetadata {
    pub identifier: Option<String>,
    pub schema_type: Option<String>,
    pub title: Title,
    pub subtitle: Option<Title>,
    pub modified: Option<DateTime<FixedOffset>>,
    pub description: Option<String>,
    pub items_per_page: Option<i64>,
    pub current_page: Option<i64>,
    pub number_of_items: Option<i64>,
}

impl Opds2FeedMetadata {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Title::Plain(title.to_string()),
            ..Self::default()
        }
    }

    pub fn label(&self) -> String {
        let title = self.title.to_string();
        if title.is_empty() {
            self.identifier.clone().unwrap_or_default()
        } else {
            title
        }
    }
}

impl AstNode for Opds2FeedMetadata {
    const KIND: NodeKind = NodeKind::Opds2FeedMetadata;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<Opds2FeedMetadata>>> =
            OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "identifier",
                    "identifier",
                    ValueParser::Uri,
                    set_opt(|m: &mut Opds2FeedMetadata| &mut m.identifier),
                ),
                PropertyDescriptor::new(
                    "schema_type",
                    "@type",
                    ValueParser::Uri,
                    set_opt(|m: &mut Opds2FeedMetadata| &mut m.schema_type),
                ),
                PropertyDescriptor::new(
                    "title",
                    "title",
                    title_parser(),
                    set(|m: &mut Opds2FeedMetadata| &mut m.title),
                )
                .required(),
                PropertyDescriptor::new(
                    "subtitle",
                    "subtitle",
                    title_parser(),
                    set_opt(|m: &mut Opds2FeedMetadata| &mut m.subtitle),
                ),
                PropertyDescriptor::new(
                    "modified",
                    "modified",
                    ValueParser::DateTime,
                    set_opt(|m: &mut Opds2FeedMetadata| &mut m.modified),
                ),
                PropertyDescriptor::new(
                    "description",
                    "description",
                    ValueParser::String,
                    set_opt(|m: &mut Opds2FeedMetadata| &mut m.description),
                ),
                PropertyDescriptor::new(
                    "items_per_page",
                    "itemsPerPage",
                    ValueParser::integer(Bounds::exclusive_minimum(0.0)),
                    set_opt(|m: &mut Opds2FeedMetadata| &mut m.items_per_page),
                ),
                PropertyDescriptor::new(
                    "current_page",
                    "currentPage",
                    ValueParser::integer(Bounds::exclusive_minimum(0.0)),
                    set_opt(|m: &mut Opds2FeedMetadata| &mut m.current_page),
                ),
                PropertyDescriptor::new(
                    "number_of_items",
                    "numberOfItems",
                    ValueParser::integer(Bounds::minimum(0.0)),
                    set_opt(|m: &mut Opds2FeedMetadata| &mut m.number_of_items),
                ),
            ]
        })
    }
}

/// A publication entry of a feed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Opds2Publication {
    pub metadata: PresentationMetadata,
    pub links: LinkList,
    pub images: CompactCollection,
    pub sub_collections: CollectionList,
    pub extra: BTreeMap<String, Value>,
}

impl AstNode for Opds2Publication {
    const KIND: NodeKind = NodeKind::Opds2Publication;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<Opds2Publication>>> =
            OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "metadata",
                    "metadata",
                    ValueParser::type_of(NodeKind::PresentationMetadata),
                    set(|p: &mut Opds2Publication| &mut p.metadata),
                )
                .required(),
                PropertyDescriptor::new(
                    "links",
                    "links",
                    links_parser(),
                    set(|p: &mut Opds2Publication| &mut p.links),
                )
                .required(),
                PropertyDescriptor::new(
                    "images",
                    "images",
                    ValueParser::type_of(NodeKind::CompactCollection),
                    set(|p: &mut Opds2Publication| &mut p.images),
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
        std::iter::once(NodeRef::from(&self.metadata))
            .chain(self.links.node_refs())
            .chain(std::iter::once(NodeRef::from(&self.images)))
            .chain(self.sub_collections.node_refs())
            .collect()
    }
}

/// Navigation links of a feed or group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Opds2Navigation {
    pub links: LinkList,
}

impl AstNode for Opds2Navigation {
    const KIND: NodeKind = NodeKind::Opds2Navigation;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<Opds2Navigation>>> =
            OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![PropertyDescriptor::new(
                "links",
                "links",
                links_parser(),
                set(|n: &mut Opds2Navigation| &mut n.links),
            )
            .required()]
        })
    }

    fn children(&self) -> Vec<NodeRef<'_>> {
        self.links.node_refs().collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Opds2Facet {
    pub metadata: Option<Opds2FeedMetadata>,
    pub links: LinkList,
}

impl AstNode for Opds2Facet {
    const KIND: NodeKind = NodeKind::Opds2Facet;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<Opds2Facet>>> = OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "metadata",
                    "metadata",
                    ValueParser::type_of(NodeKind::Opds2FeedMetadata),
                    set_opt(|f: &mut Opds2Facet| &mut f.metadata),
                ),
                PropertyDescriptor::new(
                    "links",
                    "links",
                    links_parser(),
                    set(|f: &mut Opds2Facet| &mut f.links),
                )
                .required(),
            ]
        })
    }

    fn children(&self) -> Vec<NodeRef<'_>> {
        self.metadata
            .iter()
            .map(NodeRef::from)
            .chain(self.links.node_refs())
            .collect()
    }
}

/// A titled block of publications or navigation links
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Opds2Group {
    pub metadata: Option<Opds2FeedMetadata>,
    pub links: LinkList,
    pub publications: Vec<Opds2Publication>,
    pub navigation: Option<Opds2Navigation>,
}

impl AstNode for Opds2Group {
    const KIND: NodeKind = NodeKind::Opds2Group;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<Opds2Group>>> = OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "metadata",
                    "metadata",
                    ValueParser::type_of(NodeKind::Opds2FeedMetadata),
                    set_opt(|g: &mut Opds2Group| &mut g.metadata),
                ),
                PropertyDescriptor::new(
                    "links",
                    "links",
                    links_parser(),
                    set(|g: &mut Opds2Group| &mut g.links),
                ),
                PropertyDescriptor::new(
                    "publications",
                    "publications",
                    ValueParser::unique_array_of(ValueParser::type_of(
                        NodeKind::Opds2Publication,
                    )),
                    set(|g: &mut Opds2Group| &mut g.publications),
                ),
                PropertyDescriptor::new(
                    "navigation",
                    "navigation",
                    ValueParser::type_of(NodeKind::Opds2Navigation),
                    set_opt(|g: &mut Opds2Group| &mut g.navigation),
                ),
            ]
        })
    }

    fn children(&self) -> Vec<NodeRef<'_>> {
        self.metadata
            .iter()
            .map(NodeRef::from)
            .chain(self.links.node_refs())
            .chain(self.publications.iter().map(NodeRef::from))
            .chain(self.navigation.iter().map(NodeRef::from))
            .collect()
    }
}

/// OPDS 2.0 catalog feed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Opds2Feed {
    pub context: Vec<String>,
    pub metadata: Opds2FeedMetadata,
    pub links: LinkList,
    pub publications: Vec<Opds2Publication>,
    pub navigation: Option<Opds2Navigation>,
    pub facets: Vec<Opds2Facet>,
    pub groups: Vec<Opds2Group>,
    pub sub_collections: CollectionList,
    pub extra: BTreeMap<String, Value>,
}

impl AstNode for Opds2Feed {
    const KIND: NodeKind = NodeKind::Opds2Feed;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<Opds2Feed>>> = OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "context",
                    "@context",
                    context_parser(),
                    set(|f: &mut Opds2Feed| &mut f.context),
                ),
                PropertyDescriptor::new(
                    "metadata",
                    "metadata",
                    ValueParser::type_of(NodeKind::Opds2FeedMetadata),
                    set(|f: &mut Opds2Feed| &mut f.metadata),
                )
                .required(),
                PropertyDescriptor::new(
                    "links",
                    "links",
                    links_parser(),
                    set(|f: &mut Opds2Feed| &mut f.links),
                )
                .required(),
                PropertyDescriptor::new(
                    "publications",
                    "publications",
                    ValueParser::unique_array_of(ValueParser::type_of(
                        NodeKind::Opds2Publication,
                    )),
                    set(|f: &mut Opds2Feed| &mut f.publications),
                ),
                PropertyDescriptor::new(
                    "navigation",
                    "navigation",
                    ValueParser::type_of(NodeKind::Opds2Navigation),
                    set_opt(|f: &mut Opds2Feed| &mut f.navigation),
                ),
                PropertyDescriptor::new(
                    "facets",
                    "facets",
                    ValueParser::unique_array_of(ValueParser::type_of(NodeKind::Opds2Facet)),
                    set(|f: &mut Opds2Feed| &mut f.facets),
                ),
                PropertyDescriptor::new(
                    "groups",
                    "groups",
                    ValueParser::unique_array_of(ValueParser::type_of(NodeKind::Opds2Group)),
                    set(|f: &mut Opds2Feed| &mut f.groups),
                ),
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
        std::iter::once(NodeRef::from(&self.metadata))
            .chain(self.links.node_refs())
            .chain(self.publications.iter().map(NodeRef::from))
            .chain(self.navigation.iter().map(NodeRef::from))
            .chain(self.facets.iter().map(NodeRef::from))
            .chain(self.groups.iter().map(NodeRef::from))
            .chain(self.sub_collections.node_refs())
            .collect()
    }
}

impl Manifestlike for Opds2Feed {
    const FORMAT: ManifestFormat = ManifestFormat::Opds2;

    fn context(&self) -> &[String] {
        &self.context
    }

    fn links(&self) -> &LinkList {
        &self.links
    }

    fn sub_collections(&self) -> &CollectionList {
        &self.sub_collections
    }

    fn label(&self) -> String {
        self.metadata.label()
    }

    fn metadata_node(&self) -> NodeRef<'_> {
        NodeRef::from(&self.metadata)
    }

    fn as_node_ref(&self) -> NodeRef<'_> {
        NodeRef::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::FromParsed;

    #[test]
    fn test_title_accepts_every_shape() {
        assert_eq!(
            Title::from_parsed(ParsedValue::String("Feed".into())),
            Some(Title::Plain("Feed".into()))
        );
        assert_eq!(
            Title::from_parsed(ParsedValue::List(vec![ParsedValue::String("A".into())]))
                .map(|t| t.to_string()),
            Some("A".to_string())
        );
    }

    #[test]
    fn test_feed_label() {
        let mut metadata = Opds2FeedMetadata::default();
        metadata.identifier = Some("urn:feed".into());
        assert_eq!(metadata.label(), "urn:feed");
        assert_eq!(Opds2FeedMetadata::titled("Catalog").label(), "Catalog");
    }

    #[test]
    fn test_link_property_extensions_are_gated() {
        assert!(Opds2LinkProperties::descriptors()
            .iter()
            .all(|d| d.since == ManifestFormat::Opds2));
    }
}
