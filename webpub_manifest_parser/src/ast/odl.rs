//! ODL lending nodes

use super::link::links_parser;
use super::manifest::context_parser;
use super::{
    CollectionList, CompactCollection, LinkList, Manifestlike, NodeKind, NodeRef,
    Opds2FeedMetadata, Opds2Facet, Opds2Group, Opds2Navigation, PresentationMetadata, Price,
};
use crate::parsers::{Bounds, DateValue, ValueParser};
use crate::properties::{set, set_opt, AstNode, PropertyDescriptor};
use crate::registry::ManifestFormat;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Lending terms of a license
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LicenseTerms {
    pub checkouts: Option<f64>,
    pub expires: Option<DateValue>,
    pub concurrency: Option<f64>,
    /// Loan length in seconds
    pub length: Option<f64>,
}

impl AstNode for LicenseTerms {
    const KIND: NodeKind = NodeKind::LicenseTerms;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<LicenseTerms>>> = OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "checkouts",
                    "checkouts",
                    ValueParser::number(Bounds::NONE),
                    set_opt(|t: &mut LicenseTerms| &mut t.checkouts),
                ),
                PropertyDescriptor::new(
                    "expires",
                    "expires",
                    ValueParser::date_or_time(),
                    set_opt(|t: &mut LicenseTerms| &mut t.expires),
                ),
                PropertyDescriptor::new(
                    "concurrency",
                    "concurrency",
                    ValueParser::number(Bounds::NONE),
                    set_opt(|t: &mut LicenseTerms| &mut t.concurrency),
                ),
                PropertyDescriptor::new(
                    "length",
                    "length",
                    ValueParser::number(Bounds::NONE),
                    set_opt(|t: &mut LicenseTerms| &mut t.length),
                ),
            ]
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LicenseProtection {
    pub formats: Vec<String>,
    pub devices: Option<f64>,
    pub copy_allowed: Option<bool>,
    pub print_allowed: Option<bool>,
    pub tts_allowed: Option<bool>,
}

impl AstNode for LicenseProtection {
    const KIND: NodeKind = NodeKind::LicenseProtection;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<LicenseProtection>>> =
            OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "formats",
                    "format",
                    ValueParser::string_or_list(),
                    set(|p: &mut LicenseProtection| &mut p.formats),
                ),
                PropertyDescriptor::new(
                    "devices",
                    "devices",
                    ValueParser::number(Bounds::NONE),
                    set_opt(|p: &mut LicenseProtection| &mut p.devices),
                ),
                PropertyDescriptor::new(
                    "copy_allowed",
                    "copy",
                    ValueParser::Boolean,
                    set_opt(|p: &mut LicenseProtection| &mut p.copy_allowed),
                ),
                PropertyDescriptor::new(
                    "print_allowed",
                    "print",
                    ValueParser::Boolean,
                    set_opt(|p: &mut LicenseProtection| &mut p.print_allowed),
                ),
                PropertyDescriptor::new(
                    "tts_allowed",
                    "tts",
                    ValueParser::Boolean,
                    set_opt(|p: &mut LicenseProtection| &mut p.tts_allowed),
                ),
            ]
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LicenseMetadata {
    pub identifier: String,
    pub formats: Vec<String>,
    pub created: Option<DateValue>,
    pub terms: Option<LicenseTerms>,
    pub protection: Option<LicenseProtection>,
    pub price: Option<Price>,
    pub source: Option<String>,
}

impl AstNode for LicenseMetadata {
    const KIND: NodeKind = NodeKind::LicenseMetadata;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<LicenseMetadata>>> =
            OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "identifier",
                    "identifier",
                    ValueParser::Uri,
                    set(|m: &mut LicenseMetadata| &mut m.identifier),
                )
                .required(),
                PropertyDescriptor::new(
                    "formats",
                    "format",
                    ValueParser::string_or_list(),
                    set(|m: &mut LicenseMetadata| &mut m.formats),
                )
                .required(),
                PropertyDescriptor::new(
                    "created",
                    "created",
                    ValueParser::date_or_time(),
                    set_opt(|m: &mut LicenseMetadata| &mut m.created),
                )
                .required(),
                PropertyDescriptor::new(
                    "terms",
                    "terms",
                    ValueParser::type_of(NodeKind::LicenseTerms),
                    set_opt(|m: &mut LicenseMetadata| &mut m.terms),
                ),
                PropertyDescriptor::new(
                    "protection",
                    "protection",
                    ValueParser::type_of(NodeKind::LicenseProtection),
                    set_opt(|m: &mut LicenseMetadata| &mut m.protection),
                ),
                PropertyDescriptor::new(
                    "price",
                    "price",
                    ValueParser::type_of(NodeKind::Price),
                    set_opt(|m: &mut LicenseMetadata| &mut m.price),
                ),
                PropertyDescriptor::new(
                    "source",
                    "source",
                    ValueParser::Uri,
                    set_opt(|m: &mut LicenseMetadata| &mut m.source),
                ),
            ]
        })
    }

    fn children(&self) -> Vec<NodeRef<'_>> {
        self.terms
            .iter()
            .map(NodeRef::from)
            .chain(self.protection.iter().map(NodeRef::from))
            .chain(self.price.iter().map(NodeRef::from))
            .collect()
    }
}

/// One lending license of a publication
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OdlLicense {
    pub metadata: LicenseMetadata,
    pub links: LinkList,
}

impl AstNode for OdlLicense {
    const KIND: NodeKind = NodeKind::OdlLicense;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<OdlLicense>>> = OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "metadata",
                    "metadata",
                    ValueParser::type_of(NodeKind::LicenseMetadata),
                    set(|l: &mut OdlLicense| &mut l.metadata),
                )
                .required(),
                PropertyDescriptor::new(
                    "links",
                    "links",
                    links_parser(),
                    set(|l: &mut OdlLicense| &mut l.links),
                )
                .required(),
            ]
        })
    }

    fn children(&self) -> Vec<NodeRef<'_>> {
        std::iter::once(NodeRef::from(&self.metadata))
            .chain(self.links.node_refs())
            .collect()
    }
}

/// OPDS 2.0 publication with lending licenses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OdlPublication {
    pub metadata: PresentationMetadata,
    pub links: LinkList,
    pub images: CompactCollection,
    pub licenses: Vec<OdlLicense>,
    pub sub_collections: CollectionList,
    pub extra: BTreeMap<String, Value>,
}

impl AstNode for OdlPublication {
    const KIND: NodeKind = NodeKind::OdlPublication;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<OdlPublication>>> = OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "metadata",
                    "metadata",
                    ValueParser::type_of(NodeKind::PresentationMetadata),
                    set(|p: &mut OdlPublication| &mut p.metadata),
                )
                .required(),
                PropertyDescriptor::new(
                    "links",
                    "links",
                    links_parser(),
                    set(|p: &mut OdlPublication| &mut p.links),
                ),
                PropertyDescriptor::new(
                    "images",
                    "images",
                    ValueParser::type_of(NodeKind::CompactCollection),
                    set(|p: &mut OdlPublication| &mut p.images),
                )
                .required(),
                PropertyDescriptor::new(
                    "licenses",
                    "licenses",
                    ValueParser::unique_array_of(ValueParser::type_of(NodeKind::OdlLicense)),
                    set(|p: &mut OdlPublication| &mut p.licenses),
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
            .chain(std::iter::once(NodeRef::from(&self.images)))
            .chain(self.licenses.iter().map(NodeRef::from))
            .chain(self.sub_collections.node_refs())
            .collect()
    }
}

/// ODL feed: an OPDS 2.0 feed of [`OdlPublication`]s
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OdlFeed {
    pub context: Vec<String>,
    pub metadata: Opds2FeedMetadata,
    pub links: LinkList,
    pub publications: Vec<OdlPublication>,
    pub navigation: Option<Opds2Navigation>,
    pub facets: Vec<Opds2Facet>,
    pub groups: Vec<Opds2Group>,
    pub sub_collections: CollectionList,
    pub extra: BTreeMap<String, Value>,
}

impl AstNode for OdlFeed {
    const KIND: NodeKind = NodeKind::OdlFeed;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<OdlFeed>>> = OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "context",
                    "@context",
                    context_parser(),
                    set(|f: &mut OdlFeed| &mut f.context),
                ),
                PropertyDescriptor::new(
                    "metadata",
                    "metadata",
                    ValueParser::type_of(NodeKind::Opds2FeedMetadata),
                    set(|f: &mut OdlFeed| &mut f.metadata),
                )
                .required(),
                PropertyDescriptor::new(
                    "links",
                    "links",
                    links_parser(),
                    set(|f: &mut OdlFeed| &mut f.links),
                )
                .required(),
                PropertyDescriptor::new(
                    "publications",
                    "publications",
                    ValueParser::unique_array_of(ValueParser::type_of(NodeKind::OdlPublication)),
                    set(|f: &mut OdlFeed| &mut f.publications),
                ),
                PropertyDescriptor::new(
                    "navigation",
                    "navigation",
                    ValueParser::type_of(NodeKind::Opds2Navigation),
                    set_opt(|f: &mut OdlFeed| &mut f.navigation),
                ),
                PropertyDescriptor::new(
                    "facets",
                    "facets",
                    ValueParser::unique_array_of(ValueParser::type_of(NodeKind::Opds2Facet)),
                    set(|f: &mut OdlFeed| &mut f.facets),
                ),
                PropertyDescriptor::new(
                    "groups",
                    "groups",
                    ValueParser::unique_array_of(ValueParser::type_of(NodeKind::Opds2Group)),
                    set(|f: &mut OdlFeed| &mut f.groups),
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

impl Manifestlike for OdlFeed {
    const FORMAT: ManifestFormat = ManifestFormat::Odl;

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
