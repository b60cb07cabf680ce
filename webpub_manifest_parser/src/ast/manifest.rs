use super::link::links_parser;
use super::{Collection, CollectionList, LinkList, NodeKind, NodeRef, PresentationMetadata};
use crate::parsers::ValueParser;
use crate::properties::{set, AstNode, PropertyDescriptor};
use crate::registry::{rwpm, ManifestFormat};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// A document root: the node that top-level rules apply to
pub trait Manifestlike {
    /// Format whose registries and rules apply to this root
    const FORMAT: ManifestFormat;

    fn context(&self) -> &[String];

    fn links(&self) -> &LinkList;

    fn sub_collections(&self) -> &CollectionList;

    /// Title if present, identifier otherwise
    fn label(&self) -> String;

    fn metadata_node(&self) -> NodeRef<'_>;

    fn as_node_ref(&self) -> NodeRef<'_>;
}

/// `@context`: a single string or a list of unique strings
pub(crate) fn context_parser() -> ValueParser {
    ValueParser::any_of(vec![
        ValueParser::String,
        ValueParser::unique_array_of(ValueParser::String),
    ])
}

/// Readium Web Publication Manifest
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RwpmManifest {
    pub context: Vec<String>,
    pub metadata: PresentationMetadata,
    pub links: LinkList,
    pub sub_collections: CollectionList,
    pub extra: BTreeMap<String, Value>,
}

impl RwpmManifest {
    pub fn reading_order(&self) -> Option<&Collection> {
        self.sub_collections.get_by_role(rwpm::READING_ORDER.key)
    }

    pub fn resources(&self) -> Option<&Collection> {
        self.sub_collections.get_by_role(rwpm::RESOURCES.key)
    }

    pub fn toc(&self) -> Option<&Collection> {
        self.sub_collections.get_by_role(rwpm::TOC.key)
    }
}

impl AstNode for RwpmManifest {
    const KIND: NodeKind = NodeKind::RwpmManifest;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<RwpmManifest>>> = OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "context",
                    "@context",
                    context_parser(),
                    set(|m: &mut RwpmManifest| &mut m.context),
                ),
                PropertyDescriptor::new(
                    "metadata",
                    "metadata",
                    ValueParser::type_of(NodeKind::PresentationMetadata),
                    set(|m: &mut RwpmManifest| &mut m.metadata),
                )
                .required(),
                PropertyDescriptor::new(
                    "links",
                    "links",
                    links_parser(),
                    set(|m: &mut RwpmManifest| &mut m.links),
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
            .chain(self.sub_collections.node_refs())
            .collect()
    }
}

impl Manifestlike for RwpmManifest {
    const FORMAT: ManifestFormat = ManifestFormat::Rwpm;

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
