use super::{NodeKind, NodeRef, Opds2LinkProperties};
use crate::parsers::{Bounds, FromParsed, ParsedValue, ValueParser};
use crate::properties::{set, set_opt, AstNode, PropertyDescriptor};
use serde_json::Value;
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

/// Rendering hints attached to a link
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkProperties {
    pub clipped: Option<bool>,
    pub fit: Option<String>,
    pub orientation: Option<String>,
    pub page: Option<String>,
    pub spread: Option<String>,
    /// Present once any OPDS 2.0 property was parsed
    pub opds2: Option<Opds2LinkProperties>,
    pub extra: BTreeMap<String, Value>,
}

pub(crate) const FIT: &[&str] = &["contain", "cover", "width", "height"];
pub(crate) const ORIENTATION: &[&str] = &["auto", "landscape", "portrait"];
pub(crate) const SPREAD: &[&str] = &["auto", "both", "none", "landscape"];
const PAGE: &[&str] = &["left", "right", "center"];

impl AstNode for LinkProperties {
    const KIND: NodeKind = NodeKind::LinkProperties;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<LinkProperties>>> = OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            let mut descriptors = vec![
                PropertyDescriptor::new(
                    "clipped",
                    "clipped",
                    ValueParser::Boolean,
                    set_opt(|p: &mut LinkProperties| &mut p.clipped),
                ),
                PropertyDescriptor::new(
                    "fit",
                    "fit",
                    ValueParser::Enum(FIT),
                    set_opt(|p: &mut LinkProperties| &mut p.fit),
                ),
                PropertyDescriptor::new(
                    "orientation",
                    "orientation",
                    ValueParser::Enum(ORIENTATION),
                    set_opt(|p: &mut LinkProperties| &mut p.orientation),
                ),
                PropertyDescriptor::new(
                    "page",
                    "page",
                    ValueParser::Enum(PAGE),
                    set_opt(|p: &mut LinkProperties| &mut p.page),
                ),
                PropertyDescriptor::new(
                    "spread",
                    "spread",
                    ValueParser::Enum(SPREAD),
                    set_opt(|p: &mut LinkProperties| &mut p.spread),
                ),
            ];
            descriptors.extend(Opds2LinkProperties::descriptors().iter().map(|descriptor| {
                PropertyDescriptor::lift(descriptor, |p: &mut LinkProperties| {
                    p.opds2.get_or_insert_with(Opds2LinkProperties::default)
                })
            }));
            descriptors
        })
    }

    fn extra_mut(&mut self) -> Option<&mut BTreeMap<String, Value>> {
        Some(&mut self.extra)
    }

    fn children(&self) -> Vec<NodeRef<'_>> {
        self.opds2.iter().map(NodeRef::from).collect()
    }
}

/// A link to a resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Link {
    /// URI or URI template
    pub href: String,
    pub templated: Option<bool>,
    pub media_type: Option<String>,
    pub title: Option<String>,
    pub rels: Vec<String>,
    pub properties: Option<LinkProperties>,
    pub height: Option<i64>,
    pub width: Option<i64>,
    pub bitrate: Option<f64>,
    pub duration: Option<f64>,
    pub languages: Vec<String>,
    pub alternates: Vec<Link>,
    pub children: Vec<Link>,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }

    pub fn with_rel(mut self, rel: impl Into<String>) -> Self {
        self.rels.push(rel.into());
        self
    }

    pub fn with_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn is_templated(&self) -> bool {
        self.templated.unwrap_or(false)
    }

    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels.iter().any(|r| r == rel)
    }
}

impl AstNode for Link {
    const KIND: NodeKind = NodeKind::Link;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<Link>>> = OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "href",
                    "href",
                    ValueParser::UriTemplate,
                    set(|l: &mut Link| &mut l.href),
                )
                .required(),
                PropertyDescriptor::new(
                    "templated",
                    "templated",
                    ValueParser::Boolean,
                    set_opt(|l: &mut Link| &mut l.templated),
                ),
                PropertyDescriptor::new(
                    "media_type",
                    "type",
                    ValueParser::String,
                    set_opt(|l: &mut Link| &mut l.media_type),
                ),
                PropertyDescriptor::new(
                    "title",
                    "title",
                    ValueParser::String,
                    set_opt(|l: &mut Link| &mut l.title),
                ),
                PropertyDescriptor::new(
                    "rels",
                    "rel",
                    ValueParser::string_or_list(),
                    set(|l: &mut Link| &mut l.rels),
                ),
                PropertyDescriptor::new(
                    "properties",
                    "properties",
                    ValueParser::type_of(NodeKind::LinkProperties),
                    set_opt(|l: &mut Link| &mut l.properties),
                ),
                PropertyDescriptor::new(
                    "height",
                    "height",
                    ValueParser::integer(Bounds::exclusive_minimum(0.0)),
                    set_opt(|l: &mut Link| &mut l.height),
                ),
                PropertyDescriptor::new(
                    "width",
                    "width",
                    ValueParser::integer(Bounds::exclusive_minimum(0.0)),
                    set_opt(|l: &mut Link| &mut l.width),
                ),
                PropertyDescriptor::new(
                    "bitrate",
                    "bitrate",
                    ValueParser::number(Bounds::exclusive_minimum(0.0)),
                    set_opt(|l: &mut Link| &mut l.bitrate),
                ),
                PropertyDescriptor::new(
                    "duration",
                    "duration",
                    ValueParser::number(Bounds::exclusive_minimum(0.0)),
                    set_opt(|l: &mut Link| &mut l.duration),
                ),
                PropertyDescriptor::new(
                    "languages",
                    "language",
                    ValueParser::languages(),
                    set(|l: &mut Link| &mut l.languages),
                ),
                PropertyDescriptor::new(
                    "alternates",
                    "alternate",
                    ValueParser::unique_array_of(ValueParser::type_of(NodeKind::Link)),
                    set(|l: &mut Link| &mut l.alternates),
                ),
                PropertyDescriptor::new(
                    "children",
                    "children",
                    ValueParser::unique_array_of(ValueParser::type_of(NodeKind::Link)),
                    set(|l: &mut Link| &mut l.children),
                ),
            ]
        })
    }

    fn children(&self) -> Vec<NodeRef<'_>> {
        self.properties
            .iter()
            .map(NodeRef::from)
            .chain(self.alternates.iter().map(NodeRef::from))
            .chain(self.children.iter().map(NodeRef::from))
            .collect()
    }
}

/// Ordered list of links
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkList(pub Vec<Link>);

impl LinkList {
    pub fn new(links: Vec<Link>) -> Self {
        Self(links)
    }

    /// Every link carrying `rel`, in document order
    pub fn get_by_rel<'a>(&'a self, rel: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.0.iter().filter(move |link| link.has_rel(rel))
    }

    pub fn get_by_href<'a>(&'a self, href: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.0.iter().filter(move |link| link.href == href)
    }

    pub fn first_by_rel(&self, rel: &str) -> Option<&Link> {
        self.0.iter().find(|link| link.has_rel(rel))
    }

    pub(crate) fn node_refs(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.0.iter().map(NodeRef::from)
    }
}

impl Deref for LinkList {
    type Target = Vec<Link>;

    fn deref(&self) -> &Vec<Link> {
        &self.0
    }
}

impl DerefMut for LinkList {
    fn deref_mut(&mut self) -> &mut Vec<Link> {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a LinkList {
    type Item = &'a Link;
    type IntoIter = std::slice::Iter<'a, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<Link>> for LinkList {
    fn from(links: Vec<Link>) -> Self {
        Self(links)
    }
}

impl FromParsed for LinkList {
    fn from_parsed(value: ParsedValue) -> Option<Self> {
        Vec::<Link>::from_parsed(value).map(LinkList)
    }
}

/// Parser for every `links` field
pub(crate) fn links_parser() -> ValueParser {
    ValueParser::unique_array_of(ValueParser::type_of(NodeKind::Link))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> LinkList {
        LinkList::new(vec![
            Link::new("http://example.com/self").with_rel("self"),
            Link::new("http://example.com/a").with_rel("alternate"),
            Link::new("http://example.com/b")
                .with_rel("alternate")
                .with_rel("self"),
        ])
    }

    #[test]
    fn test_get_by_rel_scans_every_link() {
        let links = links();
        let selves: Vec<_> = links.get_by_rel("self").map(|l| l.href.as_str()).collect();
        assert_eq!(selves, ["http://example.com/self", "http://example.com/b"]);
        assert_eq!(
            links.first_by_rel("alternate").map(|l| l.href.as_str()),
            Some("http://example.com/a")
        );
        assert_eq!(links.get_by_rel("cover").count(), 0);
    }

    #[test]
    fn test_get_by_href() {
        let links = links();
        assert_eq!(links.get_by_href("http://example.com/a").count(), 1);
        assert_eq!(links.get_by_href("http://example.com/z").count(), 0);
    }

    #[test]
    fn test_structural_equality() {
        let a = Link::new("x").with_type("text/html");
        let mut b = Link::new("x");
        assert_ne!(a, b);
        b.media_type = Some("text/html".into());
        assert_eq!(a, b);
    }

    #[test]
    fn test_children_include_nested_links() {
        let mut link = Link::new("root");
        link.alternates.push(Link::new("alt"));
        link.children.push(Link::new("child"));
        link.properties = Some(LinkProperties::default());

        let kinds: Vec<_> = link.children().iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            [NodeKind::LinkProperties, NodeKind::Link, NodeKind::Link]
        );
    }
}
