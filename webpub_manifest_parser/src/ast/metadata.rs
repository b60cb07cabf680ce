use super::link::{links_parser, FIT, ORIENTATION, SPREAD};
use super::{LinkList, Node, NodeKind, NodeRef};
use crate::parsers::{Bounds, DateValue, FromParsed, LocalizableString, ParsedValue, ValueParser};
use crate::properties::{set, set_opt, AstNode, PropertyDescriptor};
use chrono::{DateTime, FixedOffset};
use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

/// A person or organisation credited on a publication
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contributor {
    pub name: LocalizableString,
    pub identifier: Option<String>,
    pub sort_as: Option<String>,
    pub roles: Vec<String>,
    pub position: Option<f64>,
    pub links: LinkList,
}

impl Contributor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: LocalizableString::Plain(name.into()),
            ..Self::default()
        }
    }
}

/// A bare string names the contributor
impl FromParsed for Contributor {
    fn from_parsed(value: ParsedValue) -> Option<Self> {
        match value {
            ParsedValue::String(name) => Some(Contributor::named(name)),
            ParsedValue::Node(node) => match *node {
                Node::Contributor(contributor) => Some(contributor),
                _ => None,
            },
            _ => None,
        }
    }
}

impl AstNode for Contributor {
    const KIND: NodeKind = NodeKind::Contributor;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<Contributor>>> = OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "name",
                    "name",
                    ValueParser::localizable(),
                    set(|c: &mut Contributor| &mut c.name),
                )
                .required(),
                PropertyDescriptor::new(
                    "identifier",
                    "identifier",
                    ValueParser::Uri,
                    set_opt(|c: &mut Contributor| &mut c.identifier),
                ),
                PropertyDescriptor::new(
                    "sort_as",
                    "sortAs",
                    ValueParser::String,
                    set_opt(|c: &mut Contributor| &mut c.sort_as),
                ),
                PropertyDescriptor::new(
                    "roles",
                    "role",
                    ValueParser::string_or_list(),
                    set(|c: &mut Contributor| &mut c.roles),
                ),
                PropertyDescriptor::new(
                    "position",
                    "position",
                    ValueParser::number(Bounds::NONE),
                    set_opt(|c: &mut Contributor| &mut c.position),
                ),
                PropertyDescriptor::new(
                    "links",
                    "links",
                    links_parser(),
                    set(|c: &mut Contributor| &mut c.links),
                ),
            ]
        })
    }

    fn children(&self) -> Vec<NodeRef<'_>> {
        self.links.node_refs().collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subject {
    pub name: LocalizableString,
    pub sort_as: Option<String>,
    pub code: Option<String>,
    pub scheme: Option<String>,
    pub links: LinkList,
}

impl FromParsed for Subject {
    fn from_parsed(value: ParsedValue) -> Option<Self> {
        match value {
            ParsedValue::String(name) => Some(Subject {
                name: LocalizableString::Plain(name),
                ..Subject::default()
            }),
            ParsedValue::Node(node) => match *node {
                Node::Subject(subject) => Some(subject),
                _ => None,
            },
            _ => None,
        }
    }
}

impl AstNode for Subject {
    const KIND: NodeKind = NodeKind::Subject;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<Subject>>> = OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "name",
                    "name",
                    ValueParser::localizable(),
                    set(|s: &mut Subject| &mut s.name),
                )
                .required(),
                PropertyDescriptor::new(
                    "sort_as",
                    "sortAs",
                    ValueParser::String,
                    set_opt(|s: &mut Subject| &mut s.sort_as),
                ),
                PropertyDescriptor::new(
                    "code",
                    "code",
                    ValueParser::String,
                    set_opt(|s: &mut Subject| &mut s.code),
                ),
                PropertyDescriptor::new(
                    "scheme",
                    "scheme",
                    ValueParser::Uri,
                    set_opt(|s: &mut Subject| &mut s.scheme),
                ),
                PropertyDescriptor::new(
                    "links",
                    "links",
                    links_parser(),
                    set(|s: &mut Subject| &mut s.links),
                ),
            ]
        })
    }

    fn children(&self) -> Vec<NodeRef<'_>> {
        self.links.node_refs().collect()
    }
}

/// Collections and series a publication belongs to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Owner {
    pub collection: Vec<Contributor>,
    pub series: Vec<Contributor>,
}

impl AstNode for Owner {
    const KIND: NodeKind = NodeKind::Owner;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<Owner>>> = OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "collection",
                    "collection",
                    ValueParser::one_or_many_named(NodeKind::Contributor),
                    set(|o: &mut Owner| &mut o.collection),
                ),
                PropertyDescriptor::new(
                    "series",
                    "series",
                    ValueParser::one_or_many_named(NodeKind::Contributor),
                    set(|o: &mut Owner| &mut o.series),
                ),
            ]
        })
    }

    fn children(&self) -> Vec<NodeRef<'_>> {
        self.collection
            .iter()
            .chain(&self.series)
            .map(NodeRef::from)
            .collect()
    }
}

const READING_PROGRESSION: &[&str] = &["rtl", "ltr", "ttb", "btt", "auto"];
const OVERFLOW: &[&str] = &["auto", "paginated", "scrolled", "scrolled-continuous"];

/// Descriptive metadata of a publication
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub identifier: Option<String>,
    /// `@type`
    pub schema_type: Option<String>,
    pub title: LocalizableString,
    pub subtitle: Option<LocalizableString>,
    pub modified: Option<DateTime<FixedOffset>>,
    pub published: Option<DateValue>,
    pub languages: Vec<String>,
    pub sort_as: Option<String>,
    pub authors: Vec<Contributor>,
    pub translators: Vec<Contributor>,
    pub editors: Vec<Contributor>,
    pub artists: Vec<Contributor>,
    pub illustrators: Vec<Contributor>,
    pub letterers: Vec<Contributor>,
    pub pencilers: Vec<Contributor>,
    pub colorists: Vec<Contributor>,
    pub inkers: Vec<Contributor>,
    pub narrators: Vec<Contributor>,
    pub contributors: Vec<Contributor>,
    pub publishers: Vec<Contributor>,
    pub imprints: Vec<Contributor>,
    pub subjects: Vec<Subject>,
    pub reading_progression: Option<String>,
    pub description: Option<String>,
    pub duration: Option<f64>,
    pub number_of_pages: Option<i64>,
    pub belongs_to: Option<Owner>,
}

impl Metadata {
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Title if set, identifier otherwise
    pub fn label(&self) -> String {
        if !self.title.is_empty() {
            self.title.to_string()
        } else {
            self.identifier.clone().unwrap_or_default()
        }
    }

    /// Every credited contributor, role by role
    pub fn all_contributors(&self) -> impl Iterator<Item = &Contributor> {
        [
            &self.authors,
            &self.translators,
            &self.editors,
            &self.artists,
            &self.illustrators,
            &self.letterers,
            &self.pencilers,
            &self.colorists,
            &self.inkers,
            &self.narrators,
            &self.contributors,
            &self.publishers,
            &self.imprints,
        ]
        .into_iter()
        .flatten()
    }
}

fn contributor_role(
    name: &'static str,
    key: &'static str,
    field: fn(&mut Metadata) -> &mut Vec<Contributor>,
) -> PropertyDescriptor<Metadata> {
    PropertyDescriptor::new(
        name,
        key,
        ValueParser::one_or_many_named(NodeKind::Contributor),
        set(field),
    )
}

impl AstNode for Metadata {
    const KIND: NodeKind = NodeKind::Metadata;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<Metadata>>> = OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            vec![
                PropertyDescriptor::new(
                    "identifier",
                    "identifier",
                    ValueParser::Uri,
                    set_opt(|m: &mut Metadata| &mut m.identifier),
                ),
                PropertyDescriptor::new(
                    "schema_type",
                    "@type",
                    ValueParser::Uri,
                    set_opt(|m: &mut Metadata| &mut m.schema_type),
                ),
                PropertyDescriptor::new(
                    "title",
                    "title",
                    ValueParser::localizable(),
                    set(|m: &mut Metadata| &mut m.title),
                )
                .required(),
                PropertyDescriptor::new(
                    "subtitle",
                    "subtitle",
                    ValueParser::localizable(),
                    set_opt(|m: &mut Metadata| &mut m.subtitle),
                ),
                PropertyDescriptor::new(
                    "modified",
                    "modified",
                    ValueParser::DateTime,
                    set_opt(|m: &mut Metadata| &mut m.modified),
                ),
                PropertyDescriptor::new(
                    "published",
                    "published",
                    ValueParser::date_or_time(),
                    set_opt(|m: &mut Metadata| &mut m.published),
                ),
                PropertyDescriptor::new(
                    "languages",
                    "language",
                    ValueParser::languages(),
                    set(|m: &mut Metadata| &mut m.languages),
                ),
                PropertyDescriptor::new(
                    "sort_as",
                    "sortAs",
                    ValueParser::String,
                    set_opt(|m: &mut Metadata| &mut m.sort_as),
                ),
                contributor_role("authors", "author", |m| &mut m.authors),
                contributor_role("translators", "translator", |m| &mut m.translators),
                contributor_role("editors", "editor", |m| &mut m.editors),
                contributor_role("artists", "artist", |m| &mut m.artists),
                contributor_role("illustrators", "illustrator", |m| &mut m.illustrators),
                contributor_role("letterers", "letterer", |m| &mut m.letterers),
                contributor_role("pencilers", "penciler", |m| &mut m.pencilers),
                contributor_role("colorists", "colorist", |m| &mut m.colorists),
                contributor_role("inkers", "inker", |m| &mut m.inkers),
                contributor_role("narrators", "narrator", |m| &mut m.narrators),
                contributor_role("contributors", "contributor", |m| &mut m.contributors),
                contributor_role("publishers", "publisher", |m| &mut m.publishers),
                contributor_role("imprints", "imprint", |m| &mut m.imprints),
                PropertyDescriptor::new(
                    "subjects",
                    "subject",
                    ValueParser::one_or_many_named(NodeKind::Subject),
                    set(|m: &mut Metadata| &mut m.subjects),
                ),
                PropertyDescriptor::new(
                    "reading_progression",
                    "readingProgression",
                    ValueParser::Enum(READING_PROGRESSION),
                    set_opt(|m: &mut Metadata| &mut m.reading_progression),
                ),
                PropertyDescriptor::new(
                    "description",
                    "description",
                    ValueParser::String,
                    set_opt(|m: &mut Metadata| &mut m.description),
                ),
                PropertyDescriptor::new(
                    "duration",
                    "duration",
                    ValueParser::number(Bounds::exclusive_minimum(0.0)),
                    set_opt(|m: &mut Metadata| &mut m.duration),
                ),
                PropertyDescriptor::new(
                    "number_of_pages",
                    "numberOfPages",
                    ValueParser::integer(Bounds::exclusive_minimum(0.0)),
                    set_opt(|m: &mut Metadata| &mut m.number_of_pages),
                ),
                PropertyDescriptor::new(
                    "belongs_to",
                    "belongsTo",
                    ValueParser::type_of(NodeKind::Owner),
                    set_opt(|m: &mut Metadata| &mut m.belongs_to),
                ),
            ]
        })
    }

    fn children(&self) -> Vec<NodeRef<'_>> {
        self.all_contributors()
            .map(NodeRef::from)
            .chain(self.subjects.iter().map(NodeRef::from))
            .chain(self.belongs_to.iter().map(NodeRef::from))
            .collect()
    }
}

/// Metadata plus presentation hints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresentationMetadata {
    pub metadata: Metadata,
    pub clipped: Option<bool>,
    pub continuous: Option<bool>,
    pub fit: Option<String>,
    pub orientation: Option<String>,
    pub overflow: Option<String>,
    pub spread: Option<String>,
}

impl PresentationMetadata {
    pub fn titled(title: &str) -> Self {
        Self {
            metadata: Metadata::titled(title),
            ..Self::default()
        }
    }
}

impl Deref for PresentationMetadata {
    type Target = Metadata;

    fn deref(&self) -> &Metadata {
        &self.metadata
    }
}

impl DerefMut for PresentationMetadata {
    fn deref_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

impl AstNode for PresentationMetadata {
    const KIND: NodeKind = NodeKind::PresentationMetadata;

    fn descriptors() -> &'static [PropertyDescriptor<Self>] {
        static DESCRIPTORS: OnceLock<Vec<PropertyDescriptor<PresentationMetadata>>> =
            OnceLock::new();
        DESCRIPTORS.get_or_init(|| {
            let mut descriptors: Vec<_> = Metadata::descriptors()
                .iter()
                .map(|descriptor| {
                    PropertyDescriptor::lift(descriptor, |p: &mut PresentationMetadata| {
                        &mut p.metadata
                    })
                })
                .collect();
            descriptors.extend([
                PropertyDescriptor::new(
                    "clipped",
                    "clipped",
                    ValueParser::Boolean,
                    set_opt(|p: &mut PresentationMetadata| &mut p.clipped),
                ),
                PropertyDescriptor::new(
                    "continuous",
                    "continuous",
                    ValueParser::Boolean,
                    set_opt(|p: &mut PresentationMetadata| &mut p.continuous),
                ),
                PropertyDescriptor::new(
                    "fit",
                    "fit",
                    ValueParser::Enum(FIT),
                    set_opt(|p: &mut PresentationMetadata| &mut p.fit),
                ),
                PropertyDescriptor::new(
                    "orientation",
                    "orientation",
                    ValueParser::Enum(ORIENTATION),
                    set_opt(|p: &mut PresentationMetadata| &mut p.orientation),
                ),
                PropertyDescriptor::new(
                    "overflow",
                    "overflow",
                    ValueParser::Enum(OVERFLOW),
                    set_opt(|p: &mut PresentationMetadata| &mut p.overflow),
                ),
                PropertyDescriptor::new(
                    "spread",
                    "spread",
                    ValueParser::Enum(SPREAD),
                    set_opt(|p: &mut PresentationMetadata| &mut p.spread),
                ),
            ]);
            descriptors
        })
    }

    fn children(&self) -> Vec<NodeRef<'_>> {
        vec![NodeRef::from(&self.metadata)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contributor_from_bare_name() {
        let contributor = Contributor::from_parsed(ParsedValue::String("Ann".into())).unwrap();
        assert_eq!(contributor, Contributor::named("Ann"));

        let list = Vec::<Contributor>::from_parsed(ParsedValue::List(vec![
            ParsedValue::String("Ann".into()),
            ParsedValue::Node(Box::new(Node::from(Contributor::named("Bob")))),
        ]))
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].name.to_string(), "Bob");
    }

    #[test]
    fn test_label_falls_back_to_identifier() {
        let mut metadata = Metadata::default();
        metadata.identifier = Some("urn:isbn:123".into());
        assert_eq!(metadata.label(), "urn:isbn:123");

        metadata.title = "Moby Dick".into();
        assert_eq!(metadata.label(), "Moby Dick");
    }

    #[test]
    fn test_presentation_metadata_includes_base_fields() {
        let keys: Vec<_> = PresentationMetadata::descriptors()
            .iter()
            .map(|d| d.key)
            .collect();
        assert!(keys.contains(&"title"));
        assert!(keys.contains(&"belongsTo"));
        assert!(keys.contains(&"overflow"));
        assert_eq!(
            keys.len(),
            Metadata::descriptors().len() + 6
        );
    }
}
