//! Property descriptors: the per-node-type reflection tables
//!
//! Every AST node type publishes an ordered table of [`PropertyDescriptor`]s.
//! The syntax analyzer walks the table to pull fields out of raw JSON; nothing
//! else about a node's shape is hand-written per type.

use crate::ast::{CollectionList, NodeKind, NodeRef};
use crate::parsers::{FromParsed, ParsedValue, ValueParser};
use crate::registry::ManifestFormat;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

type Assign<T> = Box<dyn Fn(&mut T, ParsedValue) -> bool + Send + Sync>;

/// One named field of node type `T`
pub struct PropertyDescriptor<T> {
    /// Attribute name on the Rust type
    pub name: &'static str,
    /// Key in the raw JSON object
    pub key: &'static str,
    pub required: bool,
    pub parser: ValueParser,
    /// First format whose documents carry this field
    pub since: ManifestFormat,
    assign: Assign<T>,
}

impl<T: 'static> PropertyDescriptor<T> {
    pub fn new(
        name: &'static str,
        key: &'static str,
        parser: ValueParser,
        assign: impl Fn(&mut T, ParsedValue) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            key,
            required: false,
            parser,
            since: ManifestFormat::Rwpm,
            assign: Box::new(assign),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn since(mut self, format: ManifestFormat) -> Self {
        self.since = format;
        self
    }

    /// Whether documents of `format` carry this field
    pub fn applies_to(&self, format: ManifestFormat) -> bool {
        format >= self.since
    }

    /// Store a parsed value; `false` when it has the wrong shape for the field
    pub fn assign(&self, target: &mut T, value: ParsedValue) -> bool {
        (self.assign)(target, value)
    }

    /// Re-target a descriptor of an embedded type `B` onto the embedding type `T`
    pub fn lift<B: 'static>(
        base: &'static PropertyDescriptor<B>,
        project: fn(&mut T) -> &mut B,
    ) -> Self {
        Self {
            name: base.name,
            key: base.key,
            required: base.required,
            parser: base.parser.clone(),
            since: base.since,
            assign: Box::new(move |target, value| base.assign(project(target), value)),
        }
    }
}

impl<T> fmt::Debug for PropertyDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("required", &self.required)
            .field("since", &self.since)
            .finish()
    }
}

/// Assignment into a plain field
pub fn set<T, V: FromParsed>(
    field: fn(&mut T) -> &mut V,
) -> impl Fn(&mut T, ParsedValue) -> bool + Send + Sync {
    move |target, value| match V::from_parsed(value) {
        Some(value) => {
            *field(target) = value;
            true
        }
        None => false,
    }
}

/// Assignment into an optional field
pub fn set_opt<T, V: FromParsed>(
    field: fn(&mut T) -> &mut Option<V>,
) -> impl Fn(&mut T, ParsedValue) -> bool + Send + Sync {
    move |target, value| match V::from_parsed(value) {
        Some(value) => {
            *field(target) = Some(value);
            true
        }
        None => false,
    }
}

/// A node type the syntax analyzer can build from a raw JSON object
pub trait AstNode: Default + Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    const KIND: NodeKind;

    fn descriptors() -> &'static [PropertyDescriptor<Self>];

    /// Target for keys naming a registered collection role
    fn sub_collections_mut(&mut self) -> Option<&mut CollectionList> {
        None
    }

    /// Target for keys that match neither a descriptor nor a role
    fn extra_mut(&mut self) -> Option<&mut BTreeMap<String, Value>> {
        None
    }

    /// Direct child nodes, in declaration order
    fn children(&self) -> Vec<NodeRef<'_>> {
        Vec::new()
    }

    fn descriptor(name: &str) -> Option<&'static PropertyDescriptor<Self>> {
        Self::descriptors().iter().find(|d| d.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Link, Metadata, PresentationMetadata};

    #[test]
    fn test_descriptor_names_are_unique_per_type() {
        fn unique<T: AstNode>() {
            let mut names: Vec<_> = T::descriptors().iter().map(|d| d.name).collect();
            let total = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), total, "duplicate descriptor in {:?}", T::KIND);
        }

        unique::<Link>();
        unique::<Metadata>();
        unique::<PresentationMetadata>();
        unique::<crate::ast::RwpmManifest>();
        unique::<crate::ast::Opds2Feed>();
        unique::<crate::ast::OdlFeed>();
    }

    #[test]
    fn test_lifted_descriptors_keep_base_metadata() {
        let title = PresentationMetadata::descriptor("title").unwrap();
        assert_eq!(title.key, "title");
        assert!(title.required);

        let mut metadata = PresentationMetadata::default();
        assert!(title.assign(&mut metadata, ParsedValue::String("T".into())));
        assert_eq!(metadata.title.to_string(), "T");

        assert!(!title.assign(&mut metadata, ParsedValue::Integer(1)));
    }

    #[test]
    fn test_set_helpers_reject_wrong_shapes() {
        let height = Link::descriptor("height").unwrap();
        let mut link = Link::default();

        assert!(height.assign(&mut link, ParsedValue::Integer(10)));
        assert_eq!(link.height, Some(10));
        assert!(!height.assign(&mut link, ParsedValue::String("10".into())));
        assert_eq!(link.height, Some(10));
    }

    #[test]
    fn test_format_gating() {
        let price = crate::ast::LinkProperties::descriptor("price").unwrap();
        assert!(!price.applies_to(ManifestFormat::Rwpm));
        assert!(price.applies_to(ManifestFormat::Opds2));
        assert!(price.applies_to(ManifestFormat::Odl));
    }
}
