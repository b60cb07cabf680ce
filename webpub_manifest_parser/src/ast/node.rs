//! Closed sum types over every AST node type

use super::*;
use crate::parsers::{FromParsed, ParsedValue, ValueParsingError};
use crate::properties::AstNode;
use crate::syntax::SyntaxAnalyzer;
use serde_json::Value;

macro_rules! node_kinds {
    ($($kind:ident => $ty:ty),+ $(,)?) => {
        /// Tag identifying a node type
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NodeKind {
            $($kind),+
        }

        /// An owned node of any type
        #[derive(Debug, Clone, PartialEq)]
        pub enum Node {
            $($kind($ty)),+
        }

        /// A borrowed node of any type
        #[derive(Debug, Clone, Copy)]
        pub enum NodeRef<'a> {
            $($kind(&'a $ty)),+
        }

        impl NodeKind {
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$kind),+];

            pub fn name(&self) -> &'static str {
                match self {
                    $(NodeKind::$kind => stringify!($kind)),+
                }
            }

            pub(crate) fn construct(
                self,
                analyzer: &mut SyntaxAnalyzer,
                raw: &Value,
            ) -> Result<Node, ValueParsingError> {
                match self {
                    $(NodeKind::$kind => analyzer.analyze_node::<$ty>(raw).map(Node::from)),+
                }
            }
        }

        impl Node {
            pub fn kind(&self) -> NodeKind {
                match self {
                    $(Node::$kind(_) => NodeKind::$kind),+
                }
            }

            pub fn as_node_ref(&self) -> NodeRef<'_> {
                match self {
                    $(Node::$kind(node) => NodeRef::$kind(node)),+
                }
            }
        }

        impl<'a> NodeRef<'a> {
            pub fn kind(&self) -> NodeKind {
                match self {
                    $(NodeRef::$kind(_) => NodeKind::$kind),+
                }
            }

            pub fn children(&self) -> Vec<NodeRef<'a>> {
                match *self {
                    $(NodeRef::$kind(node) => node.children()),+
                }
            }

            pub fn to_owned_node(&self) -> Node {
                match *self {
                    $(NodeRef::$kind(node) => Node::$kind(node.clone())),+
                }
            }

            fn address(&self) -> *const () {
                match *self {
                    $(NodeRef::$kind(node) => node as *const $ty as *const ()),+
                }
            }
        }

        $(
            impl From<$ty> for Node {
                fn from(node: $ty) -> Self {
                    Node::$kind(node)
                }
            }

            impl<'a> From<&'a $ty> for NodeRef<'a> {
                fn from(node: &'a $ty) -> Self {
                    NodeRef::$kind(node)
                }
            }

            impl TryFrom<Node> for $ty {
                type Error = Node;

                fn try_from(node: Node) -> Result<Self, Node> {
                    match node {
                        Node::$kind(inner) => Ok(inner),
                        other => Err(other),
                    }
                }
            }

            const _: () = assert!(matches!(<$ty as AstNode>::KIND, NodeKind::$kind));
        )+
    };
}

node_kinds! {
    Link => Link,
    LinkProperties => LinkProperties,
    Opds2LinkProperties => Opds2LinkProperties,
    Price => Price,
    AcquisitionObject => AcquisitionObject,
    Holds => Holds,
    Copies => Copies,
    Availability => Availability,
    Contributor => Contributor,
    Subject => Subject,
    Owner => Owner,
    Metadata => Metadata,
    PresentationMetadata => PresentationMetadata,
    CompactCollection => CompactCollection,
    Collection => Collection,
    RwpmManifest => RwpmManifest,
    Opds2FeedMetadata => Opds2FeedMetadata,
    Opds2Publication => Opds2Publication,
    Opds2Navigation => Opds2Navigation,
    Opds2Facet => Opds2Facet,
    Opds2Group => Opds2Group,
    Opds2Feed => Opds2Feed,
    LicenseTerms => LicenseTerms,
    LicenseProtection => LicenseProtection,
    LicenseMetadata => LicenseMetadata,
    OdlLicense => OdlLicense,
    OdlPublication => OdlPublication,
    OdlFeed => OdlFeed,
}

impl NodeKind {
    /// Compact collections may be written as a bare array of links
    pub fn accepts_link_array(&self) -> bool {
        matches!(self, NodeKind::CompactCollection | NodeKind::Opds2Navigation)
    }

    /// The more general kind this one specializes, if any
    pub fn generalizes_to(self) -> Option<NodeKind> {
        use NodeKind::*;
        match self {
            Collection | Opds2Navigation => Some(CompactCollection),
            RwpmManifest | Opds2Feed | Opds2Publication | Opds2Facet | Opds2Group | OdlLicense => {
                Some(Collection)
            }
            OdlFeed => Some(Opds2Feed),
            OdlPublication => Some(Opds2Publication),
            PresentationMetadata => Some(Metadata),
            Opds2LinkProperties => Some(LinkProperties),
            _ => None,
        }
    }

    /// True when `self` is `other` or specializes it
    pub fn is_a(self, other: NodeKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == other {
                return true;
            }
            current = kind.generalizes_to();
        }
        false
    }
}

impl<'a> NodeRef<'a> {
    /// Same node in memory, not merely equal
    pub fn is_same(&self, other: &NodeRef<'_>) -> bool {
        self.kind() == other.kind() && std::ptr::eq(self.address(), other.address())
    }
}

/// Typed nodes convert out of [`ParsedValue::Node`]
macro_rules! from_parsed_node {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FromParsed for $ty {
                fn from_parsed(value: ParsedValue) -> Option<Self> {
                    match value {
                        ParsedValue::Node(node) => <$ty>::try_from(*node).ok(),
                        _ => None,
                    }
                }
            }
        )+
    };
}

// Contributor and Subject also accept a bare name; see metadata.rs
from_parsed_node! {
    Link,
    LinkProperties,
    Opds2LinkProperties,
    Price,
    AcquisitionObject,
    Holds,
    Copies,
    Availability,
    Owner,
    Metadata,
    PresentationMetadata,
    CompactCollection,
    Collection,
    RwpmManifest,
    Opds2FeedMetadata,
    Opds2Publication,
    Opds2Navigation,
    Opds2Facet,
    Opds2Group,
    Opds2Feed,
    LicenseTerms,
    LicenseProtection,
    LicenseMetadata,
    OdlLicense,
    OdlPublication,
    OdlFeed,
}
