//! Typed AST produced by the syntax analyzer
//!
//! Nodes own their children, so the tree is acyclic by construction; equality
//! is structural. [`Node`] and [`NodeRef`] are closed sum types over every
//! node type, used wherever a node's type is only known at run time.

pub mod collection;
pub mod link;
pub mod manifest;
pub mod metadata;
pub mod node;
pub mod odl;
pub mod opds2;

pub use collection::{Collection, CollectionList, CompactCollection};
pub use link::{Link, LinkList, LinkProperties};
pub use manifest::{Manifestlike, RwpmManifest};
pub use metadata::{Contributor, Metadata, Owner, PresentationMetadata, Subject};
pub use node::{Node, NodeKind, NodeRef};
pub use odl::{LicenseMetadata, LicenseProtection, LicenseTerms, OdlFeed, OdlLicense, OdlPublication};
pub use opds2::{
    AcquisitionObject, Availability, Copies, Holds, Opds2Facet, Opds2Feed, Opds2FeedMetadata,
    Opds2Group, Opds2LinkProperties, Opds2Navigation, Opds2Publication, Price,
};
