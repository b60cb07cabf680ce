//! Per-format tables of collection roles, media types and link relations
//!
//! Extension formats build on the base tables by adding keys; redefining an
//! existing key is a contract violation reported as [`RegistryError::DuplicateKey`].

pub mod odl;
pub mod opds2;
pub mod rwpm;

use crate::logging::codes::{self, Code};
use crate::log_error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Registry '{registry}' already contains key '{key}'")]
    DuplicateKey { registry: &'static str, key: String },

    #[error("Registry '{registry}' does not contain key '{key}'")]
    UnknownKey { registry: &'static str, key: String },
}

impl RegistryError {
    pub fn error_code(&self) -> Code {
        match self {
            RegistryError::DuplicateKey { .. } => codes::registry::DUPLICATE_KEY,
            RegistryError::UnknownKey { .. } => codes::registry::UNKNOWN_KEY,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            RegistryError::DuplicateKey { .. } => "DuplicateKey",
            RegistryError::UnknownKey { .. } => "UnknownKey",
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}

/// Document format, ordered by extension: ODL extends OPDS 2.0 which extends RWPM
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum ManifestFormat {
    #[default]
    Rwpm,
    Opds2,
    Odl,
}

impl ManifestFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestFormat::Rwpm => "RWPM",
            ManifestFormat::Opds2 => "OPDS 2.0",
            ManifestFormat::Odl => "ODL",
        }
    }
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait RegistryItem {
    fn key(&self) -> &str;
}

/// Named subcollection slot and the rules attached to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionRole {
    pub key: &'static str,
    /// Collections under this role must be links only
    pub compact: bool,
    /// Every link under this role must declare a media type
    pub type_required: bool,
    /// The role must be present on the manifest
    pub required: bool,
}

impl CollectionRole {
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            compact: false,
            type_required: false,
            required: false,
        }
    }

    pub const fn compact(self) -> Self {
        Self {
            compact: true,
            ..self
        }
    }

    pub const fn type_required(self) -> Self {
        Self {
            type_required: true,
            ..self
        }
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }
}

impl RegistryItem for CollectionRole {
    fn key(&self) -> &str {
        self.key
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaType {
    pub key: &'static str,
}

impl MediaType {
    pub const fn new(key: &'static str) -> Self {
        Self { key }
    }
}

impl RegistryItem for MediaType {
    fn key(&self) -> &str {
        self.key
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkRelation {
    pub key: &'static str,
}

impl LinkRelation {
    pub const fn new(key: &'static str) -> Self {
        Self { key }
    }
}

impl RegistryItem for LinkRelation {
    fn key(&self) -> &str {
        self.key
    }
}

/// Ordered, key-unique table
#[derive(Debug, Clone, PartialEq)]
pub struct Registry<T> {
    name: &'static str,
    items: Vec<T>,
}

impl<T: RegistryItem + Clone> Registry<T> {
    pub fn new(
        name: &'static str,
        items: impl IntoIterator<Item = T>,
    ) -> Result<Self, RegistryError> {
        Self {
            name,
            items: Vec::new(),
        }
        .extend(items)
    }

    // Built-in tables; their key uniqueness is covered by tests
    fn from_static(name: &'static str, tables: &[&[T]]) -> Self {
        Self {
            name,
            items: tables.iter().flat_map(|t| t.iter().cloned()).collect(),
        }
    }

    /// A new registry with `items` appended
    pub fn extend(&self, items: impl IntoIterator<Item = T>) -> Result<Self, RegistryError> {
        let mut extended = self.clone();
        for item in items {
            if extended.contains(item.key()) {
                let error = RegistryError::DuplicateKey {
                    registry: self.name,
                    key: item.key().to_string(),
                };
                log_error!(error.error_code(), &error.to_string(),
                    "registry" => self.name
                );
                return Err(error);
            }
            extended.items.push(item);
        }
        Ok(extended)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }

    /// Like [`Registry::get`], failing with `UnknownKey`
    pub fn require(&self, key: &str) -> Result<&T, RegistryError> {
        self.get(key).ok_or_else(|| RegistryError::UnknownKey {
            registry: self.name,
            key: key.to_string(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.key())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// All registries for one document format
#[derive(Debug, Clone, PartialEq)]
pub struct FormatRegistries {
    pub format: ManifestFormat,
    pub roles: Registry<CollectionRole>,
    pub media_types: Registry<MediaType>,
    pub relations: Registry<LinkRelation>,
}

impl FormatRegistries {
    pub fn for_format(format: ManifestFormat) -> &'static FormatRegistries {
        match format {
            ManifestFormat::Rwpm => rwpm_registries(),
            ManifestFormat::Opds2 => opds2_registries(),
            ManifestFormat::Odl => odl_registries(),
        }
    }

    /// Same tables with additional roles
    pub fn with_roles(
        &self,
        roles: impl IntoIterator<Item = CollectionRole>,
    ) -> Result<Self, RegistryError> {
        Ok(Self {
            roles: self.roles.extend(roles)?,
            ..self.clone()
        })
    }

    pub fn role(&self, key: &str) -> Option<&CollectionRole> {
        self.roles.get(key)
    }

    pub fn required_roles(&self) -> impl Iterator<Item = &CollectionRole> {
        self.roles.iter().filter(|role| role.required)
    }
}

pub fn rwpm_registries() -> &'static FormatRegistries {
    static REGISTRIES: OnceLock<FormatRegistries> = OnceLock::new();
    REGISTRIES.get_or_init(|| FormatRegistries {
        format: ManifestFormat::Rwpm,
        roles: Registry::from_static("RWPM roles", &[rwpm::CORE_ROLES, rwpm::ROLES]),
        media_types: Registry::from_static("RWPM media types", &[rwpm::MEDIA_TYPES]),
        relations: Registry::from_static("RWPM link relations", &[rwpm::RELATIONS]),
    })
}

pub fn opds2_registries() -> &'static FormatRegistries {
    static REGISTRIES: OnceLock<FormatRegistries> = OnceLock::new();
    REGISTRIES.get_or_init(|| FormatRegistries {
        format: ManifestFormat::Opds2,
        roles: Registry::from_static("OPDS 2.0 roles", &[rwpm::CORE_ROLES, opds2::ROLES]),
        media_types: Registry::from_static(
            "OPDS 2.0 media types",
            &[rwpm::MEDIA_TYPES, opds2::MEDIA_TYPES],
        ),
        relations: Registry::from_static(
            "OPDS 2.0 link relations",
            &[rwpm::RELATIONS, opds2::RELATIONS],
        ),
    })
}

pub fn odl_registries() -> &'static FormatRegistries {
    static REGISTRIES: OnceLock<FormatRegistries> = OnceLock::new();
    REGISTRIES.get_or_init(|| FormatRegistries {
        format: ManifestFormat::Odl,
        roles: Registry::from_static(
            "ODL roles",
            &[rwpm::CORE_ROLES, opds2::ROLES, odl::ROLES],
        ),
        media_types: Registry::from_static(
            "ODL media types",
            &[rwpm::MEDIA_TYPES, opds2::MEDIA_TYPES, odl::MEDIA_TYPES],
        ),
        relations: Registry::from_static(
            "ODL link relations",
            &[rwpm::RELATIONS, opds2::RELATIONS],
        ),
    })
}
