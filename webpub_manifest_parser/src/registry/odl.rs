//! ODL roles and media types

use super::{CollectionRole, MediaType};

pub const LICENSES: CollectionRole = CollectionRole::new("licenses").compact();

pub const ROLES: &[CollectionRole] = &[LICENSES];

pub const LICENSE_INFO_DOCUMENT: MediaType = MediaType::new("application/vnd.odl.info+json");
pub const LICENSE_STATUS_DOCUMENT: MediaType =
    MediaType::new("application/vnd.readium.license.status.v1.0+json");

pub const MEDIA_TYPES: &[MediaType] = &[LICENSE_INFO_DOCUMENT, LICENSE_STATUS_DOCUMENT];
