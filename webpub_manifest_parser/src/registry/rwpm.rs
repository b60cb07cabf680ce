//! Readium Web Publication Manifest roles, media types and link relations

use super::{CollectionRole, LinkRelation, MediaType};

// Roles shared by every format
pub const RESOURCES: CollectionRole = CollectionRole::new("resources").compact().type_required();
pub const TOC: CollectionRole = CollectionRole::new("toc").compact();
pub const GUIDED: CollectionRole = CollectionRole::new("guided").compact();
pub const LANDMARKS: CollectionRole = CollectionRole::new("landmarks").compact();
pub const LOA: CollectionRole = CollectionRole::new("loa").compact();
pub const LOI: CollectionRole = CollectionRole::new("loi").compact();
pub const LOT: CollectionRole = CollectionRole::new("lot").compact();
pub const LOV: CollectionRole = CollectionRole::new("lov").compact();
pub const PAGE_LIST: CollectionRole = CollectionRole::new("pageList").compact();

pub const CORE_ROLES: &[CollectionRole] = &[
    RESOURCES, TOC, GUIDED, LANDMARKS, LOA, LOI, LOT, LOV, PAGE_LIST,
];

pub const READING_ORDER: CollectionRole = CollectionRole::new("readingOrder")
    .compact()
    .type_required()
    .required();

pub const ROLES: &[CollectionRole] = &[READING_ORDER];

pub const WEBPUB_MANIFEST: MediaType = MediaType::new("application/webpub+json");
pub const JPEG: MediaType = MediaType::new("image/jpeg");
pub const PNG: MediaType = MediaType::new("image/png");
pub const GIF: MediaType = MediaType::new("image/gif");
pub const WEBP: MediaType = MediaType::new("image/webp");
pub const SVG: MediaType = MediaType::new("image/svg+xml");
pub const HTML: MediaType = MediaType::new("text/html");

pub const MEDIA_TYPES: &[MediaType] = &[WEBPUB_MANIFEST, JPEG, PNG, GIF, WEBP, SVG, HTML];

pub const ALTERNATE: LinkRelation = LinkRelation::new("alternate");
pub const CONTENTS: LinkRelation = LinkRelation::new("contents");
pub const COVER: LinkRelation = LinkRelation::new("cover");
pub const MANIFEST: LinkRelation = LinkRelation::new("manifest");
pub const SEARCH: LinkRelation = LinkRelation::new("search");
pub const SELF: LinkRelation = LinkRelation::new("self");

pub const RELATIONS: &[LinkRelation] = &[ALTERNATE, CONTENTS, COVER, MANIFEST, SEARCH, SELF];
