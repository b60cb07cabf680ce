//! OPDS 2.0 roles, media types and link relations

use super::{CollectionRole, LinkRelation, MediaType};

pub const NAVIGATION: CollectionRole = CollectionRole::new("navigation").compact();
pub const IMAGES: CollectionRole = CollectionRole::new("images").compact();
pub const PUBLICATIONS: CollectionRole = CollectionRole::new("publications");
pub const FACETS: CollectionRole = CollectionRole::new("facets");
pub const GROUPS: CollectionRole = CollectionRole::new("groups");

pub const ROLES: &[CollectionRole] = &[NAVIGATION, IMAGES, PUBLICATIONS, FACETS, GROUPS];

pub const OPDS_FEED: MediaType = MediaType::new("application/opds+json");
pub const OPDS_PUBLICATION: MediaType = MediaType::new("application/opds-publication+json");
pub const WEBPUB_PACKAGE: MediaType = MediaType::new("application/webpub+zip");
pub const EPUB: MediaType = MediaType::new("application/epub+zip");

pub const MEDIA_TYPES: &[MediaType] = &[OPDS_FEED, OPDS_PUBLICATION, WEBPUB_PACKAGE, EPUB];

pub const PREVIEW: LinkRelation = LinkRelation::new("preview");
pub const ACQUISITION: LinkRelation = LinkRelation::new("http://opds-spec.org/acquisition");
pub const OPEN_ACCESS: LinkRelation =
    LinkRelation::new("http://opds-spec.org/acquisition/open-access");
pub const BORROW: LinkRelation = LinkRelation::new("http://opds-spec.org/acquisition/borrow");
pub const BUY: LinkRelation = LinkRelation::new("http://opds-spec.org/acquisition/buy");
pub const SAMPLE: LinkRelation = LinkRelation::new("http://opds-spec.org/acquisition/sample");
pub const SUBSCRIBE: LinkRelation =
    LinkRelation::new("http://opds-spec.org/acquisition/subscribe");

pub const RELATIONS: &[LinkRelation] = &[
    PREVIEW, ACQUISITION, OPEN_ACCESS, BORROW, BUY, SAMPLE, SUBSCRIBE,
];

/// Relations that make a publication link an acquisition link
pub const ACQUISITION_RELATIONS: &[LinkRelation] = &[
    PREVIEW,
    ACQUISITION,
    BUY,
    OPEN_ACCESS,
    BORROW,
    SAMPLE,
    SUBSCRIBE,
    super::rwpm::ALTERNATE,
];

/// ISO 4217 currency codes accepted in prices
pub const CURRENCIES: &[&str] = &[
    "AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN", "BAM", "BBD", "BDT",
    "BGN", "BHD", "BIF", "BMD", "BND", "BOB", "BOV", "BRL", "BSD", "BTN", "BWP", "BYN", "BZD",
    "CAD", "CDF", "CHE", "CHF", "CHW", "CLF", "CLP", "CNY", "COP", "COU", "CRC", "CUC", "CUP",
    "CVE", "CZK", "DJF", "DKK", "DOP", "DZD", "EGP", "ERN", "ETB", "EUR", "FJD", "FKP", "GBP",
    "GEL", "GHS", "GIP", "GMD", "GNF", "GTQ", "GYD", "HKD", "HNL", "HRK", "HTG", "HUF", "IDR",
    "ILS", "INR", "IQD", "IRR", "ISK", "JMD", "JOD", "JPY", "KES", "KGS", "KHR", "KMF", "KPW",
    "KRW", "KWD", "KYD", "KZT", "LAK", "LBP", "LKR", "LRD", "LSL", "LYD", "MAD", "MDL", "MGA",
    "MKD", "MMK", "MNT", "MOP", "MRU", "MUR", "MVR", "MWK", "MXN", "MXV", "MYR", "MZN", "NAD",
    "NGN", "NIO", "NOK", "NPR", "NZD", "OMR", "PAB", "PEN", "PGK", "PHP", "PKR", "PLN", "PYG",
    "QAR", "RON", "RSD", "RUB", "RWF", "SAR", "SBD", "SCR", "SDG", "SEK", "SGD", "SHP", "SLL",
    "SOS", "SRD", "SSP", "STN", "SVC", "SYP", "SZL", "THB", "TJS", "TMT", "TND", "TOP", "TRY",
    "TTD", "TWD", "TZS", "UAH", "UGX", "USD", "USN", "UYI", "UYU", "UYW", "UZS", "VES", "VND",
    "VUV", "WST", "XAF", "XAG", "XAU", "XBA", "XBB", "XBC", "XBD", "XCD", "XDR", "XOF", "XPD",
    "XPF", "XPT", "XSU", "XTS", "XUA", "XXX", "YER", "ZAR", "ZMW", "ZWL",
];
