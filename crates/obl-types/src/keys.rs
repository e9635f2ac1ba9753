//! Ledger key scheme.
//!
//! All records share one flat keyspace. Issuers are keyed by their bare
//! email, so the other record kinds use a fixed key or a prefix. An issuer
//! email that falls in one of those namespaces (see [`is_reserved_key`])
//! must be refused before it is written:
//!
//! - `issuer-list`: the singleton [`IssuerList`](crate::IssuerList)
//! - `<email>`: an [`Issuer`](crate::Issuer)
//! - `badge:<slug>`: a [`Badge`](crate::Badge)
//! - `cert:<recipient email>-<slug>`: a [`Certificate`](crate::Certificate)

/// Key of the singleton issuer list.
pub const ISSUER_LIST_KEY: &str = "issuer-list";

/// Prefix for badge keys.
pub const BADGE_PREFIX: &str = "badge:";

/// Prefix for certificate keys.
pub const CERT_PREFIX: &str = "cert:";

/// Whether `key` is the issuer-list key or lies in the badge or certificate
/// namespace.
pub fn is_reserved_key(key: &str) -> bool {
    key == ISSUER_LIST_KEY || key.starts_with(BADGE_PREFIX) || key.starts_with(CERT_PREFIX)
}

/// Derive the badge slug from a display name.
///
/// ASCII spaces are removed and the remainder lowercased. Two names that
/// differ only in case or spacing therefore map to the same badge.
///
/// # Examples
///
/// ```
/// use obl_types::keys::badge_slug;
///
/// assert_eq!(badge_slug("Intro Course"), "introcourse");
/// assert_eq!(badge_slug("intro  COURSE"), "introcourse");
/// ```
pub fn badge_slug(name: &str) -> String {
    name.replace(' ', "").to_lowercase()
}

/// Ledger key for the badge with the given slug.
pub fn badge_key(slug: &str) -> String {
    format!("{BADGE_PREFIX}{slug}")
}

/// Ledger key for the certificate binding `recipient_email` to the badge
/// with the given slug.
pub fn certificate_key(recipient_email: &str, slug: &str) -> String {
    format!("{CERT_PREFIX}{recipient_email}-{slug}")
}
