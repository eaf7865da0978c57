//! New-version resolution
//!
//! Product versions are opaque strings. "New" is defined purely by the
//! catalog's list order (newest first), never by comparing version strings.

use tracing::debug;

use crate::pivnet::{CatalogError, Release, VersionEnricher};

/// Separates a release version from its ETag in a reported product version
pub const ETAG_SEPARATOR: char = '#';

/// Joins a release version and its ETag into a reported product version
pub fn with_etag(version: &str, etag: &str) -> String {
    format!("{}{}{}", version, ETAG_SEPARATOR, etag)
}

/// Returns the release version part of a reported product version
pub fn strip_etag(product_version: &str) -> &str {
    product_version
        .split_once(ETAG_SEPARATOR)
        .map_or(product_version, |(version, _)| version)
}

/// Expands releases into product versions, one group per release, in release order
pub async fn product_versions(
    enricher: &dyn VersionEnricher,
    product_slug: &str,
    releases: &[Release],
) -> Result<Vec<String>, CatalogError> {
    let mut versions = Vec::with_capacity(releases.len());
    for release in releases {
        versions.extend(enricher.product_versions(product_slug, release).await?);
    }
    Ok(versions)
}

/// Versions strictly newer than `last_seen`, newest first
///
/// An empty `last_seen` or one that no longer appears in `versions` makes
/// every version new.
pub fn since<'a>(versions: &'a [String], last_seen: &str) -> &'a [String] {
    if last_seen.is_empty() {
        return versions;
    }

    match versions.iter().position(|v| v == last_seen) {
        Some(index) => &versions[..index],
        None => versions,
    }
}

/// Returns the versions in the opposite order
pub fn reverse(versions: &[String]) -> Vec<String> {
    versions.iter().rev().cloned().collect()
}

/// Computes the versions to report, oldest first
///
/// When nothing is newer than `last_seen`, the newest version is reported on
/// its own so the result is never empty for a non-empty `versions`.
pub fn new_versions(versions: &[String], last_seen: &str) -> Vec<String> {
    let Some(newest) = versions.first() else {
        return Vec::new();
    };

    let newer = since(versions, last_seen);
    debug!("New versions: {:?}", newer);

    let reversed = reverse(newer);
    if reversed.is_empty() {
        return vec![newest.clone()];
    }
    reversed
}
