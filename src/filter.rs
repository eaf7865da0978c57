//! Release filtering by release type and version

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

use crate::pivnet::{ProductFile, Release};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("provided release_type: '{release_type}' must be one of: {}", printable(.valid))]
    InvalidReleaseType {
        release_type: String,
        valid: Vec<String>,
    },
}

/// Formats release types as `['a', 'b']`
pub fn printable(release_types: &[String]) -> String {
    format!("['{}']", release_types.join("', '"))
}

/// Checks a requested release type against the catalog's valid set
///
/// An empty request means "no filter" and is always accepted.
pub fn validate_release_type(release_type: &str, valid: &[String]) -> Result<(), FilterError> {
    if release_type.is_empty() || valid.iter().any(|t| t == release_type) {
        return Ok(());
    }

    Err(FilterError::InvalidReleaseType {
        release_type: release_type.to_string(),
        valid: valid.to_vec(),
    })
}

/// Releases whose release type equals `release_type`, in input order
pub fn releases_by_release_type(
    releases: &[Release],
    release_type: &str,
    valid: &[String],
) -> Result<Vec<Release>, FilterError> {
    validate_release_type(release_type, valid)?;

    if release_type.is_empty() {
        return Ok(releases.to_vec());
    }

    Ok(releases
        .iter()
        .filter(|r| r.release_type == release_type)
        .cloned()
        .collect())
}

/// Releases whose version equals `version`, in input order
pub fn releases_by_version(releases: &[Release], version: &str) -> Vec<Release> {
    releases
        .iter()
        .filter(|r| r.version == version)
        .cloned()
        .collect()
}

/// Maps each product file's object-key basename to its download URL
pub fn download_links(product_files: &[ProductFile]) -> BTreeMap<String, String> {
    product_files
        .iter()
        .map(|file| {
            let name = Path::new(&file.aws_object_key)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(&file.aws_object_key)
                .to_string();
            (name, file.links.download.href.clone())
        })
        .collect()
}
