//! Release catalog layer
//!
//! Everything the resource knows about the upstream catalog goes through two
//! traits, so the commands never depend on a concrete transport:
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐
//! │   Catalog   │     │ VersionEnricher │
//! │ (releases)  │     │ (version#etag)  │
//! └─────────────┘     └─────────────────┘
//!        ▲                     ▲
//!        └──── PivnetClient ───┘
//! ```
//!
//! # Modules
//!
//! - [`client`]: HTTP implementation of both traits against the v2 API
//! - [`error`]: Error type for catalog operations

#[cfg(test)]
use mockall::automock;
use serde::Deserialize;

pub mod client;
pub mod error;

pub use client::PivnetClient;
pub use error::CatalogError;

/// One publishable unit of a product
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Release {
    pub id: u64,
    pub version: String,
    #[serde(default)]
    pub release_type: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Release {
    pub fn new(id: u64, version: &str, release_type: &str) -> Self {
        Self {
            id,
            version: version.to_string(),
            release_type: release_type.to_string(),
            release_date: None,
            description: None,
        }
    }
}

/// A downloadable file attached to a release
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProductFile {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub aws_object_key: String,
    #[serde(rename = "_links")]
    pub links: ProductFileLinks,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProductFileLinks {
    pub download: Link,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Link {
    pub href: String,
}

/// Read access to the release catalog
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Fetches the currently valid release-type labels
    async fn release_types(&self) -> Result<Vec<String>, CatalogError>;

    /// Fetches all releases of a product
    ///
    /// # Returns
    /// * `Ok(Vec<Release>)` - Releases in catalog order, newest first
    /// * `Err(CatalogError)` - If the fetch fails
    async fn releases_for_product_slug(
        &self,
        product_slug: &str,
    ) -> Result<Vec<Release>, CatalogError>;

    /// Finds the release of a product carrying exactly `version`
    async fn release_for_version(
        &self,
        product_slug: &str,
        version: &str,
    ) -> Result<Release, CatalogError>;

    /// Lists the product files attached to a release
    async fn product_files(
        &self,
        product_slug: &str,
        release: &Release,
    ) -> Result<Vec<ProductFile>, CatalogError>;
}

/// Expands a release into the product-version strings reported to Concourse
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait VersionEnricher: Send + Sync {
    async fn product_versions(
        &self,
        product_slug: &str,
        release: &Release,
    ) -> Result<Vec<String>, CatalogError>;
}
