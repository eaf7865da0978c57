//! Catalog test utilities

use std::collections::HashMap;

use async_trait::async_trait;

use pivnet_resource::concourse::{CheckRequest, Source, Version};
use pivnet_resource::pivnet::{Catalog, CatalogError, ProductFile, Release, VersionEnricher};

/// In-memory catalog for testing; also enriches releases with fixed ETags
pub struct MockCatalog {
    release_types: Vec<String>,
    releases: HashMap<String, Vec<Release>>,
    etags: HashMap<u64, String>,
}

impl MockCatalog {
    pub fn new(release_types: Vec<&str>) -> Self {
        Self {
            release_types: release_types.into_iter().map(|t| t.to_string()).collect(),
            releases: HashMap::new(),
            etags: HashMap::new(),
        }
    }

    /// Adds releases as `(id, version, release_type)`, newest first
    pub fn with_releases(mut self, product_slug: &str, releases: Vec<(u64, &str, &str)>) -> Self {
        self.releases.insert(
            product_slug.to_string(),
            releases
                .into_iter()
                .map(|(id, version, release_type)| Release::new(id, version, release_type))
                .collect(),
        );
        self
    }

    pub fn with_etag(mut self, release_id: u64, etag: &str) -> Self {
        self.etags.insert(release_id, etag.to_string());
        self
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn release_types(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.release_types.clone())
    }

    async fn releases_for_product_slug(
        &self,
        product_slug: &str,
    ) -> Result<Vec<Release>, CatalogError> {
        self.releases
            .get(product_slug)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(product_slug.to_string()))
    }

    async fn release_for_version(
        &self,
        product_slug: &str,
        version: &str,
    ) -> Result<Release, CatalogError> {
        self.releases_for_product_slug(product_slug)
            .await?
            .into_iter()
            .find(|r| r.version == version)
            .ok_or_else(|| CatalogError::NotFound(version.to_string()))
    }

    async fn product_files(
        &self,
        _product_slug: &str,
        _release: &Release,
    ) -> Result<Vec<ProductFile>, CatalogError> {
        Ok(vec![])
    }
}

#[async_trait]
impl VersionEnricher for MockCatalog {
    async fn product_versions(
        &self,
        _product_slug: &str,
        release: &Release,
    ) -> Result<Vec<String>, CatalogError> {
        Ok(vec![match self.etags.get(&release.id) {
            Some(etag) => format!("{}#{}", release.version, etag),
            None => release.version.clone(),
        }])
    }
}

/// Build a check request for `product_slug`
pub fn check_request(
    product_slug: &str,
    release_type: &str,
    product_version: &str,
    last_seen: Option<&str>,
) -> CheckRequest {
    CheckRequest {
        source: Source {
            api_token: "secret".to_string(),
            product_slug: product_slug.to_string(),
            release_type: release_type.to_string(),
            product_version: product_version.to_string(),
            endpoint: None,
        },
        version: last_seen.map(Version::new),
    }
}
