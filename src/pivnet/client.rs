//! Pivotal Network v2 API client

use reqwest::{Response, StatusCode, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::USER_AGENT;
use crate::pivnet::error::CatalogError;
use crate::pivnet::{Catalog, ProductFile, Release, VersionEnricher};
use crate::versions::with_etag;

#[derive(Debug, Deserialize)]
struct ReleaseTypesResponse {
    release_types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ReleasesResponse {
    releases: Vec<Release>,
}

#[derive(Debug, Deserialize)]
struct ProductFilesResponse {
    product_files: Vec<ProductFile>,
}

/// Catalog and enricher backed by the Pivnet HTTP API
#[derive(Clone)]
pub struct PivnetClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl PivnetClient {
    /// Creates a client for `base_url` authenticating with `token`
    pub fn new(base_url: &str, token: &str) -> Result<Self, CatalogError> {
        Ok(Self {
            client: reqwest::Client::builder().user_agent(USER_AGENT).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// The underlying HTTP client, shared with the downloader
    pub fn http(&self) -> &reqwest::Client {
        &self.client
    }

    /// Value of the `Authorization` header for catalog and download requests
    pub fn authorization(&self) -> String {
        format!("Token {}", self.token)
    }

    async fn get(&self, path: &str) -> Result<Response, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, self.authorization())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_string()));
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(CatalogError::Unauthorized(format!("{} returned {}", path, status)));
        }

        if !status.is_success() {
            warn!("Pivnet returned status {}: {}", status, url);
            return Err(CatalogError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        self.get(path).await?.json().await.map_err(|e| {
            warn!("Failed to parse Pivnet response for {}: {}", path, e);
            CatalogError::InvalidResponse(e.to_string())
        })
    }
}

#[async_trait::async_trait]
impl Catalog for PivnetClient {
    async fn release_types(&self) -> Result<Vec<String>, CatalogError> {
        let response: ReleaseTypesResponse = self.get_json("/releases/release_types").await?;
        Ok(response.release_types)
    }

    async fn releases_for_product_slug(
        &self,
        product_slug: &str,
    ) -> Result<Vec<Release>, CatalogError> {
        let path = format!("/products/{}/releases", product_slug);
        let response: ReleasesResponse = self.get_json(&path).await?;
        Ok(response.releases)
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
            .ok_or_else(|| {
                CatalogError::NotFound(format!(
                    "release with version '{}' of product '{}'",
                    version, product_slug
                ))
            })
    }

    async fn product_files(
        &self,
        product_slug: &str,
        release: &Release,
    ) -> Result<Vec<ProductFile>, CatalogError> {
        let path = format!(
            "/products/{}/releases/{}/product_files",
            product_slug, release.id
        );
        let response: ProductFilesResponse = self.get_json(&path).await?;
        Ok(response.product_files)
    }
}

#[async_trait::async_trait]
impl VersionEnricher for PivnetClient {
    async fn product_versions(
        &self,
        product_slug: &str,
        release: &Release,
    ) -> Result<Vec<String>, CatalogError> {
        let path = format!("/products/{}/releases/{}", product_slug, release.id);
        let response = self.get(&path).await?;

        let etag = response
            .headers()
            .get(header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(normalize_etag)
            .filter(|e| !e.is_empty());

        Ok(vec![match etag {
            Some(etag) => with_etag(&release.version, etag),
            None => release.version.clone(),
        }])
    }
}

/// Strips the weak marker and surrounding quotes from an ETag header value
fn normalize_etag(raw: &str) -> &str {
    raw.trim()
        .strip_prefix("W/")
        .unwrap_or(raw.trim())
        .trim_matches('"')
}
