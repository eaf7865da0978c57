//! The `in` operation: fetch the product files of one reported version

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::concourse::{InRequest, InResponse, Metadata};
use crate::downloader::{self, DownloadError};
use crate::filter;
use crate::pivnet::{Catalog, CatalogError, Release};
use crate::versions::strip_etag;

/// File in the destination directory holding the fetched product version
pub const VERSION_FILE: &str = "version";

#[derive(Debug, Error)]
pub enum InError {
    #[error("version.product_version must be provided")]
    MissingVersion,

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub struct InCommand {
    catalog: Arc<dyn Catalog>,
    http: reqwest::Client,
    authorization: String,
    destination: PathBuf,
}

impl InCommand {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        http: reqwest::Client,
        authorization: &str,
        destination: &Path,
    ) -> Self {
        Self {
            catalog,
            http,
            authorization: authorization.to_string(),
            destination: destination.to_path_buf(),
        }
    }

    pub async fn run(&self, request: &InRequest) -> Result<InResponse, InError> {
        debug!("Received input: {:?}", request);

        let product_version = request.version.product_version.as_str();
        if product_version.is_empty() {
            return Err(InError::MissingVersion);
        }

        let product_slug = request.source.product_slug.as_str();
        let release = self
            .catalog
            .release_for_version(product_slug, strip_etag(product_version))
            .await?;
        debug!("Found release {} for version {}", release.id, product_version);

        let product_files = self.catalog.product_files(product_slug, &release).await?;
        let links = filter::download_links(&product_files);
        debug!("Download links: {:?}", links);

        tokio::fs::create_dir_all(&self.destination)
            .await
            .map_err(|source| InError::Io {
                path: self.destination.clone(),
                source,
            })?;

        let written =
            downloader::download(&self.http, &self.authorization, &self.destination, &links)
                .await?;
        info!("Downloaded {} files", written.len());

        let version_path = self.destination.join(VERSION_FILE);
        tokio::fs::write(&version_path, product_version)
            .await
            .map_err(|source| InError::Io {
                path: version_path.clone(),
                source,
            })?;

        Ok(InResponse {
            version: request.version.clone(),
            metadata: metadata(&release),
        })
    }
}

fn metadata(release: &Release) -> Vec<Metadata> {
    let mut metadata = vec![
        Metadata {
            name: "version".to_string(),
            value: release.version.clone(),
        },
        Metadata {
            name: "release_type".to_string(),
            value: release.release_type.clone(),
        },
    ];

    let optional = [
        ("release_date", &release.release_date),
        ("description", &release.description),
    ];
    for (name, value) in optional {
        if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
            metadata.push(Metadata {
                name: name.to_string(),
                value: value.clone(),
            });
        }
    }

    metadata
}
