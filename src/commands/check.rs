//! The `check` operation: report product versions new since the last one seen

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::concourse::{CheckRequest, CheckResponse, Version};
use crate::config::CHECK_LOG_PREFIX;
use crate::filter::{self, FilterError};
use crate::logging::rotation::{self, RotationError};
use crate::pivnet::{Catalog, CatalogError, VersionEnricher};
use crate::versions;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Rotation(#[from] RotationError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

pub struct CheckCommand {
    catalog: Arc<dyn Catalog>,
    enricher: Arc<dyn VersionEnricher>,
    log_file: PathBuf,
}

impl CheckCommand {
    /// `log_file` is the active log; older check logs beside it are removed on run
    pub fn new(
        catalog: Arc<dyn Catalog>,
        enricher: Arc<dyn VersionEnricher>,
        log_file: &Path,
    ) -> Self {
        Self {
            catalog,
            enricher,
            log_file: log_file.to_path_buf(),
        }
    }

    pub async fn run(&self, request: &CheckRequest) -> Result<CheckResponse, CheckError> {
        rotation::rotate(&self.log_file, CHECK_LOG_PREFIX)?;

        debug!("Received input: {:?}", request);

        debug!("Getting all valid release types");
        let release_types = self.catalog.release_types().await?;
        debug!("All release types: {}", filter::printable(&release_types));

        let release_type = request.source.release_type.as_str();
        filter::validate_release_type(release_type, &release_types)?;

        debug!("Getting all product versions");
        let product_slug = request.source.product_slug.as_str();
        let mut releases = self.catalog.releases_for_product_slug(product_slug).await?;

        if !release_type.is_empty() {
            debug!("Filtering all releases by release_type: {}", release_type);
            releases = filter::releases_by_release_type(&releases, release_type, &release_types)?;
        }

        let product_version = request.source.product_version.as_str();
        if !product_version.is_empty() {
            debug!("Filtering all releases by product_version: {}", product_version);
            releases = filter::releases_by_version(&releases, product_version);
        }

        let filtered =
            versions::product_versions(self.enricher.as_ref(), product_slug, &releases).await?;
        debug!("Filtered versions: {:?}", filtered);

        let response: CheckResponse = versions::new_versions(&filtered, request.last_seen())
            .into_iter()
            .map(Version::new)
            .collect();

        debug!("Returning output: {:?}", response);
        Ok(response)
    }
}
