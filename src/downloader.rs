//! Sequential download of product files into the destination directory

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use reqwest::header;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Download of {name} failed with status {status}")]
    Status {
        name: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Downloads every `name -> url` link into `dir/name`
///
/// Returns the written paths in link order.
pub async fn download(
    client: &reqwest::Client,
    authorization: &str,
    dir: &Path,
    links: &BTreeMap<String, String>,
) -> Result<Vec<PathBuf>, DownloadError> {
    let mut written = Vec::with_capacity(links.len());

    for (name, url) in links {
        let path = dir.join(name);
        debug!("Downloading {} to {}", url, path.display());

        let mut response = client
            .get(url)
            .header(header::AUTHORIZATION, authorization)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Download of {} returned status {}", name, status);
            return Err(DownloadError::Status {
                name: name.clone(),
                status,
            });
        }

        let io_error = |source: std::io::Error| DownloadError::Io {
            path: path.clone(),
            source,
        };

        let mut file = File::create(&path).await.map_err(io_error)?;
        let mut bytes = 0;
        while let Some(chunk) = response.chunk().await? {
            bytes += chunk.len();
            file.write_all(&chunk).await.map_err(io_error)?;
        }
        file.flush().await.map_err(io_error)?;

        info!("Downloaded {} ({} bytes)", name, bytes);
        written.push(path);
    }

    Ok(written)
}
