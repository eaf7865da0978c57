use std::path::PathBuf;

// =============================================================================
// Catalog constants
// =============================================================================

/// Default base URL for the Pivotal Network v2 API
pub const DEFAULT_ENDPOINT: &str = "https://network.pivotal.io/api/v2";

/// User agent sent with every catalog request
pub const USER_AGENT: &str = "pivnet-resource";

// =============================================================================
// Logging constants
// =============================================================================

/// Base-name prefix shared by every log file of the `check` operation
pub const CHECK_LOG_PREFIX: &str = "pivnet-resource-check.log";

/// Base-name prefix for log files of the `in` operation
pub const IN_LOG_PREFIX: &str = "pivnet-resource-in.log";

/// Token written to the log in place of the API token
pub const API_TOKEN_REDACTION: &str = "***REDACTED-PIVNET_API_TOKEN***";

/// Environment variable overriding the directory log files are written to
pub const LOG_DIR_ENV: &str = "PIVNET_RESOURCE_LOG_DIR";

/// Default tracing filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "debug";

/// Returns the directory log files are created in.
/// Uses $PIVNET_RESOURCE_LOG_DIR if set and non-empty,
/// otherwise the system temporary directory.
pub fn log_dir() -> PathBuf {
    log_dir_with_env(std::env::var(LOG_DIR_ENV).ok(), std::env::temp_dir())
}

fn log_dir_with_env(log_dir: Option<String>, temp_dir: PathBuf) -> PathBuf {
    log_dir
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or(temp_dir)
}
