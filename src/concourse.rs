//! Request and response envelopes exchanged with Concourse over stdin/stdout

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_ENDPOINT;

/// Resource configuration from the pipeline's `source:` block
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Source {
    pub api_token: String,
    pub product_slug: String,
    pub release_type: String,
    pub product_version: String,
    pub endpoint: Option<String>,
}

/// A missing required `source:` field
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("{0} must be provided")]
pub struct SourceError(pub &'static str);

impl Source {
    /// Ensures the fields every operation depends on are present
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.api_token.is_empty() {
            return Err(SourceError("api_token"));
        }
        if self.product_slug.is_empty() {
            return Err(SourceError("product_slug"));
        }
        Ok(())
    }

    /// Catalog base URL, falling back to the public endpoint
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_ENDPOINT)
    }
}

/// One emitted version of the resource
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Version {
    #[serde(default)]
    pub product_version: String,
}

impl Version {
    pub fn new(product_version: impl Into<String>) -> Self {
        Self {
            product_version: product_version.into(),
        }
    }
}

/// Input of the `check` script
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CheckRequest {
    pub source: Source,
    #[serde(default)]
    pub version: Option<Version>,
}

impl CheckRequest {
    /// Last product version reported to Concourse, empty on the first check
    pub fn last_seen(&self) -> &str {
        self.version
            .as_ref()
            .map(|v| v.product_version.as_str())
            .unwrap_or_default()
    }
}

/// Output of the `check` script, oldest new version first
pub type CheckResponse = Vec<Version>;

/// Input of the `in` script
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InRequest {
    pub source: Source,
    pub version: Version,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Name/value pair shown in the Concourse UI for a fetched version
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Metadata {
    pub name: String,
    pub value: String,
}

/// Output of the `in` script
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InResponse {
    pub version: Version,
    pub metadata: Vec<Metadata>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn check_request_without_version_has_empty_last_seen() {
        let request = serde_json::from_value::<CheckRequest>(json!({
            "source": {
                "api_token": "secret",
                "product_slug": "p-mysql"
            }
        }))
        .unwrap();

        assert_eq!(request.last_seen(), "");
        assert_eq!(request.source.release_type, "");
        assert_eq!(request.source.endpoint(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn check_request_from_full_object_parses_all_fields() {
        let request = serde_json::from_value::<CheckRequest>(json!({
            "source": {
                "api_token": "secret",
                "product_slug": "p-mysql",
                "release_type": "Minor Release",
                "product_version": "1.7.0",
                "endpoint": "http://localhost:8080"
            },
            "version": { "product_version": "1.6.0#abc" }
        }))
        .unwrap();

        assert_eq!(
            request,
            CheckRequest {
                source: Source {
                    api_token: "secret".to_string(),
                    product_slug: "p-mysql".to_string(),
                    release_type: "Minor Release".to_string(),
                    product_version: "1.7.0".to_string(),
                    endpoint: Some("http://localhost:8080".to_string()),
                },
                version: Some(Version::new("1.6.0#abc")),
            }
        );
        assert_eq!(request.last_seen(), "1.6.0#abc");
        assert_eq!(request.source.endpoint(), "http://localhost:8080");
    }

    #[test]
    fn check_request_with_null_version_has_empty_last_seen() {
        let request = serde_json::from_value::<CheckRequest>(json!({
            "source": { "api_token": "secret", "product_slug": "p-mysql" },
            "version": null
        }))
        .unwrap();

        assert_eq!(request.last_seen(), "");
    }

    #[test]
    fn validate_requires_api_token() {
        let source = Source {
            product_slug: "p-mysql".to_string(),
            ..Default::default()
        };

        assert_eq!(source.validate(), Err(SourceError("api_token")));
        assert_eq!(
            source.validate().unwrap_err().to_string(),
            "api_token must be provided"
        );
    }

    #[test]
    fn validate_requires_product_slug() {
        let source = Source {
            api_token: "secret".to_string(),
            ..Default::default()
        };

        assert_eq!(source.validate(), Err(SourceError("product_slug")));
    }

    #[test]
    fn check_response_serializes_as_array_of_versions() {
        let response: CheckResponse = vec![Version::new("2.0"), Version::new("3.0")];

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!([{ "product_version": "2.0" }, { "product_version": "3.0" }])
        );
    }
}
