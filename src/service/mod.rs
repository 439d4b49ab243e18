//! Extraction service boundary.
//!
//! The converter only needs two things from the service: a reachability
//! probe and a way to turn a file into markup plus metadata. The
//! [`ExtractionService`] trait isolates the HTTP client from the
//! post-processing pipeline so the latter can run against any implementation.

#[cfg(feature = "http")]
mod http;
mod supervisor;

#[cfg(feature = "http")]
pub use http::TikaClient;
pub use supervisor::{
    launch_tika, launch_with, DockerSupervisor, LaunchOptions, ServiceSupervisor, CONTAINER_NAME,
    TIKA_IMAGE,
};

use crate::error::{Error, Result};
use crate::model::Metadata;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// Default Tika server address.
pub const DEFAULT_URL: &str = "http://localhost:9998";

/// Key of the extracted XHTML in a Tika rmeta object.
pub const CONTENT_KEY: &str = "X-TIKA:content";

/// Remediation text for builds without the HTTP client.
pub const CLIENT_UNAVAILABLE_HINT: &str =
    "untika was built without the `http` feature; rebuild with `--features http` to talk to a Tika server";

/// Whether the HTTP client was compiled into this build.
pub fn client_available() -> bool {
    cfg!(feature = "http")
}

/// Result of extracting one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// XHTML markup with page containers
    pub markup: String,

    /// Metadata extracted by the service
    pub metadata: Metadata,
}

impl Extraction {
    /// Create a new extraction.
    pub fn new(markup: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            markup: markup.into(),
            metadata,
        }
    }

    /// Parse the JSON body of a Tika `/rmeta/xml` response.
    ///
    /// The array holds the container document followed by its embedded
    /// documents. The `X-TIKA:content` entries are concatenated in array
    /// order into the markup; every other entry becomes metadata. A key seen
    /// again in a later object gets that value appended with `", "`, so the
    /// container's value always comes first. Array values are joined with
    /// `", "`.
    pub fn from_rmeta_json(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)?;

        let objects = value
            .as_array()
            .ok_or_else(|| Error::InvalidResponse("expected a JSON array".into()))?;
        if objects.is_empty() {
            return Err(Error::InvalidResponse("empty metadata list".into()));
        }

        let mut extraction = Extraction::default();
        for object in objects {
            let object = object
                .as_object()
                .ok_or_else(|| Error::InvalidResponse("expected a JSON object".into()))?;

            for (key, value) in object {
                let value = value_to_string(value);
                if key == CONTENT_KEY {
                    extraction.markup.push_str(&value);
                } else {
                    extraction
                        .metadata
                        .entry(key.clone())
                        .and_modify(|existing| {
                            existing.push_str(", ");
                            existing.push_str(&value);
                        })
                        .or_insert(value);
                }
            }
        }

        if objects.len() > 1 {
            log::debug!("Merged {} embedded documents", objects.len() - 1);
        }

        Ok(extraction)
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A service that turns documents into markup and metadata.
pub trait ExtractionService {
    /// Verify that the service is reachable.
    fn probe(&self) -> Result<()>;

    /// Extract a file.
    fn extract(&self, path: &Path) -> Result<Extraction>;
}

impl<S: ExtractionService + ?Sized> ExtractionService for &S {
    fn probe(&self) -> Result<()> {
        (**self).probe()
    }

    fn extract(&self, path: &Path) -> Result<Extraction> {
        (**self).extract(path)
    }
}

impl<S: ExtractionService + ?Sized> ExtractionService for Box<S> {
    fn probe(&self) -> Result<()> {
        (**self).probe()
    }

    fn extract(&self, path: &Path) -> Result<Extraction> {
        (**self).extract(path)
    }
}

/// Stand-in service for builds without the HTTP client.
#[cfg(not(feature = "http"))]
#[derive(Debug, Clone)]
pub struct UnavailableService {
    _private: (),
}

#[cfg(not(feature = "http"))]
impl UnavailableService {
    /// Always fails with [`Error::ClientUnavailable`].
    pub fn new(_config: ServiceConfig) -> Result<Self> {
        Err(Error::ClientUnavailable(CLIENT_UNAVAILABLE_HINT.to_string()))
    }
}

#[cfg(not(feature = "http"))]
impl ExtractionService for UnavailableService {
    fn probe(&self) -> Result<()> {
        Err(Error::ClientUnavailable(CLIENT_UNAVAILABLE_HINT.to_string()))
    }

    fn extract(&self, _path: &Path) -> Result<Extraction> {
        Err(Error::ClientUnavailable(CLIENT_UNAVAILABLE_HINT.to_string()))
    }
}

/// Service used by [`crate::TikaConverter::connect`].
#[cfg(feature = "http")]
pub type DefaultService = TikaClient;

/// Service used by [`crate::TikaConverter::connect`].
#[cfg(not(feature = "http"))]
pub type DefaultService = UnavailableService;

/// Timeout applied to service requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// One limit for the whole request
    Total(Duration),
    /// Separate connect and read limits
    Split {
        /// Connection establishment limit
        connect: Duration,
        /// Limit for waiting on the response
        read: Duration,
    },
}

impl Default for Timeout {
    fn default() -> Self {
        Timeout::Total(Duration::from_secs(10))
    }
}

/// Connection settings for the extraction service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Base URL of the Tika server
    pub url: String,

    /// Request timeout
    pub timeout: Timeout,
}

impl ServiceConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL of the reachability probe.
    pub fn probe_url(&self) -> String {
        format!("{}/tika", self.base())
    }

    /// URL of the recursive metadata endpoint with XHTML content.
    pub fn rmeta_url(&self) -> String {
        format!("{}/rmeta/xml", self.base())
    }

    fn base(&self) -> &str {
        let base = self.url.trim_end_matches('/');
        base.strip_suffix("/tika").unwrap_or(base)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            timeout: Timeout::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_urls() {
        let config = ServiceConfig::default();
        assert_eq!(config.probe_url(), "http://localhost:9998/tika");
        assert_eq!(config.rmeta_url(), "http://localhost:9998/rmeta/xml");
    }

    #[test]
    fn test_config_accepts_tika_endpoint() {
        let config = ServiceConfig::new().with_url("http://tika:9998/tika/");
        assert_eq!(config.probe_url(), "http://tika:9998/tika");
        assert_eq!(config.rmeta_url(), "http://tika:9998/rmeta/xml");
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(
            ServiceConfig::default().timeout,
            Timeout::Total(Duration::from_secs(10))
        );
    }

    #[test]
    fn test_from_rmeta_json() {
        let body = r#"[{
            "Content-Type": "application/pdf",
            "dc:creator": ["Ada", "Grace"],
            "xmpTPg:NPages": 2,
            "X-TIKA:content": "<html><body><div class=\"page\">A</div></body></html>"
        }]"#;

        let extraction = Extraction::from_rmeta_json(body).unwrap();
        assert!(extraction.markup.contains("class=\"page\""));
        assert_eq!(extraction.metadata["Content-Type"], "application/pdf");
        assert_eq!(extraction.metadata["dc:creator"], "Ada, Grace");
        assert_eq!(extraction.metadata["xmpTPg:NPages"], "2");
        assert!(!extraction.metadata.contains_key(CONTENT_KEY));
    }

    #[test]
    fn test_from_rmeta_json_embedded_documents() {
        let body = r#"[{
            "Content-Type": "application/pdf",
            "title": "Report",
            "X-TIKA:content": "<html><body><div class=\"page\">Container</div></body></html>"
        }, {
            "Content-Type": "text/plain",
            "X-TIKA:embedded_resource_path": "/notes.txt",
            "X-TIKA:content": "<html><body><p>Attachment text</p></body></html>"
        }]"#;

        let extraction = Extraction::from_rmeta_json(body).unwrap();
        assert_eq!(
            crate::parser::split_pages(&extraction.markup),
            vec!["Container", "Attachment text"]
        );
        assert_eq!(
            extraction.metadata["Content-Type"],
            "application/pdf, text/plain"
        );
        assert_eq!(extraction.metadata["title"], "Report");
        assert_eq!(
            extraction.metadata["X-TIKA:embedded_resource_path"],
            "/notes.txt"
        );
    }

    #[test]
    fn test_from_rmeta_json_without_content() {
        let extraction = Extraction::from_rmeta_json(r#"[{"Content-Type": "text/plain"}]"#).unwrap();
        assert!(extraction.markup.is_empty());
        assert_eq!(extraction.metadata.len(), 1);
    }

    #[test]
    fn test_from_rmeta_json_invalid() {
        assert!(matches!(
            Extraction::from_rmeta_json("[]"),
            Err(Error::InvalidResponse(_))
        ));
        assert!(matches!(
            Extraction::from_rmeta_json(r#"{"a": 1}"#),
            Err(Error::InvalidResponse(_))
        ));
        assert!(matches!(
            Extraction::from_rmeta_json("<html/>"),
            Err(Error::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_client_available_matches_feature() {
        assert_eq!(client_available(), cfg!(feature = "http"));
    }
}
