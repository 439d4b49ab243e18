//! Blocking HTTP client for an Apache Tika server.

use super::{Extraction, ExtractionService, ServiceConfig, Timeout};
use crate::error::{Error, Result};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_DISPOSITION};
use std::fs;
use std::path::Path;

/// Tika server client.
///
/// Files are sent to `PUT /rmeta/xml`, which returns the XHTML rendering of
/// the document together with its metadata.
#[derive(Debug, Clone)]
pub struct TikaClient {
    client: Client,
    config: ServiceConfig,
}

impl TikaClient {
    /// Create a client for the given service config.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let builder = Client::builder();
        let builder = match config.timeout {
            Timeout::Total(timeout) => builder.timeout(timeout),
            Timeout::Split { connect, read } => builder.connect_timeout(connect).timeout(read),
        };
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Service config in use.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

impl ExtractionService for TikaClient {
    fn probe(&self) -> Result<()> {
        let url = self.config.probe_url();
        log::debug!("Probing Tika server at {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| Error::ServiceUnreachable {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(Error::ServiceUnreachable {
                url,
                reason: format!("status {}", response.status()),
            });
        }

        Ok(())
    }

    fn extract(&self, path: &Path) -> Result<Extraction> {
        let data = fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().replace('"', ""))
            .unwrap_or_default();

        log::debug!("Sending {} ({} bytes) to Tika", path.display(), data.len());

        let response = self
            .client
            .put(self.config.rmeta_url())
            .header(ACCEPT, "application/json")
            .header(
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            )
            .body(data)
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(Error::Service {
                status: status.as_u16(),
                message: if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("unknown").to_string()
                } else {
                    body
                },
            });
        }

        Extraction::from_rmeta_json(&body)
    }
}
